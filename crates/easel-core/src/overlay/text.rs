//! Text measurement and rasterization.
//!
//! The core ships no font bytes. A host installs one TrueType/OpenType font
//! with [`FontHandle::from_bytes`]; without it text can still be placed and
//! dragged (its box is estimated) but not confirmed.

use ab_glyph::{FontArc, PxScale};
use imageproc::drawing::{draw_text_mut, text_size};
use thiserror::Error;

use crate::color::Color;
use crate::geometry::Point;

/// Average advance of a glyph relative to the font size, used when no font
/// is available to measure with.
const ESTIMATED_ADVANCE: f64 = 0.6;

/// Line height relative to the font size.
const LINE_HEIGHT: f64 = 1.2;

/// The font bytes could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid font data: {0}")]
pub struct FontError(pub String);

/// A parsed font shared by reference count.
#[derive(Clone)]
pub struct FontHandle {
    font: FontArc,
}

impl FontHandle {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, FontError> {
        let font = FontArc::try_from_vec(bytes).map_err(|e| FontError(e.to_string()))?;
        Ok(Self { font })
    }

    pub fn font(&self) -> &FontArc {
        &self.font
    }
}

impl std::fmt::Debug for FontHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontHandle").finish_non_exhaustive()
    }
}

/// Width and height of `text` at `font_size` pixels.
pub fn measure(font: Option<&FontHandle>, text: &str, font_size: f32) -> (f64, f64) {
    let size = f64::from(font_size.max(1.0));
    match font {
        Some(handle) if !text.is_empty() => {
            let (w, h) = text_size(PxScale::from(font_size.max(1.0)), handle.font(), text);
            (w as f64, (h as f64).max(size))
        }
        _ => {
            let chars = text.chars().count().max(1) as f64;
            (chars * size * ESTIMATED_ADVANCE, size * LINE_HEIGHT)
        }
    }
}

/// Draw `text` with its top-left corner at `position`.
pub fn draw_text(
    canvas: &mut image::RgbaImage,
    font: &FontHandle,
    text: &str,
    position: Point,
    font_size: f32,
    color: Color,
) {
    draw_text_mut(
        canvas,
        color.to_rgba(),
        position.x.round() as i32,
        position.y.round() as i32,
        PxScale::from(font_size.max(1.0)),
        font.font(),
        text,
    );
}
