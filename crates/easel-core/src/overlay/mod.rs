//! Pending annotations: text and shapes that float above the raster until
//! they are confirmed (rasterized) or cancelled.
//!
//! # Architecture
//!
//! An [`Overlay`] is a position, a color and an [`OverlayShape`]. Each shape
//! variant carries only the fields it needs, so a circle can never have a
//! font size and a text overlay can never have a radius.
//!
//! Positions are canvas pixels of the current surface:
//! - `Text` and `Rect`: top-left corner
//! - `Circle`: center
//! - `Line`: start point, the end is `position + (dx, dy)`
//!
//! Rasterization lives in [`draw`] (strokes) and [`text`] (glyphs).

pub mod draw;
pub mod text;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::geometry::{CropRect, Point};

pub use text::FontHandle;

/// Color and size used for new text overlays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextStyle {
    pub color: Color,
    /// Font size in pixels.
    pub font_size: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            font_size: 20.0,
        }
    }
}

/// Color and width of a stroked path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StrokeStyle {
    pub color: Color,
    /// Line width in pixels.
    pub width: f32,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 2.0,
        }
    }
}

/// Shape choices offered by the shape tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rect,
    Circle,
    Line,
}

impl ShapeKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "rect" | "rectangle" => Some(ShapeKind::Rect),
            "circle" => Some(ShapeKind::Circle),
            "line" => Some(ShapeKind::Line),
            _ => None,
        }
    }
}

/// Geometry of one overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum OverlayShape {
    #[serde(rename_all = "camelCase")]
    Text { text: String, font_size: f32 },
    Rect { width: f64, height: f64 },
    Circle { radius: f64 },
    Line { dx: f64, dy: f64 },
}

impl OverlayShape {
    pub fn is_text(&self) -> bool {
        matches!(self, OverlayShape::Text { .. })
    }

    pub fn shape_kind(&self) -> Option<ShapeKind> {
        match self {
            OverlayShape::Text { .. } => None,
            OverlayShape::Rect { .. } => Some(ShapeKind::Rect),
            OverlayShape::Circle { .. } => Some(ShapeKind::Circle),
            OverlayShape::Line { .. } => Some(ShapeKind::Line),
        }
    }
}

/// A pending annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overlay {
    pub position: Point,
    pub color: Color,
    pub shape: OverlayShape,
}

impl Overlay {
    pub fn text(position: Point, text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            position,
            color: style.color,
            shape: OverlayShape::Text {
                text: text.into(),
                font_size: style.font_size,
            },
        }
    }

    pub fn shape(position: Point, color: Color, shape: OverlayShape) -> Self {
        Self {
            position,
            color,
            shape,
        }
    }

    /// Axis-aligned bounding box in canvas pixels.
    ///
    /// Text is measured with `font` when one is installed, otherwise it is
    /// estimated from the character count.
    pub fn bounds(&self, font: Option<&FontHandle>) -> CropRect {
        let Point { x, y } = self.position;
        match &self.shape {
            OverlayShape::Text { text, font_size } => {
                let (w, h) = text::measure(font, text, *font_size);
                CropRect::new(x, y, w, h)
            }
            OverlayShape::Rect { width, height } => {
                CropRect::new(x, y, *width, *height).normalized()
            }
            OverlayShape::Circle { radius } => {
                let r = radius.abs();
                CropRect::new(x - r, y - r, 2.0 * r, 2.0 * r)
            }
            OverlayShape::Line { dx, dy } => CropRect::new(x, y, *dx, *dy).normalized(),
        }
    }

    /// True when `point` falls inside the bounds grown by `padding` on every
    /// side.
    pub fn hit_test(&self, point: Point, padding: f64, font: Option<&FontHandle>) -> bool {
        let b = self.bounds(font);
        point.x >= b.left() - padding
            && point.x <= b.right() + padding
            && point.y >= b.top() - padding
            && point.y <= b.bottom() + padding
    }

    pub fn move_to(&mut self, position: Point) {
        self.position = position;
    }
}

/// Topmost overlay under `point`, searching from the most recently added.
pub fn hit_test_topmost(
    overlays: &[Overlay],
    point: Point,
    padding: f64,
    font: Option<&FontHandle>,
) -> Option<usize> {
    overlays
        .iter()
        .rposition(|overlay| overlay.hit_test(point, padding, font))
}
