//! The export adapter: turn the current raster into file bytes.
//!
//! This module provides functionality for:
//! - Encoding to JPEG with configurable quality (alpha flattened onto white)
//! - Encoding to lossless PNG
//! - Wrapping a PNG in an SVG document
//!
//! # Architecture
//!
//! Export is a pure read. Nothing here touches history or the session; the
//! session hands over a copy of its surface and gets bytes back.
//!
//! # Examples
//!
//! ```ignore
//! use easel_core::encode::{export_raster, ExportFormat, ExportOptions};
//!
//! let exported = export_raster(&raster, &ExportOptions::new(ExportFormat::Png), "image-editor-export")?;
//! assert_eq!(exported.file_name, "image-editor-export.png");
//! ```

mod jpeg;
mod png;
mod svg;

pub use jpeg::{encode_jpeg, JPEG_BACKGROUND};
pub use png::encode_png;
pub use svg::encode_svg;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::raster::{byte_len, Raster};

/// Default JPEG quality when the caller does not pick one.
pub const DEFAULT_JPEG_QUALITY: u8 = 92;

/// Errors that can occur during encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The underlying encoder failed
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

/// Output file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Jpeg,
    #[default]
    Png,
    Svg,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Jpeg, ExportFormat::Png, ExportFormat::Svg];

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Jpeg => "jpeg",
            ExportFormat::Png => "png",
            ExportFormat::Svg => "svg",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Jpeg => "image/jpeg",
            ExportFormat::Png => "image/png",
            ExportFormat::Svg => "image/svg+xml",
        }
    }

    /// Parse a format name as it arrives from a UI (`"jpg"` is accepted).
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Some(ExportFormat::Jpeg),
            "png" => Some(ExportFormat::Png),
            "svg" => Some(ExportFormat::Svg),
            _ => None,
        }
    }
}

/// What to export and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportOptions {
    pub format: ExportFormat,
    /// JPEG quality (1-100). Ignored by the lossless formats.
    pub quality: u8,
}

impl ExportOptions {
    pub fn new(format: ExportFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::default(),
            quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

/// An encoded file ready to be handed to a download or persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedImage {
    pub format: ExportFormat,
    pub mime_type: String,
    pub file_name: String,
    pub width: u32,
    pub height: u32,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

/// `<stem>.<ext>` for the given format.
pub fn file_name(stem: &str, format: ExportFormat) -> String {
    format!("{}.{}", stem, format.extension())
}

/// Encode `raster` per `options`.
pub fn export_raster(
    raster: &Raster,
    options: &ExportOptions,
    file_stem: &str,
) -> Result<ExportedImage, EncodeError> {
    let bytes = match options.format {
        ExportFormat::Jpeg => encode_jpeg(raster, options.quality)?,
        ExportFormat::Png => encode_png(raster)?,
        ExportFormat::Svg => encode_svg(raster)?,
    };

    Ok(ExportedImage {
        format: options.format,
        mime_type: options.format.mime_type().to_string(),
        file_name: file_name(file_stem, options.format),
        width: raster.width,
        height: raster.height,
        bytes,
    })
}

/// Shared dimension and buffer checks for every encoder.
pub(crate) fn check_raster(raster: &Raster) -> Result<(), EncodeError> {
    if raster.width == 0 || raster.height == 0 {
        return Err(EncodeError::InvalidDimensions {
            width: raster.width,
            height: raster.height,
        });
    }

    let expected = byte_len(raster.width, raster.height);
    if raster.pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: raster.pixels.len(),
        });
    }

    Ok(())
}
