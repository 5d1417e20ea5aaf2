//! The session-level error type.

use thiserror::Error;

use crate::color::ColorParseError;
use crate::decode::{DecodeError, InputError};
use crate::encode::EncodeError;
use crate::overlay::text::FontError;

/// Errors returned by [`ImageSession`](crate::ImageSession) entry points.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    /// An edit was requested before a surface was attached.
    #[error("Surface not ready: attach a surface before editing")]
    SurfaceNotReady,

    /// An edit was requested before an image was loaded.
    #[error("No image loaded")]
    NoImage,

    /// No pending overlay at the given index.
    #[error("No pending overlay at index {0}")]
    OverlayNotFound(usize),

    /// Text cannot be rasterized until a font is installed.
    #[error("No font installed: text overlays cannot be confirmed")]
    FontUnavailable,

    #[error(transparent)]
    InvalidFont(#[from] FontError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Color(#[from] ColorParseError),

    /// Resize target had a zero dimension.
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },
}
