//! Image loading: input validation and decoding.
//!
//! This module provides functionality for:
//! - Validating an [`ImageSource`] (MIME type, size ceiling, empty input)
//! - Parsing `data:` URLs into bytes
//! - Decoding JPEG, PNG, GIF, BMP and WebP into a [`Raster`](crate::raster::Raster)
//! - Applying EXIF orientation so the raster is upright
//!
//! # Architecture
//!
//! Decoding is synchronous and single-threaded. The session wraps it in a
//! load ticket so the caller can run it off the UI path and hand the result
//! back later; see [`ImageSession::begin_load`](crate::ImageSession::begin_load).
//!
//! # Examples
//!
//! ```ignore
//! use easel_core::decode::{decode_image, validate, ImageSource, DEFAULT_MAX_INPUT_BYTES};
//!
//! let source = ImageSource::from_bytes(std::fs::read("photo.jpg").unwrap())
//!     .with_mime_type("image/jpeg");
//! validate(&source, DEFAULT_MAX_INPUT_BYTES).unwrap();
//! let raster = decode_image(&source.bytes).unwrap();
//! println!("Decoded {}x{} image", raster.width, raster.height);
//! ```

mod image_file;
mod input;
mod types;

pub use image_file::decode_image;
pub use input::{validate, ImageSource, InputError, DEFAULT_MAX_INPUT_BYTES};
pub use types::DecodeError;
pub(crate) use types::Orientation;
