//! JPEG encoding for export.
//!
//! JPEG has no alpha channel, so transparent pixels (for example the margins
//! left by a zoom below 1x) are composited onto white before encoding.

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;

use super::{check_raster, EncodeError};
use crate::raster::Raster;

/// Background used when flattening alpha for JPEG output.
pub const JPEG_BACKGROUND: [u8; 3] = [255, 255, 255];

/// Encode a raster to JPEG bytes.
///
/// # Arguments
///
/// * `raster` - RGBA source
/// * `quality` - JPEG quality (1-100, where 100 is highest quality)
///
/// # Returns
///
/// JPEG-encoded bytes on success, or an error if encoding fails.
///
/// # Example
///
/// ```ignore
/// use easel_core::encode::encode_jpeg;
/// use easel_core::raster::Raster;
///
/// let raster = Raster::filled(100, 100, [128, 128, 128, 255]);
/// let jpeg = encode_jpeg(&raster, 90).unwrap();
///
/// // Verify JPEG magic bytes
/// assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
/// ```
pub fn encode_jpeg(raster: &Raster, quality: u8) -> Result<Vec<u8>, EncodeError> {
    check_raster(raster)?;

    let rgb = raster.flatten_rgb(JPEG_BACKGROUND);

    // Clamp quality to valid range (1-100)
    let quality = quality.clamp(1, 100);

    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);

    encoder
        .write_image(&rgb, raster.width, raster.height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}


// ============================================================================
// Property-Based Tests
// ============================================================================
