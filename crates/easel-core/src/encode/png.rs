//! Lossless PNG encoding.

use image::codecs::png::PngEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;

use super::{check_raster, EncodeError};
use crate::raster::Raster;

/// Encode a raster to PNG bytes, preserving alpha.
pub fn encode_png(raster: &Raster) -> Result<Vec<u8>, EncodeError> {
    check_raster(raster)?;

    let mut buffer = Cursor::new(Vec::new());
    PngEncoder::new(&mut buffer)
        .write_image(
            &raster.pixels,
            raster.width,
            raster.height,
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::test_support::gradient;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_png_signature() {
        let png = encode_png(&gradient(4, 4)).unwrap();
        assert_eq!(&png[0..8], &PNG_SIGNATURE);
    }

    #[test]
    fn test_png_is_lossless() {
        let mut raster = gradient(9, 5);
        // Make one pixel semi-transparent to check alpha survives
        raster.pixels[3] = 77;
        let png = encode_png(&raster).unwrap();
        let decoded = image::load_from_memory(&png).unwrap().into_rgba8();
        assert_eq!(decoded.into_raw(), raster.pixels);
    }

    #[test]
    fn test_png_zero_dimensions() {
        assert!(matches!(
            encode_png(&Raster::transparent(3, 0)),
            Err(EncodeError::InvalidDimensions { width: 3, height: 0 })
        ));
    }
}
