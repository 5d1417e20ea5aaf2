//! Cropping a raster to a canvas-space rectangle.
//!
//! # Coordinate System
//!
//! - Coordinates are canvas pixels of the raster being cropped, i.e. the
//!   current (post-rotation) canvas, not the originally loaded image
//! - Width/height may be negative; the rectangle is normalized first
//! - Edges are rounded to whole pixels and clamped to the raster bounds

use crate::geometry::CropRect;
use crate::raster::Raster;

/// Crop `image` to `rect`.
///
/// # Returns
///
/// A new `Raster` containing only the cropped region, or `None` when the
/// rectangle covers less than one pixel of the image in either direction.
///
/// # Example
///
/// ```ignore
/// let cropped = crop_raster(&image, &CropRect::new(0.0, 0.0, 100.0, 100.0)).unwrap();
/// assert_eq!(cropped.dimensions(), (100, 100));
/// ```
pub fn crop_raster(image: &Raster, rect: &CropRect) -> Option<Raster> {
    let region = rect.to_pixel_rect(image.width, image.height)?;

    // Fast path: full crop returns a clone
    if region.x == 0 && region.y == 0 && region.width == image.width && region.height == image.height
    {
        return Some(image.clone());
    }

    image.region(region)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::test_support::gradient;

    #[test]
    fn test_full_crop() {
        let img = gradient(100, 100);
        let result = crop_raster(&img, &CropRect::new(0.0, 0.0, 100.0, 100.0)).unwrap();
        assert_eq!(result, img);
    }

    #[test]
    fn test_left_square_of_landscape() {
        let img = gradient(200, 100);
        let result = crop_raster(&img, &CropRect::new(0.0, 0.0, 100.0, 100.0)).unwrap();
        assert_eq!(result.dimensions(), (100, 100));
    }

    #[test]
    fn test_center_crop_pixel_values() {
        let img = gradient(10, 10);
        let result = crop_raster(&img, &CropRect::new(2.0, 3.0, 6.0, 4.0)).unwrap();
        assert_eq!(result.dimensions(), (6, 4));
        // First pixel should be from position (2, 3) in the original
        assert_eq!(result.pixel(0, 0), img.pixel(2, 3));
        assert_eq!(result.pixel(5, 3), img.pixel(7, 6));
    }

    #[test]
    fn test_negative_extent_is_normalized() {
        let img = gradient(10, 10);
        let forward = crop_raster(&img, &CropRect::new(2.0, 2.0, 5.0, 5.0)).unwrap();
        let backward = crop_raster(&img, &CropRect::new(7.0, 7.0, -5.0, -5.0)).unwrap();
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_crop_clamps_to_bounds() {
        let img = gradient(10, 10);
        let result = crop_raster(&img, &CropRect::new(8.0, 8.0, 50.0, 50.0)).unwrap();
        assert_eq!(result.dimensions(), (2, 2));
    }

    #[test]
    fn test_zero_area_is_rejected() {
        let img = gradient(10, 10);
        assert!(crop_raster(&img, &CropRect::new(3.0, 3.0, 0.0, 0.0)).is_none());
        assert!(crop_raster(&img, &CropRect::new(3.0, 3.0, 5.0, 0.0)).is_none());
    }

    #[test]
    fn test_outside_is_rejected() {
        let img = gradient(10, 10);
        assert!(crop_raster(&img, &CropRect::new(-20.0, 0.0, 10.0, 10.0)).is_none());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
