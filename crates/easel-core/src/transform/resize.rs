//! Resampling a raster to new dimensions using the `image` crate's filters.

use serde::{Deserialize, Serialize};

use crate::raster::Raster;

/// Filter type for resize operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    #[default]
    Bilinear,
    /// Lanczos3 interpolation (slower, highest quality).
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// Resize a raster to exact dimensions.
///
/// Returns `None` when either target dimension is zero or the source is
/// empty.
pub fn resize_raster(image: &Raster, width: u32, height: u32, filter: FilterType) -> Option<Raster> {
    if width == 0 || height == 0 || image.is_empty() {
        return None;
    }

    // Fast path: if dimensions match, just clone
    if image.width == width && image.height == height {
        return Some(image.clone());
    }

    let rgba = image.to_rgba_image()?;
    let resized = image::imageops::resize(&rgba, width, height, filter.to_image_filter());
    Some(Raster::from_rgba_image(resized))
}
