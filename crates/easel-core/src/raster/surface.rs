//! The drawable surface abstraction.

use super::Raster;
use crate::geometry::PixelRect;

/// The single drawable resource owned by a session.
///
/// Implementations expose clear/resize/read/write plus mutable access to an
/// RGBA drawing target that overlay and freehand rasterization draw onto.
pub trait Surface {
    /// Current surface dimensions.
    fn dimensions(&self) -> (u32, u32);

    /// Resize the surface. The contents are cleared to transparent.
    fn resize(&mut self, width: u32, height: u32);

    /// Clear every pixel to transparent without changing dimensions.
    fn clear(&mut self);

    /// Copy the pixels inside `rect` (clamped to the surface).
    fn read_pixels(&self, rect: PixelRect) -> Option<Raster>;

    /// Replace the surface dimensions and contents with `raster`.
    fn put_raster(&mut self, raster: &Raster);

    /// Drawing target for stroking and text rasterization.
    fn canvas_mut(&mut self) -> &mut image::RgbaImage;

    /// Copy of the whole surface.
    fn contents(&self) -> Raster {
        let (width, height) = self.dimensions();
        self.read_pixels(PixelRect::full(width, height))
            .unwrap_or_else(|| Raster::transparent(width, height))
    }
}

/// In-memory surface backed by an `image::RgbaImage`.
#[derive(Debug, Clone)]
pub struct PixelSurface {
    canvas: image::RgbaImage,
}

impl PixelSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            canvas: image::RgbaImage::new(width, height),
        }
    }
}

impl Default for PixelSurface {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl Surface for PixelSurface {
    fn dimensions(&self) -> (u32, u32) {
        self.canvas.dimensions()
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.canvas = image::RgbaImage::new(width, height);
    }

    fn clear(&mut self) {
        for px in self.canvas.pixels_mut() {
            *px = image::Rgba([0, 0, 0, 0]);
        }
    }

    fn read_pixels(&self, rect: PixelRect) -> Option<Raster> {
        let (width, height) = self.canvas.dimensions();
        let view = Raster {
            width,
            height,
            pixels: self.canvas.as_raw().clone(),
        };
        if rect == PixelRect::full(width, height) && !view.is_empty() {
            return Some(view);
        }
        view.region(rect)
    }

    fn put_raster(&mut self, raster: &Raster) {
        // Buffer length is guaranteed by Raster's constructors.
        self.canvas = raster
            .to_rgba_image()
            .unwrap_or_else(|| image::RgbaImage::new(raster.width, raster.height));
    }

    fn canvas_mut(&mut self) -> &mut image::RgbaImage {
        &mut self.canvas
    }
}
