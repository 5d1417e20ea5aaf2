//! The raster store: owned bitmaps and the drawable surface they live on.
//!
//! A [`Raster`] is a plain RGBA buffer that can be cloned, cropped or
//! snapshotted. A [`Surface`] is the single drawable resource a session
//! edits; the session never holds a browser handle, only something that
//! implements this trait.

mod surface;

pub use surface::{PixelSurface, Surface};

use crate::geometry::PixelRect;

/// Bytes per RGBA pixel.
pub const CHANNELS: usize = 4;

/// An RGBA bitmap with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA pixel data in row-major order (4 bytes per pixel).
    /// Length is always width * height * 4.
    pub pixels: Vec<u8>,
}

impl Raster {
    /// Create a raster from dimensions and pixel data.
    ///
    /// Returns `None` if the buffer length does not match the dimensions.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        if pixels.len() != byte_len(width, height) {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    /// A fully transparent raster.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u8; byte_len(width, height)],
        }
    }

    /// A raster filled with a single color.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let mut pixels = Vec::with_capacity(byte_len(width, height));
        for _ in 0..(width as usize * height as usize) {
            pixels.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Expand packed RGB data (3 bytes per pixel) to opaque RGBA.
    pub fn from_rgb(width: u32, height: u32, rgb: &[u8]) -> Option<Self> {
        if rgb.len() != width as usize * height as usize * 3 {
            return None;
        }
        let mut pixels = Vec::with_capacity(byte_len(width, height));
        for px in rgb.chunks_exact(3) {
            pixels.extend_from_slice(&[px[0], px[1], px[2], 255]);
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    pub fn into_rgba_image(self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels)
    }

    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// RGBA value at `(x, y)`, or `None` outside the raster.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * CHANNELS;
        Some([
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ])
    }

    /// Copy the pixels inside `rect` into a new raster.
    ///
    /// The region is clamped to the raster bounds; `None` if nothing is left.
    pub fn region(&self, rect: PixelRect) -> Option<Raster> {
        let left = rect.x.min(self.width);
        let top = rect.y.min(self.height);
        let right = rect.x.saturating_add(rect.width).min(self.width);
        let bottom = rect.y.saturating_add(rect.height).min(self.height);

        let out_width = right.saturating_sub(left);
        let out_height = bottom.saturating_sub(top);
        if out_width == 0 || out_height == 0 {
            return None;
        }

        let row_bytes = out_width as usize * CHANNELS;
        let mut output = Vec::with_capacity(row_bytes * out_height as usize);

        // Copy pixel data row by row
        for y in top..bottom {
            let start = (y as usize * self.width as usize + left as usize) * CHANNELS;
            output.extend_from_slice(&self.pixels[start..start + row_bytes]);
        }

        Some(Raster {
            width: out_width,
            height: out_height,
            pixels: output,
        })
    }

    /// Drop the alpha channel by compositing over an opaque background.
    pub fn flatten_rgb(&self, background: [u8; 3]) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.pixel_count() as usize * 3);
        for px in self.pixels.chunks_exact(CHANNELS) {
            let alpha = px[3] as u32;
            for c in 0..3 {
                let v = (px[c] as u32 * alpha + background[c] as u32 * (255 - alpha) + 127) / 255;
                rgb.push(v as u8);
            }
        }
        rgb
    }
}

pub(crate) fn byte_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * CHANNELS
}
