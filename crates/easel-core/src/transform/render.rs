//! Rendering a source raster through a view transform.
//!
//! The renderer uses inverse mapping: for each pixel center in the output
//! canvas we find the source position that lands on it and sample there.
//! Output pixels that map outside the source are transparent.
//!
//! Quarter-turn rotations and flips at zoom 1 are sampled with nearest
//! neighbour, which makes them lossless. Everything else uses bilinear
//! interpolation on premultiplied alpha.

use super::{Affine, ViewTransform};
use crate::geometry::Point;
use crate::raster::{Raster, CHANNELS};

/// Interpolation filter for transform rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationFilter {
    /// Exact pixel copies; used when the matrix is axis aligned at unit scale.
    Nearest,
    /// Smooth interpolation for arbitrary angles and zoom levels.
    #[default]
    Bilinear,
}

/// Render `source` through `transform` onto a fresh canvas.
///
/// The canvas takes the source dimensions, swapped on 90°/270° turns. The
/// source is always drawn at its natural size; all scaling comes from the
/// composed matrix.
pub fn render_view(source: &Raster, transform: &ViewTransform) -> Raster {
    let (canvas_w, canvas_h) = transform.canvas_dimensions(source.width, source.height);
    let matrix = transform.matrix(source.width, source.height);
    let filter = if matrix.is_axis_aligned_unit() {
        InterpolationFilter::Nearest
    } else {
        InterpolationFilter::Bilinear
    };
    render_affine(source, &matrix, canvas_w, canvas_h, filter)
}

/// Draw `source` through the forward matrix `matrix` onto a transparent
/// `width x height` canvas.
pub fn render_affine(
    source: &Raster,
    matrix: &Affine,
    width: u32,
    height: u32,
    filter: InterpolationFilter,
) -> Raster {
    let mut output = Raster::transparent(width, height);
    if source.is_empty() {
        return output;
    }
    let Some(inverse) = matrix.invert() else {
        return output;
    };

    for dst_y in 0..height {
        for dst_x in 0..width {
            let src = inverse.apply(Point::new(dst_x as f64 + 0.5, dst_y as f64 + 0.5));

            let pixel = match filter {
                InterpolationFilter::Nearest => sample_nearest(source, src.x, src.y),
                InterpolationFilter::Bilinear => sample_bilinear(source, src.x - 0.5, src.y - 0.5),
            };

            let dst_idx = (dst_y as usize * width as usize + dst_x as usize) * CHANNELS;
            output.pixels[dst_idx..dst_idx + CHANNELS].copy_from_slice(&pixel);
        }
    }

    output
}

/// Pixel containing `(x, y)`, transparent outside the source.
fn sample_nearest(image: &Raster, x: f64, y: f64) -> [u8; 4] {
    if x < 0.0 || y < 0.0 {
        return [0; 4];
    }
    image.pixel(x.floor() as u32, y.floor() as u32).unwrap_or([0; 4])
}

/// Premultiplied RGBA of a pixel, zero outside the image.
#[inline]
fn premultiplied(image: &Raster, px: i64, py: i64) -> [f64; 4] {
    if px < 0 || py < 0 {
        return [0.0; 4];
    }
    match image.pixel(px as u32, py as u32) {
        Some([r, g, b, a]) => {
            let alpha = a as f64 / 255.0;
            [r as f64 * alpha, g as f64 * alpha, b as f64 * alpha, a as f64]
        }
        None => [0.0; 4],
    }
}

/// Sample a pixel using bilinear interpolation.
///
/// `(x, y)` is in pixel-index space (pixel `i` has its center at `i`).
/// The 4 nearest pixels are weighted by distance; neighbours outside the
/// image count as transparent so edges fade instead of smearing.
fn sample_bilinear(image: &Raster, x: f64, y: f64) -> [u8; 4] {
    let (w, h) = (image.width as f64, image.height as f64);
    if x <= -1.0 || y <= -1.0 || x >= w || y >= h {
        return [0; 4];
    }

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    // Fractional distances
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = premultiplied(image, x0, y0);
    let p10 = premultiplied(image, x0 + 1, y0);
    let p01 = premultiplied(image, x0, y0 + 1);
    let p11 = premultiplied(image, x0 + 1, y0 + 1);

    let mut acc = [0.0f64; 4];
    for i in 0..4 {
        acc[i] = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
    }

    let alpha = acc[3];
    if alpha < 0.5 {
        return [0; 4];
    }
    let unpremultiply = 255.0 / alpha;
    [
        (acc[0] * unpremultiply).clamp(0.0, 255.0).round() as u8,
        (acc[1] * unpremultiply).clamp(0.0, 255.0).round() as u8,
        (acc[2] * unpremultiply).clamp(0.0, 255.0).round() as u8,
        alpha.clamp(0.0, 255.0).round() as u8,
    ]
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::raster::test_support::gradient;
    use crate::transform::FlipAxis;
    use proptest::prelude::*;

    proptest! {
        /// Property: four quarter turns from the source reproduce it exactly.
        #[test]
        fn prop_four_quarter_turns_are_lossless(
            (width, height) in (1u32..=24, 1u32..=24),
        ) {
            let img = gradient(width, height);
            let mut t = ViewTransform::identity();
            for _ in 0..4 {
                t.rotate_by(90);
            }
            prop_assert_eq!(t.rotation_degrees, 0);
            prop_assert_eq!(render_view(&img, &t), img);
        }

        /// Property: a quarter-turn render permutes pixels without loss.
        #[test]
        fn prop_quarter_turn_preserves_pixel_multiset(
            (width, height) in (1u32..=16, 1u32..=16),
            turns in 0i32..4,
            flip_h in any::<bool>(),
        ) {
            let img = gradient(width, height);
            let mut t = ViewTransform::identity();
            t.rotate_by(turns * 90);
            if flip_h {
                t.toggle_flip(FlipAxis::Horizontal);
            }
            let out = render_view(&img, &t);

            let mut a: Vec<&[u8]> = img.pixels.chunks(4).collect();
            let mut b: Vec<&[u8]> = out.pixels.chunks(4).collect();
            a.sort();
            b.sort();
            prop_assert_eq!(a, b);
        }

        /// Property: canvas dimensions follow the swap rule for any angle.
        #[test]
        fn prop_canvas_dimensions_follow_rotation(
            (width, height) in (1u32..=32, 1u32..=32),
            degrees in -720i32..720,
        ) {
            let img = gradient(width, height);
            let mut t = ViewTransform::identity();
            t.rotate_by(degrees);
            let out = render_view(&img, &t);
            if degrees.rem_euclid(180) == 90 {
                prop_assert_eq!(out.dimensions(), (height, width));
            } else {
                prop_assert_eq!(out.dimensions(), (width, height));
            }
        }
    }
}
