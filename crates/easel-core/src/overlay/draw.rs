//! Stroking shapes and freehand segments onto the surface.
//!
//! `imageproc` draws one-pixel outlines. Wider strokes are built by stamping
//! filled discs along each segment, and by drawing concentric outlines for
//! circles.

use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_circle_mut, draw_line_segment_mut};

use super::text::{draw_text, FontHandle};
use super::{Overlay, OverlayShape, StrokeStyle};
use crate::geometry::Point;

/// Stroke a straight segment from `from` to `to`.
///
/// The segment is clipped to the canvas (grown by the stroke radius) before
/// drawing. Segments with a non-finite endpoint are skipped.
pub fn stroke_segment(canvas: &mut image::RgbaImage, from: Point, to: Point, style: StrokeStyle) {
    let color = style.color.to_rgba();
    let radius = (style.width / 2.0).round().max(1.0) as i32;

    let (width, height) = canvas.dimensions();
    let margin = f64::from(radius) + 1.0;
    let min = Point::new(-margin, -margin);
    let max = Point::new(f64::from(width) + margin, f64::from(height) + margin);
    let Some((from, to)) = clip_segment(from, to, min, max) else {
        return;
    };

    if style.width <= 1.0 {
        draw_line_segment_mut(
            canvas,
            (from.x as f32, from.y as f32),
            (to.x as f32, to.y as f32),
            color,
        );
        return;
    }

    let length = from.distance_to(to);
    let steps = length.ceil().max(1.0) as usize;

    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        let x = from.x + (to.x - from.x) * t;
        let y = from.y + (to.y - from.y) * t;
        draw_filled_circle_mut(canvas, (x.round() as i32, y.round() as i32), radius, color);
    }
}

/// Liang-Barsky clip of `from..to` against the box `min..max`.
fn clip_segment(from: Point, to: Point, min: Point, max: Point) -> Option<(Point, Point)> {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    if ![from.x, from.y, dx, dy].iter().all(|v| v.is_finite()) {
        return None;
    }

    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;
    let edges = [
        (-dx, from.x - min.x),
        (dx, max.x - from.x),
        (-dy, from.y - min.y),
        (dy, max.y - from.y),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    let at = |t: f64| Point::new(from.x + dx * t, from.y + dy * t);
    Some((at(t0), at(t1)))
}

/// Stroke the outline of an axis-aligned rectangle.
pub fn stroke_rect(
    canvas: &mut image::RgbaImage,
    origin: Point,
    width: f64,
    height: f64,
    style: StrokeStyle,
) {
    let a = origin;
    let b = Point::new(origin.x + width, origin.y);
    let c = Point::new(origin.x + width, origin.y + height);
    let d = Point::new(origin.x, origin.y + height);
    for (from, to) in [(a, b), (b, c), (c, d), (d, a)] {
        stroke_segment(canvas, from, to, style);
    }
}

/// Stroke the outline of a circle.
pub fn stroke_circle(canvas: &mut image::RgbaImage, center: Point, radius: f64, style: StrokeStyle) {
    let color = style.color.to_rgba();
    let center = (center.x.round() as i32, center.y.round() as i32);
    let radius = radius.abs().round() as i32;
    let half = ((style.width.max(1.0) - 1.0) / 2.0).round() as i32;

    for r in (radius - half).max(0)..=(radius + half) {
        draw_hollow_circle_mut(canvas, center, r, color);
    }
}

/// Rasterize a pending overlay.
///
/// Shapes are stroked (never filled) in the overlay's own color. Text needs a
/// font; callers check for one before confirming.
pub fn draw_overlay(
    canvas: &mut image::RgbaImage,
    overlay: &Overlay,
    stroke_width: f32,
    font: Option<&FontHandle>,
) {
    let style = StrokeStyle {
        color: overlay.color,
        width: stroke_width,
    };
    match &overlay.shape {
        OverlayShape::Text { text, font_size } => {
            if let Some(font) = font {
                draw_text(canvas, font, text, overlay.position, *font_size, overlay.color);
            }
        }
        OverlayShape::Rect { width, height } => {
            stroke_rect(canvas, overlay.position, *width, *height, style)
        }
        OverlayShape::Circle { radius } => stroke_circle(canvas, overlay.position, *radius, style),
        OverlayShape::Line { dx, dy } => {
            let end = overlay.position + Point::new(*dx, *dy);
            stroke_segment(canvas, overlay.position, end, style)
        }
    }
}
