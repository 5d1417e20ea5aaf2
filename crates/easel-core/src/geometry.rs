//! Canvas-space geometry shared by the session components.
//!
//! All coordinates are in canvas pixels with the origin at the top-left
//! corner and the y axis pointing down.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// A point (or offset) in canvas pixel space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// An integer pixel region with non-negative extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The whole of a `width x height` canvas.
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A crop rectangle as drawn by the pointer.
///
/// Width and height may be negative while the rectangle is being dragged
/// up or left of its anchor. Use [`CropRect::normalized`] before reading
/// pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    #[serde(rename = "w")]
    pub width: f64,
    #[serde(rename = "h")]
    pub height: f64,
}

impl CropRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Same region with non-negative width and height.
    pub fn normalized(&self) -> CropRect {
        let (x, width) = if self.width < 0.0 {
            (self.x + self.width, -self.width)
        } else {
            (self.x, self.width)
        };
        let (y, height) = if self.height < 0.0 {
            (self.y + self.height, -self.height)
        } else {
            (self.y, self.height)
        };
        CropRect::new(x, y, width, height)
    }

    pub fn left(&self) -> f64 {
        self.normalized().x
    }

    pub fn top(&self) -> f64 {
        self.normalized().y
    }

    pub fn right(&self) -> f64 {
        let n = self.normalized();
        n.x + n.width
    }

    pub fn bottom(&self) -> f64 {
        let n = self.normalized();
        n.y + n.height
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    /// Snap to whole pixels and intersect with a `width x height` canvas.
    ///
    /// Returns `None` when less than one pixel in either direction remains
    /// or any field is not finite.
    pub fn to_pixel_rect(&self, width: u32, height: u32) -> Option<PixelRect> {
        let n = self.normalized();
        if ![n.x, n.y, n.width, n.height].iter().all(|v| v.is_finite()) {
            return None;
        }
        let left = n.x.round().max(0.0);
        let top = n.y.round().max(0.0);
        let right = (n.x + n.width).round().min(width as f64);
        let bottom = (n.y + n.height).round().min(height as f64);

        if right - left < 1.0 || bottom - top < 1.0 {
            return None;
        }

        Some(PixelRect::new(
            left as u32,
            top as u32,
            (right - left) as u32,
            (bottom - top) as u32,
        ))
    }
}
