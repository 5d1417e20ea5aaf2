//! The composable view transform: rotation, flips, zoom and pan.

use serde::{Deserialize, Serialize};

use super::Affine;
use crate::geometry::Point;

/// Lower zoom bound.
pub const MIN_ZOOM: f64 = 0.1;
/// Upper zoom bound.
pub const MAX_ZOOM: f64 = 5.0;

/// Flip axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlipAxis {
    Horizontal,
    Vertical,
}

/// Rotation, flip, zoom and pan applied to the source raster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewTransform {
    /// Rotation in degrees, clockwise. Kept in `[0, 360)`.
    pub rotation_degrees: i32,
    pub flip_horizontal: bool,
    pub flip_vertical: bool,
    /// Uniform scale, clamped to the configured zoom bounds.
    pub zoom: f64,
    /// Display offset; only honoured while `zoom > 1`.
    pub pan_offset: Point,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            rotation_degrees: 0,
            flip_horizontal: false,
            flip_vertical: false,
            zoom: 1.0,
            pan_offset: Point::ZERO,
        }
    }
}

impl ViewTransform {
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// Add `delta` degrees, normalizing the result into `[0, 360)`.
    pub fn rotate_by(&mut self, delta: i32) {
        self.rotation_degrees = (self.rotation_degrees as i64 + delta as i64).rem_euclid(360) as i32;
    }

    pub fn toggle_flip(&mut self, axis: FlipAxis) {
        match axis {
            FlipAxis::Horizontal => self.flip_horizontal = !self.flip_horizontal,
            FlipAxis::Vertical => self.flip_vertical = !self.flip_vertical,
        }
    }

    /// Clamp and store a zoom level, resetting the pan offset.
    ///
    /// Non-finite input is ignored. Returns the stored zoom.
    pub fn set_zoom(&mut self, level: f64, min: f64, max: f64) -> f64 {
        if level.is_finite() {
            self.zoom = level.clamp(min, max);
        }
        self.pan_offset = Point::ZERO;
        self.zoom
    }

    /// The same rotation and flips at zoom 1 with no pan.
    pub fn unzoomed(&self) -> Self {
        Self {
            zoom: 1.0,
            pan_offset: Point::ZERO,
            ..*self
        }
    }

    /// True for quarter turns that swap canvas width and height.
    pub fn swaps_dimensions(&self) -> bool {
        self.rotation_degrees.rem_euclid(180) == 90
    }

    /// Canvas size for a source of `width x height`.
    pub fn canvas_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        if self.swaps_dimensions() {
            (height, width)
        } else {
            (width, height)
        }
    }

    /// Whether panning is currently allowed.
    pub fn can_pan(&self) -> bool {
        self.zoom > 1.0
    }

    /// Offset the UI should apply to the displayed surface.
    pub fn display_offset(&self) -> Point {
        if self.can_pan() {
            self.pan_offset
        } else {
            Point::ZERO
        }
    }

    /// Forward matrix from source pixel space to canvas pixel space.
    ///
    /// Order: move the source center to the origin, zoom, rotate, flip, then
    /// move the origin to the canvas center. Read right to left this is the
    /// canvas sequence translate(center), scale(flip), rotate, scale(zoom),
    /// drawImage(-w/2, -h/2).
    pub fn matrix(&self, source_width: u32, source_height: u32) -> Affine {
        let (canvas_w, canvas_h) = self.canvas_dimensions(source_width, source_height);
        let flip_x = if self.flip_horizontal { -1.0 } else { 1.0 };
        let flip_y = if self.flip_vertical { -1.0 } else { 1.0 };

        Affine::translate(-(source_width as f64) / 2.0, -(source_height as f64) / 2.0)
            .then(&Affine::scale(self.zoom, self.zoom))
            .then(&Affine::rotate_degrees(self.rotation_degrees as f64))
            .then(&Affine::scale(flip_x, flip_y))
            .then(&Affine::translate(canvas_w as f64 / 2.0, canvas_h as f64 / 2.0))
    }
}
