//! Editor configuration.
//!
//! Every tunable of the session lives here with a sensible default, so a
//! host can pass a partial object (`{ "maxZoom": 8 }`) and get the rest
//! filled in.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::decode::DEFAULT_MAX_INPUT_BYTES;
use crate::encode::DEFAULT_JPEG_QUALITY;
use crate::overlay::{StrokeStyle, TextStyle};
use crate::transform::{FilterType, MAX_ZOOM, MIN_ZOOM};

/// File name stem used for exports.
pub const DEFAULT_EXPORT_STEM: &str = "image-editor-export";

/// Session configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Lower zoom bound (default 0.1).
    pub min_zoom: f64,
    /// Upper zoom bound (default 5.0).
    pub max_zoom: f64,
    /// Largest accepted input in bytes (default 10 MB).
    pub max_input_bytes: usize,
    /// JPEG export quality used when none is given (1-100).
    pub jpeg_quality: u8,
    /// Style for new text overlays.
    pub text_style: TextStyle,
    pub min_text_size: f32,
    pub max_text_size: f32,
    /// Stroke used when a shape overlay is confirmed. The color here is the
    /// default color for new shapes; each overlay keeps its own.
    pub shape_stroke: StrokeStyle,
    /// Freehand brush.
    pub brush: StrokeStyle,
    /// Side length of the square hit area around each crop handle.
    pub crop_handle_size: f64,
    /// Commit a crop as soon as the pointer is released. When false the
    /// rectangle stays pending until `confirm_crop`/`cancel_crop`.
    pub crop_commit_on_release: bool,
    /// Extra slack around overlay bounds when hit testing.
    pub overlay_hit_padding: f64,
    pub default_rect_width: f64,
    pub default_rect_height: f64,
    pub default_circle_radius: f64,
    pub default_line_length: f64,
    /// Filter for `resize_image`.
    pub resize_filter: FilterType,
    pub export_file_stem: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            text_style: TextStyle::default(),
            min_text_size: 8.0,
            max_text_size: 72.0,
            shape_stroke: StrokeStyle::default(),
            brush: StrokeStyle {
                color: Color::BLACK,
                width: 3.0,
            },
            crop_handle_size: 10.0,
            crop_commit_on_release: true,
            overlay_hit_padding: 4.0,
            default_rect_width: 100.0,
            default_rect_height: 60.0,
            default_circle_radius: 30.0,
            default_line_length: 100.0,
            resize_filter: FilterType::default(),
            export_file_stem: DEFAULT_EXPORT_STEM.to_string(),
        }
    }
}

impl EditorConfig {
    /// Repair values that would break the session: swapped or non-finite
    /// bounds, zero sizes and an empty file stem.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if !positive(self.min_zoom) {
            self.min_zoom = defaults.min_zoom;
        }
        if !positive(self.max_zoom) {
            self.max_zoom = defaults.max_zoom;
        }
        if self.min_zoom > self.max_zoom {
            std::mem::swap(&mut self.min_zoom, &mut self.max_zoom);
        }

        if self.max_input_bytes == 0 {
            self.max_input_bytes = defaults.max_input_bytes;
        }
        if self.jpeg_quality == 0 {
            self.jpeg_quality = defaults.jpeg_quality;
        }
        self.jpeg_quality = self.jpeg_quality.min(100);

        if !positive(f64::from(self.min_text_size)) {
            self.min_text_size = defaults.min_text_size;
        }
        if !positive(f64::from(self.max_text_size)) {
            self.max_text_size = defaults.max_text_size;
        }
        if self.min_text_size > self.max_text_size {
            std::mem::swap(&mut self.min_text_size, &mut self.max_text_size);
        }
        if !self.text_style.font_size.is_finite() {
            self.text_style.font_size = defaults.text_style.font_size;
        }
        self.text_style.font_size = self
            .text_style
            .font_size
            .clamp(self.min_text_size, self.max_text_size);

        for stroke in [&mut self.shape_stroke, &mut self.brush] {
            if !positive(f64::from(stroke.width)) {
                stroke.width = 1.0;
            }
        }

        if !positive(self.crop_handle_size) {
            self.crop_handle_size = defaults.crop_handle_size;
        }
        if !self.overlay_hit_padding.is_finite() || self.overlay_hit_padding < 0.0 {
            self.overlay_hit_padding = 0.0;
        }
        for (value, default) in [
            (&mut self.default_rect_width, defaults.default_rect_width),
            (&mut self.default_rect_height, defaults.default_rect_height),
            (&mut self.default_circle_radius, defaults.default_circle_radius),
            (&mut self.default_line_length, defaults.default_line_length),
        ] {
            if !positive(*value) {
                *value = default;
            }
        }

        if self.export_file_stem.trim().is_empty() {
            self.export_file_stem = defaults.export_file_stem;
        }

        self
    }

    /// Clamp a text size into the configured range.
    pub fn clamp_text_size(&self, size: f32) -> f32 {
        if size.is_finite() {
            size.clamp(self.min_text_size, self.max_text_size)
        } else {
            self.text_style.font_size
        }
    }
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
