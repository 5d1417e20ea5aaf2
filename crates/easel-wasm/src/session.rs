//! The JavaScript-facing editing session.
//!
//! `JsImageSession` wraps an [`ImageSession`] over an in-memory
//! [`PixelSurface`]. After each call the host reads `pixels()` (RGBA,
//! row-major) with `width`/`height` and paints them; `state()` carries
//! everything else the UI shows.

use easel_core::decode::ImageSource;
use easel_core::{
    Color, CropRect, EditorConfig, ExportOptions, ExportedImage, ImageSession, LoadTicket,
    PixelSurface, Point, Surface,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::types::{js_error, non_empty, parse_flip, parse_format, parse_shape, parse_tool};

/// Handle for a load started with `begin_load`.
#[wasm_bindgen]
pub struct JsLoadTicket {
    inner: LoadTicket,
}

#[wasm_bindgen]
impl JsLoadTicket {
    #[wasm_bindgen(getter)]
    pub fn generation(&self) -> f64 {
        self.inner.generation() as f64
    }
}

/// An encoded export.
#[wasm_bindgen]
pub struct JsExportedImage {
    inner: ExportedImage,
}

#[wasm_bindgen]
impl JsExportedImage {
    #[wasm_bindgen(getter)]
    pub fn format(&self) -> String {
        self.inner.format.extension().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> String {
        self.inner.mime_type.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn file_name(&self) -> String {
        self.inner.file_name.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Encoded bytes as a `Uint8Array` (copied).
    pub fn bytes(&self) -> Vec<u8> {
        self.inner.bytes.clone()
    }
}

#[wasm_bindgen]
pub struct JsImageSession {
    inner: ImageSession<PixelSurface>,
}

impl JsImageSession {
    pub fn from_config(config: EditorConfig) -> Self {
        Self {
            inner: ImageSession::new(config),
        }
    }

    pub fn session(&self) -> &ImageSession<PixelSurface> {
        &self.inner
    }
}

impl Default for JsImageSession {
    fn default() -> Self {
        Self::from_config(EditorConfig::default())
    }
}

#[wasm_bindgen]
impl JsImageSession {
    /// Create a session. `config` is a plain object of `EditorConfig`
    /// fields (camelCase); `undefined` or `null` means defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<JsImageSession, JsValue> {
        if config.is_undefined() || config.is_null() {
            return Ok(Self::default());
        }
        let config: EditorConfig = serde_wasm_bindgen::from_value(config).map_err(js_error)?;
        Ok(Self::from_config(config))
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    pub fn attach_surface(&mut self) {
        self.inner.attach_surface(PixelSurface::default());
    }

    pub fn detach_surface(&mut self) {
        self.inner.detach_surface();
    }

    pub fn install_font(&mut self, bytes: Vec<u8>) -> Result<(), JsValue> {
        self.inner.install_font(bytes).map_err(js_error)
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Validate, decode and install an image file.
    pub fn load_image(
        &mut self,
        bytes: Vec<u8>,
        mime_type: Option<String>,
        name: Option<String>,
    ) -> Result<JsValue, JsValue> {
        let outcome = self
            .inner
            .load_image(source(bytes, mime_type, name))
            .map_err(js_error)?;
        serde_wasm_bindgen::to_value(&outcome).map_err(js_error)
    }

    /// Load a `data:image/...;base64,` URL.
    pub fn load_data_url(&mut self, url: &str) -> Result<JsValue, JsValue> {
        let source = ImageSource::from_data_url(url).map_err(js_error)?;
        let outcome = self.inner.load_image(source).map_err(js_error)?;
        serde_wasm_bindgen::to_value(&outcome).map_err(js_error)
    }

    /// Start a load whose bytes arrive later (e.g. from a `FileReader`).
    pub fn begin_load(&mut self) -> JsLoadTicket {
        JsLoadTicket {
            inner: self.inner.begin_load(),
        }
    }

    /// Deliver the bytes for `ticket`. Stale tickets resolve to
    /// `{ status: "superseded" }` without touching the session.
    pub fn complete_load(
        &mut self,
        ticket: &JsLoadTicket,
        bytes: Vec<u8>,
        mime_type: Option<String>,
        name: Option<String>,
    ) -> Result<JsValue, JsValue> {
        let decoded = self.inner.decode_source(&source(bytes, mime_type, name));
        let outcome = self
            .inner
            .complete_load(ticket.inner, decoded)
            .map_err(js_error)?;
        serde_wasm_bindgen::to_value(&outcome).map_err(js_error)
    }

    /// Report that reading the file for `ticket` failed.
    pub fn fail_load(&mut self, ticket: &JsLoadTicket) -> Result<JsValue, JsValue> {
        let failed: Result<easel_core::Raster, _> = Err(easel_core::decode::InputError::Empty);
        let outcome = self
            .inner
            .complete_load(ticket.inner, failed)
            .map_err(js_error)?;
        serde_wasm_bindgen::to_value(&outcome).map_err(js_error)
    }

    #[wasm_bindgen(getter)]
    pub fn is_loading(&self) -> bool {
        self.inner.is_loading()
    }

    #[wasm_bindgen(getter)]
    pub fn last_error(&self) -> Option<String> {
        self.inner.last_error().map(str::to_string)
    }

    // =========================================================================
    // Transforms
    // =========================================================================

    pub fn rotate_image(&mut self, degrees: i32) -> Result<(), JsValue> {
        self.inner.rotate_image(degrees).map_err(js_error)
    }

    /// Flip along `"horizontal"` or `"vertical"`.
    pub fn flip_image(&mut self, axis: &str) -> Result<(), JsValue> {
        let axis = parse_flip(axis)?;
        self.inner.flip_image(axis).map_err(js_error)
    }

    /// Returns the zoom level actually applied after clamping.
    pub fn zoom_image(&mut self, level: f64) -> Result<f64, JsValue> {
        self.inner.zoom_image(level).map_err(js_error)
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) -> bool {
        self.inner.pan_by(Point::new(dx, dy))
    }

    pub fn resize_image(&mut self, width: u32, height: u32) -> Result<(), JsValue> {
        self.inner.resize_image(width, height).map_err(js_error)
    }

    // =========================================================================
    // Crop
    // =========================================================================

    /// Crop to a canvas rectangle. Returns `false` for a zero-area rectangle.
    pub fn crop_image(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<bool, JsValue> {
        self.inner
            .crop_image(CropRect::new(x, y, width, height))
            .map_err(js_error)
    }

    pub fn confirm_crop(&mut self) -> Result<bool, JsValue> {
        self.inner.confirm_crop().map_err(js_error)
    }

    pub fn cancel_crop(&mut self) {
        self.inner.cancel_crop();
    }

    // =========================================================================
    // History
    // =========================================================================

    pub fn undo(&mut self) -> bool {
        self.inner.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.inner.redo()
    }

    #[wasm_bindgen(getter)]
    pub fn can_undo(&self) -> bool {
        self.inner.can_undo()
    }

    #[wasm_bindgen(getter)]
    pub fn can_redo(&self) -> bool {
        self.inner.can_redo()
    }

    // =========================================================================
    // Tools and pointer events
    // =========================================================================

    /// Select `"none"`, `"crop"`, `"text"`, `"shape"` or `"draw"`.
    pub fn select_tool(&mut self, tool: &str) -> Result<(), JsValue> {
        let tool = parse_tool(tool)?;
        self.inner.select_tool(tool);
        Ok(())
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) -> Result<(), JsValue> {
        self.inner.pointer_down(Point::new(x, y)).map_err(js_error)
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> Result<(), JsValue> {
        self.inner.pointer_move(Point::new(x, y)).map_err(js_error)
    }

    pub fn pointer_up(&mut self) -> Result<(), JsValue> {
        self.inner.pointer_up().map_err(js_error)
    }

    pub fn pointer_leave(&mut self) -> Result<(), JsValue> {
        self.inner.pointer_leave().map_err(js_error)
    }

    // =========================================================================
    // Overlays
    // =========================================================================

    /// Add a centered text overlay. Returns its index.
    pub fn add_text_overlay(
        &mut self,
        text: &str,
        color: Option<String>,
        font_size: Option<f32>,
    ) -> Result<usize, JsValue> {
        let color = non_empty(color)
            .map(|hex| Color::from_hex(&hex))
            .transpose()
            .map_err(js_error)?;
        self.inner
            .add_text_overlay(text, color, font_size)
            .map_err(js_error)
    }

    /// Add a `"rect"`, `"circle"` or `"line"` overlay. Returns its index.
    pub fn add_shape_overlay(&mut self, kind: &str) -> Result<usize, JsValue> {
        let kind = parse_shape(kind)?;
        self.inner.add_shape_overlay(kind).map_err(js_error)
    }

    pub fn set_text_color(&mut self, hex: &str) -> Result<(), JsValue> {
        self.inner.set_text_color(hex).map_err(js_error)
    }

    pub fn set_text_size(&mut self, size: f32) -> f32 {
        self.inner.set_text_size(size)
    }

    pub fn update_overlay_color(&mut self, index: usize, hex: &str) -> Result<(), JsValue> {
        self.inner.update_overlay_color(index, hex).map_err(js_error)
    }

    pub fn update_overlay_text(&mut self, index: usize, text: &str) -> Result<bool, JsValue> {
        self.inner.update_overlay_text(index, text).map_err(js_error)
    }

    pub fn move_overlay(&mut self, index: usize, x: f64, y: f64) -> Result<(), JsValue> {
        self.inner
            .move_overlay(index, Point::new(x, y))
            .map_err(js_error)
    }

    pub fn confirm_overlay(&mut self, index: usize) -> Result<(), JsValue> {
        self.inner.confirm_overlay(index).map_err(js_error)
    }

    /// Remove a pending overlay; returns it as a plain object.
    pub fn cancel_overlay(&mut self, index: usize) -> Result<JsValue, JsValue> {
        let overlay = self.inner.cancel_overlay(index).map_err(js_error)?;
        serde_wasm_bindgen::to_value(&overlay).map_err(js_error)
    }

    pub fn overlays(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.inner.overlays()).map_err(js_error)
    }

    // =========================================================================
    // Export
    // =========================================================================

    /// Encode the surface. `quality` applies to JPEG only and defaults to
    /// the configured quality.
    pub fn export_image(&self, format: &str, quality: Option<u8>) -> Result<JsExportedImage, JsValue> {
        let format = parse_format(format)?;
        let quality = quality.unwrap_or(self.inner.config().jpeg_quality);
        let options = ExportOptions::new(format).with_quality(quality);
        let inner = self.inner.export_image(&options).map_err(js_error)?;
        Ok(JsExportedImage { inner })
    }

    /// Export and trigger a browser download named
    /// `<export stem>.<extension>`.
    pub fn download(&self, format: &str) -> Result<(), JsValue> {
        let format = parse_format(format)?;
        let exported = self.inner.export_as(format).map_err(js_error)?;
        trigger_download(&exported)?;
        log::info!("Downloaded {} ({} bytes)", exported.file_name, exported.bytes.len());
        Ok(())
    }

    // =========================================================================
    // Surface and state
    // =========================================================================

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.surface().map_or(0, |s| s.dimensions().0)
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.surface().map_or(0, |s| s.dimensions().1)
    }

    /// RGBA surface pixels as a `Uint8Array` (copied). Empty without a
    /// surface.
    pub fn pixels(&self) -> Vec<u8> {
        self.inner
            .surface()
            .map(|s| s.contents().pixels)
            .unwrap_or_default()
    }

    /// Snapshot of the session for the UI, as a plain object.
    pub fn state(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.state()).map_err(js_error)
    }

    /// The sanitized configuration in effect.
    pub fn config(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.inner.config()).map_err(js_error)
    }
}

fn source(bytes: Vec<u8>, mime_type: Option<String>, name: Option<String>) -> ImageSource {
    let mut source = ImageSource::from_bytes(bytes);
    if let Some(mime_type) = non_empty(mime_type) {
        source = source.with_mime_type(mime_type);
    }
    if let Some(name) = non_empty(name) {
        source = source.with_name(name);
    }
    source
}

/// Hand the export to the browser through a temporary object URL on an
/// `<a download>` element.
fn trigger_download(exported: &ExportedImage) -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| js_error("No document available for download"))?;

    let parts = js_sys::Array::new();
    parts.push(&js_sys::Uint8Array::from(exported.bytes.as_slice()));
    let options = web_sys::BlobPropertyBag::new();
    options.set_type(&exported.mime_type);
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)?;

    let anchor = document
        .create_element("a")?
        .dyn_into::<web_sys::HtmlAnchorElement>()
        .map_err(|_| js_error("Failed to create download link"))?;
    anchor.set_href(&url);
    anchor.set_download(&exported.file_name);
    anchor.click();

    web_sys::Url::revoke_object_url(&url)
}
