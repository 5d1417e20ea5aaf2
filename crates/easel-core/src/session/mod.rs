//! The editing session: one image, one surface, one history.
//!
//! # Architecture
//!
//! [`ImageSession`] owns every piece of editor state. It keeps two rasters
//! apart:
//!
//! - the *source*, the raster last committed by a pixel edit (load, crop,
//!   resize, overlay confirm, freehand stroke, undo/redo), and
//! - the *surface*, what is shown: the source rendered through the current
//!   [`ViewTransform`].
//!
//! Rotate and flip change only the transform and re-render from the source.
//! Pixel edits act on the surface and then "bake" it: the surface becomes
//! the new source and the transform returns to identity.
//!
//! Every committing operation pushes one snapshot of the surface. Zoom,
//! pan, crop rectangle drags and overlay drags are ephemeral.
//!
//! # Example
//!
//! ```ignore
//! use easel_core::{EditorConfig, ImageSession, ImageSource, PixelSurface};
//!
//! let mut session = ImageSession::<PixelSurface>::new(EditorConfig::default());
//! session.attach_surface(PixelSurface::default());
//! session.load_image(ImageSource::from_bytes(bytes).with_mime_type("image/png"))?;
//! session.rotate_image(90)?;
//! session.undo();
//! ```

pub mod crop;
mod overlays;
mod pointer;

pub use crop::{CropHandle, CropRelease, CropSession};
pub use pointer::Tool;

use serde::Serialize;

use crate::config::EditorConfig;
use crate::decode::{decode_image, validate, ImageSource};
use crate::encode::{export_raster, ExportFormat, ExportOptions, ExportedImage};
use crate::error::EditorError;
use crate::geometry::{CropRect, Point};
use crate::history::{History, Snapshot};
use crate::overlay::{FontHandle, Overlay, TextStyle};
use crate::raster::{PixelSurface, Raster, Surface};
use crate::transform::{render_view, resize_raster, FlipAxis, ViewTransform};

use pointer::Drag;

/// Identifies one load request. Only the most recent ticket is honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    pub fn generation(self) -> u64 {
        self.generation
    }
}

/// Result of completing a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum LoadOutcome {
    /// The image is now the session's content.
    Loaded { width: u32, height: u32 },
    /// A newer load was started (or the session was reset) first; the
    /// result was discarded.
    Superseded,
}

/// A crop handle and where it is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HandleState {
    pub handle: CropHandle,
    pub x: f64,
    pub y: f64,
}

/// Everything a UI needs to render the editor chrome.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub surface_ready: bool,
    pub has_image: bool,
    pub width: u32,
    pub height: u32,
    pub tool: Tool,
    pub transform: ViewTransform,
    pub display_offset: Point,
    pub history_length: usize,
    pub history_index: isize,
    pub can_undo: bool,
    pub can_redo: bool,
    pub crop_rect: Option<CropRect>,
    pub crop_handles: Vec<HandleState>,
    pub overlays: Vec<Overlay>,
    pub text_style: TextStyle,
    pub font_installed: bool,
    pub is_loading: bool,
    pub last_error: Option<String>,
}

/// The editing session engine.
pub struct ImageSession<S: Surface = PixelSurface> {
    config: EditorConfig,
    surface: Option<S>,
    font: Option<FontHandle>,
    source: Option<Raster>,
    transform: ViewTransform,
    history: History,
    tool: Tool,
    crop: CropSession,
    overlays: Vec<Overlay>,
    drag: Drag,
    text_style: TextStyle,
    load_generation: u64,
    pending_load: Option<u64>,
    last_error: Option<String>,
}

impl<S: Surface> Default for ImageSession<S> {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl<S: Surface> ImageSession<S> {
    pub fn new(config: EditorConfig) -> Self {
        let config = config.sanitized();
        Self {
            text_style: config.text_style,
            config,
            surface: None,
            font: None,
            source: None,
            transform: ViewTransform::identity(),
            history: History::new(),
            tool: Tool::default(),
            crop: CropSession::new(),
            overlays: Vec::new(),
            drag: Drag::Idle,
            load_generation: 0,
            pending_load: None,
            last_error: None,
        }
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Inject the drawable surface. If an image is already loaded it is
    /// rendered onto the new surface.
    pub fn attach_surface(&mut self, surface: S) {
        self.surface = Some(surface);
        log::info!("Surface attached");
        if self.source.is_some() {
            if let Err(err) = self.render() {
                log::warn!("Could not render onto the attached surface: {}", err);
            }
        }
    }

    /// Release the surface. The image and history are kept for a later
    /// `attach_surface`.
    pub fn detach_surface(&mut self) -> Option<S> {
        self.settle_stroke();
        self.drag = Drag::Idle;
        self.crop.cancel();
        let surface = self.surface.take();
        if surface.is_some() {
            log::info!("Surface detached");
        }
        surface
    }

    /// Install the font used to rasterize text overlays.
    pub fn install_font(&mut self, bytes: Vec<u8>) -> Result<(), EditorError> {
        let font = FontHandle::from_bytes(bytes)?;
        self.font = Some(font);
        log::info!("Font installed");
        Ok(())
    }

    pub fn set_font(&mut self, font: FontHandle) {
        self.font = Some(font);
    }

    /// Drop the image, history and every ephemeral state. The surface,
    /// configuration and font are kept; any outstanding load is superseded.
    pub fn reset(&mut self) {
        self.source = None;
        self.transform = ViewTransform::identity();
        self.history.clear();
        self.tool = Tool::default();
        self.crop.cancel();
        self.overlays.clear();
        self.drag = Drag::Idle;
        self.text_style = self.config.text_style;
        self.load_generation += 1;
        self.pending_load = None;
        self.last_error = None;
        if let Some(surface) = self.surface.as_mut() {
            surface.resize(0, 0);
        }
        log::info!("Editor reset");
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Start a load and get the ticket its result must be delivered with.
    /// Starting another load supersedes this one.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.load_generation += 1;
        if self.pending_load.is_some() {
            log::warn!("Load superseded by a newer request");
        }
        self.pending_load = Some(self.load_generation);
        log::debug!("Load {} started", self.load_generation);
        LoadTicket {
            generation: self.load_generation,
        }
    }

    /// Validate and decode a source without touching the session. Hosts
    /// that decode off the UI path call this between `begin_load` and
    /// `complete_load`.
    pub fn decode_source(&self, source: &ImageSource) -> Result<Raster, EditorError> {
        validate(source, self.config.max_input_bytes)?;
        Ok(decode_image(&source.bytes)?)
    }

    /// Deliver the result for `ticket`.
    ///
    /// A stale ticket is discarded with `LoadOutcome::Superseded`. A failed
    /// decode is recorded in `last_error` and returned; the session is
    /// otherwise unchanged.
    pub fn complete_load<E>(
        &mut self,
        ticket: LoadTicket,
        result: Result<Raster, E>,
    ) -> Result<LoadOutcome, EditorError>
    where
        E: Into<EditorError>,
    {
        if self.pending_load != Some(ticket.generation) {
            log::warn!("Discarding stale load {}", ticket.generation);
            return Ok(LoadOutcome::Superseded);
        }
        self.pending_load = None;

        let result: Result<Raster, EditorError> = result.map_err(Into::into);
        let raster = match result {
            Ok(raster) => raster,
            Err(err) => return Err(self.record_error(err)),
        };

        if self.surface.is_none() {
            return Err(self.record_error(EditorError::SurfaceNotReady));
        }

        let (width, height) = raster.dimensions();
        self.install_image(raster)?;
        log::info!("Image loaded ({}x{})", width, height);
        Ok(LoadOutcome::Loaded { width, height })
    }

    /// Validate, decode and install `source` in one step.
    pub fn load_image(&mut self, source: ImageSource) -> Result<LoadOutcome, EditorError> {
        if self.surface.is_none() {
            return Err(EditorError::SurfaceNotReady);
        }
        if let Err(err) = validate(&source, self.config.max_input_bytes) {
            log::warn!("Rejected input {}: {}", source.label(), err);
            return Err(self.record_error(err.into()));
        }
        log::debug!("Decoding {} ({} bytes)", source.label(), source.bytes.len());

        let ticket = self.begin_load();
        let result = decode_image(&source.bytes);
        self.complete_load(ticket, result)
    }

    /// Install an already-decoded raster as a fresh image.
    pub fn load_raster(&mut self, raster: Raster) -> Result<LoadOutcome, EditorError> {
        let ticket = self.begin_load();
        self.complete_load(ticket, Ok::<_, EditorError>(raster))
    }

    pub fn is_loading(&self) -> bool {
        self.pending_load.is_some()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn install_image(&mut self, raster: Raster) -> Result<(), EditorError> {
        self.settle_stroke();
        self.transform = ViewTransform::identity();
        self.crop.cancel();
        self.overlays.clear();
        self.drag = Drag::Idle;
        self.last_error = None;

        let surface = self.surface.as_mut().ok_or(EditorError::SurfaceNotReady)?;
        surface.put_raster(&raster);
        self.history.reset(Snapshot::from_raster(&raster));
        self.source = Some(raster);
        Ok(())
    }

    fn record_error(&mut self, err: EditorError) -> EditorError {
        self.last_error = Some(err.to_string());
        err
    }

    // ------------------------------------------------------------------
    // Transforms
    // ------------------------------------------------------------------

    /// Rotate by `degrees` (clockwise) and commit.
    pub fn rotate_image(&mut self, degrees: i32) -> Result<(), EditorError> {
        self.ensure_ready()?;
        self.settle_stroke();
        self.crop.cancel();
        self.transform.rotate_by(degrees);
        self.render()?;
        self.push_snapshot("rotate")?;
        log::info!("Rotated by {} (now {})", degrees, self.transform.rotation_degrees);
        Ok(())
    }

    /// Mirror along `axis` and commit.
    pub fn flip_image(&mut self, axis: FlipAxis) -> Result<(), EditorError> {
        self.ensure_ready()?;
        self.settle_stroke();
        self.crop.cancel();
        self.transform.toggle_flip(axis);
        self.render()?;
        self.push_snapshot("flip")?;
        log::info!("Flipped {:?}", axis);
        Ok(())
    }

    /// Set the zoom level, clamped to the configured bounds. Resets the pan
    /// offset. Not a committing operation. Returns the stored zoom.
    pub fn zoom_image(&mut self, level: f64) -> Result<f64, EditorError> {
        self.ensure_ready()?;
        self.settle_stroke();
        self.crop.cancel();
        if matches!(self.drag, Drag::Pan { .. }) {
            self.drag = Drag::Idle;
        }
        let zoom = self
            .transform
            .set_zoom(level, self.config.min_zoom, self.config.max_zoom);
        self.render()?;
        log::debug!("Zoom set to {zoom:.2}");
        Ok(zoom)
    }

    /// Shift the display offset by `delta`. Ignored unless zoomed in.
    pub fn pan_by(&mut self, delta: Point) -> bool {
        if !self.transform.can_pan() {
            return false;
        }
        self.transform.pan_offset = self.transform.pan_offset + delta;
        true
    }

    // ------------------------------------------------------------------
    // Crop and resize
    // ------------------------------------------------------------------

    /// Crop to `rect` (current canvas space) and commit.
    ///
    /// Returns `Ok(false)` when the rectangle covers less than one pixel;
    /// nothing changes in that case.
    pub fn crop_image(&mut self, rect: CropRect) -> Result<bool, EditorError> {
        self.ensure_ready()?;
        self.settle_stroke();
        self.crop.cancel();
        self.commit_crop(rect)
    }

    /// Commit the pending crop rectangle. Returns `Ok(false)` if there is
    /// none or it has no area.
    pub fn confirm_crop(&mut self) -> Result<bool, EditorError> {
        self.ensure_ready()?;
        if self.crop.is_dragging() {
            self.crop.pointer_up();
        }
        match self.crop.take() {
            Some(rect) => self.commit_crop(rect),
            None => Ok(false),
        }
    }

    /// Drop the pending crop rectangle.
    pub fn cancel_crop(&mut self) {
        self.crop.cancel();
    }

    pub fn crop_rect(&self) -> Option<CropRect> {
        self.crop.rect()
    }

    fn commit_crop(&mut self, rect: CropRect) -> Result<bool, EditorError> {
        let surface = self.surface.as_mut().ok_or(EditorError::SurfaceNotReady)?;
        let (width, height) = surface.dimensions();

        let Some(region) = rect
            .to_pixel_rect(width, height)
            .and_then(|px| surface.read_pixels(px))
        else {
            log::warn!(
                "Rejected empty crop ({:.1}, {:.1}, {:.1}x{:.1})",
                rect.x,
                rect.y,
                rect.width,
                rect.height
            );
            return Ok(false);
        };

        surface.put_raster(&region);
        let (w, h) = region.dimensions();
        self.bake()?;
        self.push_snapshot("crop")?;
        log::info!("Cropped to {}x{}", w, h);
        Ok(true)
    }

    /// Resample the current canvas to `width x height` and commit.
    pub fn resize_image(&mut self, width: u32, height: u32) -> Result<(), EditorError> {
        self.ensure_ready()?;
        if width == 0 || height == 0 {
            return Err(EditorError::InvalidDimensions { width, height });
        }
        self.settle_stroke();
        self.crop.cancel();

        let surface = self.surface.as_mut().ok_or(EditorError::SurfaceNotReady)?;
        let resized = resize_raster(&surface.contents(), width, height, self.config.resize_filter)
            .ok_or(EditorError::InvalidDimensions { width, height })?;
        surface.put_raster(&resized);

        self.bake()?;
        self.push_snapshot("resize")?;
        log::info!("Resized to {}x{}", width, height);
        Ok(())
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    /// Step back one snapshot. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.settle_stroke();
        let Some(raster) = self.history.undo().map(Snapshot::to_raster) else {
            return false;
        };
        self.restore(raster);
        log::info!("Undo (history {}/{})", self.history.index() + 1, self.history.len());
        true
    }

    /// Step forward one snapshot. Returns `false` when already at the tail.
    pub fn redo(&mut self) -> bool {
        self.settle_stroke();
        let Some(raster) = self.history.redo().map(Snapshot::to_raster) else {
            return false;
        };
        self.restore(raster);
        log::info!("Redo (history {}/{})", self.history.index() + 1, self.history.len());
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    fn restore(&mut self, raster: Raster) {
        self.transform = ViewTransform::identity();
        self.crop.cancel();
        self.drag = Drag::Idle;
        if let Some(surface) = self.surface.as_mut() {
            surface.put_raster(&raster);
        }
        self.source = Some(raster);
    }

    // ------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------

    /// Encode the current surface. Pending overlays are not included.
    pub fn export_image(&self, options: &ExportOptions) -> Result<ExportedImage, EditorError> {
        self.ensure_ready()?;
        let surface = self.surface.as_ref().ok_or(EditorError::SurfaceNotReady)?;
        let exported = export_raster(&surface.contents(), options, &self.config.export_file_stem)?;
        log::info!(
            "Exported {} ({} bytes)",
            exported.file_name,
            exported.bytes.len()
        );
        Ok(exported)
    }

    /// Export with the configured JPEG quality.
    pub fn export_as(&self, format: ExportFormat) -> Result<ExportedImage, EditorError> {
        self.export_image(&ExportOptions::new(format).with_quality(self.config.jpeg_quality))
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn transform(&self) -> &ViewTransform {
        &self.transform
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn is_surface_ready(&self) -> bool {
        self.surface.is_some()
    }

    pub fn has_image(&self) -> bool {
        self.source.is_some()
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// The raster pixel edits start from (the last baked state).
    pub fn source(&self) -> Option<&Raster> {
        self.source.as_ref()
    }

    /// Current canvas dimensions.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.source.as_ref()?;
        self.surface.as_ref().map(|surface| surface.dimensions())
    }

    /// Copy of what is currently shown.
    pub fn current_raster(&self) -> Option<Raster> {
        self.source.as_ref()?;
        self.surface.as_ref().map(|surface| surface.contents())
    }

    pub fn state(&self) -> SessionState {
        let (width, height) = self.dimensions().unwrap_or((0, 0));
        SessionState {
            surface_ready: self.is_surface_ready(),
            has_image: self.has_image(),
            width,
            height,
            tool: self.tool,
            transform: self.transform,
            display_offset: self.transform.display_offset(),
            history_length: self.history.len(),
            history_index: self.history.index(),
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
            crop_rect: self.crop.rect(),
            crop_handles: self
                .crop
                .handles()
                .into_iter()
                .map(|(handle, p)| HandleState {
                    handle,
                    x: p.x,
                    y: p.y,
                })
                .collect(),
            overlays: self.overlays.clone(),
            text_style: self.text_style,
            font_installed: self.has_font(),
            is_loading: self.is_loading(),
            last_error: self.last_error.clone(),
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn ensure_ready(&self) -> Result<(), EditorError> {
        if self.surface.is_none() {
            return Err(EditorError::SurfaceNotReady);
        }
        if self.source.is_none() {
            return Err(EditorError::NoImage);
        }
        Ok(())
    }

    /// Redraw the surface from the source through the transform.
    fn render(&mut self) -> Result<(), EditorError> {
        let surface = self.surface.as_mut().ok_or(EditorError::SurfaceNotReady)?;
        let source = self.source.as_ref().ok_or(EditorError::NoImage)?;
        surface.put_raster(&render_view(source, &self.transform));
        Ok(())
    }

    /// Make the surface the new source and reset the transform.
    fn bake(&mut self) -> Result<(), EditorError> {
        let surface = self.surface.as_ref().ok_or(EditorError::SurfaceNotReady)?;
        self.source = Some(surface.contents());
        self.transform = ViewTransform::identity();
        Ok(())
    }

    /// Record the committed content: the surface, or the source rendered at
    /// zoom 1 while a zoom is applied.
    fn push_snapshot(&mut self, label: &str) -> Result<(), EditorError> {
        let surface = self.surface.as_ref().ok_or(EditorError::SurfaceNotReady)?;
        let raster = if self.transform.zoom == 1.0 {
            surface.contents()
        } else {
            let source = self.source.as_ref().ok_or(EditorError::NoImage)?;
            render_view(source, &self.transform.unzoomed())
        };
        self.history.push(Snapshot::from_raster(&raster));
        log::debug!(
            "Snapshot after {} (history {}/{})",
            label,
            self.history.index() + 1,
            self.history.len()
        );
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::loaded;
    use super::*;
    use crate::decode::InputError;
    use crate::overlay::ShapeKind;
    use crate::raster::test_support::gradient;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        crate::encode::encode_png(&gradient(width, height)).unwrap()
    }

    #[test]
    fn test_edits_require_surface() {
        let mut session = ImageSession::<PixelSurface>::new(EditorConfig::default());
        assert_eq!(session.rotate_image(90), Err(EditorError::SurfaceNotReady));
        assert_eq!(
            session.load_image(ImageSource::from_bytes(png_bytes(2, 2))),
            Err(EditorError::SurfaceNotReady)
        );
        assert_eq!(
            session.export_as(ExportFormat::Png).unwrap_err(),
            EditorError::SurfaceNotReady
        );
    }

    #[test]
    fn test_edits_require_image() {
        let mut session = ImageSession::<PixelSurface>::new(EditorConfig::default());
        session.attach_surface(PixelSurface::default());
        assert_eq!(session.flip_image(FlipAxis::Horizontal), Err(EditorError::NoImage));
        assert_eq!(
            session.crop_image(CropRect::new(0.0, 0.0, 1.0, 1.0)),
            Err(EditorError::NoImage)
        );
        assert!(!session.undo());
        assert!(!session.redo());
    }

    #[test]
    fn test_load_resets_history() {
        let mut session = ImageSession::<PixelSurface>::new(EditorConfig::default());
        session.attach_surface(PixelSurface::default());
        let outcome = session
            .load_image(ImageSource::from_bytes(png_bytes(20, 10)).with_mime_type("image/png"))
            .unwrap();
        assert_eq!(outcome, LoadOutcome::Loaded { width: 20, height: 10 });
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history().index(), 0);
        assert!(!session.can_undo());
        assert!(!session.can_redo());
        assert_eq!(session.dimensions(), Some((20, 10)));
        assert_eq!(session.current_raster(), Some(gradient(20, 10)));
    }

    #[test]
    fn test_rejected_input_leaves_session_unchanged() {
        let mut session = loaded(8, 8);
        session.rotate_image(90).unwrap();
        let before = session.current_raster();

        let pdf = ImageSource::from_bytes(vec![1, 2, 3]).with_mime_type("application/pdf");
        assert!(matches!(
            session.load_image(pdf),
            Err(EditorError::Input(InputError::UnsupportedType(_)))
        ));
        assert_eq!(session.current_raster(), before);
        assert_eq!(session.history().len(), 2);
        assert!(session.last_error().unwrap().contains("application/pdf"));

        let big = ImageSource::from_bytes(vec![0; 11 * 1024 * 1024]);
        assert!(matches!(
            session.load_image(big),
            Err(EditorError::Input(InputError::TooLarge { .. }))
        ));
        assert_eq!(session.history().len(), 2);
    }

    #[test]
    fn test_decode_failure_leaves_session_unchanged() {
        let mut session = loaded(8, 8);
        let garbage = ImageSource::from_bytes(vec![0xAB; 64]).with_mime_type("image/png");
        assert!(matches!(session.load_image(garbage), Err(EditorError::Decode(_))));
        assert_eq!(session.current_raster(), Some(gradient(8, 8)));
        assert!(!session.is_loading());
        assert!(session.last_error().is_some());
    }

    #[test]
    fn test_stale_ticket_is_superseded() {
        let mut session = ImageSession::<PixelSurface>::new(EditorConfig::default());
        session.attach_surface(PixelSurface::default());

        let first = session.begin_load();
        let second = session.begin_load();
        assert!(session.is_loading());

        let late = session.complete_load(first, Ok::<_, EditorError>(gradient(4, 4)));
        assert_eq!(late, Ok(LoadOutcome::Superseded));
        assert!(!session.has_image());
        assert!(session.is_loading());

        let current = session.complete_load(second, Ok::<_, EditorError>(gradient(6, 3)));
        assert_eq!(current, Ok(LoadOutcome::Loaded { width: 6, height: 3 }));
        assert!(!session.is_loading());

        // A ticket can only be used once
        let again = session.complete_load(second, Ok::<_, EditorError>(gradient(1, 1)));
        assert_eq!(again, Ok(LoadOutcome::Superseded));
        assert_eq!(session.dimensions(), Some((6, 3)));
    }

    #[test]
    fn test_reset_supersedes_pending_load() {
        let mut session = loaded(4, 4);
        let ticket = session.begin_load();
        session.reset();
        assert_eq!(
            session.complete_load(ticket, Ok::<_, EditorError>(gradient(2, 2))),
            Ok(LoadOutcome::Superseded)
        );
        assert!(!session.has_image());
        assert_eq!(session.history().index(), -1);
        assert!(session.is_surface_ready());
    }

    #[test]
    fn test_crop_scenario() {
        let mut session = loaded(200, 100);
        let before = session.history().len();

        assert_eq!(session.crop_image(CropRect::new(0.0, 0.0, 100.0, 100.0)), Ok(true));
        assert_eq!(session.dimensions(), Some((100, 100)));
        assert_eq!(session.history().len(), before + 1);
        assert_eq!(session.history().index(), before as isize);
        assert_eq!(
            session.current_raster().unwrap(),
            gradient(200, 100)
                .region(crate::geometry::PixelRect::new(0, 0, 100, 100))
                .unwrap()
        );
    }

    #[test]
    fn test_zero_area_crop_is_rejected() {
        let mut session = loaded(50, 50);
        assert_eq!(session.crop_image(CropRect::new(10.0, 10.0, 0.0, 20.0)), Ok(false));
        assert_eq!(session.crop_image(CropRect::new(90.0, 90.0, 5.0, 5.0)), Ok(false));
        assert_eq!(session.dimensions(), Some((50, 50)));
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_non_finite_crop_is_rejected() {
        let mut session = loaded(50, 40);
        let nan = f64::NAN;
        assert_eq!(session.crop_image(CropRect::new(nan, nan, 10.0, 10.0)), Ok(false));
        assert_eq!(session.crop_image(CropRect::new(0.0, 0.0, f64::INFINITY, 10.0)), Ok(false));
        assert_eq!(session.dimensions(), Some((50, 40)));
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.crop_rect(), None);
    }

    #[test]
    fn test_rotate_then_crop_uses_rotated_space() {
        let mut session = loaded(200, 100);
        session.rotate_image(90).unwrap();
        assert_eq!(session.dimensions(), Some((100, 200)));

        // This rectangle only fits inside the rotated (portrait) canvas
        assert_eq!(session.crop_image(CropRect::new(0.0, 120.0, 100.0, 80.0)), Ok(true));
        assert_eq!(session.dimensions(), Some((100, 80)));

        // A clockwise quarter turn maps source (x, y) to canvas (99 - y, x),
        // so the cropped bottom-left pixel is the source's bottom-right.
        let source = gradient(200, 100);
        let cropped = session.current_raster().unwrap();
        assert_eq!(cropped.pixel(0, 79), source.pixel(199, 99));
    }

    #[test]
    fn test_rotate_four_times_restores_dimensions() {
        let mut session = loaded(30, 20);
        for _ in 0..4 {
            session.rotate_image(90).unwrap();
        }
        assert_eq!(session.transform().rotation_degrees, 0);
        assert_eq!(session.dimensions(), Some((30, 20)));
        assert_eq!(session.current_raster(), Some(gradient(30, 20)));
        assert_eq!(session.history().len(), 5);
    }

    #[test]
    fn test_flip_twice_restores_flags() {
        let mut session = loaded(10, 10);
        session.flip_image(FlipAxis::Horizontal).unwrap();
        assert!(session.transform().flip_horizontal);
        session.flip_image(FlipAxis::Horizontal).unwrap();
        assert!(!session.transform().flip_horizontal);
        assert_eq!(session.current_raster(), Some(gradient(10, 10)));
    }

    #[test]
    fn test_flip_mirrors_pixels() {
        let mut session = loaded(10, 4);
        session.flip_image(FlipAxis::Horizontal).unwrap();
        let source = gradient(10, 4);
        let flipped = session.current_raster().unwrap();
        assert_eq!(flipped.pixel(0, 0), source.pixel(9, 0));
        assert_eq!(flipped.pixel(9, 3), source.pixel(0, 3));
    }

    #[test]
    fn test_zoom_is_clamped_and_not_committed() {
        let mut session = loaded(20, 20);
        assert_eq!(session.zoom_image(10.0), Ok(5.0));
        assert_eq!(session.zoom_image(0.01), Ok(0.1));
        assert_eq!(session.transform().zoom, 0.1);
        assert_eq!(session.history().len(), 1);
        // Canvas size does not follow zoom
        assert_eq!(session.dimensions(), Some((20, 20)));
    }

    #[test]
    fn test_pan_only_when_zoomed_in() {
        let mut session = loaded(20, 20);
        assert!(!session.pan_by(Point::new(5.0, 5.0)));
        session.zoom_image(2.0).unwrap();
        assert!(session.pan_by(Point::new(5.0, -3.0)));
        assert_eq!(session.state().display_offset, Point::new(5.0, -3.0));

        // Changing zoom resets the offset
        session.zoom_image(3.0).unwrap();
        assert_eq!(session.state().display_offset, Point::ZERO);
    }

    #[test]
    fn test_undo_redo_restores_bytes_and_identity() {
        let mut session = loaded(40, 20);
        session.rotate_image(90).unwrap();
        session.crop_image(CropRect::new(0.0, 0.0, 20.0, 20.0)).unwrap();
        let after_crop = session.current_raster();

        assert!(session.undo());
        assert_eq!(session.transform(), &ViewTransform::identity());
        assert_eq!(session.dimensions(), Some((20, 40)));
        assert!(session.can_undo() && session.can_redo());

        assert!(session.redo());
        assert_eq!(session.current_raster(), after_crop);
        assert!(!session.can_redo());

        assert!(session.undo());
        assert!(session.undo());
        assert_eq!(session.current_raster(), Some(gradient(40, 20)));
        assert!(!session.undo());
    }

    #[test]
    fn test_new_edit_after_undo_prunes_redo() {
        let mut session = loaded(20, 10);
        session.rotate_image(90).unwrap();
        session.rotate_image(90).unwrap();
        session.undo();
        session.undo();
        assert_eq!(session.history().index(), 0);

        session.flip_image(FlipAxis::Vertical).unwrap();
        assert_eq!(session.history().len(), 2);
        assert!(!session.can_redo());
    }

    #[test]
    fn test_rotation_after_undo_starts_from_restored_pixels() {
        let mut session = loaded(20, 10);
        session.rotate_image(90).unwrap();
        session.undo();
        session.rotate_image(180).unwrap();
        assert_eq!(session.transform().rotation_degrees, 180);
        assert_eq!(session.dimensions(), Some((20, 10)));
    }

    #[test]
    fn test_resize() {
        let mut session = loaded(40, 20);
        session.resize_image(20, 10).unwrap();
        assert_eq!(session.dimensions(), Some((20, 10)));
        assert_eq!(session.history().len(), 2);
        assert_eq!(
            session.resize_image(0, 10),
            Err(EditorError::InvalidDimensions { width: 0, height: 10 })
        );
    }

    #[test]
    fn test_export_current_surface() {
        let mut session = loaded(12, 8);
        session.rotate_image(90).unwrap();
        let exported = session.export_as(ExportFormat::Png).unwrap();
        assert_eq!(exported.file_name, "image-editor-export.png");
        assert_eq!((exported.width, exported.height), (8, 12));

        let decoded = image::load_from_memory(&exported.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 12));

        let jpeg = session.export_as(ExportFormat::Jpeg).unwrap();
        assert_eq!(jpeg.mime_type, "image/jpeg");
        assert_eq!(jpeg.file_name, "image-editor-export.jpeg");
    }

    #[test]
    fn test_detach_and_reattach() {
        let mut session = loaded(9, 7);
        session.rotate_image(90).unwrap();
        let detached = session.detach_surface();
        assert!(detached.is_some());
        assert_eq!(session.rotate_image(90), Err(EditorError::SurfaceNotReady));

        session.attach_surface(PixelSurface::default());
        assert_eq!(session.dimensions(), Some((7, 9)));
    }

    #[test]
    fn test_snapshot_while_zoomed_excludes_zoom() {
        let mut session = loaded(20, 20);
        session.zoom_image(2.0).unwrap();
        session.add_shape_overlay(ShapeKind::Rect).unwrap();
        session.pointer_down(Point::new(10.0, 10.0)).unwrap();
        session.pointer_move(Point::new(12.0, 10.0)).unwrap();
        session.pointer_up().unwrap();
        assert_eq!(session.history().len(), 2);

        assert!(session.undo());
        assert!(session.redo());
        assert_eq!(session.current_raster(), Some(gradient(20, 20)));
        assert_eq!(session.source(), Some(&gradient(20, 20)));
    }

    #[test]
    fn test_rotate_while_zoomed_snapshots_unzoomed() {
        let mut plain = loaded(20, 10);
        plain.rotate_image(90).unwrap();

        let mut session = loaded(20, 10);
        session.zoom_image(3.0).unwrap();
        session.rotate_image(90).unwrap();
        assert_ne!(session.current_raster(), plain.current_raster());

        assert!(session.undo());
        assert!(session.redo());
        assert_eq!(session.current_raster(), plain.current_raster());
    }

    #[test]
    fn test_state_summary() {
        let mut session = loaded(16, 8);
        session.rotate_image(270).unwrap();
        let state = session.state();
        assert!(state.surface_ready && state.has_image);
        assert_eq!((state.width, state.height), (8, 16));
        assert_eq!(state.transform.rotation_degrees, 270);
        assert_eq!(state.history_length, 2);
        assert_eq!(state.history_index, 1);
        assert!(state.can_undo && !state.can_redo);
        assert_eq!(state.tool, Tool::None);
        assert!(!state.is_loading);
    }

    #[test]
    fn test_config_is_sanitized() {
        let mut config = EditorConfig::default();
        config.min_zoom = 3.0;
        config.max_zoom = 1.0;
        let mut session = ImageSession::<PixelSurface>::new(config);
        session.attach_surface(PixelSurface::default());
        session.load_raster(gradient(4, 4)).unwrap();
        assert_eq!(session.zoom_image(10.0), Ok(3.0));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::test_support::loaded;
    use super::*;
    use crate::transform::{MAX_ZOOM, MIN_ZOOM};
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Op {
        Rotate(i32),
        Flip(bool),
        Zoom(f64),
        Crop(f64, f64, f64, f64),
        Undo,
        Redo,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            prop_oneof![Just(90), Just(180), Just(270), Just(-90)].prop_map(Op::Rotate),
            any::<bool>().prop_map(Op::Flip),
            (0.01f64..10.0).prop_map(Op::Zoom),
            (0.0f64..20.0, 0.0f64..20.0, -10.0f64..20.0, -10.0f64..20.0)
                .prop_map(|(x, y, w, h)| Op::Crop(x, y, w, h)),
            Just(Op::Undo),
            Just(Op::Redo),
        ]
    }

    /// Apply `op`, returning true when the surface was committed or
    /// restored from history (so it must match the current snapshot).
    fn apply(session: &mut ImageSession, op: &Op) -> bool {
        match *op {
            Op::Rotate(degrees) => session.rotate_image(degrees).is_ok(),
            Op::Flip(horizontal) => {
                let axis = if horizontal {
                    FlipAxis::Horizontal
                } else {
                    FlipAxis::Vertical
                };
                session.flip_image(axis).is_ok()
            }
            Op::Zoom(level) => {
                let zoom = session.zoom_image(level).unwrap();
                assert!((MIN_ZOOM..=MAX_ZOOM).contains(&zoom));
                false
            }
            Op::Crop(x, y, w, h) => session.crop_image(CropRect::new(x, y, w, h)).unwrap(),
            Op::Undo => session.undo(),
            Op::Redo => session.redo(),
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        /// Property: undo/redo flags always match the history cursor.
        #[test]
        fn prop_flags_match_cursor(ops in prop::collection::vec(op_strategy(), 0..12)) {
            let mut session = loaded(12, 8);
            for op in &ops {
                apply(&mut session, op);
                let history = session.history();
                prop_assert_eq!(session.can_undo(), history.index() > 0);
                prop_assert_eq!(session.can_redo(), history.index() < history.len() as isize - 1);
            }
        }

        /// Property: after a committing op at zoom 1, the current snapshot
        /// equals the surface.
        #[test]
        fn prop_snapshot_matches_surface(ops in prop::collection::vec(op_strategy(), 0..10)) {
            let mut session = loaded(10, 6);
            // Zoom re-renders without a snapshot, so only check once a
            // later commit or restore has caught up.
            let mut in_sync = true;
            for op in &ops {
                let committed = apply(&mut session, op);
                in_sync = match op {
                    Op::Zoom(_) => false,
                    _ => in_sync || committed,
                };
                if in_sync && session.transform().zoom == 1.0 {
                    let shown = session.current_raster().unwrap();
                    let current = session.history().current().unwrap().to_raster();
                    prop_assert_eq!(shown, current);
                }
            }
        }

        /// Property: undo followed by redo is byte-identical.
        #[test]
        fn prop_undo_redo_identity(ops in prop::collection::vec(op_strategy(), 1..10)) {
            let mut session = loaded(10, 6);
            for op in &ops {
                apply(&mut session, op);
            }
            if session.can_undo() {
                session.undo();
                let restored = session.current_raster();
                session.redo();
                session.undo();
                prop_assert_eq!(session.current_raster(), restored);
                prop_assert!(session.transform().is_identity());
            }
        }
    }
}
