//! Adding, editing, confirming and cancelling pending overlays.

use super::pointer::Drag;
use super::ImageSession;
use crate::color::Color;
use crate::error::EditorError;
use crate::geometry::Point;
use crate::overlay::draw::draw_overlay;
use crate::overlay::{text, Overlay, OverlayShape, ShapeKind, TextStyle};
use crate::raster::Surface;

impl<S: Surface> ImageSession<S> {
    /// Append a text overlay centered on the canvas.
    ///
    /// `color` and `font_size` default to the current text style; the size
    /// is clamped to the configured range. Returns the overlay's index.
    pub fn add_text_overlay(
        &mut self,
        content: &str,
        color: Option<Color>,
        font_size: Option<f32>,
    ) -> Result<usize, EditorError> {
        self.ensure_ready()?;
        let style = TextStyle {
            color: color.unwrap_or(self.text_style.color),
            font_size: self
                .config
                .clamp_text_size(font_size.unwrap_or(self.text_style.font_size)),
        };

        let (w, h) = text::measure(self.font.as_ref(), content, style.font_size);
        let center = self.canvas_center()?;
        let position = Point::new(center.x - w / 2.0, center.y - h / 2.0);

        self.overlays.push(Overlay::text(position, content, style));
        log::info!("Text overlay added ({} pending)", self.overlays.len());
        Ok(self.overlays.len() - 1)
    }

    /// Append a shape overlay with the default geometry, centered on the
    /// canvas, in the default stroke color. Returns the overlay's index.
    pub fn add_shape_overlay(&mut self, kind: ShapeKind) -> Result<usize, EditorError> {
        self.ensure_ready()?;
        let center = self.canvas_center()?;
        let config = &self.config;

        let (position, shape) = match kind {
            ShapeKind::Rect => (
                Point::new(
                    center.x - config.default_rect_width / 2.0,
                    center.y - config.default_rect_height / 2.0,
                ),
                OverlayShape::Rect {
                    width: config.default_rect_width,
                    height: config.default_rect_height,
                },
            ),
            ShapeKind::Circle => (
                center,
                OverlayShape::Circle {
                    radius: config.default_circle_radius,
                },
            ),
            ShapeKind::Line => (
                Point::new(center.x - config.default_line_length / 2.0, center.y),
                OverlayShape::Line {
                    dx: config.default_line_length,
                    dy: 0.0,
                },
            ),
        };

        let color = config.shape_stroke.color;
        self.overlays.push(Overlay::shape(position, color, shape));
        log::info!("{:?} overlay added ({} pending)", kind, self.overlays.len());
        Ok(self.overlays.len() - 1)
    }

    /// Color for subsequent text overlays, as a CSS hex string.
    pub fn set_text_color(&mut self, hex: &str) -> Result<(), EditorError> {
        self.text_style.color = Color::from_hex(hex)?;
        Ok(())
    }

    /// Size for subsequent text overlays. Returns the clamped size.
    pub fn set_text_size(&mut self, size: f32) -> f32 {
        self.text_style.font_size = self.config.clamp_text_size(size);
        self.text_style.font_size
    }

    pub fn text_style(&self) -> TextStyle {
        self.text_style
    }

    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    pub fn update_overlay_color(&mut self, index: usize, hex: &str) -> Result<(), EditorError> {
        let color = Color::from_hex(hex)?;
        self.overlay_mut(index)?.color = color;
        Ok(())
    }

    /// Replace the text of a text overlay. Returns `Ok(false)` for shapes.
    pub fn update_overlay_text(&mut self, index: usize, content: &str) -> Result<bool, EditorError> {
        match &mut self.overlay_mut(index)?.shape {
            OverlayShape::Text { text, .. } => {
                *text = content.to_string();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Move an overlay without a history entry.
    pub fn move_overlay(&mut self, index: usize, position: Point) -> Result<(), EditorError> {
        self.overlay_mut(index)?.move_to(position);
        Ok(())
    }

    /// Rasterize overlay `index` onto the surface, remove it from the
    /// pending list and commit.
    ///
    /// Text needs an installed font; without one this returns
    /// `FontUnavailable` and the overlay stays pending.
    pub fn confirm_overlay(&mut self, index: usize) -> Result<(), EditorError> {
        self.ensure_ready()?;
        let overlay = self
            .overlays
            .get(index)
            .ok_or(EditorError::OverlayNotFound(index))?;
        if overlay.shape.is_text() && self.font.is_none() {
            return Err(EditorError::FontUnavailable);
        }

        self.settle_stroke();
        let overlay = self.take_overlay(index)?;
        let stroke_width = self.config.shape_stroke.width;
        let surface = self.surface.as_mut().ok_or(EditorError::SurfaceNotReady)?;
        draw_overlay(surface.canvas_mut(), &overlay, stroke_width, self.font.as_ref());

        self.bake()?;
        self.push_snapshot("overlay confirm")?;
        log::info!("Overlay confirmed ({} pending)", self.overlays.len());
        Ok(())
    }

    /// Discard overlay `index` without rasterizing it.
    pub fn cancel_overlay(&mut self, index: usize) -> Result<Overlay, EditorError> {
        let overlay = self.take_overlay(index)?;
        log::info!("Overlay cancelled ({} pending)", self.overlays.len());
        Ok(overlay)
    }

    fn overlay_mut(&mut self, index: usize) -> Result<&mut Overlay, EditorError> {
        self.overlays
            .get_mut(index)
            .ok_or(EditorError::OverlayNotFound(index))
    }

    /// Remove an overlay, keeping an in-progress overlay drag pointed at the
    /// same object.
    fn take_overlay(&mut self, index: usize) -> Result<Overlay, EditorError> {
        if index >= self.overlays.len() {
            return Err(EditorError::OverlayNotFound(index));
        }
        if let Drag::Overlay { index: dragged, grab } = self.drag {
            self.drag = match dragged.cmp(&index) {
                std::cmp::Ordering::Equal => Drag::Idle,
                std::cmp::Ordering::Greater => Drag::Overlay {
                    index: dragged - 1,
                    grab,
                },
                std::cmp::Ordering::Less => self.drag,
            };
        }
        Ok(self.overlays.remove(index))
    }

    fn canvas_center(&self) -> Result<Point, EditorError> {
        let surface = self.surface.as_ref().ok_or(EditorError::SurfaceNotReady)?;
        let (w, h) = surface.dimensions();
        Ok(Point::new(w as f64 / 2.0, h as f64 / 2.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use crate::encode::ExportFormat;
    use crate::overlay::text::test_fonts::system_font;
    use crate::raster::{PixelSurface, Raster};
    use crate::session::test_support::loaded;
    use crate::session::Tool;

    fn white_session(width: u32, height: u32) -> ImageSession {
        let mut session = ImageSession::<PixelSurface>::new(EditorConfig::default());
        session.attach_surface(PixelSurface::default());
        session
            .load_raster(Raster::filled(width, height, [255, 255, 255, 255]))
            .unwrap();
        session
    }

    #[test]
    fn test_overlay_ops_require_image() {
        let mut session = ImageSession::<PixelSurface>::new(EditorConfig::default());
        session.attach_surface(PixelSurface::default());
        assert_eq!(
            session.add_shape_overlay(ShapeKind::Circle),
            Err(EditorError::NoImage)
        );
        assert_eq!(
            session.add_text_overlay("x", None, None),
            Err(EditorError::NoImage)
        );
    }

    #[test]
    fn test_default_shape_geometry() {
        let mut session = loaded(200, 100);
        session.add_shape_overlay(ShapeKind::Rect).unwrap();
        session.add_shape_overlay(ShapeKind::Circle).unwrap();
        session.add_shape_overlay(ShapeKind::Line).unwrap();

        let overlays = session.overlays();
        assert_eq!(overlays[0].position, Point::new(50.0, 20.0));
        assert_eq!(
            overlays[0].shape,
            OverlayShape::Rect {
                width: 100.0,
                height: 60.0
            }
        );
        assert_eq!(overlays[1].position, Point::new(100.0, 50.0));
        assert_eq!(overlays[1].shape, OverlayShape::Circle { radius: 30.0 });
        assert_eq!(overlays[2].position, Point::new(50.0, 50.0));
        assert_eq!(overlays[2].shape, OverlayShape::Line { dx: 100.0, dy: 0.0 });
        // Adding is not a commit
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_text_style_applies_to_new_overlays() {
        let mut session = loaded(100, 100);
        session.set_text_color("#ff0000").unwrap();
        assert_eq!(session.set_text_size(200.0), 72.0);
        session.add_text_overlay("Hi", None, None).unwrap();
        session
            .add_text_overlay("Yo", Some(Color::rgb(0, 0, 255)), Some(2.0))
            .unwrap();

        let overlays = session.overlays();
        assert_eq!(overlays[0].color, Color::rgb(255, 0, 0));
        assert!(matches!(
            overlays[0].shape,
            OverlayShape::Text { font_size, .. } if font_size == 72.0
        ));
        assert_eq!(overlays[1].color, Color::rgb(0, 0, 255));
        assert!(matches!(
            overlays[1].shape,
            OverlayShape::Text { font_size, .. } if font_size == 8.0
        ));
        assert!(session.set_text_color("not a color").is_err());
    }

    #[test]
    fn test_update_and_cancel() {
        let mut session = loaded(100, 100);
        session.add_text_overlay("Hi", None, None).unwrap();
        session.add_shape_overlay(ShapeKind::Circle).unwrap();

        assert_eq!(session.update_overlay_text(0, "Hello"), Ok(true));
        assert_eq!(session.update_overlay_text(1, "nope"), Ok(false));
        session.update_overlay_color(1, "#00ff00").unwrap();
        assert_eq!(session.overlays()[1].color, Color::rgb(0, 255, 0));
        assert_eq!(
            session.update_overlay_color(5, "#000"),
            Err(EditorError::OverlayNotFound(5))
        );

        let removed = session.cancel_overlay(0).unwrap();
        assert!(matches!(removed.shape, OverlayShape::Text { ref text, .. } if text == "Hello"));
        assert_eq!(session.overlays().len(), 1);
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.cancel_overlay(3), Err(EditorError::OverlayNotFound(3)));
    }

    #[test]
    fn test_confirm_shape_rasterizes_in_own_color() {
        let mut session = white_session(200, 100);
        let index = session.add_shape_overlay(ShapeKind::Rect).unwrap();
        session.update_overlay_color(index, "#ff0000").unwrap();

        session.confirm_overlay(index).unwrap();
        assert!(session.overlays().is_empty());
        assert_eq!(session.history().len(), 2);

        let raster = session.current_raster().unwrap();
        // Rect spans (50, 20) to (150, 80); edges are stroked, inside is not
        assert_eq!(raster.pixel(50, 50), Some([255, 0, 0, 255]));
        assert_eq!(raster.pixel(100, 50), Some([255, 255, 255, 255]));

        assert!(session.undo());
        assert_eq!(
            session.current_raster().unwrap().pixel(50, 50),
            Some([255, 255, 255, 255])
        );
    }

    #[test]
    fn test_confirm_text_without_font_keeps_overlay() {
        let mut session = loaded(100, 100);
        session.add_text_overlay("Hi", None, None).unwrap();
        assert_eq!(session.confirm_overlay(0), Err(EditorError::FontUnavailable));
        assert_eq!(session.overlays().len(), 1);
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.confirm_overlay(4), Err(EditorError::OverlayNotFound(4)));
    }

    #[test]
    fn test_pending_overlays_survive_tool_switch_and_are_not_exported() {
        let mut session = white_session(50, 50);
        session.add_shape_overlay(ShapeKind::Line).unwrap();
        session.select_tool(Tool::Crop);
        session.select_tool(Tool::Shape);
        assert_eq!(session.overlays().len(), 1);

        let exported = session.export_as(ExportFormat::Png).unwrap();
        let decoded = image::load_from_memory(&exported.bytes).unwrap().into_rgba8();
        assert!(decoded.pixels().all(|p| p.0 == [255, 255, 255, 255]));
    }

    #[test]
    fn test_cancel_during_drag_keeps_drag_target() {
        let mut session = loaded(200, 200);
        session.add_shape_overlay(ShapeKind::Circle).unwrap(); // index 0, centered
        let mut far = session.overlays()[0].clone();
        far.move_to(Point::new(20.0, 20.0));
        session.overlays.insert(0, far); // index 0 far, centered circle now 1

        session.pointer_down(Point::new(100.0, 100.0)).unwrap();
        session.cancel_overlay(0).unwrap();
        session.pointer_move(Point::new(110.0, 100.0)).unwrap();
        session.pointer_up().unwrap();
        assert_eq!(session.overlays()[0].position, Point::new(110.0, 100.0));
    }

    #[test]
    fn test_text_overlay_scenario() {
        let Some(font) = system_font() else {
            return;
        };
        let mut session = white_session(200, 100);
        session.set_font(font);
        session.select_tool(Tool::Text);

        let index = session.add_text_overlay("Hi", None, None).unwrap();
        let start = session.overlays()[index].position;
        let grab = Point::new(start.x + 2.0, start.y + 2.0);
        let history_before = session.history().len();

        // No snapshot while dragging
        session.pointer_down(grab).unwrap();
        session.pointer_move(Point::new(grab.x - 30.0, grab.y)).unwrap();
        session.pointer_move(Point::new(grab.x - 60.0, grab.y)).unwrap();
        assert_eq!(session.history().len(), history_before);
        assert_eq!(session.overlays()[index].position, Point::new(start.x - 60.0, start.y));

        // One snapshot on release
        session.pointer_up().unwrap();
        assert_eq!(session.history().len(), history_before + 1);

        // One more on confirm, and the text is in the exported pixels
        session.confirm_overlay(index).unwrap();
        assert!(session.overlays().is_empty());
        assert_eq!(session.history().len(), history_before + 2);

        let exported = session.export_as(ExportFormat::Png).unwrap();
        let decoded = image::load_from_memory(&exported.bytes).unwrap().into_rgba8();
        let dark = decoded.pixels().filter(|p| p.0[0] < 128).count();
        assert!(dark > 0, "expected text pixels in export");
    }

    #[test]
    fn test_confirm_after_rotation_bakes() {
        let mut session = white_session(60, 30);
        session.rotate_image(90).unwrap();
        session.add_shape_overlay(ShapeKind::Circle).unwrap();
        session.confirm_overlay(0).unwrap();

        assert!(session.transform().is_identity());
        assert_eq!(session.dimensions(), Some((30, 60)));
        assert_eq!(session.source(), session.current_raster().as_ref());

        // A further rotation turns the annotated raster
        let annotated = session.current_raster().unwrap();
        session.rotate_image(90).unwrap();
        assert_eq!(session.dimensions(), Some((60, 30)));
        assert_ne!(session.current_raster(), Some(annotated));
    }
}
