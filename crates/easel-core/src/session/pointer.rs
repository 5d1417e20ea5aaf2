//! Tool selection and pointer routing.
//!
//! Only one drag runs at a time. What a press starts depends on the tool:
//!
//! | Tool                  | Press starts                                   |
//! |-----------------------|------------------------------------------------|
//! | `crop`                | drawing or resizing the crop rectangle         |
//! | `draw`                | a freehand stroke                              |
//! | `none`/`text`/`shape` | an overlay drag, or a pan when zoomed in       |
//!
//! A pointer leaving the surface is a release.

use serde::{Deserialize, Serialize};

use super::ImageSession;
use crate::error::EditorError;
use crate::geometry::Point;
use crate::overlay::draw::stroke_segment;
use crate::overlay::hit_test_topmost;
use crate::raster::Surface;

use super::crop::CropRelease;

/// The active editing tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    None,
    Crop,
    Text,
    Shape,
    Draw,
}

impl Tool {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Some(Tool::None),
            "crop" => Some(Tool::Crop),
            "text" => Some(Tool::Text),
            "shape" => Some(Tool::Shape),
            "draw" => Some(Tool::Draw),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tool::None => "none",
            Tool::Crop => "crop",
            Tool::Text => "text",
            Tool::Shape => "shape",
            Tool::Draw => "draw",
        }
    }
}

/// Drag in progress outside the crop sub-session.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) enum Drag {
    #[default]
    Idle,
    Overlay {
        index: usize,
        /// Pointer position relative to the overlay anchor.
        grab: Point,
    },
    Pan {
        last: Point,
    },
    Stroke {
        last: Point,
    },
}

impl<S: Surface> ImageSession<S> {
    /// Switch tools. A pending crop rectangle and any drag or pan are
    /// dropped; an unfinished freehand stroke is committed. Pending overlays
    /// are kept.
    pub fn select_tool(&mut self, tool: Tool) {
        if tool == self.tool {
            return;
        }
        self.settle_stroke();
        self.crop.cancel();
        self.drag = Drag::Idle;
        log::debug!("Tool {} -> {}", self.tool.as_str(), tool.as_str());
        self.tool = tool;
    }

    /// True while any pointer drag is active.
    pub fn is_dragging(&self) -> bool {
        self.drag != Drag::Idle || self.crop.is_dragging()
    }

    pub fn pointer_down(&mut self, point: Point) -> Result<(), EditorError> {
        self.ensure_ready()?;
        if self.is_dragging() {
            return Ok(());
        }

        match self.tool {
            Tool::Crop => self.crop.pointer_down(point, self.config.crop_handle_size),
            Tool::Draw => {
                let brush = self.config.brush;
                let surface = self.surface.as_mut().ok_or(EditorError::SurfaceNotReady)?;
                stroke_segment(surface.canvas_mut(), point, point, brush);
                self.drag = Drag::Stroke { last: point };
                log::debug!("Stroke started at ({:.1}, {:.1})", point.x, point.y);
            }
            Tool::None | Tool::Text | Tool::Shape => {
                let hit = hit_test_topmost(
                    &self.overlays,
                    point,
                    self.config.overlay_hit_padding,
                    self.font.as_ref(),
                );
                if let Some(index) = hit {
                    let grab = point - self.overlays[index].position;
                    self.drag = Drag::Overlay { index, grab };
                    log::debug!("Dragging overlay {}", index);
                } else if self.transform.can_pan() {
                    self.drag = Drag::Pan { last: point };
                }
            }
        }
        Ok(())
    }

    pub fn pointer_move(&mut self, point: Point) -> Result<(), EditorError> {
        self.ensure_ready()?;

        if self.crop.is_dragging() {
            self.crop.pointer_move(point);
            return Ok(());
        }

        match self.drag {
            Drag::Idle => {}
            Drag::Overlay { index, grab } => {
                if let Some(overlay) = self.overlays.get_mut(index) {
                    overlay.move_to(point - grab);
                }
            }
            Drag::Pan { last } => {
                self.transform.pan_offset = self.transform.pan_offset + (point - last);
                self.drag = Drag::Pan { last: point };
            }
            Drag::Stroke { last } => {
                let brush = self.config.brush;
                let surface = self.surface.as_mut().ok_or(EditorError::SurfaceNotReady)?;
                stroke_segment(surface.canvas_mut(), last, point, brush);
                self.drag = Drag::Stroke { last: point };
            }
        }
        Ok(())
    }

    pub fn pointer_up(&mut self) -> Result<(), EditorError> {
        self.ensure_ready()?;

        if self.crop.is_dragging() {
            match self.crop.pointer_up() {
                CropRelease::Drawn(_) if self.config.crop_commit_on_release => {
                    if let Some(rect) = self.crop.take() {
                        self.commit_crop(rect)?;
                    }
                }
                CropRelease::Drawn(rect) | CropRelease::Resized(rect) => {
                    if rect.width < 1.0 || rect.height < 1.0 {
                        self.crop.cancel();
                    }
                }
                CropRelease::None => {}
            }
            return Ok(());
        }

        match std::mem::take(&mut self.drag) {
            Drag::Idle | Drag::Pan { .. } => {}
            Drag::Overlay { index, .. } => {
                log::debug!("Overlay {} dropped", index);
                self.push_snapshot("overlay drag")?;
            }
            Drag::Stroke { .. } => self.finish_stroke()?,
        }
        Ok(())
    }

    /// Same as a release.
    pub fn pointer_leave(&mut self) -> Result<(), EditorError> {
        self.pointer_up()
    }

    /// Commit an unfinished freehand stroke, if any.
    pub(crate) fn settle_stroke(&mut self) {
        if let Drag::Stroke { .. } = self.drag {
            self.drag = Drag::Idle;
            if let Err(err) = self.finish_stroke() {
                log::warn!("Could not commit stroke: {}", err);
            }
        }
    }

    fn finish_stroke(&mut self) -> Result<(), EditorError> {
        self.bake()?;
        self.push_snapshot("freehand stroke")?;
        log::info!("Freehand stroke committed");
        Ok(())
    }
}
