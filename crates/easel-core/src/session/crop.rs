//! The interactive crop sub-session.
//!
//! ```text
//! Idle --down--> Drawing --up--> (commit) Idle
//!                        \--up--> Pending --down on handle--> Resizing --up--> Pending
//!                                    \--confirm/cancel--> Idle
//! ```
//!
//! Handle positions are derived from the rectangle on every call, never
//! stored.

use serde::{Deserialize, Serialize};

use crate::geometry::{CropRect, Point};

/// The eight resize affordances of a crop rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CropHandle {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
}

impl CropHandle {
    pub const ALL: [CropHandle; 8] = [
        CropHandle::TopLeft,
        CropHandle::Top,
        CropHandle::TopRight,
        CropHandle::Right,
        CropHandle::BottomRight,
        CropHandle::Bottom,
        CropHandle::BottomLeft,
        CropHandle::Left,
    ];

    /// Where this handle sits on `rect` (corners and edge midpoints).
    pub fn position(self, rect: &CropRect) -> Point {
        let (l, t, r, b) = (rect.left(), rect.top(), rect.right(), rect.bottom());
        let cx = (l + r) / 2.0;
        let cy = (t + b) / 2.0;
        match self {
            CropHandle::TopLeft => Point::new(l, t),
            CropHandle::Top => Point::new(cx, t),
            CropHandle::TopRight => Point::new(r, t),
            CropHandle::Right => Point::new(r, cy),
            CropHandle::BottomRight => Point::new(r, b),
            CropHandle::Bottom => Point::new(cx, b),
            CropHandle::BottomLeft => Point::new(l, b),
            CropHandle::Left => Point::new(l, cy),
        }
    }

    fn moves_left(self) -> bool {
        matches!(self, CropHandle::TopLeft | CropHandle::Left | CropHandle::BottomLeft)
    }

    fn moves_right(self) -> bool {
        matches!(self, CropHandle::TopRight | CropHandle::Right | CropHandle::BottomRight)
    }

    fn moves_top(self) -> bool {
        matches!(self, CropHandle::TopLeft | CropHandle::Top | CropHandle::TopRight)
    }

    fn moves_bottom(self) -> bool {
        matches!(self, CropHandle::BottomLeft | CropHandle::Bottom | CropHandle::BottomRight)
    }

    /// Drag this handle of `original` by `delta`. Edge handles move one
    /// edge, corner handles move two. The result may be inverted if an edge
    /// is dragged past its opposite; it is normalized on release.
    pub fn drag(self, original: &CropRect, delta: Point) -> CropRect {
        let mut left = original.left();
        let mut top = original.top();
        let mut right = original.right();
        let mut bottom = original.bottom();

        if self.moves_left() {
            left += delta.x;
        }
        if self.moves_right() {
            right += delta.x;
        }
        if self.moves_top() {
            top += delta.y;
        }
        if self.moves_bottom() {
            bottom += delta.y;
        }

        CropRect::new(left, top, right - left, bottom - top)
    }
}

/// All handles of `rect` with their positions.
pub fn handle_positions(rect: &CropRect) -> Vec<(CropHandle, Point)> {
    CropHandle::ALL
        .iter()
        .map(|&handle| (handle, handle.position(rect)))
        .collect()
}

/// The handle whose `size x size` square contains `point`.
pub fn hit_test_handle(rect: &CropRect, point: Point, size: f64) -> Option<CropHandle> {
    let half = size / 2.0;
    CropHandle::ALL.into_iter().find(|handle| {
        let p = handle.position(rect);
        (point.x - p.x).abs() <= half && (point.y - p.y).abs() <= half
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum Phase {
    #[default]
    Idle,
    Drawing {
        anchor: Point,
    },
    Pending,
    Resizing {
        handle: CropHandle,
        grab: Point,
        original: CropRect,
    },
}

/// What a pointer release produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CropRelease {
    /// Nothing was being dragged.
    None,
    /// A freshly drawn rectangle (normalized).
    Drawn(CropRect),
    /// An existing rectangle after a handle drag (normalized).
    Resized(CropRect),
}

/// Ephemeral crop state. Only one rectangle exists at a time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CropSession {
    rect: Option<CropRect>,
    phase: Phase,
}

impl CropSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rect(&self) -> Option<CropRect> {
        self.rect
    }

    /// True while the pointer is held (drawing or resizing).
    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Drawing { .. } | Phase::Resizing { .. })
    }

    pub fn is_pending(&self) -> bool {
        self.phase == Phase::Pending
    }

    pub fn handles(&self) -> Vec<(CropHandle, Point)> {
        self.rect.as_ref().map(handle_positions).unwrap_or_default()
    }

    /// Start drawing, or start resizing when a pending rectangle's handle
    /// is grabbed. Pressing elsewhere discards a pending rectangle and
    /// starts a new one.
    pub fn pointer_down(&mut self, point: Point, handle_size: f64) {
        if let (Phase::Pending, Some(rect)) = (self.phase, self.rect) {
            if let Some(handle) = hit_test_handle(&rect, point, handle_size) {
                log::debug!("crop: resizing via {:?}", handle);
                self.phase = Phase::Resizing {
                    handle,
                    grab: point,
                    original: rect,
                };
                return;
            }
        }

        log::debug!("crop: drawing from ({:.1}, {:.1})", point.x, point.y);
        self.rect = Some(CropRect::new(point.x, point.y, 0.0, 0.0));
        self.phase = Phase::Drawing { anchor: point };
    }

    pub fn pointer_move(&mut self, point: Point) {
        match self.phase {
            Phase::Drawing { anchor } => {
                self.rect = Some(CropRect::new(
                    anchor.x,
                    anchor.y,
                    point.x - anchor.x,
                    point.y - anchor.y,
                ));
            }
            Phase::Resizing {
                handle,
                grab,
                original,
            } => {
                self.rect = Some(handle.drag(&original, point - grab));
            }
            Phase::Idle | Phase::Pending => {}
        }
    }

    /// End the current drag. The rectangle is left pending; the caller
    /// commits or keeps it.
    pub fn pointer_up(&mut self) -> CropRelease {
        let release = match (self.phase, self.rect) {
            (Phase::Drawing { .. }, Some(rect)) => CropRelease::Drawn(rect.normalized()),
            (Phase::Resizing { .. }, Some(rect)) => CropRelease::Resized(rect.normalized()),
            _ => return CropRelease::None,
        };

        if let CropRelease::Drawn(rect) | CropRelease::Resized(rect) = release {
            self.rect = Some(rect);
        }
        self.phase = Phase::Pending;
        release
    }

    /// Take the rectangle for committing and return to idle.
    pub fn take(&mut self) -> Option<CropRect> {
        self.phase = Phase::Idle;
        self.rect.take().map(|rect| rect.normalized())
    }

    /// Drop any rectangle and return to idle.
    pub fn cancel(&mut self) {
        if self.rect.is_some() {
            log::debug!("crop: cancelled");
        }
        self.rect = None;
        self.phase = Phase::Idle;
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
