//! Snapshot history with a cursor, for undo and redo.
//!
//! The history is a linear list of immutable raster snapshots. Pushing while
//! the cursor is not at the tail prunes everything after the cursor, so there
//! is never a redo branch after a new edit.

use std::sync::Arc;

use crate::raster::Raster;

/// An immutable copy of the surface at one point in time.
///
/// Cloning a snapshot shares the underlying bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    width: u32,
    height: u32,
    bytes: Arc<[u8]>,
}

impl Snapshot {
    pub fn from_raster(raster: &Raster) -> Self {
        Self {
            width: raster.width,
            height: raster.height,
            bytes: Arc::from(raster.pixels.as_slice()),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Serialized RGBA bytes of the snapshot.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_raster(&self) -> Raster {
        Raster {
            width: self.width,
            height: self.height,
            pixels: self.bytes.to_vec(),
        }
    }
}

/// Ordered snapshot stack plus cursor.
#[derive(Debug, Clone, Default)]
pub struct History {
    snapshots: Vec<Snapshot>,
    /// `None` while the history is empty.
    cursor: Option<usize>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard everything and start over with a single snapshot.
    pub fn reset(&mut self, initial: Snapshot) {
        self.snapshots.clear();
        self.snapshots.push(initial);
        self.cursor = Some(0);
    }

    /// Drop all snapshots.
    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.cursor = None;
    }

    /// Truncate after the cursor, append, and move the cursor to the tail.
    pub fn push(&mut self, snapshot: Snapshot) {
        if let Some(cursor) = self.cursor {
            self.snapshots.truncate(cursor + 1);
        }
        self.snapshots.push(snapshot);
        self.cursor = Some(self.snapshots.len() - 1);
    }

    /// Step back one snapshot. Returns the snapshot to restore, or `None`
    /// (and leaves the cursor alone) when there is nothing to undo.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        let cursor = self.cursor.filter(|&c| c > 0)?;
        self.cursor = Some(cursor - 1);
        self.snapshots.get(cursor - 1)
    }

    /// Step forward one snapshot. Returns the snapshot to restore, or `None`
    /// when already at the tail.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        let cursor = self.cursor?;
        if cursor + 1 >= self.snapshots.len() {
            return None;
        }
        self.cursor = Some(cursor + 1);
        self.snapshots.get(cursor + 1)
    }

    pub fn can_undo(&self) -> bool {
        matches!(self.cursor, Some(c) if c > 0)
    }

    pub fn can_redo(&self) -> bool {
        matches!(self.cursor, Some(c) if c + 1 < self.snapshots.len())
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Cursor position, `-1` when empty.
    pub fn index(&self) -> isize {
        self.cursor.map_or(-1, |c| c as isize)
    }

    /// Snapshot under the cursor.
    pub fn current(&self) -> Option<&Snapshot> {
        self.cursor.and_then(|c| self.snapshots.get(c))
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Op {
        Push(u8),
        Undo,
        Redo,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            any::<u8>().prop_map(Op::Push),
            Just(Op::Undo),
            Just(Op::Redo),
        ]
    }

    fn snap(value: u8) -> Snapshot {
        Snapshot::from_raster(&Raster::filled(1, 1, [value, 0, 0, 255]))
    }

    proptest! {
        /// Property: can_undo / can_redo always agree with the cursor.
        #[test]
        fn prop_flags_match_cursor(ops in prop::collection::vec(op_strategy(), 0..60)) {
            let mut history = History::new();
            history.reset(snap(0));

            for op in ops {
                match op {
                    Op::Push(v) => history.push(snap(v)),
                    Op::Undo => { history.undo(); }
                    Op::Redo => { history.redo(); }
                }
                let idx = history.index();
                let len = history.len() as isize;
                prop_assert!(idx >= 0 && idx < len);
                prop_assert_eq!(history.can_undo(), idx > 0);
                prop_assert_eq!(history.can_redo(), idx < len - 1);
            }
        }

        /// Property: undo then redo lands on the same snapshot.
        #[test]
        fn prop_undo_redo_is_idempotent(values in prop::collection::vec(any::<u8>(), 1..20)) {
            let mut history = History::new();
            history.reset(snap(0));
            for v in values {
                history.push(snap(v));
            }

            let before = history.current().cloned();
            let index = history.index();
            history.undo();
            history.redo();
            prop_assert_eq!(history.current().cloned(), before);
            prop_assert_eq!(history.index(), index);
        }

        /// Property: pushing after undoing to index k truncates to k + 1 first.
        #[test]
        fn prop_push_truncates_after_cursor(
            count in 1usize..20,
            undos in 0usize..20,
            pushes in 1usize..5,
        ) {
            let mut history = History::new();
            history.reset(snap(0));
            for i in 0..count {
                history.push(snap(i as u8));
            }
            for _ in 0..undos {
                history.undo();
            }
            let k = history.index() as usize;

            for i in 0..pushes {
                history.push(snap(200 + i as u8));
            }
            prop_assert_eq!(history.len(), k + 1 + pushes);
            prop_assert!(!history.can_redo());
        }
    }
}
