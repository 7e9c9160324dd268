//! Linear undo/redo history of grid mutations
//!
//! Recording a new entry discards any redo branch beyond the counter.

use tracing::warn;

use crate::catalog::index::TileRef;
use crate::spatial::grid::Coord;

/// A single reversible grid mutation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionLogEntry {
    /// One cell changed
    TileChange {
        /// Cell position
        position: Coord,
        /// Tile before the change
        old: TileRef,
        /// Tile after the change
        new: TileRef,
    },
    /// The map was resized
    Resize {
        /// Dimensions before, as `(width, height)`
        old: (usize, usize),
        /// Dimensions after, as `(width, height)`
        new: (usize, usize),
    },
}

/// Ordered entries plus the index of the last applied one
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionLog {
    entries: Vec<ActionLogEntry>,
    /// Index of the last applied entry; -1 when nothing is applied
    counter: isize,
}

impl Default for ActionLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionLog {
    /// Create an empty log
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            counter: -1,
        }
    }

    /// Append after the counter, discarding the redo branch
    pub fn record(&mut self, entry: ActionLogEntry) {
        let keep = (self.counter + 1) as usize;
        self.entries.truncate(keep);
        self.entries.push(entry);
        self.counter = keep as isize;
    }

    /// Step back, returning the entry whose old state must be restored
    pub fn undo(&mut self) -> Option<ActionLogEntry> {
        if self.counter < 0 {
            warn!("nothing to undo");
            return None;
        }
        let entry = self.entries.get(self.counter as usize).copied();
        self.counter -= 1;
        entry
    }

    /// Step forward, returning the entry whose new state must be applied
    pub fn redo(&mut self) -> Option<ActionLogEntry> {
        let next = (self.counter + 1) as usize;
        if next >= self.entries.len() {
            warn!("nothing to redo");
            return None;
        }
        let entry = self.entries.get(next).copied();
        self.counter += 1;
        entry
    }

    /// Index of the last applied entry; -1 when nothing is applied
    pub const fn counter(&self) -> isize {
        self.counter
    }

    /// Number of stored entries, including undone ones
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was ever recorded
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All stored entries
    pub fn entries(&self) -> &[ActionLogEntry] {
        &self.entries
    }

    /// Whether [`ActionLog::undo`] would succeed
    pub const fn can_undo(&self) -> bool {
        self.counter >= 0
    }

    /// Whether [`ActionLog::redo`] would succeed
    pub const fn can_redo(&self) -> bool {
        ((self.counter + 1) as usize) < self.entries.len()
    }

    /// Forget every entry
    pub fn clear(&mut self) {
        self.entries.clear();
        self.counter = -1;
    }
}
