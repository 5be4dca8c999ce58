//! Undo/redo history.
//!
//! A linear sequence of full document snapshots with a cursor — no
//! command or diff model. Recording truncates any forward ("redone")
//! entries, appends the post-edit snapshot, and trims the oldest entries
//! beyond the configured depth.
//!
//! Drag gestures use **batch grouping**: edits between `begin_batch` and
//! `end_batch` are applied live but collapse into a single snapshot when
//! the gesture ends, so a 200-frame drag is one undo step.

use easel_core::model::Document;

/// Default maximum number of snapshots kept.
pub const DEFAULT_DEPTH: usize = 200;

pub struct History {
    snapshots: Vec<Document>,
    /// Index of the snapshot matching the live document.
    cursor: usize,
    max_depth: usize,
    /// Batch nesting depth (0 = not batching).
    batch_depth: usize,
    /// Whether any edit occurred during the current batch.
    batch_dirty: bool,
}

impl History {
    /// Create a history whose first entry is the seeded document.
    pub fn new(initial: Document, max_depth: usize) -> Self {
        Self {
            snapshots: vec![initial],
            cursor: 0,
            max_depth: max_depth.max(2),
            batch_depth: 0,
            batch_dirty: false,
        }
    }

    /// Record the post-edit state. Inside a batch this only marks the
    /// batch dirty; the snapshot is taken once at `end_batch`.
    pub fn record(&mut self, doc: &Document) {
        if self.batch_depth > 0 {
            self.batch_dirty = true;
            return;
        }
        self.push(doc.clone());
    }

    /// Start a batch group (a drag gesture).
    pub fn begin_batch(&mut self) {
        if self.batch_depth == 0 {
            self.batch_dirty = false;
        }
        self.batch_depth += 1;
    }

    /// End a batch group. When the outermost batch closes and something
    /// changed, one snapshot is pushed for the whole gesture.
    pub fn end_batch(&mut self, doc: &Document) {
        if self.batch_depth == 0 {
            return;
        }
        self.batch_depth -= 1;
        if self.batch_depth == 0 && self.batch_dirty {
            self.push(doc.clone());
            self.batch_dirty = false;
        }
    }

    fn push(&mut self, snapshot: Document) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(snapshot);
        if self.snapshots.len() > self.max_depth {
            self.snapshots.remove(0);
        }
        self.cursor = self.snapshots.len() - 1;
    }

    /// Step back. Returns the document to restore, or `None` at the start.
    pub fn undo(&mut self) -> Option<Document> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        log::debug!("undo -> snapshot {}/{}", self.cursor, self.snapshots.len());
        Some(self.snapshots[self.cursor].clone())
    }

    /// Step forward. Returns the document to restore, or `None` at the end.
    pub fn redo(&mut self) -> Option<Document> {
        if self.cursor + 1 >= self.snapshots.len() {
            return None;
        }
        self.cursor += 1;
        log::debug!("redo -> snapshot {}/{}", self.cursor, self.snapshots.len());
        Some(self.snapshots[self.cursor].clone())
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
