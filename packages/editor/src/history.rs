//! # Undo/Redo History
//!
//! Linear snapshot history: an ordered list of [`Document`] snapshots and a
//! pointer to the current one.
//!
//! ## Design
//!
//! - Recording truncates everything after the pointer, appends, and moves the
//!   pointer to the new last entry
//! - Undo/redo only move the pointer; the caller swaps the snapshot in
//! - Snapshots are `Arc`s, so undo and redo hand back the exact value that
//!   was recorded
//! - An optional level cap evicts the oldest entries
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut history = History::new(initial);
//! history.record(next, Some("Add Button"));
//!
//! let previous = history.undo();   // Some(initial)
//! let again = history.redo();      // Some(next)
//! ```

use crate::document::Document;
use crate::errors::EditorError;
use std::sync::Arc;

/// One recorded state
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub document: Arc<Document>,

    /// Optional description of the edit that produced this state
    pub label: Option<String>,
}

impl HistoryEntry {
    pub fn new(document: Arc<Document>, label: Option<String>) -> Self {
        Self { document, label }
    }
}

/// Snapshot history for one editing session
#[derive(Debug)]
pub struct History {
    entries: Vec<HistoryEntry>,
    pointer: usize,

    /// Maximum number of entries kept (0 = unlimited)
    max_levels: usize,
}

impl History {
    /// Start a history at `initial` with no level cap
    pub fn new(initial: Arc<Document>) -> Self {
        Self::with_max_levels(initial, 0)
    }

    pub fn with_max_levels(initial: Arc<Document>, max_levels: usize) -> Self {
        Self {
            entries: vec![HistoryEntry::new(initial, None)],
            pointer: 0,
            max_levels,
        }
    }

    /// Rebuild a history from persisted entries
    pub fn from_parts(
        entries: Vec<HistoryEntry>,
        pointer: usize,
        max_levels: usize,
    ) -> Result<Self, EditorError> {
        if entries.is_empty() {
            return Err(EditorError::InvalidHistory("history has no entries".to_string()));
        }
        if pointer >= entries.len() {
            return Err(EditorError::InvalidHistory(format!(
                "pointer {} is out of range for {} entries",
                pointer,
                entries.len()
            )));
        }

        let mut history = Self {
            entries,
            pointer,
            max_levels,
        };
        history.evict_oldest();
        Ok(history)
    }

    /// Record a new current state, discarding any redo states
    pub fn record(&mut self, document: Arc<Document>, label: Option<String>) {
        self.entries.truncate(self.pointer + 1);
        self.entries.push(HistoryEntry::new(document, label));
        self.pointer = self.entries.len() - 1;
        self.evict_oldest();
    }

    fn evict_oldest(&mut self) {
        if self.max_levels == 0 || self.entries.len() <= self.max_levels {
            return;
        }

        let excess = (self.entries.len() - self.max_levels).min(self.pointer);
        self.entries.drain(..excess);
        self.pointer -= excess;
    }

    /// Step back; `None` at the oldest entry
    pub fn undo(&mut self) -> Option<Arc<Document>> {
        if !self.can_undo() {
            return None;
        }
        self.pointer -= 1;
        Some(self.current())
    }

    /// Step forward; `None` at the newest entry
    pub fn redo(&mut self) -> Option<Arc<Document>> {
        if !self.can_redo() {
            return None;
        }
        self.pointer += 1;
        Some(self.current())
    }

    pub fn can_undo(&self) -> bool {
        self.pointer > 0
    }

    pub fn can_redo(&self) -> bool {
        self.pointer + 1 < self.entries.len()
    }

    /// Drop everything and start over at `initial`
    pub fn reset(&mut self, initial: Arc<Document>) {
        self.entries = vec![HistoryEntry::new(initial, None)];
        self.pointer = 0;
    }

    pub fn current(&self) -> Arc<Document> {
        Arc::clone(&self.entries[self.pointer].document)
    }

    /// Description of the edit the next undo reverts
    pub fn undo_label(&self) -> Option<&str> {
        if !self.can_undo() {
            return None;
        }
        self.entries[self.pointer].label.as_deref()
    }

    /// Description of the edit the next redo reapplies
    pub fn redo_label(&self) -> Option<&str> {
        self.entries
            .get(self.pointer + 1)
            .and_then(|entry| entry.label.as_deref())
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_levels(&self) -> usize {
        self.max_levels
    }
}
