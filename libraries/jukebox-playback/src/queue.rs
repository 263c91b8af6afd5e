//! Selection queue
//!
//! Plain FIFO of pending selections:
//! ```text
//! head  ─► Selection (now up / now playing)
//!          Selection
//!          Selection
//! tail  ─► Selection (most recently enqueued)
//! ```

use crate::types::Selection;
use std::collections::VecDeque;

/// FIFO of pending selections
#[derive(Debug, Clone, Default)]
pub struct SelectionQueue {
    entries: VecDeque<Selection>,
}

impl SelectionQueue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Append selection to the tail
    pub fn enqueue(&mut self, selection: Selection) {
        self.entries.push_back(selection);
    }

    /// Head of the queue without removing it
    pub fn peek(&self) -> Option<Selection> {
        self.entries.front().copied()
    }

    /// Remove and return the head
    pub fn pop_front(&mut self) -> Option<Selection> {
        self.entries.pop_front()
    }

    /// Remove every entry
    ///
    /// Session state is owned elsewhere and is not affected.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate entries head first
    pub fn iter(&self) -> impl Iterator<Item = &Selection> {
        self.entries.iter()
    }

    /// Copy of all entries in play order
    pub fn snapshot(&self) -> Vec<Selection> {
        self.entries.iter().copied().collect()
    }
}
