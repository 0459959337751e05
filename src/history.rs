//! Linear undo/redo history.
//!
//! The stack holds every committed state; `pointer` marks the one currently
//! shown. Pushing after an undo discards the entries above the pointer.

use tracing::debug;

#[derive(Debug, Clone)]
pub struct HistoryStack<T> {
    entries: Vec<T>,
    pointer: usize,
    capacity: Option<usize>,
}

impl<T> Default for HistoryStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> HistoryStack<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            pointer: 0,
            capacity: None,
        }
    }

    /// History that evicts its oldest entry once `capacity` states are held.
    /// A capacity of zero is treated as one.
    pub fn bounded(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            pointer: 0,
            capacity: Some(capacity.max(1)),
        }
    }

    pub fn with_capacity(capacity: Option<usize>) -> Self {
        match capacity {
            Some(capacity) => Self::bounded(capacity),
            None => Self::new(),
        }
    }

    /// Seeds the history with the state shown before any edit. Only takes
    /// effect while the history is empty; returns whether it did.
    pub fn set_initial_state(&mut self, state: T) -> bool {
        if !self.entries.is_empty() {
            return false;
        }
        self.entries.push(state);
        self.pointer = 0;
        true
    }

    /// Records a committed state, dropping any redo entries.
    pub fn take_snapshot(&mut self, state: T) {
        if !self.entries.is_empty() {
            let dropped = self.entries.len() - (self.pointer + 1);
            if dropped > 0 {
                debug!(dropped, "discarding redo branch");
            }
            self.entries.truncate(self.pointer + 1);
        }
        self.entries.push(state);
        if let Some(capacity) = self.capacity {
            let overflow = self.entries.len().saturating_sub(capacity);
            if overflow > 0 {
                self.entries.drain(..overflow);
            }
        }
        self.pointer = self.entries.len() - 1;
    }

    pub fn undo(&mut self) -> Option<&T> {
        if !self.can_undo() {
            return None;
        }
        self.pointer -= 1;
        self.entries.get(self.pointer)
    }

    pub fn redo(&mut self) -> Option<&T> {
        if !self.can_redo() {
            return None;
        }
        self.pointer += 1;
        self.entries.get(self.pointer)
    }

    pub fn can_undo(&self) -> bool {
        self.pointer > 0
    }

    pub fn can_redo(&self) -> bool {
        self.pointer + 1 < self.entries.len()
    }

    pub fn current(&self) -> Option<&T> {
        self.entries.get(self.pointer)
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

    pub fn clear(&mut self) {
        self.entries.clear();
        self.pointer = 0;
    }
}
