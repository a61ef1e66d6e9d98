//! Undo/Redo snapshot stack.
//!
//! Every mutating operation pushes a snapshot of the whole scene taken
//! *before* the mutation. Undo swaps the current scene for the most recent
//! snapshot; redo is the mirror.
//!
//! Drawing gestures capture their snapshot at the start and only push it
//! when the gesture commits, so an abandoned gesture leaves no undo step.

use std::collections::VecDeque;
use vg_core::Snapshot;

pub struct UndoStack {
    undo_stack: VecDeque<Snapshot>,
    redo_stack: Vec<Snapshot>,
    /// Maximum undo depth; the oldest snapshot is evicted beyond it.
    max_depth: usize,
    /// Snapshot captured at the start of an in-progress gesture.
    gesture_snapshot: Option<Snapshot>,
}

impl UndoStack {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::with_capacity(max_depth.min(64)),
            redo_stack: Vec::new(),
            max_depth,
            gesture_snapshot: None,
        }
    }

    /// Record the state before a new mutating action. Clears redo.
    pub fn push(&mut self, before: Snapshot) {
        self.push_undo(before);
        self.redo_stack.clear();
    }

    fn push_undo(&mut self, snapshot: Snapshot) {
        self.undo_stack.push_back(snapshot);
        while self.undo_stack.len() > self.max_depth {
            self.undo_stack.pop_front();
        }
    }

    /// Hold `before` until the gesture commits or aborts.
    pub fn begin_gesture(&mut self, before: Snapshot) {
        self.gesture_snapshot = Some(before);
    }

    /// Push the held gesture snapshot. Returns false if no gesture was open.
    pub fn commit_gesture(&mut self) -> bool {
        match self.gesture_snapshot.take() {
            Some(before) => {
                self.push(before);
                true
            }
            None => false,
        }
    }

    /// Drop the held gesture snapshot without recording an undo step.
    pub fn abort_gesture(&mut self) -> bool {
        self.gesture_snapshot.take().is_some()
    }

    pub fn in_gesture(&self) -> bool {
        self.gesture_snapshot.is_some()
    }

    /// Pop the most recent snapshot, keeping `current` for redo.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let previous = self.undo_stack.pop_back()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    /// Pop the most recently undone snapshot, keeping `current` for undo.
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.redo_stack.pop()?;
        self.push_undo(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Forget all history (used when a new document is loaded).
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.gesture_snapshot = None;
    }
}
