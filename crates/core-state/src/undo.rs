use core_text::{Position, TextBuffer};
use tracing::trace;

/// Default number of snapshots retained in undo history.
pub const UNDO_HISTORY_MAX: usize = 200;

/// A full-state snapshot for undo/redo (coarse clone of the buffer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSnapshot {
    pub buffer: TextBuffer,
    pub cursor: Position,
}

/// Insert/Replace typing run state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InsertRun {
    Inactive,
    Active { edits: u32 },
}

/// Linear undo/redo history.
///
/// Pushing a new snapshot always clears the redo stack, so redo is only valid
/// immediately after one or more undos. The undo stack is capped at
/// `max_depth` entries, dropping the oldest first.
#[derive(Debug, Clone)]
pub struct UndoEngine {
    undo_stack: Vec<EditSnapshot>,
    redo_stack: Vec<EditSnapshot>,
    insert_run: InsertRun,
    max_depth: usize,
}

impl Default for UndoEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl UndoEngine {
    pub fn new() -> Self {
        Self::with_max_depth(UNDO_HISTORY_MAX)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            insert_run: InsertRun::Inactive,
            max_depth: max_depth.max(1),
        }
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn push_snapshot(&mut self, cursor: Position, buffer: &TextBuffer) {
        self.undo_stack.push(EditSnapshot {
            buffer: buffer.clone(),
            cursor,
        });
        trace!(target: "state.undo", undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), lines = buffer.line_count(), "push_snapshot");
        if self.undo_stack.len() > self.max_depth {
            let _ = self.undo_stack.remove(0);
            trace!(target: "state.undo", "undo_stack_trimmed");
        }
        if !self.redo_stack.is_empty() {
            self.redo_stack.clear();
            trace!(target: "state.undo", "redo_stack_cleared_on_new_edit");
        }
    }

    /// Push the pre-edit snapshot for a typing run. Only the first call of a
    /// run pushes; later calls just count the edit.
    pub fn begin_insert_coalescing(&mut self, cursor: Position, buffer: &TextBuffer) {
        match &mut self.insert_run {
            InsertRun::Inactive => {
                self.push_snapshot(cursor, buffer);
                self.insert_run = InsertRun::Active { edits: 1 };
            }
            InsertRun::Active { edits } => *edits += 1,
        }
    }

    /// Mark a run as already open (its snapshot was pushed by the command that
    /// entered the mode, e.g. `o` or `cw`).
    pub fn open_insert_run(&mut self) {
        self.insert_run = InsertRun::Active { edits: 0 };
    }

    pub fn end_insert_coalescing(&mut self) {
        if let InsertRun::Active { edits } = self.insert_run {
            trace!(target: "state.undo", edits, "insert_run_end");
        }
        self.insert_run = InsertRun::Inactive;
    }

    pub fn undo(&mut self, cursor: &mut Position, buffer: &mut TextBuffer) -> bool {
        let Some(last) = self.undo_stack.pop() else {
            return false;
        };
        trace!(target: "state.undo", undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), "undo_pop");
        self.redo_stack.push(EditSnapshot {
            buffer: std::mem::replace(buffer, last.buffer),
            cursor: std::mem::replace(cursor, last.cursor),
        });
        trace!(target: "state.undo", redo_depth = self.redo_stack.len(), "redo_push_from_undo");
        self.insert_run = InsertRun::Inactive;
        true
    }

    pub fn redo(&mut self, cursor: &mut Position, buffer: &mut TextBuffer) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };
        trace!(target: "state.undo", redo_depth = self.redo_stack.len(), undo_depth = self.undo_stack.len(), "redo_pop");
        self.undo_stack.push(EditSnapshot {
            buffer: std::mem::replace(buffer, next.buffer),
            cursor: std::mem::replace(cursor, next.cursor),
        });
        trace!(target: "state.undo", undo_depth = self.undo_stack.len(), "undo_push_from_redo");
        self.insert_run = InsertRun::Inactive;
        true
    }
}
