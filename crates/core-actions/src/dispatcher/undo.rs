//! Undo / Redo handling.
//!
//! Delegates to the snapshot stacks inside `EditorState`. An empty stack is
//! a silent no-op, but `u` still counts as an undo for the attempt.

use super::DispatchResult;
use core_state::EditorState;

pub(crate) fn handle_undo(state: &mut EditorState) -> DispatchResult {
    if state.undo() {
        tracing::trace!(target: "actions.dispatch", op="undo", undo_depth = state.undo_depth(), redo_depth = state.redo_depth(), "undo");
        state.normalize_cursor();
        state.set_message("Undo");
        DispatchResult::undone()
    } else {
        DispatchResult::undo_noop()
    }
}

pub(crate) fn handle_redo(state: &mut EditorState) -> DispatchResult {
    if state.redo() {
        tracing::trace!(target: "actions.dispatch", op="redo", undo_depth = state.undo_depth(), redo_depth = state.redo_depth(), "redo");
        state.normalize_cursor();
        state.set_message("Redo");
        DispatchResult::edited()
    } else {
        DispatchResult::clean()
    }
}
