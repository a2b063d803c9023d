use super::DispatchResult;
use core_state::EditorState;

/// `m{a-z}`
pub(crate) fn set_mark(name: char, state: &mut EditorState) -> DispatchResult {
    if !state.marks.set(name, state.cursor) {
        return DispatchResult::clean();
    }
    tracing::trace!(target: "actions.dispatch", op="set_mark", mark=%name, row=state.cursor.row, col=state.cursor.col, "mark");
    state.set_message(format!("Mark '{name}' set"));
    DispatchResult::dirty()
}

/// `'{a-z}`. Stored positions may point past the current buffer; they are
/// clamped on arrival.
pub(crate) fn jump_mark(name: char, state: &mut EditorState) -> DispatchResult {
    match state.marks.get(name) {
        Some(pos) => {
            state.cursor = pos.clamp_normal(&state.buffer);
            tracing::trace!(target: "actions.dispatch", op="jump_mark", mark=%name, row=state.cursor.row, col=state.cursor.col, "mark");
            state.set_message(format!("Jumped to mark '{name}'"));
        }
        None => state.set_message(format!("Mark '{name}' not set")),
    }
    DispatchResult::dirty()
}
