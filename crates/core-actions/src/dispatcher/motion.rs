//! Motion sub-dispatch (cursor movement).
//!
//! Delegates to `core_text::motion::apply` and then normalizes the cursor
//! for Normal/Visual semantics. In Visual modes the anchor stays put, so a
//! motion extends the selection.

use super::DispatchResult;
use core_keymap::CommandToken;
use core_state::EditorState;
use core_text::motion::{self, Motion};

/// Motion carried by a command token, if it is one.
pub(crate) fn motion_for(token: CommandToken) -> Option<Motion> {
    use CommandToken as T;
    Some(match token {
        T::Left => Motion::Left,
        T::Down => Motion::Down,
        T::Up => Motion::Up,
        T::Right => Motion::Right,
        T::WordForward => Motion::WordForward,
        T::WordBackward => Motion::WordBackward,
        T::WordEnd => Motion::WordEnd,
        T::LineStart => Motion::LineStart,
        T::LineEnd => Motion::LineEnd,
        T::FirstNonBlank => Motion::FirstNonBlank,
        T::BufferStart => Motion::BufferStart,
        T::BufferEnd => Motion::BufferEnd,
        T::ParagraphForward => Motion::ParagraphForward,
        T::ParagraphBackward => Motion::ParagraphBackward,
        _ => return None,
    })
}

pub(crate) fn handle_motion(kind: Motion, state: &mut EditorState) -> DispatchResult {
    let before = state.cursor;
    state.cursor = motion::apply(before, &state.buffer, kind);
    state.normalize_cursor();
    tracing::trace!(target: "actions.dispatch", op="motion", ?kind, from_row=before.row, from_col=before.col, to_row=state.cursor.row, to_col=state.cursor.col, "motion");
    if before == state.cursor {
        DispatchResult::clean()
    } else {
        DispatchResult::dirty()
    }
}
