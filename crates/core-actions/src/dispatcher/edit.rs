//! Text mutation dispatch.
//!
//! Operators run through the pure functions in [`crate::edit`] and the
//! outcome is applied here: a snapshot is pushed only when the buffer
//! really changed, which also clears the redo stack.
//!
//! Insert and Replace typing coalesce: the first mutation of a run pushes the
//! snapshot, later keystrokes only count. `Enter` in Insert ends the run.

use super::{DispatchResult, mode};
use crate::edit::{self, EditOutcome};
use core_events::{KeyCode, KeyEvent};
use core_keymap::CommandToken;
use core_state::{EditorState, Mode, SelectionKind};
use core_text::Position;

/// Apply `out` to `state`. Returns true if the buffer changed.
fn apply_outcome(out: EditOutcome, state: &mut EditorState) -> bool {
    let mut changed = false;
    if let Some(buffer) = out.buffer
        && buffer != state.buffer
    {
        state.push_snapshot();
        state.buffer = buffer;
        changed = true;
    }
    state.cursor = out.cursor;
    if let Some(register) = out.register {
        state.register = register;
    }
    if let Some(msg) = out.message {
        state.set_message(msg);
    }
    changed
}

fn result_for(changed: bool) -> DispatchResult {
    if changed {
        DispatchResult::edited()
    } else {
        DispatchResult::dirty()
    }
}

pub(crate) fn handle_edit(token: CommandToken, state: &mut EditorState) -> DispatchResult {
    use CommandToken as T;
    let (buf, cursor) = (&state.buffer, state.cursor);
    let out = match token {
        T::DeleteChar => edit::delete_char(buf, cursor),
        T::DeleteLine => edit::delete_line(buf, cursor),
        T::DeleteWord => edit::delete_word(buf, cursor),
        T::DeleteToLineEnd => edit::delete_to_line_end(buf, cursor),
        T::YankLine => edit::yank_line(buf, cursor),
        T::YankWord => edit::yank_word(buf, cursor),
        T::ChangeWord => edit::change_word(buf, cursor),
        T::PasteAfter => edit::paste(buf, cursor, &state.register, false),
        T::PasteBefore => edit::paste(buf, cursor, &state.register, true),
        _ => return DispatchResult::clean(),
    };
    let enter_insert = out.enter_insert;
    let changed = apply_outcome(out, state);
    tracing::trace!(target: "actions.dispatch", op="edit", token=%token, changed, row=state.cursor.row, col=state.cursor.col, "edit");
    if enter_insert {
        // The snapshot pushed above covers the whole change-then-type run.
        if changed {
            state.open_insert_run();
        } else {
            state.end_insert_coalescing();
        }
        mode::set_mode(Mode::Insert, state);
    }
    result_for(changed)
}

/// `o` / `O`
pub(crate) fn open_line(above: bool, state: &mut EditorState) -> DispatchResult {
    state.push_snapshot();
    let row = if above {
        state.cursor.row
    } else {
        state.cursor.row + 1
    };
    state.buffer.insert_line(row, "");
    state.cursor = Position::new(row, 0);
    state.open_insert_run();
    tracing::trace!(target: "actions.dispatch", op="open_line", above, row, "edit");
    mode::set_mode(Mode::Insert, state);
    DispatchResult::edited()
}

/// Visual `d` / `y`. Always returns to Normal.
pub(crate) fn handle_visual_op(delete: bool, state: &mut EditorState) -> DispatchResult {
    let Some(span) = state.selection_span() else {
        return mode::leave_to_normal(state);
    };
    mode::leave_to_normal(state);
    if span.kind == SelectionKind::Characterwise && !span.is_single_row() {
        tracing::debug!(target: "actions.dispatch", op="visual_op", start_row=span.start.row, end_row=span.end.row, "multi_row_charwise_rejected");
        state.set_message("Visual selection across lines is not supported");
        return DispatchResult::dirty();
    }
    let out = if delete {
        edit::delete_selection(&state.buffer, span)
    } else {
        edit::yank_selection(&state.buffer, span)
    };
    let changed = apply_outcome(out, state);
    state.normalize_cursor();
    tracing::trace!(target: "actions.dispatch", op="visual_op", delete, kind=?span.kind, changed, "edit");
    result_for(changed)
}

/// `r{ch}`
pub(crate) fn replace_char(ch: char, state: &mut EditorState) -> DispatchResult {
    let out = edit::replace_char(&state.buffer, state.cursor, ch);
    result_for(apply_outcome(out, state))
}

/// Keys typed in Insert mode.
pub(crate) fn handle_insert_key(key: &KeyEvent, state: &mut EditorState) -> DispatchResult {
    state.cursor = state.cursor.clamp_insert(&state.buffer);
    let Position { row, col } = state.cursor;
    match key.code {
        KeyCode::Enter => {
            state.begin_insert_coalescing();
            state.buffer.split_line(row, col);
            state.cursor = Position::new(row + 1, 0);
            state.end_insert_coalescing();
            tracing::trace!(target: "actions.dispatch", op="insert_newline", row, col, "edit");
            DispatchResult::edited()
        }
        KeyCode::Backspace => {
            if col == 0 {
                return DispatchResult::clean();
            }
            state.begin_insert_coalescing();
            state.buffer.splice(row, col - 1, col, "");
            state.cursor.col = col - 1;
            tracing::trace!(target: "actions.dispatch", op="backspace", row, col, "edit");
            DispatchResult::edited()
        }
        KeyCode::Left | KeyCode::Right | KeyCode::Up | KeyCode::Down => arrow(key.code, state),
        _ => match key.printable() {
            Some(ch) => {
                state.begin_insert_coalescing();
                let mut tmp = [0u8; 4];
                state.buffer.splice(row, col, col, ch.encode_utf8(&mut tmp));
                state.cursor.col = col + 1;
                tracing::trace!(target: "actions.dispatch", op="insert_char", ch=%ch, row, col, "edit");
                DispatchResult::edited()
            }
            None => DispatchResult::clean(),
        },
    }
}

/// Keys typed in Replace mode: overwrite, or append at the line end.
pub(crate) fn handle_replace_key(key: &KeyEvent, state: &mut EditorState) -> DispatchResult {
    state.cursor = state.cursor.clamp_insert(&state.buffer);
    let Position { row, col } = state.cursor;
    match key.code {
        KeyCode::Backspace => {
            state.cursor.col = col.saturating_sub(1);
            DispatchResult::dirty()
        }
        KeyCode::Left | KeyCode::Right | KeyCode::Up | KeyCode::Down => arrow(key.code, state),
        _ => match key.printable() {
            Some(ch) => {
                state.begin_insert_coalescing();
                let end = (col + 1).min(state.buffer.line_len(row));
                let mut tmp = [0u8; 4];
                state.buffer.splice(row, col, end, ch.encode_utf8(&mut tmp));
                state.cursor.col = col + 1;
                tracing::trace!(target: "actions.dispatch", op="replace_char", ch=%ch, row, col, "edit");
                DispatchResult::edited()
            }
            None => DispatchResult::clean(),
        },
    }
}

/// Arrow keys in Insert/Replace move without leaving the mode and end the
/// current typing run.
fn arrow(code: KeyCode, state: &mut EditorState) -> DispatchResult {
    let Position { row, col } = state.cursor;
    let next = match code {
        KeyCode::Left => Position::new(row, col.saturating_sub(1)),
        KeyCode::Right => Position::new(row, col + 1),
        KeyCode::Up => Position::new(row.saturating_sub(1), col),
        _ => Position::new(row + 1, col),
    };
    state.cursor = next.clamp_insert(&state.buffer);
    state.end_insert_coalescing();
    DispatchResult::dirty()
}
