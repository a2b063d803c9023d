//! Mode transitions.
//!
//! Every return to Normal goes through [`leave_to_normal`]: it ends any
//! typing run, drops the visual anchor and search prompt, clears pending
//! input and the status message, and clamps the cursor. There is no
//! cursor retreat when leaving Insert.

use super::DispatchResult;
use core_keymap::CommandToken;
use core_state::{EditorState, Mode, Pending, SearchDirection, SelectionKind};
use core_text::{Position, grapheme};

pub(crate) fn leave_to_normal(state: &mut EditorState) -> DispatchResult {
    let from = state.mode;
    match from {
        Mode::Insert | Mode::Replace => state.end_insert_coalescing(),
        Mode::Visual | Mode::VisualLine => state.selection.clear(),
        Mode::Search => state.search_prompt.clear(),
        Mode::Normal => {}
    }
    state.mode = Mode::Normal;
    state.pending = Pending::None;
    state.clear_message();
    state.normalize_cursor();
    tracing::trace!(target: "actions.dispatch", op="mode", ?from, to=?Mode::Normal, "leave_to_normal");
    DispatchResult::dirty()
}

/// `i`, `a`, `A`, `I`: reposition and start a fresh typing run.
pub(crate) fn enter_insert(token: CommandToken, state: &mut EditorState) -> DispatchResult {
    let row = state.cursor.row;
    let len = state.buffer.line_len(row);
    let col = match token {
        CommandToken::Append => (state.cursor.col + 1).min(len),
        CommandToken::AppendLineEnd => len,
        CommandToken::InsertLineStart => state
            .buffer
            .line(row)
            .map(grapheme::first_non_blank)
            .unwrap_or(0),
        _ => state.cursor.col.min(len),
    };
    state.cursor = Position::new(row, col);
    state.end_insert_coalescing();
    set_mode(Mode::Insert, state);
    DispatchResult::dirty()
}

/// `R`
pub(crate) fn enter_replace(state: &mut EditorState) -> DispatchResult {
    state.end_insert_coalescing();
    set_mode(Mode::Replace, state);
    DispatchResult::dirty()
}

/// `v` / `V`: enter, switch between, or leave the visual modes.
pub(crate) fn toggle_visual(kind: SelectionKind, state: &mut EditorState) -> DispatchResult {
    let target = match kind {
        SelectionKind::Characterwise => Mode::Visual,
        SelectionKind::Linewise => Mode::VisualLine,
    };
    if state.mode == target {
        return leave_to_normal(state);
    }
    if !state.mode.is_visual() {
        state.selection.begin(state.cursor);
    }
    set_mode(target, state);
    DispatchResult::dirty()
}

/// `/` and `?`
pub(crate) fn begin_search(direction: SearchDirection, state: &mut EditorState) -> DispatchResult {
    state.search_prompt.begin(direction);
    state.mode = Mode::Search;
    state.set_message(state.search_prompt.display());
    tracing::trace!(target: "actions.dispatch", op="mode", to=?Mode::Search, ?direction, "begin_search");
    DispatchResult::dirty()
}

pub(super) fn set_mode(mode: Mode, state: &mut EditorState) {
    tracing::trace!(target: "actions.dispatch", op="mode", from=?state.mode, to=?mode, "mode_change");
    state.mode = mode;
    state.message = mode.banner().map(str::to_string);
}
