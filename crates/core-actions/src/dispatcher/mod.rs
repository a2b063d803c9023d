//! Dispatcher applying resolved commands and raw keys to `EditorState`.
//!
//! Sub-modules:
//! * `motion` - cursor movement semantics
//! * `mode`   - mode transitions (Normal <-> Insert/Replace/Visual/Search)
//! * `edit`   - text mutation (operators, paste, Insert/Replace typing)
//! * `search` - search prompt editing and match navigation
//! * `marks`  - set / jump to named marks
//! * `undo`   - undo / redo dispatch
//!
//! Allow-list validation happens before anything here runs; these handlers
//! assume the command is permitted.

use core_events::KeyEvent;
use core_keymap::CommandToken;
use core_state::{EditorState, Mode, Pending, SearchDirection, SelectionKind};

mod edit;
mod marks;
mod mode;
mod motion;
mod search;
mod undo;

pub(crate) use mode::leave_to_normal;

/// Result of dispatching a single command or key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchResult {
    /// Visible state changed (cursor, mode, message, ...).
    pub dirty: bool,
    /// Buffer content changed.
    pub edited: bool,
    /// `u` was dispatched, whether or not history had anything to restore.
    pub undo_issued: bool,
}

impl DispatchResult {
    pub fn dirty() -> Self {
        Self {
            dirty: true,
            ..Self::default()
        }
    }
    pub fn clean() -> Self {
        Self::default()
    }
    pub fn edited() -> Self {
        Self {
            dirty: true,
            edited: true,
            undo_issued: false,
        }
    }
    pub fn undone() -> Self {
        Self {
            dirty: true,
            edited: true,
            undo_issued: true,
        }
    }
    /// `u` with nothing to restore.
    pub fn undo_noop() -> Self {
        Self {
            undo_issued: true,
            ..Self::default()
        }
    }
}

/// Run a resolved Normal/Visual command.
pub(crate) fn run_command(token: CommandToken, state: &mut EditorState) -> DispatchResult {
    use CommandToken as T;
    tracing::debug!(target: "actions.dispatch", op = "command", token = %token, mode = ?state.mode);
    if let Some(m) = motion::motion_for(token) {
        return motion::handle_motion(m, state);
    }
    let result = match token {
        T::Insert | T::Append | T::AppendLineEnd | T::InsertLineStart => {
            mode::enter_insert(token, state)
        }
        T::OpenBelow | T::OpenAbove => edit::open_line(token == T::OpenAbove, state),
        T::Escape => mode::leave_to_normal(state),
        T::VisualChar => mode::toggle_visual(SelectionKind::Characterwise, state),
        T::VisualLine => mode::toggle_visual(SelectionKind::Linewise, state),
        T::VisualDelete | T::VisualYank => edit::handle_visual_op(token == T::VisualDelete, state),
        T::SearchForward => mode::begin_search(SearchDirection::Forward, state),
        T::SearchBackward => mode::begin_search(SearchDirection::Backward, state),
        T::SearchNext => search::handle_step(true, state),
        T::SearchPrev => search::handle_step(false, state),
        T::Undo => undo::handle_undo(state),
        T::Redo => undo::handle_redo(state),
        T::DeleteChar
        | T::DeleteLine
        | T::DeleteWord
        | T::DeleteToLineEnd
        | T::YankLine
        | T::YankWord
        | T::ChangeWord
        | T::PasteAfter
        | T::PasteBefore => edit::handle_edit(token, state),
        T::ReplaceMode => mode::enter_replace(state),
        T::ReplaceChar | T::SetMark | T::JumpMark => {
            state.pending = match token {
                T::ReplaceChar => Pending::ReplaceChar,
                T::SetMark => Pending::SetMark,
                _ => Pending::JumpMark,
            };
            state.message = state.pending.prompt();
            DispatchResult::dirty()
        }
        // Motions were handled above.
        _ => DispatchResult::clean(),
    };
    if matches!(state.mode, Mode::Normal | Mode::Visual | Mode::VisualLine) {
        state.normalize_cursor();
    }
    result
}

/// Complete `r`, `m` or `'` with its character argument.
pub(crate) fn run_with_arg(token: CommandToken, ch: char, state: &mut EditorState) -> DispatchResult {
    tracing::debug!(target: "actions.dispatch", op = "command_arg", token = %token, arg = %ch);
    state.clear_message();
    let result = match token {
        CommandToken::ReplaceChar => edit::replace_char(ch, state),
        CommandToken::SetMark => marks::set_mark(ch, state),
        CommandToken::JumpMark => marks::jump_mark(ch, state),
        _ => DispatchResult::clean(),
    };
    state.normalize_cursor();
    result
}

/// Handle a raw key in Insert, Replace or Search mode (Escape excluded).
pub(crate) fn handle_text_key(key: &KeyEvent, state: &mut EditorState) -> DispatchResult {
    match state.mode {
        Mode::Insert => edit::handle_insert_key(key, state),
        Mode::Replace => edit::handle_replace_key(key, state),
        Mode::Search => search::handle_prompt_key(key, state),
        Mode::Normal | Mode::Visual | Mode::VisualLine => DispatchResult::clean(),
    }
}
