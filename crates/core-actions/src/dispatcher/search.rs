//! Search prompt editing and match navigation.

use super::{DispatchResult, mode};
use core_events::{KeyCode, KeyEvent};
use core_state::EditorState;

/// Keys typed while in Search mode (Escape is handled by the caller).
pub(crate) fn handle_prompt_key(key: &KeyEvent, state: &mut EditorState) -> DispatchResult {
    match key.code {
        KeyCode::Enter => submit(state),
        KeyCode::Backspace => {
            state.search_prompt.backspace();
            state.set_message(state.search_prompt.display());
            DispatchResult::dirty()
        }
        _ => match key.printable() {
            Some(ch) => {
                state.search_prompt.push_char(ch);
                state.set_message(state.search_prompt.display());
                DispatchResult::dirty()
            }
            None => DispatchResult::clean(),
        },
    }
}

fn submit(state: &mut EditorState) -> DispatchResult {
    let direction = state.search_prompt.direction();
    let typed = state.search_prompt.term().to_string();
    let term = if typed.is_empty() {
        state.search.as_ref().map(|s| s.term.clone()).unwrap_or_default()
    } else {
        typed
    };
    mode::leave_to_normal(state);
    if term.is_empty() {
        state.set_message("No previous search");
        return DispatchResult::dirty();
    }
    let found = crate::search::run(&state.buffer, &term, state.cursor, direction);
    match found.current() {
        Some(pos) => {
            state.cursor = pos.clamp_normal(&state.buffer);
            state.set_message(match_message(found.current_index, found.matches.len()));
        }
        None => state.set_message("Pattern not found"),
    }
    state.search = Some(found);
    DispatchResult::dirty()
}

/// `n` (`forward == true`) and `N`.
pub(crate) fn handle_step(forward: bool, state: &mut EditorState) -> DispatchResult {
    let Some(search) = state.search.as_mut() else {
        state.set_message("No previous search");
        return DispatchResult::dirty();
    };
    let next = if forward {
        search.advance()
    } else {
        search.retreat()
    };
    let (index, total) = (search.current_index, search.matches.len());
    match next {
        Some(pos) => {
            state.cursor = pos.clamp_normal(&state.buffer);
            state.set_message(match_message(index, total));
        }
        None => state.set_message("Pattern not found"),
    }
    DispatchResult::dirty()
}

fn match_message(index: usize, total: usize) -> String {
    format!("Match {} of {}", index + 1, total)
}
