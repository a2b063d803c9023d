//! The editor state machine facing the host.
//!
//! `Editor` owns the [`EditorState`], the key translator and the bookkeeping
//! for one lesson attempt (allow-list, mistakes, undo flag, start time,
//! completion). Hosts feed keys through [`Editor::dispatch`] and poll
//! [`Editor::evaluate_completion`] after each one.

use std::collections::BTreeSet;
use std::time::Instant;

use core_events::{KeyCode, KeyEvent};
use core_keymap::CommandToken;
use core_lesson::{AttemptView, CompletionRecord, Lesson};
use core_state::{
    EditorState, Marks, Mode, Pending, Register, SearchState, SelectionSpan, UNDO_HISTORY_MAX,
};
use core_text::{Position, TextBuffer};
use serde::Serialize;
use tracing::{trace, warn};

use crate::dispatcher::{self, DispatchResult};
use crate::key_translator::{KeyTranslator, Translation};

/// Per-attempt bookkeeping, reset with the buffer.
#[derive(Debug, Clone)]
struct Attempt {
    started_at: Instant,
    mistakes: u32,
    undo_performed: bool,
    interacted: bool,
    completion: Option<CompletionRecord>,
}

impl Attempt {
    fn new() -> Self {
        Self {
            started_at: Instant::now(),
            mistakes: 0,
            undo_performed: false,
            interacted: false,
            completion: None,
        }
    }
}

/// Everything a host needs to render or inspect the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateSnapshot {
    pub mode: Mode,
    pub cursor: Position,
    pub lines: Vec<String>,
    pub mistakes: u32,
    pub message: Option<String>,
    pub marks: Marks,
    pub register: Register,
    pub undo_depth: usize,
    pub redo_depth: usize,
    pub pending_command: Option<String>,
    pub search: Option<SearchState>,
    pub selection: Option<SelectionSpan>,
    pub undo_performed: bool,
}

#[derive(Debug)]
pub struct Editor {
    state: EditorState,
    translator: KeyTranslator,
    allowed: Option<BTreeSet<CommandToken>>,
    history_depth: usize,
    attempt: Attempt,
}

impl Editor {
    /// Unrestricted editor over `buffer` (every command allowed).
    pub fn new(buffer: TextBuffer) -> Self {
        Self::with_history_depth(buffer, UNDO_HISTORY_MAX)
    }

    pub fn with_history_depth(buffer: TextBuffer, history_depth: usize) -> Self {
        Self {
            state: EditorState::with_history_depth(buffer, history_depth),
            translator: KeyTranslator::new(),
            allowed: None,
            history_depth,
            attempt: Attempt::new(),
        }
    }

    /// Editor primed with `lesson`'s text and allow-list.
    pub fn for_lesson(lesson: &Lesson, history_depth: usize) -> Self {
        let mut editor = Self::with_history_depth(lesson.initial_buffer(), history_depth);
        editor.allowed = Some(lesson.allowed_commands.clone());
        editor
    }

    /// Reinitialize every piece of owned state for a fresh, unrestricted
    /// attempt over `initial_text`.
    pub fn reset<I, S>(&mut self, initial_text: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state =
            EditorState::with_history_depth(TextBuffer::from_lines(initial_text), self.history_depth);
        self.allowed = None;
        self.attempt = Attempt::new();
        trace!(target: "actions.dispatch", op="reset", lines = self.state.buffer.line_count(), "reset");
    }

    /// Reset to `lesson`'s initial text and restrict commands to its allow-list.
    pub fn start_lesson(&mut self, lesson: &Lesson) {
        self.reset(lesson.initial_text.iter().cloned());
        self.allowed = Some(lesson.allowed_commands.clone());
    }

    /// Feed one key through the state machine.
    pub fn dispatch(&mut self, key: KeyEvent) -> DispatchResult {
        self.attempt.interacted = true;
        trace!(target: "actions.dispatch", key = %key, mode = ?self.state.mode, "key");
        let is_esc = key.code == KeyCode::Esc && key.mods.is_empty();
        let result = match self.state.mode {
            Mode::Insert | Mode::Replace if is_esc => self.guarded(CommandToken::Escape),
            Mode::Search if is_esc => dispatcher::leave_to_normal(&mut self.state),
            Mode::Insert | Mode::Replace | Mode::Search => {
                dispatcher::handle_text_key(&key, &mut self.state)
            }
            Mode::Normal | Mode::Visual | Mode::VisualLine => self.dispatch_command_key(&key),
        };
        if result.undo_issued {
            self.attempt.undo_performed = true;
        }
        result
    }

    fn dispatch_command_key(&mut self, key: &KeyEvent) -> DispatchResult {
        let mode = self.state.mode;
        match self.translator.translate(mode, &mut self.state.pending, key) {
            Translation::Command(token) => {
                if !self.permit(token) {
                    return DispatchResult::dirty();
                }
                self.state.message = mode.banner().map(str::to_string);
                dispatcher::run_command(token, &mut self.state)
            }
            Translation::WithArg(token, ch) => dispatcher::run_with_arg(token, ch, &mut self.state),
            Translation::Escape if mode.is_visual() => self.guarded(CommandToken::Escape),
            Translation::Escape | Translation::Ignored => DispatchResult::clean(),
            Translation::Pending => {
                self.state.message = self.state.pending.prompt();
                DispatchResult::dirty()
            }
            Translation::Cancelled => {
                self.state.message = mode.banner().map(str::to_string);
                DispatchResult::dirty()
            }
        }
    }

    fn guarded(&mut self, token: CommandToken) -> DispatchResult {
        if !self.permit(token) {
            return DispatchResult::dirty();
        }
        dispatcher::run_command(token, &mut self.state)
    }

    /// Validate `token` against the allow-list, recording a mistake on rejection.
    fn permit(&mut self, token: CommandToken) -> bool {
        if self.is_allowed(token) {
            return true;
        }
        self.attempt.mistakes += 1;
        self.state.pending = Pending::None;
        self.state
            .set_message(format!("Command '{token}' not allowed in this lesson!"));
        warn!(target: "actions.dispatch", token = %token, mistakes = self.attempt.mistakes, "command_rejected");
        false
    }

    pub fn is_allowed(&self, token: CommandToken) -> bool {
        self.allowed
            .as_ref()
            .is_none_or(|allowed| allowed.contains(&token))
    }

    /// Check `lesson`'s goal. Returns `None` before the first key, when the
    /// goal is unmet, and on every call after the first success.
    pub fn evaluate_completion(&mut self, lesson: &Lesson) -> Option<CompletionRecord> {
        if !self.attempt.interacted || self.attempt.completion.is_some() {
            return None;
        }
        let view = AttemptView {
            buffer: &self.state.buffer,
            cursor: self.state.cursor,
            marks: &self.state.marks,
            mistakes: self.attempt.mistakes,
            undo_performed: self.attempt.undo_performed,
            started_at: self.attempt.started_at,
        };
        let record = core_lesson::check(lesson, &view)?;
        self.attempt.completion = Some(record.clone());
        Some(record)
    }

    /// The record produced by the first successful evaluation, if any.
    pub fn completion(&self) -> Option<&CompletionRecord> {
        self.attempt.completion.as_ref()
    }

    pub fn completion_triggered(&self) -> bool {
        self.attempt.completion.is_some()
    }

    pub fn mistakes(&self) -> u32 {
        self.attempt.mistakes
    }

    pub fn undo_performed(&self) -> bool {
        self.attempt.undo_performed
    }

    pub fn state(&self) -> StateSnapshot {
        let st = &self.state;
        StateSnapshot {
            mode: st.mode,
            cursor: st.cursor,
            lines: st.buffer.lines().to_vec(),
            mistakes: self.attempt.mistakes,
            message: st.message.clone(),
            marks: st.marks.clone(),
            register: st.register.clone(),
            undo_depth: st.undo_depth(),
            redo_depth: st.redo_depth(),
            pending_command: st.pending.prompt(),
            search: st.search.clone(),
            selection: st.selection_span(),
            undo_performed: self.attempt.undo_performed,
        }
    }
}
