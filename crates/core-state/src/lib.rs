//! Editor state: buffer, cursor, mode, undo engine, register, marks and search.
//!
//! This crate owns data and the small invariants that go with it (history
//! capping, mark naming, selection ordering). Key handling and command
//! semantics live in `core-actions`; nothing here interprets input.
//!
//! Insert Coalescing:
//! - A contiguous run of Insert or Replace typing is captured by a *single*
//!   undo snapshot taken lazily at the first mutation in the run.
//! - Boundaries: `Esc` leaving the mode, or `Enter` splitting a line.
//! - Commands that enter Insert after editing (`o`, `O`, `cw`) push their own
//!   snapshot and open the run so the whole change undoes as one unit.

use std::collections::BTreeMap;

use core_text::{Position, TextBuffer};
use serde::Serialize;

pub mod undo;
use undo::UndoEngine;
pub use undo::{EditSnapshot, UNDO_HISTORY_MAX};

/// Current editor mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Mode {
    /// Normal command/navigation mode.
    #[default]
    Normal,
    /// Insert text mode.
    Insert,
    /// Overtype mode entered with `R`.
    Replace,
    /// Character-wise selection.
    Visual,
    /// Line-wise selection.
    VisualLine,
    /// Typing a search term after `/` or `?`.
    Search,
}

impl Mode {
    pub fn is_visual(self) -> bool {
        matches!(self, Mode::Visual | Mode::VisualLine)
    }

    /// Status line banner shown while the mode is active.
    pub fn banner(self) -> Option<&'static str> {
        match self {
            Mode::Insert => Some("-- INSERT --"),
            Mode::Replace => Some("-- REPLACE --"),
            Mode::Visual => Some("-- VISUAL --"),
            Mode::VisualLine => Some("-- VISUAL LINE --"),
            Mode::Normal | Mode::Search => None,
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Selection
// -------------------------------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SelectionKind {
    Characterwise,
    Linewise,
}

/// Ordered selection: `start <= end` in document order. Both ends are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectionSpan {
    pub start: Position,
    pub end: Position,
    pub kind: SelectionKind,
}

impl SelectionSpan {
    /// Construct a new span normalizing ordering so that start <= end.
    pub fn new(a: Position, b: Position, kind: SelectionKind) -> Self {
        let (start, end) = if a <= b { (a, b) } else { (b, a) };
        Self { start, end, kind }
    }

    pub fn is_single_row(&self) -> bool {
        self.start.row == self.end.row
    }

    /// Inclusive row range covered by the span.
    pub fn rows(&self) -> std::ops::RangeInclusive<usize> {
        self.start.row..=self.end.row
    }
}

/// Visual selection anchored where Visual mode was entered; the cursor is the
/// moving end.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SelectionModel {
    pub anchor: Option<Position>,
}

impl SelectionModel {
    pub fn begin(&mut self, anchor: Position) {
        self.anchor = Some(anchor);
    }
    pub fn clear(&mut self) {
        self.anchor = None;
    }
    pub fn is_active(&self) -> bool {
        self.anchor.is_some()
    }
    pub fn span(&self, cursor: Position, kind: SelectionKind) -> Option<SelectionSpan> {
        self.anchor.map(|a| SelectionSpan::new(a, cursor, kind))
    }
}

// -------------------------------------------------------------------------------------------------
// Register
// -------------------------------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum RegisterKind {
    #[default]
    Char,
    Line,
}

/// Single clipboard slot. Overwritten by every yank or delete, read by paste.
/// Line-wise content holds one or more lines joined by `\n`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Register {
    pub content: String,
    pub kind: RegisterKind,
}

impl Register {
    pub fn is_empty(&self) -> bool {
        self.content.is_empty() && self.kind == RegisterKind::Char
    }

    /// Store `text`. Empty char-wise payloads leave the register untouched.
    pub fn record<S: Into<String>>(&mut self, text: S, kind: RegisterKind) {
        let text = text.into();
        if text.is_empty() && kind == RegisterKind::Char {
            return;
        }
        self.content = text;
        self.kind = kind;
    }

    /// Content split into lines (line-wise registers always yield at least one).
    pub fn lines(&self) -> Vec<&str> {
        self.content.split('\n').collect()
    }
}

// -------------------------------------------------------------------------------------------------
// Marks
// -------------------------------------------------------------------------------------------------
/// Named positions keyed by a lowercase ASCII letter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Marks(BTreeMap<char, Position>);

impl Marks {
    pub fn is_valid_name(c: char) -> bool {
        c.is_ascii_lowercase()
    }

    /// Record `pos` under `name`. Returns false for names outside `a..=z`.
    pub fn set(&mut self, name: char, pos: Position) -> bool {
        if !Self::is_valid_name(name) {
            return false;
        }
        self.0.insert(name, pos);
        true
    }

    pub fn get(&self, name: char) -> Option<Position> {
        self.0.get(&name).copied()
    }

    pub fn contains(&self, name: char) -> bool {
        self.0.contains_key(&name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// -------------------------------------------------------------------------------------------------
// Search
// -------------------------------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SearchDirection {
    #[default]
    Forward,
    Backward,
}

impl SearchDirection {
    pub fn prompt_char(self) -> char {
        match self {
            SearchDirection::Forward => '/',
            SearchDirection::Backward => '?',
        }
    }
}

/// Result of the most recent submitted search.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SearchState {
    pub term: String,
    pub direction: SearchDirection,
    pub matches: Vec<Position>,
    pub current_index: usize,
}

impl SearchState {
    pub fn current(&self) -> Option<Position> {
        self.matches.get(self.current_index).copied()
    }

    /// Advance cyclically and return the new current match.
    pub fn advance(&mut self) -> Option<Position> {
        if self.matches.is_empty() {
            return None;
        }
        self.current_index = (self.current_index + 1) % self.matches.len();
        self.current()
    }

    /// Retreat cyclically and return the new current match.
    pub fn retreat(&mut self) -> Option<Position> {
        if self.matches.is_empty() {
            return None;
        }
        let n = self.matches.len();
        self.current_index = (self.current_index + n - 1) % n;
        self.current()
    }
}

/// The search term being typed while in Search mode.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SearchPrompt {
    buf: String,
    direction: SearchDirection,
}

impl SearchPrompt {
    pub fn begin(&mut self, direction: SearchDirection) {
        self.buf.clear();
        self.direction = direction;
    }
    pub fn push_char(&mut self, ch: char) {
        self.buf.push(ch);
    }
    pub fn backspace(&mut self) {
        self.buf.pop();
    }
    pub fn term(&self) -> &str {
        &self.buf
    }
    pub fn direction(&self) -> SearchDirection {
        self.direction
    }
    pub fn clear(&mut self) {
        self.buf.clear();
    }
    /// Prompt text as shown on the status line, e.g. `/foo`.
    pub fn display(&self) -> String {
        format!("{}{}", self.direction.prompt_char(), self.buf)
    }
}

// -------------------------------------------------------------------------------------------------
// Pending input
// -------------------------------------------------------------------------------------------------
/// Keys buffered in Normal/Visual mode while a command is incomplete.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Pending {
    #[default]
    None,
    /// Strict prefix of a multi-key command (`d`, `y`, `c`, `g`).
    Prefix(String),
    /// `r` awaiting the replacement character.
    ReplaceChar,
    /// `m` awaiting a mark letter.
    SetMark,
    /// `'` awaiting a mark letter.
    JumpMark,
}

impl Pending {
    pub fn is_none(&self) -> bool {
        matches!(self, Pending::None)
    }

    /// Transient prompt shown while the command is incomplete.
    pub fn prompt(&self) -> Option<String> {
        match self {
            Pending::None => None,
            Pending::Prefix(p) => Some(p.clone()),
            Pending::ReplaceChar => Some("r_".to_string()),
            Pending::SetMark => Some("m_".to_string()),
            Pending::JumpMark => Some("'_".to_string()),
        }
    }
}

// -------------------------------------------------------------------------------------------------
// EditorState
// -------------------------------------------------------------------------------------------------
/// Top-level editor state container (single buffer).
#[derive(Debug, Clone)]
pub struct EditorState {
    pub buffer: TextBuffer,
    pub cursor: Position,
    pub mode: Mode,
    pub message: Option<String>,
    pub register: Register,
    pub marks: Marks,
    pub search: Option<SearchState>,
    pub search_prompt: SearchPrompt,
    pub selection: SelectionModel,
    pub pending: Pending,
    undo: UndoEngine,
}

impl EditorState {
    /// Create a new state over `buffer` with the default history depth.
    pub fn new(buffer: TextBuffer) -> Self {
        Self::with_history_depth(buffer, UNDO_HISTORY_MAX)
    }

    pub fn with_history_depth(buffer: TextBuffer, max_depth: usize) -> Self {
        Self {
            buffer,
            cursor: Position::origin(),
            mode: Mode::Normal,
            message: None,
            register: Register::default(),
            marks: Marks::default(),
            search: None,
            search_prompt: SearchPrompt::default(),
            selection: SelectionModel::default(),
            pending: Pending::None,
            undo: UndoEngine::with_max_depth(max_depth),
        }
    }

    pub fn set_message<S: Into<String>>(&mut self, msg: S) {
        self.message = Some(msg.into());
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    /// Capture the current buffer and cursor as a discrete undo entry.
    pub fn push_snapshot(&mut self) {
        self.undo.push_snapshot(self.cursor, &self.buffer);
    }

    /// Capture `snapshot` (taken before a mutation that has since been applied).
    pub fn push_prior_snapshot(&mut self, snapshot: EditSnapshot) {
        self.undo.push_snapshot(snapshot.cursor, &snapshot.buffer);
    }

    pub fn snapshot(&self) -> EditSnapshot {
        EditSnapshot {
            buffer: self.buffer.clone(),
            cursor: self.cursor,
        }
    }

    /// Begin (or continue) a typing run; the first call pushes the pre-edit snapshot.
    ///
    /// The snapshot cursor is the Insert-mode cursor at the first keystroke
    /// (after `a`/`A`/`I` repositioned it), not where the cursor sat before
    /// entering Insert. Undo clamps it back into Normal-mode range.
    pub fn begin_insert_coalescing(&mut self) {
        self.undo.begin_insert_coalescing(self.cursor, &self.buffer);
    }

    pub fn open_insert_run(&mut self) {
        self.undo.open_insert_run();
    }

    pub fn end_insert_coalescing(&mut self) {
        self.undo.end_insert_coalescing();
    }

    /// Restore the previous snapshot. Returns true if one was restored.
    pub fn undo(&mut self) -> bool {
        self.undo.undo(&mut self.cursor, &mut self.buffer)
    }

    /// Re-apply the last undone snapshot. Returns true if applied.
    pub fn redo(&mut self) -> bool {
        self.undo.redo(&mut self.cursor, &mut self.buffer)
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.undo_depth()
    }
    pub fn redo_depth(&self) -> usize {
        self.undo.redo_depth()
    }

    /// Active visual selection, if any, shaped by the current mode.
    pub fn selection_span(&self) -> Option<SelectionSpan> {
        let kind = match self.mode {
            Mode::Visual => SelectionKind::Characterwise,
            Mode::VisualLine => SelectionKind::Linewise,
            _ => return None,
        };
        self.selection.span(self.cursor, kind)
    }

    /// Clamp the cursor for Normal-mode semantics.
    pub fn normalize_cursor(&mut self) {
        self.cursor = self.cursor.clamp_normal(&self.buffer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_orders_endpoints() {
        let s = SelectionSpan::new(
            Position::new(2, 1),
            Position::new(0, 4),
            SelectionKind::Characterwise,
        );
        assert_eq!(s.start, Position::new(0, 4));
        assert_eq!(s.end, Position::new(2, 1));
        assert!(!s.is_single_row());
        assert_eq!(s.rows(), 0..=2);
    }

    #[test]
    fn selection_span_follows_mode() {
        let mut st = EditorState::new(TextBuffer::from_lines(["abc", "def"]));
        st.selection.begin(Position::new(1, 2));
        st.cursor = Position::new(0, 1);
        assert_eq!(st.selection_span(), None);
        st.mode = Mode::VisualLine;
        let span = st.selection_span().unwrap();
        assert_eq!(span.kind, SelectionKind::Linewise);
        assert_eq!(span.start, Position::new(0, 1));
    }

    #[test]
    fn register_ignores_empty_char_payloads() {
        let mut r = Register::default();
        r.record("abc", RegisterKind::Char);
        r.record("", RegisterKind::Char);
        assert_eq!(r.content, "abc");
        r.record("", RegisterKind::Line);
        assert_eq!(r.kind, RegisterKind::Line);
        assert_eq!(r.lines(), vec![""]);
        assert!(!r.is_empty());
    }

    #[test]
    fn marks_accept_lowercase_only() {
        let mut m = Marks::default();
        assert!(m.set('a', Position::new(1, 1)));
        assert!(!m.set('A', Position::origin()));
        assert!(!m.set('1', Position::origin()));
        assert_eq!(m.get('a'), Some(Position::new(1, 1)));
        assert_eq!(m.len(), 1);
        assert!(m.contains('a'));
    }

    #[test]
    fn search_state_cycles() {
        let mut s = SearchState {
            term: "x".into(),
            direction: SearchDirection::Forward,
            matches: vec![Position::new(1, 0), Position::new(3, 0), Position::new(5, 0)],
            current_index: 2,
        };
        assert_eq!(s.advance(), Some(Position::new(1, 0)));
        assert_eq!(s.retreat(), Some(Position::new(5, 0)));
        assert_eq!(s.retreat(), Some(Position::new(3, 0)));
        let mut empty = SearchState::default();
        assert_eq!(empty.advance(), None);
    }

    #[test]
    fn search_prompt_edits() {
        let mut p = SearchPrompt::default();
        p.begin(SearchDirection::Backward);
        p.push_char('a');
        p.push_char('b');
        p.backspace();
        assert_eq!(p.display(), "?a");
        p.backspace();
        p.backspace();
        assert_eq!(p.term(), "");
    }

    #[test]
    fn pending_prompts() {
        assert_eq!(Pending::None.prompt(), None);
        assert_eq!(Pending::Prefix("d".into()).prompt().as_deref(), Some("d"));
        assert_eq!(Pending::ReplaceChar.prompt().as_deref(), Some("r_"));
        assert_eq!(Pending::JumpMark.prompt().as_deref(), Some("'_"));
    }

    #[test]
    fn state_undo_round_trip() {
        let mut st = EditorState::new(TextBuffer::from_lines(["abc"]));
        st.cursor = Position::new(0, 1);
        st.push_snapshot();
        st.buffer.splice(0, 1, 2, "");
        assert!(st.undo());
        assert_eq!(st.buffer.line(0), Some("abc"));
        assert_eq!(st.cursor, Position::new(0, 1));
        assert!(st.redo());
        assert_eq!(st.buffer.line(0), Some("ac"));
        assert!(!st.redo());
    }
}
