#![allow(dead_code)] // Shared across many integration tests; each test binary uses a subset of helpers.

use core_actions::Editor;
use core_events::{KeyCode, KeyEvent, KeyModifiers, parse_keys};
use core_keymap::CommandToken;
use core_lesson::{Goal, Lesson};
use core_text::{Position, TextBuffer};

#[derive(Clone, Copy, Debug)]
pub enum Stroke {
    Char(char),
    Esc,
    Enter,
    Backspace,
    Ctrl(char),
}

impl Stroke {
    pub fn to_event(self) -> KeyEvent {
        match self {
            Stroke::Char(c) => KeyEvent::char(c),
            Stroke::Esc => KeyEvent::plain(KeyCode::Esc),
            Stroke::Enter => KeyEvent::plain(KeyCode::Enter),
            Stroke::Backspace => KeyEvent::plain(KeyCode::Backspace),
            Stroke::Ctrl(c) => KeyEvent::new(KeyCode::Char(c), KeyModifiers::CTRL),
        }
    }
}

pub fn editor(lines: &[&str]) -> Editor {
    Editor::new(TextBuffer::from_lines(lines.iter().copied()))
}

/// Feed a key script such as `"dd"`, `"ihello<Esc>"` or `"<C-r>"`.
pub fn run_keys(ed: &mut Editor, script: &str) {
    for key in parse_keys(script).expect("valid key script") {
        ed.dispatch(key);
    }
}

pub fn run_sequence(ed: &mut Editor, keys: &[Stroke]) {
    for stroke in keys {
        ed.dispatch(stroke.to_event());
    }
}

/// Editor over `lines` after replaying `script`.
pub fn after(lines: &[&str], script: &str) -> Editor {
    let mut ed = editor(lines);
    run_keys(&mut ed, script);
    ed
}

pub fn lines(ed: &Editor) -> Vec<String> {
    ed.state().lines
}

pub fn cursor(ed: &Editor) -> Position {
    ed.state().cursor
}

pub fn lesson(lines: &[&str], goal: Goal, allowed: &[&str]) -> Lesson {
    let tokens = allowed
        .iter()
        .map(|s| s.parse::<CommandToken>().expect("known token"));
    Lesson::new(1, lines.iter().copied(), goal).allow(tokens)
}
