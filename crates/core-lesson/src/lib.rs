//! Lessons and the completion evaluator.
//!
//! A [`Lesson`] is read-only input: starting text, a goal predicate and the
//! set of commands the learner may use. After every key the host asks
//! [`check`] whether the goal is met; the first success yields a
//! [`CompletionRecord`].

use std::collections::BTreeSet;
use std::path::PathBuf;

use core_keymap::CommandToken;
use core_text::TextBuffer;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod catalog;
mod eval;

pub use catalog::Catalog;
pub use eval::{AttemptView, check, check_at, goal_met, score_for};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
    Developer,
}

/// Completion predicate, tagged by `kind` in lesson files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Goal {
    /// Cursor at exactly this position.
    TargetPosition { row: usize, col: usize },
    /// At least `count` (default 1) case-insensitive occurrences of `text`
    /// in the buffer joined by spaces.
    TargetText {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        count: Option<usize>,
    },
    /// Non-blank, right-trimmed lines equal `lines` in order.
    TargetState { lines: Vec<String> },
    /// Buffer equals the initial text and at least one undo happened.
    UndoRequired,
    /// Some non-blank line occurs twice or more.
    DuplicateLine,
    /// Buffer differs from the initial text.
    ChangedFromInitial,
    /// Every listed mark is set.
    RequiredMarks { marks: Vec<char> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub instructions: String,
    pub initial_text: Vec<String>,
    pub goal: Goal,
    #[serde(default)]
    pub allowed_commands: BTreeSet<CommandToken>,
    #[serde(default)]
    pub hints: Vec<String>,
}

impl Lesson {
    /// Minimal lesson with no allowed commands; chain [`Lesson::allow`].
    pub fn new<I, S>(id: u32, initial_text: I, goal: Goal) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id,
            title: format!("Lesson {id}"),
            description: String::new(),
            difficulty: Difficulty::default(),
            instructions: String::new(),
            initial_text: initial_text.into_iter().map(Into::into).collect(),
            goal,
            allowed_commands: BTreeSet::new(),
            hints: Vec::new(),
        }
    }

    pub fn allow<I: IntoIterator<Item = CommandToken>>(mut self, tokens: I) -> Self {
        self.allowed_commands.extend(tokens);
        self
    }

    pub fn initial_buffer(&self) -> TextBuffer {
        TextBuffer::from_lines(self.initial_text.iter().map(String::as_str))
    }
}

/// Outcome of a successful goal check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub lesson_id: u32,
    pub completed: bool,
    pub score: u32,
    pub time_taken_seconds: u64,
    pub mistakes: u32,
}

#[derive(Debug, Error)]
pub enum LessonError {
    #[error("failed to parse lesson catalog: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to read lesson catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("duplicate lesson id {0}")]
    DuplicateId(u32),
    #[error("lesson {0} has no initial text")]
    EmptyInitialText(u32),
    #[error("lesson {id} targets ({row},{col}) outside its initial text")]
    TargetOutOfRange { id: u32, row: usize, col: usize },
    #[error("no lesson with id {0}")]
    NotFound(u32),
}
