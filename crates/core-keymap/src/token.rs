//! Closed set of editor commands.
//!
//! Every key sequence the editor acts on resolves to exactly one
//! [`CommandToken`]. Lessons list the tokens they allow in their canonical
//! string form (`"dd"`, `"ctrl+r"`, `"ESC"`), so the string table below is
//! part of the lesson file format.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum CommandToken {
    // motions
    Left,
    Down,
    Up,
    Right,
    WordForward,
    WordBackward,
    WordEnd,
    LineStart,
    LineEnd,
    FirstNonBlank,
    BufferStart,
    BufferEnd,
    ParagraphBackward,
    ParagraphForward,
    // insert entry
    Insert,
    Append,
    OpenBelow,
    OpenAbove,
    AppendLineEnd,
    InsertLineStart,
    Escape,
    // visual
    VisualChar,
    VisualLine,
    VisualDelete,
    VisualYank,
    // search
    SearchForward,
    SearchBackward,
    SearchNext,
    SearchPrev,
    // history
    Undo,
    Redo,
    // edits
    DeleteChar,
    DeleteLine,
    DeleteWord,
    DeleteToLineEnd,
    YankLine,
    YankWord,
    ChangeWord,
    PasteAfter,
    PasteBefore,
    ReplaceChar,
    ReplaceMode,
    // marks
    SetMark,
    JumpMark,
}

impl CommandToken {
    pub const ALL: [CommandToken; 44] = [
        CommandToken::Left,
        CommandToken::Down,
        CommandToken::Up,
        CommandToken::Right,
        CommandToken::WordForward,
        CommandToken::WordBackward,
        CommandToken::WordEnd,
        CommandToken::LineStart,
        CommandToken::LineEnd,
        CommandToken::FirstNonBlank,
        CommandToken::BufferStart,
        CommandToken::BufferEnd,
        CommandToken::ParagraphBackward,
        CommandToken::ParagraphForward,
        CommandToken::Insert,
        CommandToken::Append,
        CommandToken::OpenBelow,
        CommandToken::OpenAbove,
        CommandToken::AppendLineEnd,
        CommandToken::InsertLineStart,
        CommandToken::Escape,
        CommandToken::VisualChar,
        CommandToken::VisualLine,
        CommandToken::VisualDelete,
        CommandToken::VisualYank,
        CommandToken::SearchForward,
        CommandToken::SearchBackward,
        CommandToken::SearchNext,
        CommandToken::SearchPrev,
        CommandToken::Undo,
        CommandToken::Redo,
        CommandToken::DeleteChar,
        CommandToken::DeleteLine,
        CommandToken::DeleteWord,
        CommandToken::DeleteToLineEnd,
        CommandToken::YankLine,
        CommandToken::YankWord,
        CommandToken::ChangeWord,
        CommandToken::PasteAfter,
        CommandToken::PasteBefore,
        CommandToken::ReplaceChar,
        CommandToken::ReplaceMode,
        CommandToken::SetMark,
        CommandToken::JumpMark,
    ];

    /// Canonical string form used in lesson files and messages.
    pub fn as_str(self) -> &'static str {
        use CommandToken::*;
        match self {
            Left => "h",
            Down => "j",
            Up => "k",
            Right => "l",
            WordForward => "w",
            WordBackward => "b",
            WordEnd => "e",
            LineStart => "0",
            LineEnd => "$",
            FirstNonBlank => "^",
            BufferStart => "gg",
            BufferEnd => "G",
            ParagraphBackward => "{",
            ParagraphForward => "}",
            Insert => "i",
            Append => "a",
            OpenBelow => "o",
            OpenAbove => "O",
            AppendLineEnd => "A",
            InsertLineStart => "I",
            Escape => "ESC",
            VisualChar => "v",
            VisualLine => "V",
            VisualDelete => "d",
            VisualYank => "y",
            SearchForward => "/",
            SearchBackward => "?",
            SearchNext => "n",
            SearchPrev => "N",
            Undo => "u",
            Redo => "ctrl+r",
            DeleteChar => "x",
            DeleteLine => "dd",
            DeleteWord => "dw",
            DeleteToLineEnd => "d$",
            YankLine => "yy",
            YankWord => "yw",
            ChangeWord => "cw",
            PasteAfter => "p",
            PasteBefore => "P",
            ReplaceChar => "r",
            ReplaceMode => "R",
            SetMark => "m",
            JumpMark => "'",
        }
    }
}

impl fmt::Display for CommandToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandParseError {
    #[error("unknown command token `{0}`")]
    UnknownCommand(String),
}

impl FromStr for CommandToken {
    type Err = CommandParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept a couple of spellings hosts commonly use for the two special keys.
        let canonical = match s {
            "Escape" | "esc" | "<Esc>" => "ESC",
            "<C-r>" | "Ctrl+r" | "C-r" => "ctrl+r",
            other => other,
        };
        CommandToken::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == canonical)
            .ok_or_else(|| CommandParseError::UnknownCommand(s.to_string()))
    }
}

impl TryFrom<String> for CommandToken {
    type Error = CommandParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CommandToken> for &'static str {
    fn from(t: CommandToken) -> Self {
        t.as_str()
    }
}
