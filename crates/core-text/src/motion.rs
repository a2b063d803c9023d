//! Cursor motions.
//!
//! Pure functions over a `TextBuffer` + `Position` pair. Nothing here knows
//! about modes; the caller normalizes the result for Normal-mode semantics
//! (see [`Position::clamp_normal`]).
//!
//! Every motion clamps at buffer boundaries instead of failing.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::grapheme::{self, CharClass};
use crate::{Position, TextBuffer};

/// Closed set of cursor motions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    WordForward,
    WordBackward,
    WordEnd,
    LineStart,
    LineEnd,
    FirstNonBlank,
    BufferStart,
    BufferEnd,
    ParagraphForward,
    ParagraphBackward,
}

/// Compute the position reached by `motion` from `pos`.
pub fn apply(pos: Position, buf: &TextBuffer, motion: Motion) -> Position {
    let pos = Position::new(pos.row.min(buf.last_row()), pos.col);
    let next = match motion {
        Motion::Left => Position::new(pos.row, pos.col.saturating_sub(1)),
        Motion::Right => {
            let last = buf.line_len(pos.row).saturating_sub(1);
            Position::new(pos.row, (pos.col + 1).min(last))
        }
        // Column is kept as-is; vertical moves have no column memory.
        Motion::Up => Position::new(pos.row.saturating_sub(1), pos.col),
        Motion::Down => Position::new((pos.row + 1).min(buf.last_row()), pos.col),
        Motion::WordForward => Position::new(pos.row, word_forward(line_of(buf, pos.row), pos.col)),
        Motion::WordBackward => {
            Position::new(pos.row, word_backward(line_of(buf, pos.row), pos.col))
        }
        Motion::WordEnd => Position::new(pos.row, word_end(line_of(buf, pos.row), pos.col)),
        Motion::LineStart => Position::new(pos.row, 0),
        Motion::LineEnd => Position::new(pos.row, buf.line_len(pos.row).saturating_sub(1)),
        Motion::FirstNonBlank => Position::new(
            pos.row,
            grapheme::first_non_blank(line_of(buf, pos.row)),
        ),
        Motion::BufferStart => Position::origin(),
        Motion::BufferEnd => Position::new(buf.last_row(), pos.col),
        Motion::ParagraphForward => Position::new(paragraph_forward(buf, pos.row), 0),
        Motion::ParagraphBackward => Position::new(paragraph_backward(buf, pos.row), 0),
    };
    trace!(target: "text.motion", ?motion, from = ?pos, to = ?next, "motion");
    next
}

fn line_of(buf: &TextBuffer, row: usize) -> &str {
    buf.line(row).unwrap_or_default()
}

fn classes(line: &str) -> Vec<CharClass> {
    grapheme::clusters(line)
        .into_iter()
        .map(grapheme::class_of)
        .collect()
}

/// Start of the next word on the same line. Runs off the end clamp to the last column.
pub fn word_forward(line: &str, col: usize) -> usize {
    let cls = classes(line);
    let len = cls.len();
    if len == 0 {
        return 0;
    }
    let mut i = col.min(len);
    if i < len && cls[i] != CharClass::Whitespace {
        let run = cls[i];
        while i < len && cls[i] == run {
            i += 1;
        }
    }
    while i < len && cls[i] == CharClass::Whitespace {
        i += 1;
    }
    i.min(len - 1)
}

/// Start of the word left of `col`: skip whitespace leftward, then the class run.
pub fn word_backward(line: &str, col: usize) -> usize {
    let cls = classes(line);
    let mut i = col.min(cls.len());
    while i > 0 && cls[i - 1] == CharClass::Whitespace {
        i -= 1;
    }
    if i == 0 {
        return 0;
    }
    let run = cls[i - 1];
    while i > 0 && cls[i - 1] == run {
        i -= 1;
    }
    i
}

/// Last column of the next same-class run, starting one column ahead of `col`.
pub fn word_end(line: &str, col: usize) -> usize {
    let cls = classes(line);
    let len = cls.len();
    if len == 0 {
        return 0;
    }
    let mut i = col + 1;
    while i < len && cls[i] == CharClass::Whitespace {
        i += 1;
    }
    if i >= len {
        return len - 1;
    }
    let run = cls[i];
    while i + 1 < len && cls[i + 1] == run {
        i += 1;
    }
    i
}

fn paragraph_forward(buf: &TextBuffer, row: usize) -> usize {
    let last = buf.last_row();
    let mut r = row + 1;
    while r <= last && !buf.is_blank(r) {
        r += 1;
    }
    while r <= last && buf.is_blank(r) {
        r += 1;
    }
    r.min(last)
}

fn paragraph_backward(buf: &TextBuffer, row: usize) -> usize {
    let mut r = row;
    while r > 0 && !buf.is_blank(r - 1) {
        r -= 1;
    }
    while r > 0 && buf.is_blank(r - 1) {
        r -= 1;
    }
    // `r - 1` is now the first non-blank row above the blank gap.
    r.saturating_sub(1)
}
