//! Pure edit operations.
//!
//! Each operation takes the buffer and cursor by reference and returns an
//! [`EditOutcome`] describing the result; nothing here touches history, mode
//! or the lesson allow-list. The dispatcher decides whether an outcome is
//! worth an undo snapshot (only when `buffer` is `Some`).
//!
//! Word spans used by `dw`, `yw` and `cw`:
//! * `dw` / `yw`: the class run under the cursor plus any trailing whitespace.
//!   Starting on whitespace covers just the whitespace run.
//! * `cw`: the class run only (whitespace is left alone).

use core_state::{Register, RegisterKind, SelectionKind, SelectionSpan};
use core_text::grapheme::{self, CharClass};
use core_text::{Position, TextBuffer};

/// Result of one edit operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    /// New buffer content; `None` when the content is unchanged.
    pub buffer: Option<TextBuffer>,
    pub cursor: Position,
    pub message: Option<String>,
    /// New register content; `None` leaves the register as it was.
    pub register: Option<Register>,
    /// The caller should switch to Insert mode.
    pub enter_insert: bool,
}

impl EditOutcome {
    fn unchanged(cursor: Position) -> Self {
        Self {
            buffer: None,
            cursor,
            message: None,
            register: None,
            enter_insert: false,
        }
    }

    fn edited(buffer: TextBuffer, cursor: Position) -> Self {
        Self {
            buffer: Some(buffer),
            ..Self::unchanged(cursor)
        }
    }

    fn with_message(mut self, msg: impl Into<String>) -> Self {
        self.message = Some(msg.into());
        self
    }

    fn with_register(mut self, text: impl Into<String>, kind: RegisterKind) -> Self {
        let mut reg = Register::default();
        reg.record(text, kind);
        if !reg.is_empty() {
            self.register = Some(reg);
        }
        self
    }

    pub fn changed(&self) -> bool {
        self.buffer.is_some()
    }
}

fn classes(line: &str) -> Vec<CharClass> {
    grapheme::clusters(line)
        .into_iter()
        .map(grapheme::class_of)
        .collect()
}

fn run_end(classes: &[CharClass], from: usize) -> usize {
    let Some(&class) = classes.get(from) else {
        return from;
    };
    from + classes[from..].iter().take_while(|c| **c == class).count()
}

/// `[col, end)` covered by `dw` / `yw`.
pub fn word_span(line: &str, col: usize) -> (usize, usize) {
    let cls = classes(line);
    if col >= cls.len() {
        return (col, col);
    }
    let mut end = run_end(&cls, col);
    if cls[col] != CharClass::Whitespace {
        end += cls[end..]
            .iter()
            .take_while(|c| **c == CharClass::Whitespace)
            .count();
    }
    (col, end)
}

/// `[col, end)` covered by `cw`.
pub fn change_span(line: &str, col: usize) -> (usize, usize) {
    let cls = classes(line);
    if col >= cls.len() {
        return (col, col);
    }
    (col, run_end(&cls, col))
}

fn nothing_to_delete(cursor: Position) -> EditOutcome {
    EditOutcome::unchanged(cursor).with_message("Nothing to delete")
}

/// `x`: remove the character under the cursor.
pub fn delete_char(buf: &TextBuffer, cursor: Position) -> EditOutcome {
    let len = buf.line_len(cursor.row);
    if cursor.col >= len {
        return nothing_to_delete(cursor);
    }
    let mut next = buf.clone();
    let removed = next.splice(cursor.row, cursor.col, cursor.col + 1, "");
    EditOutcome::edited(next, cursor)
        .with_register(removed, RegisterKind::Char)
        .with_message("Deleted character")
}

/// `dd`: remove the cursor line. The last remaining line becomes empty.
pub fn delete_line(buf: &TextBuffer, cursor: Position) -> EditOutcome {
    let mut next = buf.clone();
    let Some(removed) = next.remove_line(cursor.row) else {
        return nothing_to_delete(cursor);
    };
    let row = cursor.row.min(next.last_row());
    EditOutcome::edited(next, Position::new(row, 0))
        .with_register(removed, RegisterKind::Line)
        .with_message("Deleted line")
}

/// `dw`
pub fn delete_word(buf: &TextBuffer, cursor: Position) -> EditOutcome {
    let Some(line) = buf.line(cursor.row) else {
        return nothing_to_delete(cursor);
    };
    let (start, end) = word_span(line, cursor.col);
    if start == end {
        return nothing_to_delete(cursor);
    }
    let mut next = buf.clone();
    let removed = next.splice(cursor.row, start, end, "");
    EditOutcome::edited(next, cursor)
        .with_register(removed, RegisterKind::Char)
        .with_message("Deleted word")
}

/// `d$`
pub fn delete_to_line_end(buf: &TextBuffer, cursor: Position) -> EditOutcome {
    let len = buf.line_len(cursor.row);
    if cursor.col >= len {
        return nothing_to_delete(cursor);
    }
    let mut next = buf.clone();
    let removed = next.splice(cursor.row, cursor.col, len, "");
    EditOutcome::edited(next, cursor)
        .with_register(removed, RegisterKind::Char)
        .with_message("Deleted to end of line")
}

/// `cw`: remove the word under the cursor and ask for Insert mode. Insert mode
/// is requested even when there is nothing to remove.
pub fn change_word(buf: &TextBuffer, cursor: Position) -> EditOutcome {
    let (start, end) = buf
        .line(cursor.row)
        .map(|line| change_span(line, cursor.col))
        .unwrap_or((cursor.col, cursor.col));
    let mut out = if start == end {
        EditOutcome::unchanged(cursor)
    } else {
        let mut next = buf.clone();
        let removed = next.splice(cursor.row, start, end, "");
        EditOutcome::edited(next, cursor)
            .with_register(removed, RegisterKind::Char)
            .with_message("Changed word")
    };
    out.enter_insert = true;
    out
}

/// `yy`
pub fn yank_line(buf: &TextBuffer, cursor: Position) -> EditOutcome {
    let line = buf.line(cursor.row).unwrap_or_default();
    EditOutcome::unchanged(cursor)
        .with_register(line, RegisterKind::Line)
        .with_message(format!("Yanked: \"{line}\""))
}

/// `yw`
pub fn yank_word(buf: &TextBuffer, cursor: Position) -> EditOutcome {
    let Some(line) = buf.line(cursor.row) else {
        return EditOutcome::unchanged(cursor).with_message(yank_message(""));
    };
    let (start, end) = word_span(line, cursor.col);
    let text = buf.slice(cursor.row, start, end);
    let msg = yank_message(&text);
    EditOutcome::unchanged(cursor)
        .with_register(text, RegisterKind::Char)
        .with_message(msg)
}

fn yank_message(text: &str) -> String {
    if text.is_empty() {
        "Nothing to yank".to_string()
    } else {
        format!("Yanked: \"{text}\"")
    }
}

/// `r{ch}`: overwrite the character under the cursor.
pub fn replace_char(buf: &TextBuffer, cursor: Position, ch: char) -> EditOutcome {
    if cursor.col >= buf.line_len(cursor.row) {
        return EditOutcome::unchanged(cursor).with_message("Nothing to replace");
    }
    let mut next = buf.clone();
    let mut tmp = [0u8; 4];
    next.splice(cursor.row, cursor.col, cursor.col + 1, ch.encode_utf8(&mut tmp));
    EditOutcome::edited(next, cursor).with_message(format!("Replaced with '{ch}'"))
}

/// `p` (`before == false`) and `P` (`before == true`).
pub fn paste(buf: &TextBuffer, cursor: Position, register: &Register, before: bool) -> EditOutcome {
    if register.is_empty() {
        return EditOutcome::unchanged(cursor).with_message("Nothing in register");
    }
    let mut next = buf.clone();
    match register.kind {
        RegisterKind::Line => {
            let row = if before { cursor.row } else { cursor.row + 1 };
            for (i, line) in register.lines().into_iter().enumerate() {
                next.insert_line(row + i, line);
            }
            let msg = if before {
                "Pasted line above"
            } else {
                "Pasted line below"
            };
            let cursor = Position::new(row.min(next.last_row()), 0);
            EditOutcome::edited(next, cursor).with_message(msg)
        }
        RegisterKind::Char => {
            let len = buf.line_len(cursor.row);
            let at = if before {
                cursor.col.min(len)
            } else {
                (cursor.col + 1).min(len)
            };
            next.splice(cursor.row, at, at, &register.content);
            let inserted = grapheme::count(&register.content);
            let msg = if before {
                "Pasted before cursor"
            } else {
                "Pasted after cursor"
            };
            EditOutcome::edited(next, Position::new(cursor.row, at + inserted.saturating_sub(1)))
                .with_message(msg)
        }
    }
}

/// Visual `d`. Character-wise spans are limited to one row; callers reject
/// multi-row character-wise selections before getting here.
pub fn delete_selection(buf: &TextBuffer, span: SelectionSpan) -> EditOutcome {
    match span.kind {
        SelectionKind::Characterwise => {
            let row = span.start.row;
            let len = buf.line_len(row);
            let (start, end) = (span.start.col, (span.end.col + 1).min(len));
            if start >= end {
                return nothing_to_delete(span.start);
            }
            let mut next = buf.clone();
            let removed = next.splice(row, start, end, "");
            EditOutcome::edited(next, span.start)
                .with_register(removed, RegisterKind::Char)
                .with_message("Deleted selection")
        }
        SelectionKind::Linewise => {
            let mut next = buf.clone();
            let mut removed = Vec::new();
            for _ in span.rows() {
                if let Some(line) = next.remove_line(span.start.row) {
                    removed.push(line);
                }
            }
            let row = span.start.row.min(next.last_row());
            EditOutcome::edited(next, Position::new(row, 0))
                .with_register(removed.join("\n"), RegisterKind::Line)
                .with_message("Deleted selection")
        }
    }
}

/// Visual `y`. The cursor moves to the start of the selection.
pub fn yank_selection(buf: &TextBuffer, span: SelectionSpan) -> EditOutcome {
    match span.kind {
        SelectionKind::Characterwise => {
            let text = buf.slice(span.start.row, span.start.col, span.end.col + 1);
            let msg = yank_message(&text);
            EditOutcome::unchanged(span.start)
                .with_register(text, RegisterKind::Char)
                .with_message(msg)
        }
        SelectionKind::Linewise => {
            let lines: Vec<&str> = span.rows().filter_map(|r| buf.line(r)).collect();
            let msg = match lines.as_slice() {
                [one] => format!("Yanked: \"{one}\""),
                many => format!("{} lines yanked", many.len()),
            };
            EditOutcome::unchanged(Position::new(span.start.row, 0))
                .with_register(lines.join("\n"), RegisterKind::Line)
                .with_message(msg)
        }
    }
}
