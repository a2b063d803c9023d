//! Line-oriented text buffer.
//!
//! The buffer is an ordered list of line strings (document order). It is never
//! empty: removing the last remaining line re-seeds a single empty line.
//!
//! Columns are grapheme-cluster indices, not byte offsets. Every mutating API
//! takes `(row, col)` pairs and translates them to byte offsets through the
//! [`grapheme`] helpers, so callers never slice inside a cluster.

use serde::{Deserialize, Serialize};

pub mod motion;

/// A cursor location: zero-based row and grapheme column.
///
/// Derived ordering is row-major (row first, then column), which is the
/// document order used by search and selections.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn origin() -> Self {
        Self { row: 0, col: 0 }
    }

    /// Clamp for Normal-mode semantics: `row < line_count` and
    /// `col < max(line_len, 1)` so the block cursor rests on a real cell.
    pub fn clamp_normal(self, buf: &TextBuffer) -> Self {
        let row = self.row.min(buf.line_count() - 1);
        let len = buf.line_len(row);
        Self {
            row,
            col: self.col.min(len.saturating_sub(1)),
        }
    }

    /// Clamp for insert-adjacent contexts where `col == line_len` is legal.
    pub fn clamp_insert(self, buf: &TextBuffer) -> Self {
        let row = self.row.min(buf.line_count() - 1);
        Self {
            row,
            col: self.col.min(buf.line_len(row)),
        }
    }
}

/// Ordered sequence of lines. Mutated only through the methods below.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextBuffer {
    lines: Vec<String>,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self {
            lines: vec![String::new()],
        }
    }
}

impl TextBuffer {
    /// Build a buffer from owned or borrowed lines. An empty input yields one empty line.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        if lines.is_empty() {
            lines.push(String::new());
        }
        Self { lines }
    }

    /// Split `content` into lines (`\n` or `\r\n`).
    pub fn from_text(content: &str) -> Self {
        Self::from_lines(content.lines())
    }

    /// Total number of lines. Always at least one.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Borrow line `row`, if it exists.
    pub fn line(&self, row: usize) -> Option<&str> {
        self.lines.get(row).map(String::as_str)
    }

    /// All lines in document order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Length of line `row` in grapheme clusters (0 for a missing row).
    pub fn line_len(&self, row: usize) -> usize {
        self.line(row).map(grapheme::count).unwrap_or(0)
    }

    /// True when line `row` is missing, empty, or whitespace only.
    pub fn is_blank(&self, row: usize) -> bool {
        self.line(row).is_none_or(|l| l.trim().is_empty())
    }

    pub fn last_row(&self) -> usize {
        self.lines.len() - 1
    }

    /// Overwrite line `row`. Returns false (and does nothing) if the row is missing.
    pub fn replace_line(&mut self, row: usize, text: impl Into<String>) -> bool {
        match self.lines.get_mut(row) {
            Some(line) => {
                *line = text.into();
                true
            }
            None => false,
        }
    }

    /// Insert a new line so that it becomes line `row`. Rows past the end append.
    pub fn insert_line(&mut self, row: usize, text: impl Into<String>) {
        let row = row.min(self.lines.len());
        self.lines.insert(row, text.into());
    }

    /// Remove line `row`, returning its content. Removing the only line leaves
    /// one empty line behind.
    pub fn remove_line(&mut self, row: usize) -> Option<String> {
        if row >= self.lines.len() {
            return None;
        }
        let removed = self.lines.remove(row);
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        Some(removed)
    }

    /// Replace the grapheme range `[col_start, col_end)` of line `row` with
    /// `replacement`, returning the removed text. Columns clamp to the line end.
    pub fn splice(
        &mut self,
        row: usize,
        col_start: usize,
        col_end: usize,
        replacement: &str,
    ) -> String {
        let Some(line) = self.lines.get_mut(row) else {
            return String::new();
        };
        let (start, end) = if col_start <= col_end {
            (col_start, col_end)
        } else {
            (col_end, col_start)
        };
        let b_start = grapheme::byte_offset(line, start);
        let b_end = grapheme::byte_offset(line, end);
        let removed = line[b_start..b_end].to_string();
        line.replace_range(b_start..b_end, replacement);
        removed
    }

    /// Text of the grapheme range `[col_start, col_end)` on line `row`.
    pub fn slice(&self, row: usize, col_start: usize, col_end: usize) -> String {
        let Some(line) = self.line(row) else {
            return String::new();
        };
        let b_start = grapheme::byte_offset(line, col_start.min(col_end));
        let b_end = grapheme::byte_offset(line, col_end.max(col_start));
        line[b_start..b_end].to_string()
    }

    /// Split line `row` at `col`; the tail becomes a new line below.
    pub fn split_line(&mut self, row: usize, col: usize) {
        let Some(line) = self.lines.get_mut(row) else {
            return;
        };
        let at = grapheme::byte_offset(line, col);
        let tail = line.split_off(at);
        self.lines.insert(row + 1, tail);
    }

    /// All lines joined with `sep`.
    pub fn joined(&self, sep: &str) -> String {
        self.lines.join(sep)
    }

    /// Compare content against a plain list of lines.
    pub fn eq_lines<S: AsRef<str>>(&self, other: &[S]) -> bool {
        self.lines.len() == other.len()
            && self
                .lines
                .iter()
                .zip(other)
                .all(|(a, b)| a.as_str() == b.as_ref())
    }
}

/// Grapheme helpers operating on a single line.
pub mod grapheme {
    use unicode_segmentation::UnicodeSegmentation;

    /// Character class used by word motions and word operators.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum CharClass {
        Whitespace,
        Word,
        Punctuation,
    }

    /// Classify a cluster by its first `char`: alphanumeric or `_` is a word char.
    pub fn class_of(g: &str) -> CharClass {
        match g.chars().next() {
            Some(c) if c.is_whitespace() => CharClass::Whitespace,
            Some(c) if c == '_' || c.is_alphanumeric() => CharClass::Word,
            Some(_) => CharClass::Punctuation,
            None => CharClass::Whitespace,
        }
    }

    pub fn clusters(line: &str) -> Vec<&str> {
        line.graphemes(true).collect()
    }

    pub fn count(line: &str) -> usize {
        line.graphemes(true).count()
    }

    /// Byte offset of grapheme column `col`; `line.len()` when `col` is past the end.
    pub fn byte_offset(line: &str, col: usize) -> usize {
        line.grapheme_indices(true)
            .nth(col)
            .map(|(idx, _)| idx)
            .unwrap_or(line.len())
    }

    pub fn cluster_at(line: &str, col: usize) -> Option<&str> {
        line.graphemes(true).nth(col)
    }

    /// Column of the first non-whitespace cluster (0 if the line is all whitespace).
    pub fn first_non_blank(line: &str) -> usize {
        line.graphemes(true)
            .position(|g| class_of(g) != CharClass::Whitespace)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::grapheme::{self, CharClass};
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_input_seeds_one_line() {
        let b = TextBuffer::from_lines(Vec::<String>::new());
        assert_eq!(b.line_count(), 1);
        assert_eq!(b.line(0), Some(""));
        assert_eq!(TextBuffer::from_text("").line_count(), 1);
    }

    #[test]
    fn remove_last_line_reseeds() {
        let mut b = TextBuffer::from_lines(["only"]);
        assert_eq!(b.remove_line(0).as_deref(), Some("only"));
        assert_eq!(b.line_count(), 1);
        assert_eq!(b.line(0), Some(""));
        assert_eq!(b.remove_line(3), None);
    }

    #[test]
    fn insert_and_replace_lines() {
        let mut b = TextBuffer::from_lines(["a", "c"]);
        b.insert_line(1, "b");
        b.insert_line(99, "d");
        assert!(b.eq_lines(&["a", "b", "c", "d"]));
        assert!(b.replace_line(0, "A"));
        assert!(!b.replace_line(10, "nope"));
        assert_eq!(b.line(0), Some("A"));
    }

    #[test]
    fn splice_uses_grapheme_columns() {
        let mut b = TextBuffer::from_lines(["aé😀b"]);
        let removed = b.splice(0, 1, 3, "XY");
        assert_eq!(removed, "é😀");
        assert_eq!(b.line(0), Some("aXYb"));
        // Columns past the end clamp.
        let removed = b.splice(0, 3, 50, "");
        assert_eq!(removed, "b");
        assert_eq!(b.line(0), Some("aXY"));
    }

    #[test]
    fn combining_mark_is_one_column() {
        let b = TextBuffer::from_lines(["e\u{301}x"]);
        assert_eq!(b.line_len(0), 2);
        assert_eq!(b.slice(0, 1, 2), "x");
    }

    #[test]
    fn split_line_moves_tail() {
        let mut b = TextBuffer::from_lines(["abcd"]);
        b.split_line(0, 2);
        assert!(b.eq_lines(&["ab", "cd"]));
    }

    #[test]
    fn clamp_helpers() {
        let b = TextBuffer::from_lines(["abc", ""]);
        assert_eq!(Position::new(0, 3).clamp_normal(&b), Position::new(0, 2));
        assert_eq!(Position::new(0, 3).clamp_insert(&b), Position::new(0, 3));
        assert_eq!(Position::new(5, 4).clamp_normal(&b), Position::new(1, 0));
    }

    #[test]
    fn classes_and_first_non_blank() {
        assert_eq!(grapheme::class_of("a"), CharClass::Word);
        assert_eq!(grapheme::class_of("_"), CharClass::Word);
        assert_eq!(grapheme::class_of("("), CharClass::Punctuation);
        assert_eq!(grapheme::class_of("\t"), CharClass::Whitespace);
        assert_eq!(grapheme::first_non_blank("   x"), 3);
        assert_eq!(grapheme::first_non_blank("    "), 0);
    }

    #[test]
    fn positions_order_row_major() {
        assert!(Position::new(0, 9) < Position::new(1, 0));
        assert!(Position::new(2, 1) < Position::new(2, 4));
    }
}
