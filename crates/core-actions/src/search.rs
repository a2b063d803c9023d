//! Case-insensitive literal search over the buffer.
//!
//! Matches are collected in document order and may overlap. The starting
//! match depends on direction: forward picks the first match after the
//! cursor (wrapping to the first), backward the last match before it
//! (wrapping to the last).

use core_state::{SearchDirection, SearchState};
use core_text::{Position, TextBuffer, grapheme};
use tracing::debug;

/// Every position where `term` starts, in document order.
pub fn find_matches(buf: &TextBuffer, term: &str) -> Vec<Position> {
    let needle: Vec<String> = grapheme::clusters(term)
        .into_iter()
        .map(str::to_lowercase)
        .collect();
    if needle.is_empty() {
        return Vec::new();
    }
    let mut out = Vec::new();
    for (row, line) in buf.lines().iter().enumerate() {
        let hay: Vec<String> = grapheme::clusters(line)
            .into_iter()
            .map(str::to_lowercase)
            .collect();
        if hay.len() < needle.len() {
            continue;
        }
        for col in 0..=hay.len() - needle.len() {
            if hay[col..col + needle.len()] == needle[..] {
                out.push(Position::new(row, col));
            }
        }
    }
    out
}

/// Index of the match to land on first.
pub fn start_index(matches: &[Position], cursor: Position, direction: SearchDirection) -> usize {
    match direction {
        SearchDirection::Forward => matches.iter().position(|m| *m > cursor).unwrap_or(0),
        SearchDirection::Backward => matches
            .iter()
            .rposition(|m| *m < cursor)
            .unwrap_or(matches.len().saturating_sub(1)),
    }
}

/// Run a search from `cursor`. The returned state has no matches when the
/// term does not occur.
pub fn run(buf: &TextBuffer, term: &str, cursor: Position, direction: SearchDirection) -> SearchState {
    let matches = find_matches(buf, term);
    let current_index = start_index(&matches, cursor, direction);
    debug!(target: "actions.search", term, ?direction, matches = matches.len(), current_index, "search");
    SearchState {
        term: term.to_string(),
        direction,
        matches,
        current_index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn buf(lines: &[&str]) -> TextBuffer {
        TextBuffer::from_lines(lines.iter().copied())
    }

    #[test]
    fn finds_case_insensitive_and_overlapping() {
        let b = buf(&["Foo foo", "xfoo", "aaa"]);
        assert_eq!(
            find_matches(&b, "FOO"),
            vec![Position::new(0, 0), Position::new(0, 4), Position::new(1, 1)]
        );
        assert_eq!(
            find_matches(&b, "aa"),
            vec![Position::new(2, 0), Position::new(2, 1)]
        );
        assert!(find_matches(&b, "").is_empty());
        assert!(find_matches(&b, "zzz").is_empty());
    }

    #[test]
    fn forward_starts_after_cursor_and_wraps() {
        let m = [Position::new(0, 0), Position::new(1, 2), Position::new(3, 0)];
        assert_eq!(start_index(&m, Position::new(0, 0), SearchDirection::Forward), 1);
        assert_eq!(start_index(&m, Position::new(1, 2), SearchDirection::Forward), 2);
        assert_eq!(start_index(&m, Position::new(3, 0), SearchDirection::Forward), 0);
    }

    #[test]
    fn backward_starts_before_cursor_and_wraps() {
        let m = [Position::new(0, 0), Position::new(1, 2), Position::new(3, 0)];
        assert_eq!(start_index(&m, Position::new(2, 0), SearchDirection::Backward), 1);
        assert_eq!(start_index(&m, Position::new(0, 0), SearchDirection::Backward), 2);
        assert_eq!(start_index(&[], Position::new(0, 0), SearchDirection::Backward), 0);
    }

    #[test]
    fn run_builds_state() {
        let st = run(&buf(&["one two one"]), "one", Position::new(0, 0), SearchDirection::Forward);
        assert_eq!(st.matches.len(), 2);
        assert_eq!(st.current(), Some(Position::new(0, 8)));
    }
}
