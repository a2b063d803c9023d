mod common;

use common::*;
use core_state::{Mode, SearchDirection};
use core_text::Position;
use pretty_assertions::assert_eq;

#[test]
fn forward_search_jumps_to_first_match_after_cursor() {
    let ed = after(&["foo bar", "Foo baz", "qux foo"], "/foo<CR>");
    assert_eq!(cursor(&ed), Position::new(1, 0));
    assert_eq!(ed.state().mode, Mode::Normal);
    assert_eq!(ed.state().message.as_deref(), Some("Match 2 of 3"));
    let search = ed.state().search.unwrap();
    assert_eq!(search.term, "foo");
    assert_eq!(search.direction, SearchDirection::Forward);
}

#[test]
fn next_and_previous_cycle() {
    let mut ed = after(&["foo bar", "Foo baz", "qux foo"], "/foo<CR>n");
    assert_eq!(cursor(&ed), Position::new(2, 4));
    run_keys(&mut ed, "n");
    assert_eq!(cursor(&ed), Position::origin());
    assert_eq!(ed.state().message.as_deref(), Some("Match 1 of 3"));
    run_keys(&mut ed, "N");
    assert_eq!(cursor(&ed), Position::new(2, 4));
}

#[test]
fn backward_search_wraps_to_last_match() {
    let ed = after(&["foo", "bar", "foo"], "?foo<CR>");
    assert_eq!(cursor(&ed), Position::new(2, 0));
    let ed = after(&["foo", "bar", "foo"], "G?foo<CR>");
    assert_eq!(cursor(&ed), Position::origin());
}

#[test]
fn prompt_editing_and_cancel() {
    let mut ed = after(&["abc"], "/ab");
    assert_eq!(ed.state().mode, Mode::Search);
    assert_eq!(ed.state().message.as_deref(), Some("/ab"));
    run_keys(&mut ed, "<BS>");
    assert_eq!(ed.state().message.as_deref(), Some("/a"));
    run_keys(&mut ed, "<Esc>");
    assert_eq!(ed.state().mode, Mode::Normal);
    assert_eq!(ed.state().search, None);
    assert_eq!(ed.state().message, None);
}

#[test]
fn missing_pattern_and_no_previous_search() {
    let ed = after(&["abc"], "/zzz<CR>");
    assert_eq!(ed.state().message.as_deref(), Some("Pattern not found"));
    assert_eq!(ed.state().mode, Mode::Normal);
    assert_eq!(cursor(&ed), Position::origin());

    let ed = after(&["abc"], "n");
    assert_eq!(ed.state().message.as_deref(), Some("No previous search"));
}

#[test]
fn empty_term_repeats_previous_search() {
    let ed = after(&["x a", "a", "a"], "/a<CR>/<CR>");
    assert_eq!(cursor(&ed), Position::new(1, 0));
    assert_eq!(ed.state().search.unwrap().term, "a");
}

#[test]
fn marks_set_and_jump() {
    let mut ed = after(&["first", "second", "third"], "jlma");
    assert_eq!(ed.state().message.as_deref(), Some("Mark 'a' set"));
    run_keys(&mut ed, "G'a");
    assert_eq!(cursor(&ed), Position::new(1, 1));
    run_keys(&mut ed, "'b");
    assert_eq!(ed.state().message.as_deref(), Some("Mark 'b' not set"));
    assert_eq!(cursor(&ed), Position::new(1, 1));
}

#[test]
fn marks_clamp_after_the_buffer_shrinks() {
    let ed = after(&["a", "b", "ccc"], "G$mzdd'z");
    assert_eq!(cursor(&ed), Position::new(1, 0));
}

#[test]
fn invalid_mark_names_cancel() {
    let ed = after(&["abc"], "mAl");
    assert!(ed.state().marks.is_empty());
    assert_eq!(cursor(&ed), Position::new(0, 1));
}
