mod common;

use common::*;
use core_actions::Editor;
use core_events::parse_keys;
use core_lesson::{Catalog, CompletionRecord, Goal, Lesson};
use core_state::Mode;
use core_text::Position;
use pretty_assertions::assert_eq;

/// Replay `script`, polling completion after every key like a host would.
fn play(ed: &mut Editor, lesson: &Lesson, script: &str) -> Option<CompletionRecord> {
    let mut done = None;
    for key in parse_keys(script).unwrap() {
        ed.dispatch(key);
        if let Some(rec) = ed.evaluate_completion(lesson) {
            assert!(done.is_none(), "completion fired twice");
            done = Some(rec);
        }
    }
    done
}

#[test]
fn reaching_target_position_completes() {
    let l = lesson(&["abcdef"], Goal::TargetPosition { row: 0, col: 3 }, &["l"]);
    let mut ed = Editor::for_lesson(&l, 200);
    assert_eq!(play(&mut ed, &l, "ll"), None);
    let rec = play(&mut ed, &l, "l").expect("completed");
    assert!(rec.completed);
    assert_eq!(rec.score, 100);
    assert_eq!(rec.mistakes, 0);
    assert_eq!(cursor(&ed), Position::new(0, 3));
}

#[test]
fn disallowed_command_is_a_mistake_and_does_nothing() {
    let l = lesson(&["abcdef", "ghijkl"], Goal::TargetPosition { row: 0, col: 3 }, &["l"]);
    let mut ed = Editor::for_lesson(&l, 200);
    assert_eq!(play(&mut ed, &l, "j"), None);
    let snap = ed.state();
    assert_eq!(snap.mistakes, 1);
    assert_eq!(snap.cursor, Position::origin());
    assert_eq!(
        snap.message.as_deref(),
        Some("Command 'j' not allowed in this lesson!")
    );
    let rec = play(&mut ed, &l, "lll").unwrap();
    assert_eq!(rec.score, 90);
    assert_eq!(rec.mistakes, 1);
}

#[test]
fn deleting_to_target_state_completes() {
    let l = lesson(
        &["delete this", "keep this"],
        Goal::TargetState {
            lines: vec!["keep this".into()],
        },
        &["dd"],
    );
    let mut ed = Editor::for_lesson(&l, 200);
    let rec = play(&mut ed, &l, "dd").unwrap();
    assert_eq!(rec.score, 100);
    assert_eq!(lines(&ed), vec!["keep this"]);
}

#[test]
fn undo_lesson_needs_an_undo() {
    let l = lesson(&["a", "b"], Goal::UndoRequired, &["dd", "u"]);
    let mut ed = Editor::for_lesson(&l, 200);
    // Untouched buffer equals the initial text but no undo happened yet.
    assert_eq!(play(&mut ed, &l, "z"), None);
    assert_eq!(play(&mut ed, &l, "dd"), None);
    assert_eq!(lines(&ed), vec!["b"]);
    let rec = play(&mut ed, &l, "u").unwrap();
    assert!(rec.completed);
    assert!(ed.undo_performed());
    assert_eq!(lines(&ed), vec!["a", "b"]);
}

#[test]
fn undo_on_untouched_buffer_still_counts() {
    let l = lesson(&["a", "b"], Goal::UndoRequired, &["u"]);
    let mut ed = Editor::for_lesson(&l, 200);
    let rec = play(&mut ed, &l, "u").expect("completed");
    assert_eq!(rec.score, 100);
    assert_eq!(ed.state().undo_depth, 0);
    assert_eq!(lines(&ed), vec!["a", "b"]);
}

#[test]
fn rejected_undo_does_not_count() {
    let l = lesson(&["a", "b"], Goal::UndoRequired, &["dd"]);
    let mut ed = Editor::for_lesson(&l, 200);
    assert_eq!(play(&mut ed, &l, "u"), None);
    assert!(!ed.undo_performed());
    assert_eq!(ed.mistakes(), 1);
}

#[test]
fn prefix_keys_are_validated_only_when_resolved() {
    let l = lesson(&["a", "b"], Goal::ChangedFromInitial, &["dd"]);
    let mut ed = Editor::for_lesson(&l, 200);
    assert_eq!(play(&mut ed, &l, "d"), None);
    assert_eq!(ed.mistakes(), 0);
    assert_eq!(ed.state().pending_command.as_deref(), Some("d"));
    // `d` then `j` re-resolves `j` on its own, which is not allowed.
    play(&mut ed, &l, "j");
    assert_eq!(ed.mistakes(), 1);
    assert_eq!(cursor(&ed), Position::origin());
    assert!(play(&mut ed, &l, "dd").is_some());
}

#[test]
fn escape_is_validated_when_leaving_insert() {
    let l = lesson(&["x"], Goal::ChangedFromInitial, &["i"]);
    let mut ed = Editor::for_lesson(&l, 200);
    play(&mut ed, &l, "iab<Esc>");
    let snap = ed.state();
    assert_eq!(snap.mode, Mode::Insert);
    assert_eq!(snap.mistakes, 1);
    assert_eq!(
        snap.message.as_deref(),
        Some("Command 'ESC' not allowed in this lesson!")
    );
    assert_eq!(snap.lines, vec!["abx"]);
}

#[test]
fn typed_text_and_arguments_are_not_validated() {
    let l = lesson(&["x"], Goal::ChangedFromInitial, &["i", "ESC", "r", "m"]);
    let mut ed = Editor::for_lesson(&l, 200);
    play(&mut ed, &l, "ihjkl<Esc>rqmz");
    assert_eq!(ed.mistakes(), 0);
    assert_eq!(lines(&ed), vec!["hjklq"]);
    assert!(ed.state().marks.contains('z'));
}

#[test]
fn completion_waits_for_interaction_and_fires_once() {
    let l = lesson(&["same"], Goal::TargetPosition { row: 0, col: 0 }, &["l"]);
    let mut ed = Editor::for_lesson(&l, 200);
    assert_eq!(ed.evaluate_completion(&l), None);
    assert!(play(&mut ed, &l, "z").is_some());
    assert!(ed.completion_triggered());
    assert_eq!(play(&mut ed, &l, "zz"), None);
    assert_eq!(ed.completion().map(|r| r.lesson_id), Some(1));
}

#[test]
fn builtin_delete_lesson_playthrough() {
    let catalog = Catalog::builtin().unwrap();
    let l = catalog.get(5).unwrap();
    let mut ed = Editor::for_lesson(l, 200);
    let rec = play(&mut ed, l, "ddwdwdwjjdwjddj$x0wwwwx").expect("lesson 5 completes");
    assert_eq!(rec.score, 100);
    assert_eq!(
        lines(&ed),
        vec![
            "Remove from this sentence carefully",
            "Keep this line intact",
            "Delete words from here also",
            "Keep this line as well",
            "Remove single char: x here and here: y",
        ]
    );
}

#[test]
fn builtin_undo_lesson_playthrough() {
    let catalog = Catalog::builtin().unwrap();
    let l = catalog.get(8).unwrap();
    let mut ed = Editor::for_lesson(l, 200);
    assert_eq!(play(&mut ed, l, "jdddddd"), None);
    assert_eq!(ed.state().undo_depth, 3);
    assert_eq!(play(&mut ed, l, "uu"), None);
    let rec = play(&mut ed, l, "u").unwrap();
    assert_eq!(rec.mistakes, 0);
    assert_eq!(ed.state().redo_depth, 3);
}

#[test]
fn builtin_marks_lesson_playthrough() {
    let catalog = Catalog::builtin().unwrap();
    let l = catalog.get(12).unwrap();
    let mut ed = Editor::for_lesson(l, 200);
    assert_eq!(play(&mut ed, l, "majjmb"), None);
    assert!(play(&mut ed, l, "jjmc").is_some());
    play(&mut ed, l, "'a");
    assert_eq!(cursor(&ed), Position::origin());
    assert_eq!(ed.state().message.as_deref(), Some("Jumped to mark 'a'"));
}
