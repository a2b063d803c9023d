use std::collections::HashMap;
use std::time::Instant;

use core_state::Marks;
use core_text::{Position, TextBuffer};
use tracing::{info, trace};

use crate::{CompletionRecord, Goal, Lesson};

/// The slice of an attempt the evaluator looks at.
#[derive(Debug, Clone, Copy)]
pub struct AttemptView<'a> {
    pub buffer: &'a TextBuffer,
    pub cursor: Position,
    pub marks: &'a Marks,
    pub mistakes: u32,
    pub undo_performed: bool,
    pub started_at: Instant,
}

/// `max(100 - 10 * mistakes, 0)`.
pub fn score_for(mistakes: u32) -> u32 {
    100u32.saturating_sub(mistakes.saturating_mul(10))
}

/// Check the lesson goal against the attempt, timing against `Instant::now()`.
///
/// Stateless: callers that must fire once per attempt keep their own
/// "already completed" flag.
pub fn check(lesson: &Lesson, attempt: &AttemptView<'_>) -> Option<CompletionRecord> {
    check_at(lesson, attempt, Instant::now())
}

/// [`check`] with an explicit clock reading.
pub fn check_at(
    lesson: &Lesson,
    attempt: &AttemptView<'_>,
    now: Instant,
) -> Option<CompletionRecord> {
    if !goal_met(lesson, attempt) {
        trace!(target: "lesson.eval", lesson = lesson.id, "goal_not_met");
        return None;
    }
    let record = CompletionRecord {
        lesson_id: lesson.id,
        completed: true,
        score: score_for(attempt.mistakes),
        time_taken_seconds: now.saturating_duration_since(attempt.started_at).as_secs(),
        mistakes: attempt.mistakes,
    };
    info!(
        target: "lesson.eval",
        lesson = lesson.id,
        score = record.score,
        mistakes = record.mistakes,
        seconds = record.time_taken_seconds,
        "lesson_completed"
    );
    Some(record)
}

/// Evaluate only the goal predicate.
pub fn goal_met(lesson: &Lesson, attempt: &AttemptView<'_>) -> bool {
    let buf = attempt.buffer;
    match &lesson.goal {
        Goal::TargetPosition { row, col } => attempt.cursor == Position::new(*row, *col),
        Goal::TargetText { text, count } => {
            count_occurrences(&buf.joined(" "), text) >= count.unwrap_or(1).max(1)
        }
        Goal::TargetState { lines } => normalized(buf.lines()) == normalized(lines),
        Goal::UndoRequired => attempt.undo_performed && buf.eq_lines(&lesson.initial_text),
        Goal::DuplicateLine => has_duplicate_line(buf.lines()),
        Goal::ChangedFromInitial => !buf.eq_lines(&lesson.initial_text),
        Goal::RequiredMarks { marks } => marks.iter().all(|m| attempt.marks.contains(*m)),
    }
}

/// Case-insensitive, non-overlapping occurrences. An empty needle counts zero.
fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack
        .to_lowercase()
        .matches(needle.to_lowercase().as_str())
        .count()
}

/// Drop blank lines and trailing whitespace. Applied to buffer and target alike.
fn normalized(lines: &[String]) -> Vec<&str> {
    lines
        .iter()
        .map(|l| l.trim_end())
        .filter(|l| !l.trim().is_empty())
        .collect()
}

fn has_duplicate_line(lines: &[String]) -> bool {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for line in lines.iter().filter(|l| !l.trim().is_empty()) {
        let n = seen.entry(line.as_str()).or_default();
        *n += 1;
        if *n > 1 {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    struct Fixture {
        buffer: TextBuffer,
        cursor: Position,
        marks: Marks,
        mistakes: u32,
        undo_performed: bool,
        started_at: Instant,
    }

    impl Fixture {
        fn new(lines: &[&str]) -> Self {
            Self {
                buffer: TextBuffer::from_lines(lines.iter().copied()),
                cursor: Position::origin(),
                marks: Marks::default(),
                mistakes: 0,
                undo_performed: false,
                started_at: Instant::now(),
            }
        }

        fn view(&self) -> AttemptView<'_> {
            AttemptView {
                buffer: &self.buffer,
                cursor: self.cursor,
                marks: &self.marks,
                mistakes: self.mistakes,
                undo_performed: self.undo_performed,
                started_at: self.started_at,
            }
        }
    }

    #[test]
    fn position_goal_scores_and_times() {
        let lesson = Lesson::new(1, ["abcd"], Goal::TargetPosition { row: 0, col: 3 });
        let mut f = Fixture::new(&["abcd"]);
        assert!(check(&lesson, &f.view()).is_none());
        f.cursor = Position::new(0, 3);
        f.mistakes = 2;
        let rec = check_at(&lesson, &f.view(), f.started_at + Duration::from_millis(4_900)).unwrap();
        assert_eq!(
            rec,
            CompletionRecord {
                lesson_id: 1,
                completed: true,
                score: 80,
                time_taken_seconds: 4,
                mistakes: 2,
            }
        );
    }

    #[test]
    fn score_floors_at_zero() {
        assert_eq!(score_for(0), 100);
        assert_eq!(score_for(10), 0);
        assert_eq!(score_for(25), 0);
    }

    #[test]
    fn target_text_counts_case_insensitively() {
        let goal = Goal::TargetText {
            text: "vim".into(),
            count: Some(3),
        };
        let lesson = Lesson::new(4, ["x"], goal);
        let f = Fixture::new(&["Vim here", "and vim", "VIMvim"]);
        assert!(goal_met(&lesson, &f.view()));
        let f = Fixture::new(&["vi m", "vim"]);
        assert!(!goal_met(&lesson, &f.view()));
    }

    #[test]
    fn target_text_spans_joined_lines_and_rejects_empty() {
        let lesson = Lesson::new(
            4,
            ["x"],
            Goal::TargetText {
                text: "a b".into(),
                count: None,
            },
        );
        assert!(goal_met(&lesson, &Fixture::new(&["xa", "by"]).view()));
        let empty = Lesson::new(
            4,
            ["x"],
            Goal::TargetText {
                text: String::new(),
                count: None,
            },
        );
        assert!(!goal_met(&empty, &Fixture::new(&["anything"]).view()));
    }

    #[test]
    fn target_state_ignores_blank_lines_and_trailing_space() {
        let lesson = Lesson::new(
            5,
            ["x"],
            Goal::TargetState {
                lines: vec!["keep this".into(), "".into(), "and this  ".into()],
            },
        );
        assert!(goal_met(
            &lesson,
            &Fixture::new(&["", "keep this  ", "and this"]).view()
        ));
        assert!(!goal_met(
            &lesson,
            &Fixture::new(&["and this", "keep this"]).view()
        ));
    }

    #[test]
    fn builtin_targets_with_spacer_lines_are_reachable() {
        let catalog = crate::Catalog::builtin().unwrap();
        for id in [16, 17] {
            let lesson = catalog.get(id).unwrap();
            let Goal::TargetState { lines } = &lesson.goal else {
                panic!("lesson {id} has a target_state goal");
            };
            let text: Vec<&str> = lines.iter().map(String::as_str).collect();
            assert!(goal_met(lesson, &Fixture::new(&text).view()), "lesson {id}");
        }
    }

    #[test]
    fn undo_goal_needs_both_conditions() {
        let lesson = Lesson::new(8, ["a", "b"], Goal::UndoRequired);
        let mut f = Fixture::new(&["a", "b"]);
        assert!(!goal_met(&lesson, &f.view()));
        f.undo_performed = true;
        assert!(goal_met(&lesson, &f.view()));
        f.buffer = TextBuffer::from_lines(["b"]);
        assert!(!goal_met(&lesson, &f.view()));
    }

    #[test]
    fn duplicate_and_changed_goals() {
        let dup = Lesson::new(9, ["a", "", ""], Goal::DuplicateLine);
        assert!(!goal_met(&dup, &Fixture::new(&["a", "", ""]).view()));
        assert!(goal_met(&dup, &Fixture::new(&["a", "", "a"]).view()));

        let changed = Lesson::new(11, ["a"], Goal::ChangedFromInitial);
        assert!(!goal_met(&changed, &Fixture::new(&["a"]).view()));
        assert!(goal_met(&changed, &Fixture::new(&["b"]).view()));
    }

    #[test]
    fn required_marks_goal() {
        let lesson = Lesson::new(
            12,
            ["x"],
            Goal::RequiredMarks {
                marks: vec!['a', 'b'],
            },
        );
        let mut f = Fixture::new(&["x"]);
        f.marks.set('a', Position::origin());
        assert!(!goal_met(&lesson, &f.view()));
        f.marks.set('b', Position::origin());
        assert!(goal_met(&lesson, &f.view()));
    }
}
