//! Key script replay against a single lesson.

use anyhow::{Context, Result};
use core_actions::{Editor, StateSnapshot};
use core_events::parse_keys;
use core_lesson::{CompletionRecord, Lesson};
use serde::Serialize;
use tracing::debug;

/// Final outcome of one replayed attempt.
#[derive(Debug, Serialize)]
pub struct PlayReport {
    pub lesson_id: u32,
    pub keys: usize,
    /// Number of keys fed when the goal was first met.
    pub completed_after: Option<usize>,
    pub completion: Option<CompletionRecord>,
    pub state: StateSnapshot,
}

/// Feed `script` into a fresh editor for `lesson`, checking completion after
/// every key the way an interactive host would.
pub fn play(lesson: &Lesson, history_depth: usize, script: &str) -> Result<PlayReport> {
    let keys = parse_keys(script).with_context(|| format!("parsing key script {script:?}"))?;
    let mut editor = Editor::for_lesson(lesson, history_depth);
    let mut completed_after = None;
    for (i, key) in keys.iter().enumerate() {
        editor.dispatch(*key);
        if let Some(record) = editor.evaluate_completion(lesson) {
            debug!(target: "runtime.replay", lesson = lesson.id, key_index = i, score = record.score, "lesson_completed");
            completed_after = Some(i + 1);
        }
    }
    Ok(PlayReport {
        lesson_id: lesson.id,
        keys: keys.len(),
        completed_after,
        completion: editor.completion().cloned(),
        state: editor.state(),
    })
}
