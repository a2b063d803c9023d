//! KeyTranslator: stateful key -> command translation for Normal and Visual.
//!
//! The translator owns the compiled keymap; the pending state lives in
//! [`EditorState::pending`](core_state::EditorState) so it shows up in state
//! snapshots.
//!
//! State machine:
//! * Idle: the key is resolved on its own.
//! * Prefix(keys): keys are a strict prefix of a multi-key command (`d`, `y`,
//!   `c`, `g`). The next key extends the prefix. `NoMatch` discards the prefix
//!   and resolves the new key alone (so `d` then `j` moves down).
//! * ReplaceChar / SetMark / JumpMark: awaiting exactly one character. Escape
//!   or a non-qualifying key cancels silently.
//! * `<Esc>` with a prefix buffered cancels the prefix; otherwise it is
//!   reported as [`Translation::Escape`] for the dispatcher to handle.

use core_events::{KeyCode, KeyEvent};
use core_keymap::{CommandToken, Keymap, Resolution};
use core_state::{Marks, Mode, Pending};
use tracing::trace;

/// Outcome of feeding one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Translation {
    /// Fully resolved command.
    Command(CommandToken),
    /// `r`, `m` or `'` completed by its character argument.
    WithArg(CommandToken, char),
    /// Bare Escape with nothing pending.
    Escape,
    /// Key buffered; more input needed.
    Pending,
    /// Pending input discarded.
    Cancelled,
    /// Key has no meaning in this mode.
    Ignored,
}

#[derive(Debug, Default)]
pub struct KeyTranslator {
    keymap: Keymap,
}

impl KeyTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Translate `key` in `mode` (Normal, Visual or VisualLine), updating
    /// `pending` in place.
    pub fn translate(&self, mode: Mode, pending: &mut Pending, key: &KeyEvent) -> Translation {
        if let Some(token) = awaiting_arg(pending) {
            *pending = Pending::None;
            let accepted = key.printable().filter(|c| {
                token == CommandToken::ReplaceChar || Marks::is_valid_name(*c)
            });
            return match accepted {
                Some(ch) => Translation::WithArg(token, ch),
                None => {
                    trace!(target: "actions.dispatch", token = %token, key = %key, "argument_cancelled");
                    Translation::Cancelled
                }
            };
        }

        if key.code == KeyCode::Esc && key.mods.is_empty() {
            if let Pending::Prefix(prefix) = pending {
                trace!(target: "actions.dispatch", prefix = %prefix, "prefix_cancelled");
                *pending = Pending::None;
                return Translation::Cancelled;
            }
            return Translation::Escape;
        }

        let trie = if mode.is_visual() {
            &self.keymap.visual
        } else {
            &self.keymap.normal
        };
        let mut keys: Vec<KeyEvent> = match pending {
            Pending::Prefix(p) => p.chars().map(KeyEvent::char).collect(),
            _ => Vec::new(),
        };
        let had_prefix = !keys.is_empty();
        keys.push(*key);

        match trie.resolve(&keys) {
            Resolution::Matched(output) => {
                *pending = Pending::None;
                Translation::Command(output)
            }
            Resolution::NeedMore => {
                *pending = Pending::Prefix(keys.iter().filter_map(KeyEvent::printable).collect());
                Translation::Pending
            }
            Resolution::NoMatch if had_prefix => {
                trace!(target: "actions.dispatch", key = %key, "prefix_discarded");
                *pending = Pending::None;
                self.translate(mode, pending, key)
            }
            Resolution::NoMatch => Translation::Ignored,
        }
    }
}

fn awaiting_arg(pending: &Pending) -> Option<CommandToken> {
    match pending {
        Pending::ReplaceChar => Some(CommandToken::ReplaceChar),
        Pending::SetMark => Some(CommandToken::SetMark),
        Pending::JumpMark => Some(CommandToken::JumpMark),
        Pending::None | Pending::Prefix(_) => None,
    }
}
