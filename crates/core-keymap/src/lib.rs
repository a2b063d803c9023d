//! core-keymap: key-sequence resolution for vimdojo.
//!
//! - Pure and deterministic: resolution depends only on the pending keys.
//! - One compiled trie per mode (Normal, Visual). Multi-key commands such as
//!   `dd`, `gg` and `cw` are paths of length two.
//! - No side effects: logging only at TRACE for traversal steps.

use core_events::{KeyCode, KeyEvent, KeyModifiers};
use smallvec::SmallVec;
use tracing::trace;

mod token;

pub use token::{CommandParseError, CommandToken};

// -------------------------------------------------------------------------------------------------
// Key Pattern
// -------------------------------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyPattern {
    /// Printable character with no Ctrl/Alt held.
    Char(char),
    /// Ctrl + character.
    Ctrl(char),
    /// A non-printable key, unmodified.
    Key(KeyCode),
}

impl KeyPattern {
    pub fn matches(&self, key: &KeyEvent) -> bool {
        match *self {
            KeyPattern::Char(c) => key.printable() == Some(c),
            KeyPattern::Ctrl(c) => {
                key.code == KeyCode::Char(c) && key.mods.contains(KeyModifiers::CTRL)
            }
            KeyPattern::Key(code) => key.code == code && key.mods.is_empty(),
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Mapping Specification
// -------------------------------------------------------------------------------------------------
#[derive(Debug, Clone)]
pub struct MappingSpec {
    pub sequence: Vec<KeyPattern>,
    pub output: CommandToken,
}

impl MappingSpec {
    /// Spec whose sequence is the given printable characters.
    pub fn chars(seq: &str, output: CommandToken) -> Self {
        Self {
            sequence: seq.chars().map(KeyPattern::Char).collect(),
            output,
        }
    }

    pub fn key(pat: KeyPattern, output: CommandToken) -> Self {
        Self {
            sequence: vec![pat],
            output,
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Trie Representation
// -------------------------------------------------------------------------------------------------
#[derive(Debug, Clone)]
struct Edge {
    pat: KeyPattern,
    next: usize,
}

#[derive(Debug, Clone)]
struct Node {
    terminal: Option<usize>, // index into mappings vec
    edges: SmallVec<[Edge; 4]>,
}

impl Node {
    fn new() -> Self {
        Self {
            terminal: None,
            edges: SmallVec::new(),
        }
    }
}

#[derive(Debug)]
pub struct MappingTrie {
    nodes: Vec<Node>,
    mappings: Vec<MappingSpec>,
}

impl MappingTrie {
    pub fn build(specs: Vec<MappingSpec>) -> Self {
        let mut trie = MappingTrie {
            nodes: vec![Node::new()],
            mappings: specs,
        };
        for (idx, m) in trie.mappings.iter().enumerate() {
            let mut cur = 0usize;
            for pat in &m.sequence {
                let next = if let Some(e) = trie.nodes[cur].edges.iter().find(|e| e.pat == *pat) {
                    e.next
                } else {
                    let new_idx = trie.nodes.len();
                    trie.nodes.push(Node::new());
                    trie.nodes[cur].edges.push(Edge {
                        pat: *pat,
                        next: new_idx,
                    });
                    new_idx
                };
                cur = next;
            }
            if trie.nodes[cur].terminal.is_some() {
                // Later mapping overrides earlier.
                trace!(
                    target: "keymap",
                    mapping_index = idx,
                    node = cur,
                    "terminal_override"
                );
            }
            trie.nodes[cur].terminal = Some(idx);
        }
        trie
    }

    /// Resolve the pending key buffer against the trie (longest match wins).
    pub fn resolve(&self, buffer: &[KeyEvent]) -> Resolution {
        let mut node_idx = 0usize;
        let mut last_terminal: Option<usize> = None; // mapping index
        let mut walked = 0usize;
        for (i, key) in buffer.iter().enumerate() {
            let Some(edge) = self.nodes[node_idx].edges.iter().find(|e| e.pat.matches(key)) else {
                break;
            };
            node_idx = edge.next;
            walked = i + 1;
            trace!(target: "keymap", step = i, key = %key, node = node_idx, "advance");
            if let Some(mi) = self.nodes[node_idx].terminal {
                last_terminal = Some(mi);
            }
        }
        if let Some(mi) = last_terminal {
            Resolution::Matched(self.mappings[mi].output)
        } else if walked == buffer.len() && !buffer.is_empty() {
            // Every key advanced but no terminal yet: a strict prefix.
            Resolution::NeedMore
        } else {
            Resolution::NoMatch
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Resolution Result
// -------------------------------------------------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Matched(CommandToken),
    /// Strict prefix of one or more mappings.
    NeedMore,
    NoMatch,
}

// -------------------------------------------------------------------------------------------------
// Mode Keymaps
// -------------------------------------------------------------------------------------------------
fn motion_specs() -> Vec<MappingSpec> {
    use CommandToken as T;
    use KeyPattern as K;
    vec![
        MappingSpec::chars("h", T::Left),
        MappingSpec::chars("j", T::Down),
        MappingSpec::chars("k", T::Up),
        MappingSpec::chars("l", T::Right),
        MappingSpec::key(K::Key(KeyCode::Left), T::Left),
        MappingSpec::key(K::Key(KeyCode::Down), T::Down),
        MappingSpec::key(K::Key(KeyCode::Up), T::Up),
        MappingSpec::key(K::Key(KeyCode::Right), T::Right),
        MappingSpec::chars("w", T::WordForward),
        MappingSpec::chars("b", T::WordBackward),
        MappingSpec::chars("e", T::WordEnd),
        MappingSpec::chars("0", T::LineStart),
        MappingSpec::chars("$", T::LineEnd),
        MappingSpec::chars("^", T::FirstNonBlank),
        MappingSpec::chars("gg", T::BufferStart),
        MappingSpec::chars("G", T::BufferEnd),
        MappingSpec::chars("{", T::ParagraphBackward),
        MappingSpec::chars("}", T::ParagraphForward),
    ]
}

/// Normal mode mappings.
pub fn normal_specs() -> Vec<MappingSpec> {
    use CommandToken as T;
    let mut v = motion_specs();
    v.extend([
        MappingSpec::chars("i", T::Insert),
        MappingSpec::chars("a", T::Append),
        MappingSpec::chars("o", T::OpenBelow),
        MappingSpec::chars("O", T::OpenAbove),
        MappingSpec::chars("A", T::AppendLineEnd),
        MappingSpec::chars("I", T::InsertLineStart),
        MappingSpec::chars("v", T::VisualChar),
        MappingSpec::chars("V", T::VisualLine),
        MappingSpec::chars("/", T::SearchForward),
        MappingSpec::chars("?", T::SearchBackward),
        MappingSpec::chars("n", T::SearchNext),
        MappingSpec::chars("N", T::SearchPrev),
        MappingSpec::chars("u", T::Undo),
        MappingSpec::key(KeyPattern::Ctrl('r'), T::Redo),
        MappingSpec::chars("x", T::DeleteChar),
        MappingSpec::chars("dd", T::DeleteLine),
        MappingSpec::chars("dw", T::DeleteWord),
        MappingSpec::chars("d$", T::DeleteToLineEnd),
        MappingSpec::chars("yy", T::YankLine),
        MappingSpec::chars("yw", T::YankWord),
        MappingSpec::chars("cw", T::ChangeWord),
        MappingSpec::chars("p", T::PasteAfter),
        MappingSpec::chars("P", T::PasteBefore),
        MappingSpec::chars("r", T::ReplaceChar),
        MappingSpec::chars("R", T::ReplaceMode),
        MappingSpec::chars("m", T::SetMark),
        MappingSpec::chars("'", T::JumpMark),
    ]);
    v
}

/// Visual and VisualLine mode mappings.
pub fn visual_specs() -> Vec<MappingSpec> {
    use CommandToken as T;
    let mut v = motion_specs();
    v.extend([
        MappingSpec::chars("d", T::VisualDelete),
        MappingSpec::chars("y", T::VisualYank),
        MappingSpec::chars("v", T::VisualChar),
        MappingSpec::chars("V", T::VisualLine),
    ]);
    v
}

/// Compiled tries for every mode that resolves commands through key sequences.
#[derive(Debug)]
pub struct Keymap {
    pub normal: MappingTrie,
    pub visual: MappingTrie,
}

impl Default for Keymap {
    fn default() -> Self {
        Self {
            normal: MappingTrie::build(normal_specs()),
            visual: MappingTrie::build(visual_specs()),
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn keys(s: &str) -> Vec<KeyEvent> {
        s.chars().map(KeyEvent::char).collect()
    }

    #[test]
    fn single_key_match() {
        let km = Keymap::default();
        assert_eq!(
            km.normal.resolve(&keys("w")),
            Resolution::Matched(CommandToken::WordForward)
        );
    }

    #[test]
    fn operator_prefix_needs_more() {
        let km = Keymap::default();
        assert_eq!(km.normal.resolve(&keys("d")), Resolution::NeedMore);
        assert_eq!(km.normal.resolve(&keys("g")), Resolution::NeedMore);
        assert_eq!(km.normal.resolve(&keys("c")), Resolution::NeedMore);
    }

    #[test]
    fn multi_key_commands() {
        let km = Keymap::default();
        assert_eq!(
            km.normal.resolve(&keys("dd")),
            Resolution::Matched(CommandToken::DeleteLine)
        );
        assert_eq!(
            km.normal.resolve(&keys("d$")),
            Resolution::Matched(CommandToken::DeleteToLineEnd)
        );
        assert_eq!(
            km.normal.resolve(&keys("gg")),
            Resolution::Matched(CommandToken::BufferStart)
        );
        assert_eq!(
            km.normal.resolve(&keys("cw")),
            Resolution::Matched(CommandToken::ChangeWord)
        );
    }

    #[test]
    fn unrecognized_follow_up_is_no_match() {
        let km = Keymap::default();
        assert_eq!(km.normal.resolve(&keys("dj")), Resolution::NoMatch);
        assert_eq!(km.normal.resolve(&keys("z")), Resolution::NoMatch);
        assert_eq!(km.normal.resolve(&[]), Resolution::NoMatch);
    }

    #[test]
    fn ctrl_and_arrow_patterns() {
        let km = Keymap::default();
        assert_eq!(
            km.normal.resolve(&[KeyEvent::ctrl('r')]),
            Resolution::Matched(CommandToken::Redo)
        );
        // Plain `r` is replace, not redo.
        assert_eq!(
            km.normal.resolve(&keys("r")),
            Resolution::Matched(CommandToken::ReplaceChar)
        );
        assert_eq!(
            km.visual.resolve(&[KeyEvent::plain(KeyCode::Down)]),
            Resolution::Matched(CommandToken::Down)
        );
    }

    #[test]
    fn visual_operators_are_single_keys() {
        let km = Keymap::default();
        assert_eq!(
            km.visual.resolve(&keys("d")),
            Resolution::Matched(CommandToken::VisualDelete)
        );
        assert_eq!(
            km.visual.resolve(&keys("y")),
            Resolution::Matched(CommandToken::VisualYank)
        );
        assert_eq!(km.visual.resolve(&keys("x")), Resolution::NoMatch);
    }
}
