//! Core input event types for vimdojo.
//!
//! A host translates whatever its platform delivers into [`KeyEvent`]s and
//! feeds them to the editor one at a time. For scripted input (tests, the CLI
//! replay command) [`parse_keys`] accepts a compact notation: plain characters
//! stand for themselves and named keys are written in angle brackets, e.g.
//! `dd<Esc>`, `<C-r>`, `ihello<CR>`. A literal `<` is written `<lt>`.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyEvent {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    /// Unmodified key.
    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::empty())
    }

    pub fn char(c: char) -> Self {
        Self::plain(KeyCode::Char(c))
    }

    pub fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CTRL)
    }

    /// The printable character carried by this event, if it is one with no
    /// Ctrl/Alt held (Shift is already folded into the char).
    pub fn printable(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c) if !self.mods.intersects(KeyModifiers::CTRL | KeyModifiers::ALT) => {
                Some(c)
            }
            _ => None,
        }
    }
}

/// Normalized logical keys consumed by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Tab,
    Up,
    Down,
    Left,
    Right,
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const CTRL = 0b0000_0001;
        const ALT  = 0b0000_0010;
        const SHIFT= 0b0000_0100;
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.code {
            KeyCode::Char('<') if self.mods.is_empty() => return f.write_str("<lt>"),
            KeyCode::Char(c) if self.mods.is_empty() => return write!(f, "{c}"),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Enter => "CR".to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Backspace => "BS".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
            KeyCode::Left => "Left".to_string(),
            KeyCode::Right => "Right".to_string(),
        };
        f.write_str("<")?;
        if self.mods.contains(KeyModifiers::CTRL) {
            f.write_str("C-")?;
        }
        if self.mods.contains(KeyModifiers::ALT) {
            f.write_str("A-")?;
        }
        if self.mods.contains(KeyModifiers::SHIFT) {
            f.write_str("S-")?;
        }
        write!(f, "{name}>")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyParseError {
    #[error("unterminated key name starting at offset {0}")]
    Unterminated(usize),
    #[error("unknown key name <{0}>")]
    UnknownKey(String),
}

/// Parse a key script into events.
pub fn parse_keys(script: &str) -> Result<Vec<KeyEvent>, KeyParseError> {
    let mut out = Vec::new();
    let mut rest = script;
    let mut offset = 0usize;
    while let Some(c) = rest.chars().next() {
        if c != '<' {
            out.push(KeyEvent::char(c));
            offset += c.len_utf8();
            rest = &rest[c.len_utf8()..];
            continue;
        }
        let Some(close) = rest.find('>') else {
            return Err(KeyParseError::Unterminated(offset));
        };
        out.push(parse_named(&rest[1..close])?);
        offset += close + 1;
        rest = &rest[close + 1..];
    }
    Ok(out)
}

fn parse_named(body: &str) -> Result<KeyEvent, KeyParseError> {
    let unknown = || KeyParseError::UnknownKey(body.to_string());
    let mut mods = KeyModifiers::empty();
    let mut name = body;
    loop {
        let lower = name.get(..2).map(str::to_ascii_lowercase);
        match lower.as_deref() {
            Some("c-") => mods |= KeyModifiers::CTRL,
            Some("a-") | Some("m-") => mods |= KeyModifiers::ALT,
            Some("s-") => mods |= KeyModifiers::SHIFT,
            _ => break,
        }
        name = &name[2..];
    }
    let code = match name.to_ascii_lowercase().as_str() {
        "esc" => KeyCode::Esc,
        "cr" | "enter" | "return" => KeyCode::Enter,
        "bs" | "backspace" => KeyCode::Backspace,
        "tab" => KeyCode::Tab,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "lt" => KeyCode::Char('<'),
        "space" => KeyCode::Char(' '),
        _ => {
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if !mods.is_empty() => KeyCode::Char(c),
                _ => return Err(unknown()),
            }
        }
    };
    Ok(KeyEvent::new(code, mods))
}
