//! Input injection seam and keyboard sequence handling.
//!
//! Event delivery is platform plumbing behind [`InputDriver`]. This module
//! owns the key vocabulary (`<Ctrl>`, `<F5>`, ...) and the press/hold/release
//! policy used when typing chords.

use crate::search::Point;
use crate::util::ScreenMatchResult;
use std::thread;
use std::time::Duration;

/// How long chord modifiers are held before release.
pub const DEFAULT_KEY_HOLD: Duration = Duration::from_millis(400);

/// Named keys that can appear as `<Name>` in a key sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpecialKey {
    Ctrl,
    Shift,
    Alt,
    Meta,
    Tab,
    Super,
    Fn,
    PgUp,
    PgDn,
    Delete,
    Home,
    Esc,
    F(u8),
    Enter,
}

impl SpecialKey {
    /// Parses a bracketed name such as `<Ctrl>` or `<F11>`.
    pub fn from_name(name: &str) -> Option<Self> {
        let inner = name.strip_prefix('<')?.strip_suffix('>')?;
        let key = match inner {
            "Ctrl" => Self::Ctrl,
            "Shift" => Self::Shift,
            "Alt" => Self::Alt,
            "Meta" => Self::Meta,
            "Tab" => Self::Tab,
            "Super" => Self::Super,
            "Fn" => Self::Fn,
            "PgUp" => Self::PgUp,
            "PgDn" => Self::PgDn,
            "Delete" => Self::Delete,
            "Home" => Self::Home,
            "Esc" => Self::Esc,
            "Enter" => Self::Enter,
            other => {
                let n: u8 = other.strip_prefix('F')?.parse().ok()?;
                if !(1..=12).contains(&n) {
                    return None;
                }
                Self::F(n)
            }
        };
        Some(key)
    }

    /// X11 keycode on a standard pc105 layout.
    pub fn keycode(self) -> u32 {
        match self {
            Self::Ctrl => 37,
            Self::Shift => 50,
            Self::Alt => 64,
            Self::Meta | Self::Super => 133,
            Self::Tab => 23,
            Self::Fn => 151,
            Self::PgUp => 112,
            Self::PgDn => 117,
            Self::Delete => 119,
            Self::Home => 110,
            Self::Esc => 9,
            Self::Enter => 36,
            Self::F(n @ 1..=10) => 66 + n as u32,
            Self::F(11) => 95,
            Self::F(_) => 96,
        }
    }
}

/// One element of a key sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyToken {
    Text(String),
    Key(SpecialKey),
}

/// Splits `"<Ctrl><Shift>t"` into special keys and literal text.
///
/// Bracketed names that are not known keys stay literal.
pub fn parse_key_sequence(input: &str) -> Vec<KeyToken> {
    let mut tokens = Vec::new();
    let mut text = String::new();
    let mut rest = input;

    while !rest.is_empty() {
        if rest.starts_with('<') {
            if let Some(end) = rest.find('>') {
                if let Some(key) = SpecialKey::from_name(&rest[..=end]) {
                    if !text.is_empty() {
                        tokens.push(KeyToken::Text(std::mem::take(&mut text)));
                    }
                    tokens.push(KeyToken::Key(key));
                    rest = &rest[end + 1..];
                    continue;
                }
            }
        }
        let mut chars = rest.chars();
        if let Some(ch) = chars.next() {
            text.push(ch);
        }
        rest = chars.as_str();
    }

    if !text.is_empty() {
        tokens.push(KeyToken::Text(text));
    }
    tokens
}

/// Platform backend that injects pointer and keyboard events.
pub trait InputDriver {
    fn click(&mut self, at: Point) -> ScreenMatchResult<()>;
    fn right_click(&mut self, at: Point) -> ScreenMatchResult<()>;
    fn double_click(&mut self, at: Point) -> ScreenMatchResult<()>;
    /// Moves the pointer without pressing a button.
    fn hover(&mut self, at: Point) -> ScreenMatchResult<()>;
    fn type_char(&mut self, ch: char) -> ScreenMatchResult<()>;
    fn press_key(&mut self, key: SpecialKey) -> ScreenMatchResult<()>;
    fn release_key(&mut self, key: SpecialKey) -> ScreenMatchResult<()>;
}

/// Types a key sequence.
///
/// Text is typed character by character. Special keys are pressed as they
/// appear and stay down; once the whole sequence is sent they are held for
/// `hold` and released in reverse order. A sequence without special keys
/// never sleeps. If sending fails, every key already pressed is still released
/// and the first error is returned.
pub fn type_text<D: InputDriver + ?Sized>(
    driver: &mut D,
    tokens: &[KeyToken],
    hold: Duration,
) -> ScreenMatchResult<()> {
    let mut held = Vec::new();
    let sent = send_tokens(driver, tokens, &mut held);
    if sent.is_ok() && !held.is_empty() {
        thread::sleep(hold);
    }

    let mut released = Ok(());
    for key in held.into_iter().rev() {
        if let Err(err) = driver.release_key(key) {
            released = released.and(Err(err));
        }
    }
    sent.and(released)
}

fn send_tokens<D: InputDriver + ?Sized>(
    driver: &mut D,
    tokens: &[KeyToken],
    held: &mut Vec<SpecialKey>,
) -> ScreenMatchResult<()> {
    for token in tokens {
        match token {
            KeyToken::Text(text) => {
                for ch in text.chars() {
                    driver.type_char(ch)?;
                }
            }
            KeyToken::Key(key) => {
                driver.press_key(*key)?;
                held.push(*key);
            }
        }
    }
    Ok(())
}
