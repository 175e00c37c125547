//! Key identity.
//!
//! A [`KeyState`] is the normalized identity of a key press: the key name plus
//! the control/alt/shift flags. Equality, hashing and the canonical string
//! form are all derived from those four fields, so two key states compare
//! equal exactly when their canonical strings match.
//!
//! # Canonical form
//!
//! ```text
//! ctrl+alt+shift+<key>
//! ```
//!
//! Modifiers always appear in that order. The space key renders as `Space`.

use std::{fmt, str::FromStr};

use crate::error::KeyError;

/// Name used for the space bar.
pub const SPACE: &str = "Space";

/// A validated key name.
///
/// Either a single character (`'p'`, `'+'`, `'é'`) or a named key (`Enter`,
/// `Up`, `F5`). A space character is stored as [`SPACE`]. Names never
/// contain `+` unless the whole name is `+`, which keeps the canonical
/// string of a [`KeyState`] unambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(String);

impl Key {
    /// Validate and normalize a key name.
    ///
    /// # Errors
    ///
    /// - `KeyError::Empty` if `name` is empty
    /// - `KeyError::Separator` if `name` contains `+` and is not exactly `+`
    pub fn new(name: &str) -> Result<Self, KeyError> {
        if name.is_empty() {
            return Err(KeyError::Empty);
        }
        if name == " " {
            return Ok(Self(SPACE.to_string()));
        }
        if name != "+" && name.contains('+') {
            return Err(KeyError::Separator { name: name.to_string() });
        }
        Ok(Self(name.to_string()))
    }

    /// Key name as stored (space is `Space`).
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The character this key types, if it is a single-character key.
    ///
    /// `Space` maps back to `' '`; other named keys return `None`.
    pub fn as_char(&self) -> Option<char> {
        if self.0 == SPACE {
            return Some(' ');
        }
        let mut chars = self.0.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }
}

impl From<char> for Key {
    fn from(c: char) -> Self {
        if c == ' ' { Self(SPACE.to_string()) } else { Self(c.to_string()) }
    }
}

impl FromStr for Key {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Non-character keys with a fixed name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    /// Enter/Return.
    Enter,
    /// Escape.
    Escape,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Home.
    Home,
    /// End.
    End,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Tab.
    Tab,
    /// Backspace.
    Backspace,
    /// Delete.
    Delete,
    /// Insert.
    Insert,
    /// Function key `F1`..`F24`.
    F(u8),
}

impl fmt::Display for NamedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Enter => "Enter",
            Self::Escape => "Escape",
            Self::Up => "Up",
            Self::Down => "Down",
            Self::Left => "Left",
            Self::Right => "Right",
            Self::Home => "Home",
            Self::End => "End",
            Self::PageUp => "PageUp",
            Self::PageDown => "PageDown",
            Self::Tab => "Tab",
            Self::Backspace => "Backspace",
            Self::Delete => "Delete",
            Self::Insert => "Insert",
            Self::F(n) => return write!(f, "F{n}"),
        };
        f.write_str(name)
    }
}

impl From<NamedKey> for Key {
    fn from(named: NamedKey) -> Self {
        Self(named.to_string())
    }
}

/// Modifier flags held alongside a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    /// Control key.
    pub control: bool,
    /// Alt/Option key.
    pub alt: bool,
    /// Shift key.
    pub shift: bool,
}

impl Modifiers {
    /// No modifiers.
    pub const NONE: Self = Self { control: false, alt: false, shift: false };
    /// Control only.
    pub const CONTROL: Self = Self { control: true, alt: false, shift: false };
    /// Alt only.
    pub const ALT: Self = Self { control: false, alt: true, shift: false };
    /// Shift only.
    pub const SHIFT: Self = Self { control: false, alt: false, shift: true };

    /// Create modifiers from individual flags.
    pub const fn new(control: bool, alt: bool, shift: bool) -> Self {
        Self { control, alt, shift }
    }

    /// True if no modifier is set.
    pub const fn is_empty(self) -> bool {
        !self.control && !self.alt && !self.shift
    }
}

/// Normalized identity of a key press: key name plus modifiers.
///
/// Immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyState {
    key: Key,
    modifiers: Modifiers,
}

impl KeyState {
    /// Create a key state from a key and its modifiers.
    pub fn new(key: impl Into<Key>, modifiers: Modifiers) -> Self {
        Self { key: key.into(), modifiers }
    }

    /// Unmodified key.
    pub fn plain(key: impl Into<Key>) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    /// The key, without modifiers.
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Modifier flags.
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Control flag.
    pub fn control(&self) -> bool {
        self.modifiers.control
    }

    /// Alt flag.
    pub fn alt(&self) -> bool {
        self.modifiers.alt
    }

    /// Shift flag.
    pub fn shift(&self) -> bool {
        self.modifiers.shift
    }

    /// Canonical string form, e.g. `ctrl+alt+p`.
    pub fn canonical(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for KeyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.control {
            f.write_str("ctrl+")?;
        }
        if self.modifiers.alt {
            f.write_str("alt+")?;
        }
        if self.modifiers.shift {
            f.write_str("shift+")?;
        }
        f.write_str(self.key.as_str())
    }
}

/// Parses strings like `ctrl+q`, `Shift+Alt+F5` or `+`.
///
/// Modifier tokens are case-insensitive and may come in any order; the last
/// token is the key.
impl FromStr for KeyState {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // A trailing "+" token is the plus key itself ("ctrl++").
        let (prefix, key) = match s.strip_suffix("++") {
            Some(prefix) => (Some(prefix), "+"),
            None if s == "+" => (None, "+"),
            None => match s.rsplit_once('+') {
                Some((prefix, key)) => (Some(prefix), key),
                None => (None, s),
            },
        };

        let mut modifiers = Modifiers::NONE;
        for token in prefix.into_iter().flat_map(|p| p.split('+')) {
            let flag = match token.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => &mut modifiers.control,
                "alt" => &mut modifiers.alt,
                "shift" => &mut modifiers.shift,
                _ => return Err(KeyError::UnknownModifier { token: token.to_string() }),
            };
            if *flag {
                return Err(KeyError::DuplicateModifier { token: token.to_string() });
            }
            *flag = true;
        }

        Ok(Self { key: Key::new(key)?, modifiers })
    }
}
