//! Platform-neutral input events.

use keybook_core::{Key, Modifiers};

/// Input delivered by a [`Driver`](crate::Driver).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Key went down.
    Press {
        /// Key pressed.
        key: Key,
        /// Modifiers held at press time.
        modifiers: Modifiers,
    },

    /// Key went up. Modifiers do not matter for release.
    Release {
        /// Key released.
        key: Key,
    },

    /// The host lost input focus; no further releases will arrive for keys
    /// that are currently down.
    FocusLost,

    /// Periodic wake-up with no input.
    Tick,

    /// The host is closing.
    Quit,
}

impl InputEvent {
    /// Press with no modifiers.
    pub fn press(key: impl Into<Key>) -> Self {
        Self::Press { key: key.into(), modifiers: Modifiers::NONE }
    }

    /// Release of `key`.
    pub fn release(key: impl Into<Key>) -> Self {
        Self::Release { key: key.into() }
    }
}
