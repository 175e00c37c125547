//! Observable state snapshots for invariant checking.
//!
//! Snapshots copy out what the book and keyboard expose so invariants run
//! against a consistent view.

use keybook_core::Timestamp;
use keybook_input::Keyboard;
use keybook_menu::Book;

/// Snapshot of the book and, optionally, the keyboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemSnapshot {
    /// Pages, bottom first.
    pub pages: Vec<PageSnapshot>,
    /// Incremental search buffer.
    pub search_buffer: String,
    /// Held key states in canonical form, sorted.
    pub held: Vec<String>,
    /// Armed repeat timers.
    pub timers: Vec<TimerSnapshot>,
}

/// Snapshot of one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSnapshot {
    /// Resolved title.
    pub title: String,
    /// Focused line. `None` for the title.
    pub focus: Option<usize>,
    /// Number of lines.
    pub len: usize,
}

/// Snapshot of one armed repeat timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerSnapshot {
    /// Trigger of the owning hotkey, canonical form.
    pub trigger: String,
    /// Whether the trigger is currently held.
    pub held: bool,
}

impl SystemSnapshot {
    /// Snapshot with no pages, keys or timers.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Capture the book.
    pub fn from_book<I>(book: &Book<I>) -> Self {
        let pages = book
            .pages()
            .iter()
            .map(|page| PageSnapshot { title: page.title(), focus: page.focus(), len: page.len() })
            .collect();
        Self { pages, search_buffer: book.search_buffer().to_string(), ..Self::default() }
    }

    /// Add the keyboard's held keys and timers.
    #[must_use]
    pub fn with_keyboard<C, I: Timestamp>(mut self, keyboard: &Keyboard<C, I>) -> Self {
        self.held = keyboard.held_keys().map(|state| state.canonical()).collect();
        self.held.sort();
        self.timers = keyboard
            .hotkeys()
            .filter(|hotkey| hotkey.timer().is_some())
            .map(|hotkey| TimerSnapshot {
                trigger: hotkey.trigger().canonical(),
                held: keyboard.is_held(hotkey.trigger()),
            })
            .collect();
        self
    }
}
