//! Terminal driver for the TUI.
//!
//! Implements the [`Driver`] trait for terminal I/O using crossterm for
//! keyboard events and ratatui for rendering. There is no audio backend:
//! sounds show up in the status bar.

use std::{
    collections::VecDeque,
    io::{self, Stdout, stdout},
    time::{Duration, Instant},
};

use crossterm::{
    ExecutableCommand,
    event::{
        DisableFocusChange, EnableFocusChange, Event, EventStream, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
        supports_keyboard_enhancement,
    },
};
use futures::StreamExt;
use keybook_app::{Announcer, Driver, InputEvent, SoundPlayer};
use keybook_core::{Key, Modifiers, NamedKey};
use keybook_menu::{Book, SoundId};
use ratatui::{Terminal, backend::CrosstermBackend};
use thiserror::Error;

use crate::ui::{self, Status};

/// Wake-up interval when no repeat timer is pending.
const IDLE_TICK: Duration = Duration::from_millis(250);

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Converts crossterm events to [`InputEvent`]s.
///
/// Terminals without the kitty keyboard protocol never report key releases.
/// In that mode every press is followed by a synthesized release, so hotkeys
/// fire once per press (the terminal's own auto-repeat still sends presses).
#[derive(Debug, Default)]
pub struct InputTranslator {
    reports_releases: bool,
    pending: VecDeque<InputEvent>,
}

impl InputTranslator {
    /// Create a translator. `reports_releases` is true when the terminal
    /// sends key release events.
    pub fn new(reports_releases: bool) -> Self {
        Self { reports_releases, pending: VecDeque::new() }
    }

    /// Synthesized event waiting to be delivered.
    pub fn pop_pending(&mut self) -> Option<InputEvent> {
        self.pending.pop_front()
    }

    /// Translate one terminal event. `None` for events with no meaning here.
    pub fn translate(&mut self, event: Event) -> Option<InputEvent> {
        match event {
            Event::Key(key_event) => self.translate_key(key_event),
            Event::FocusLost => Some(InputEvent::FocusLost),
            Event::FocusGained | Event::Resize(..) => Some(InputEvent::Tick),
            _ => None,
        }
    }

    fn translate_key(&mut self, event: KeyEvent) -> Option<InputEvent> {
        let modifiers = convert_modifiers(event.modifiers);
        if event.code == KeyCode::Char('c') && modifiers.control {
            return Some(InputEvent::Quit);
        }

        let key = convert_key(event.code)?;
        match event.kind {
            KeyEventKind::Press => {
                if !self.reports_releases {
                    self.pending.push_back(InputEvent::Release { key: key.clone() });
                }
                Some(InputEvent::Press { key, modifiers })
            },
            KeyEventKind::Release => {
                // Shift may go up first, so the release can report the other
                // case of the character that was pressed. Release both.
                if let KeyCode::Char(c) = event.code
                    && let Some(other) = other_case(c)
                {
                    self.pending.push_back(InputEvent::Release { key: Key::from(other) });
                }
                Some(InputEvent::Release { key })
            },
            KeyEventKind::Repeat => None,
        }
    }
}

/// `c` in the opposite case, if that is a different single character.
fn other_case(c: char) -> Option<char> {
    let mut flipped: Vec<char> = if c.is_uppercase() {
        c.to_lowercase().collect()
    } else {
        c.to_uppercase().collect()
    };
    match flipped.pop() {
        Some(other) if flipped.is_empty() && other != c => Some(other),
        _ => None,
    }
}

/// Convert a crossterm `KeyCode` to a [`Key`].
pub fn convert_key(code: KeyCode) -> Option<Key> {
    let named = match code {
        KeyCode::Char(c) => return Some(Key::from(c)),
        KeyCode::Enter => NamedKey::Enter,
        KeyCode::Esc => NamedKey::Escape,
        KeyCode::Up => NamedKey::Up,
        KeyCode::Down => NamedKey::Down,
        KeyCode::Left => NamedKey::Left,
        KeyCode::Right => NamedKey::Right,
        KeyCode::Home => NamedKey::Home,
        KeyCode::End => NamedKey::End,
        KeyCode::PageUp => NamedKey::PageUp,
        KeyCode::PageDown => NamedKey::PageDown,
        KeyCode::Tab | KeyCode::BackTab => NamedKey::Tab,
        KeyCode::Backspace => NamedKey::Backspace,
        KeyCode::Delete => NamedKey::Delete,
        KeyCode::Insert => NamedKey::Insert,
        KeyCode::F(n) => NamedKey::F(n),
        _ => return None,
    };
    Some(named.into())
}

/// Convert crossterm modifier flags.
pub fn convert_modifiers(modifiers: KeyModifiers) -> Modifiers {
    Modifiers::new(
        modifiers.contains(KeyModifiers::CONTROL),
        modifiers.contains(KeyModifiers::ALT),
        modifiers.contains(KeyModifiers::SHIFT),
    )
}

/// Terminal driver implementing the [`Driver`] trait.
pub struct TerminalDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_stream: EventStream,
    input: InputTranslator,
    status: Status,
    next_handle: u64,
    enhanced: bool,
    restored: bool,
}

impl TerminalDriver {
    /// Enter raw mode and the alternate screen.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be configured.
    pub fn new() -> Result<Self, TerminalError> {
        enable_raw_mode()?;
        let mut out = stdout();
        out.execute(EnterAlternateScreen)?;
        out.execute(EnableFocusChange)?;

        let enhanced = supports_keyboard_enhancement().unwrap_or(false);
        if enhanced {
            out.execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))?;
        }
        tracing::info!(enhanced, "terminal ready");

        let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
        Ok(Self {
            terminal,
            event_stream: EventStream::new(),
            input: InputTranslator::new(enhanced),
            status: Status::default(),
            next_handle: 0,
            enhanced,
            restored: false,
        })
    }

    fn restore(&mut self) {
        if self.restored {
            return;
        }
        self.restored = true;
        if self.enhanced {
            let _ = stdout().execute(PopKeyboardEnhancementFlags);
        }
        let _ = stdout().execute(DisableFocusChange);
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}

impl SoundPlayer for TerminalDriver {
    type Handle = u64;

    fn play(&mut self, sound: &SoundId) -> Option<u64> {
        self.next_handle += 1;
        tracing::debug!(%sound, handle = self.next_handle, "play");
        self.status.sounds.push((self.next_handle, sound.clone()));
        Some(self.next_handle)
    }

    fn stop(&mut self, handle: u64) {
        self.status.sounds.retain(|(playing, _)| *playing != handle);
    }
}

impl Announcer for TerminalDriver {
    fn message(&mut self, text: &str) {
        tracing::debug!(text, "announce");
        self.status.message = Some(text.to_string());
    }
}

impl Driver for TerminalDriver {
    type Error = TerminalError;
    type Instant = Instant;

    async fn poll_event(
        &mut self,
        deadline: Option<Instant>,
    ) -> Result<Option<InputEvent>, TerminalError> {
        if let Some(event) = self.input.pop_pending() {
            return Ok(Some(event));
        }
        let timeout =
            deadline.map_or(IDLE_TICK, |deadline| deadline.saturating_duration_since(Instant::now()));

        tokio::select! {
            biased;

            maybe_event = self.event_stream.next() => {
                match maybe_event {
                    Some(Ok(event)) => Ok(self.input.translate(event)),
                    Some(Err(e)) => Err(TerminalError::Io(e)),
                    None => Ok(Some(InputEvent::Quit)),
                }
            }

            () = tokio::time::sleep(timeout) => Ok(None),
        }
    }

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn render(&mut self, book: &Book) -> Result<(), TerminalError> {
        let status = &self.status;
        self.terminal.draw(|frame| ui::render(frame, book, status))?;
        Ok(())
    }

    fn shutdown(&mut self) {
        self.restore();
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        self.restore();
    }
}
