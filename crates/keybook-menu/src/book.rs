//! The page stack.
//!
//! [`Book`] is a sans-IO state machine: operations mutate the stack and the
//! focus of the top page, and queue [`Feedback`] describing what the host
//! should say or play. Nothing is spoken or played until the host drains the
//! queue with [`Book::take_feedback`].
//!
//! # Reentrancy
//!
//! Line actions receive `&mut Book`, so an action may push, pop or move while
//! the book is in the middle of `activate`. The action is cloned out of the
//! page before it runs; no borrow of the page outlives the call.

use std::{fmt, mem, time::Instant};

use keybook_core::{ActionError, MenuError, Timestamp};

use crate::{BookConfig, Channel, Feedback, Page, SoundId};

/// Stack of [`Page`]s. Only the top page is interactive.
pub struct Book<I = Instant> {
    frames: Vec<Page<I>>,
    config: BookConfig,
    search_buffer: String,
    last_search_at: Option<I>,
    feedback: Vec<Feedback>,
}

impl<I> Default for Book<I> {
    fn default() -> Self {
        Self::new(BookConfig::default())
    }
}

impl<I> Book<I> {
    /// Create an empty book.
    pub fn new(config: BookConfig) -> Self {
        Self {
            frames: Vec::new(),
            config,
            search_buffer: String::new(),
            last_search_at: None,
            feedback: Vec::new(),
        }
    }

    /// Configuration this book was built with.
    pub fn config(&self) -> &BookConfig {
        &self.config
    }

    /// Top page. `None` if the stack is empty.
    pub fn current(&self) -> Option<&Page<I>> {
        self.frames.last()
    }

    /// All pages, bottom first.
    pub fn pages(&self) -> &[Page<I>] {
        &self.frames
    }

    /// Number of pages on the stack.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// True if no page is on the stack.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Current incremental search text (lowercased).
    pub fn search_buffer(&self) -> &str {
        &self.search_buffer
    }

    /// Feedback queued since the last drain, oldest first.
    pub fn pending_feedback(&self) -> &[Feedback] {
        &self.feedback
    }

    /// Drain queued feedback, oldest first.
    pub fn take_feedback(&mut self) -> Vec<Feedback> {
        mem::take(&mut self.feedback)
    }

    /// Push `page` on top and announce its focus.
    pub fn push(&mut self, page: Page<I>) {
        self.search_buffer.clear();
        self.last_search_at = None;
        self.frames.push(page);
        tracing::debug!(depth = self.frames.len(), "page pushed");
        self.refresh_focus();
    }

    /// Remove and return the top page. `None` if the stack is empty.
    ///
    /// The page underneath, if any, is popped and pushed again so its focus is
    /// re-announced. That re-push also clears the search buffer.
    pub fn pop(&mut self) -> Option<Page<I>> {
        let page = self.frames.pop()?;
        tracing::debug!(depth = self.frames.len(), "page popped");

        if let Some(exposed) = self.frames.pop() {
            self.push(exposed);
        }
        Some(page)
    }

    /// Announce the current focus: the page title, or the focused line's
    /// sound and title.
    ///
    /// # Errors
    ///
    /// - `MenuError::InvalidState` if the stack is empty
    pub fn show_focus(&mut self) -> Result<(), MenuError> {
        let Some(page) = self.frames.last() else {
            return Err(MenuError::InvalidState { operation: "show focus" });
        };

        let Some(line) = page.focused_line() else {
            let title = page.title();
            self.announce(title);
            return Ok(());
        };

        let sound = line.resolve_sound().or_else(|| {
            if page.plays_default_sounds() { self.config.sounds.movement.clone() } else { None }
        });
        let title = line.title();

        self.stop(Channel::Move);
        self.play(Channel::Move, sound);
        self.announce(title);
        Ok(())
    }

    /// Move focus one line up. From the first line this focuses the title.
    pub fn move_up(&mut self) {
        let Some(page) = self.frames.last_mut() else {
            return;
        };
        let Some(index) = page.focus() else {
            return;
        };
        page.set_focus(index.checked_sub(1));
        self.refresh_focus();
    }

    /// Move focus one line down. From the title this focuses the first line.
    pub fn move_down(&mut self) {
        let Some(page) = self.frames.last_mut() else {
            return;
        };
        let next = page.focus().map_or(0, |index| index + 1);
        if next >= page.len() {
            return;
        }
        page.set_focus(Some(next));
        self.refresh_focus();
    }

    /// Focus the first line. No-op on an empty page or if already there.
    pub fn move_first(&mut self) {
        self.jump(|_| Some(0));
    }

    /// Focus the last line. No-op on an empty page or if already there.
    pub fn move_last(&mut self) {
        self.jump(|len| len.checked_sub(1));
    }

    /// Run the focused line's action.
    ///
    /// No-op if the stack is empty or the title is focused.
    ///
    /// # Errors
    ///
    /// Whatever the line's action returns.
    pub fn activate(&mut self) -> Result<(), ActionError> {
        let Some(line) = self.frames.last().and_then(Page::focused_line) else {
            return Ok(());
        };
        let action = line.action();
        tracing::debug!(line = %line.title(), "line activated");

        self.play(Channel::Activate, self.config.sounds.activate.clone());
        action(self)
    }

    /// Dismiss the top page.
    ///
    /// A non-dismissible page stays put and the refusal sound plays. Otherwise
    /// the page is popped and its cancel action, if any, runs afterwards.
    ///
    /// # Errors
    ///
    /// Whatever the page's cancel action returns.
    pub fn cancel(&mut self) -> Result<(), ActionError> {
        let Some(page) = self.frames.last() else {
            return Ok(());
        };

        if !page.is_dismissible() {
            tracing::debug!("cancel refused");
            self.stop(Channel::NoCancel);
            self.play(Channel::NoCancel, self.config.sounds.no_cancel.clone());
            return Ok(());
        }

        let on_cancel = self.pop().and_then(|mut page| page.take_on_cancel());
        match on_cancel {
            Some(action) => action(self),
            None => Ok(()),
        }
    }

    fn jump(&mut self, target: impl FnOnce(usize) -> Option<usize>) {
        let Some(page) = self.frames.last_mut() else {
            return;
        };
        let Some(index) = target(page.len()) else {
            return;
        };
        if page.focus() == Some(index) {
            return;
        }
        page.set_focus(Some(index));
        self.refresh_focus();
    }

    fn refresh_focus(&mut self) {
        if let Err(error) = self.show_focus() {
            tracing::warn!(%error, "focus not shown");
        }
    }

    fn announce(&mut self, text: String) {
        self.feedback.push(Feedback::Announce(text));
    }

    fn play(&mut self, channel: Channel, sound: Option<SoundId>) {
        if let Some(sound) = sound {
            self.feedback.push(Feedback::Play { channel, sound });
        }
    }

    fn stop(&mut self, channel: Channel) {
        self.feedback.push(Feedback::Stop { channel });
    }
}

impl<I: Timestamp> Book<I> {
    /// Extend the incremental search with `term` and focus the first line
    /// whose title starts with the buffer.
    ///
    /// A pause longer than the configured timeout since the previous call
    /// starts a fresh search. No-op if the stack is empty.
    pub fn handle_search(&mut self, term: &str, now: I) {
        let Some(page) = self.frames.last() else {
            return;
        };

        if self.last_search_at.is_some_and(|last| now - last > self.config.search_timeout) {
            self.search_buffer.clear();
        }
        self.search_buffer.push_str(&term.to_lowercase());
        self.last_search_at = Some(now);

        let found = page
            .all_lines()
            .iter()
            .position(|line| line.title().to_lowercase().starts_with(&self.search_buffer));

        let Some(index) = found else {
            tracing::debug!(buffer = %self.search_buffer, "search found nothing");
            self.stop(Channel::SearchSuccess);
            self.play(Channel::SearchFail, self.config.sounds.search_fail.clone());
            return;
        };

        tracing::debug!(buffer = %self.search_buffer, index, "search matched");
        self.stop(Channel::SearchFail);
        self.play(Channel::SearchSuccess, self.config.sounds.search_success.clone());
        if let Some(page) = self.frames.last_mut() {
            page.set_focus(Some(index));
        }
        self.refresh_focus();
    }
}

impl<I> fmt::Debug for Book<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Book")
            .field("frames", &self.frames)
            .field("config", &self.config)
            .field("search_buffer", &self.search_buffer)
            .field("feedback", &self.feedback)
            .finish_non_exhaustive()
    }
}
