//! Menu pages.

use std::{fmt, rc::Rc, time::Instant};

use keybook_core::{ActionError, Source};

use crate::{Book, Line, MenuAction};

/// A titled list of [`Line`]s with a focus cursor.
///
/// Focus is `None` while the title is focused, otherwise the index of the
/// focused line. It is always in range.
pub struct Page<I = Instant> {
    title: Source<String>,
    lines: Vec<Line<I>>,
    focus: Option<usize>,
    dismissible: bool,
    play_default_sounds: bool,
    on_cancel: Option<MenuAction<I>>,
}

impl<I> Page<I> {
    /// Create an empty, dismissible page with default sounds enabled.
    pub fn new(title: impl Into<Source<String>>) -> Self {
        Self {
            title: title.into(),
            lines: Vec::new(),
            focus: None,
            dismissible: true,
            play_default_sounds: true,
            on_cancel: None,
        }
    }

    /// Append a line.
    #[must_use]
    pub fn line(mut self, line: Line<I>) -> Self {
        self.lines.push(line);
        self
    }

    /// Append several lines.
    #[must_use]
    pub fn lines(mut self, lines: impl IntoIterator<Item = Line<I>>) -> Self {
        self.lines.extend(lines);
        self
    }

    /// Whether cancel may pop this page. Defaults to true.
    #[must_use]
    pub fn dismissible(mut self, dismissible: bool) -> Self {
        self.dismissible = dismissible;
        self
    }

    /// Whether focused lines without a sound play the default move sound.
    /// Defaults to true.
    #[must_use]
    pub fn play_default_sounds(mut self, play: bool) -> Self {
        self.play_default_sounds = play;
        self
    }

    /// Run `action` after the page is cancelled and popped.
    #[must_use]
    pub fn on_cancel(
        mut self,
        action: impl Fn(&mut Book<I>) -> Result<(), ActionError> + 'static,
    ) -> Self {
        self.on_cancel = Some(Rc::new(action));
        self
    }

    /// Start with focus on line `index` instead of the title.
    ///
    /// Out-of-range indices leave focus on the title.
    #[must_use]
    pub fn focused(mut self, index: usize) -> Self {
        if index < self.lines.len() {
            self.focus = Some(index);
        }
        self
    }

    /// Resolved page title.
    pub fn title(&self) -> String {
        self.title.resolve()
    }

    /// All lines, in display order.
    pub fn all_lines(&self) -> &[Line<I>] {
        &self.lines
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True if the page has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Focused line index. `None` if the title is focused.
    pub fn focus(&self) -> Option<usize> {
        self.focus
    }

    /// Focused line. `None` if the title is focused.
    pub fn focused_line(&self) -> Option<&Line<I>> {
        self.focus.and_then(|index| self.lines.get(index))
    }

    /// Whether cancel may pop this page.
    pub fn is_dismissible(&self) -> bool {
        self.dismissible
    }

    /// Whether the default move sound is used for lines without one.
    pub fn plays_default_sounds(&self) -> bool {
        self.play_default_sounds
    }

    pub(crate) fn set_focus(&mut self, focus: Option<usize>) {
        debug_assert!(focus.is_none_or(|index| index < self.lines.len()));
        self.focus = focus;
    }

    pub(crate) fn take_on_cancel(&mut self) -> Option<MenuAction<I>> {
        self.on_cancel.take()
    }
}

/// Clones share line actions; the focus is copied.
impl<I> Clone for Page<I> {
    fn clone(&self) -> Self {
        Self {
            title: self.title.clone(),
            lines: self.lines.clone(),
            focus: self.focus,
            dismissible: self.dismissible,
            play_default_sounds: self.play_default_sounds,
            on_cancel: self.on_cancel.clone(),
        }
    }
}

impl<I> fmt::Debug for Page<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("title", &self.title)
            .field("lines", &self.lines)
            .field("focus", &self.focus)
            .field("dismissible", &self.dismissible)
            .field("play_default_sounds", &self.play_default_sounds)
            .field("on_cancel", &self.on_cancel.is_some())
            .finish()
    }
}
