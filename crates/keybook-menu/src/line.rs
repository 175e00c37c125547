//! Menu lines.

use std::{fmt, rc::Rc, time::Instant};

use keybook_core::{ActionError, Source};

use crate::{Book, SoundId};

/// Action run when a line is activated or a page is cancelled.
///
/// Receives the book itself, so it may push or pop pages.
pub type MenuAction<I> = Rc<dyn Fn(&mut Book<I>) -> Result<(), ActionError>>;

/// One selectable entry on a [`Page`](crate::Page).
pub struct Line<I = Instant> {
    title: Source<String>,
    action: MenuAction<I>,
    sound: Source<Option<SoundId>>,
}

impl<I> Line<I> {
    /// Create a line with a title and an activation action.
    pub fn new(
        title: impl Into<Source<String>>,
        action: impl Fn(&mut Book<I>) -> Result<(), ActionError> + 'static,
    ) -> Self {
        Self { title: title.into(), action: Rc::new(action), sound: Source::default() }
    }

    /// Create a line whose title is computed each time it is read.
    pub fn computed(
        title: impl Fn() -> String + 'static,
        action: impl Fn(&mut Book<I>) -> Result<(), ActionError> + 'static,
    ) -> Self {
        Self::new(Source::computed(title), action)
    }

    /// Line that does nothing when activated.
    pub fn label(title: impl Into<Source<String>>) -> Self {
        Self::new(title, |_| Ok(()))
    }

    /// Play `sound` instead of the default move sound when focused.
    #[must_use]
    pub fn sound(mut self, sound: impl Into<SoundId>) -> Self {
        self.sound = Source::Static(Some(sound.into()));
        self
    }

    /// Pick the focus sound each time the line is focused.
    #[must_use]
    pub fn computed_sound(mut self, sound: impl Fn() -> Option<SoundId> + 'static) -> Self {
        self.sound = Source::computed(sound);
        self
    }

    /// Resolved title.
    pub fn title(&self) -> String {
        self.title.resolve()
    }

    /// Resolved focus sound. `None` if the line has none of its own.
    pub fn resolve_sound(&self) -> Option<SoundId> {
        self.sound.resolve()
    }

    pub(crate) fn action(&self) -> MenuAction<I> {
        Rc::clone(&self.action)
    }
}

impl<I> Clone for Line<I> {
    fn clone(&self) -> Self {
        Self { title: self.title.clone(), action: Rc::clone(&self.action), sound: self.sound.clone() }
    }
}

impl<I> fmt::Debug for Line<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Line")
            .field("title", &self.title)
            .field("sound", &self.sound)
            .finish_non_exhaustive()
    }
}
