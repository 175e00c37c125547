//! Late-bound values.
//!
//! Titles and sound identifiers may be fixed at construction or computed
//! each time they are read (a title showing a live volume level, say).
//! [`Source`] keeps the two cases explicit instead of always storing a
//! closure.

use std::{fmt, rc::Rc};

/// A value that is either static or computed on every read.
pub enum Source<T> {
    /// Fixed value.
    Static(T),
    /// Computed by calling the function at read time.
    Computed(Rc<dyn Fn() -> T>),
}

impl<T: Clone> Source<T> {
    /// Create a computed source.
    pub fn computed(f: impl Fn() -> T + 'static) -> Self {
        Self::Computed(Rc::new(f))
    }

    /// Resolve the current value.
    pub fn resolve(&self) -> T {
        match self {
            Self::Static(value) => value.clone(),
            Self::Computed(f) => f(),
        }
    }
}

impl<T: Clone> Clone for Source<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Static(value) => Self::Static(value.clone()),
            Self::Computed(f) => Self::Computed(Rc::clone(f)),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Source<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(value) => f.debug_tuple("Static").field(value).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl From<&str> for Source<String> {
    fn from(value: &str) -> Self {
        Self::Static(value.to_string())
    }
}

impl From<String> for Source<String> {
    fn from(value: String) -> Self {
        Self::Static(value)
    }
}

impl<T: Default> Default for Source<T> {
    fn default() -> Self {
        Self::Static(T::default())
    }
}
