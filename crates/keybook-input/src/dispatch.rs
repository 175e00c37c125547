//! Error isolation at the dispatch boundary.
//!
//! Every action runs through [`invoke`], which turns both returned errors and
//! panics into an [`ActionError`]. The caller hands that error to the
//! registry's [`ErrorHandler`] together with an [`ErrorContext`]; it never
//! propagates further.

use std::{
    fmt,
    panic::{self, AssertUnwindSafe},
    rc::Rc,
};

use keybook_core::{ActionError, KeyState};

/// Handler receiving every action failure caught by the dispatcher.
///
/// Injected into the [`crate::Keyboard`] at construction. Shared (`Rc`) so
/// menu pages that re-run hotkeys report to the same place.
pub type ErrorHandler = Rc<dyn Fn(&ActionError, &ErrorContext)>;

/// How the failing action was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Initial key press.
    Press,
    /// Repeat timer firing while the key is held.
    Repeat,
    /// Activated from a menu line rather than a key.
    Menu,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Press => "press",
            Self::Repeat => "repeat",
            Self::Menu => "menu",
        })
    }
}

/// Identifies the hotkey whose action failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Trigger of the failing hotkey.
    pub trigger: KeyState,
    /// Hotkey title at the time of failure, if it has one.
    pub title: Option<String>,
    /// Dispatch path.
    pub origin: Origin,
}

/// Error handler that logs failures and does nothing else.
pub fn log_errors() -> ErrorHandler {
    Rc::new(|error: &ActionError, context: &ErrorContext| {
        tracing::error!(
            trigger = %context.trigger,
            title = context.title.as_deref().unwrap_or(""),
            origin = %context.origin,
            %error,
            "hotkey action failed"
        );
    })
}

/// Run an action, converting a panic into [`ActionError::Panicked`].
pub(crate) fn invoke<C>(
    action: &dyn Fn(&mut C) -> Result<(), ActionError>,
    ctx: &mut C,
) -> Result<(), ActionError> {
    match panic::catch_unwind(AssertUnwindSafe(|| action(ctx))) {
        Ok(result) => result,
        Err(payload) => Err(ActionError::from_panic(&*payload)),
    }
}
