//! Error types shared by the keybook crates.
//!
//! Three distinct layers:
//!
//! - [`KeyError`]: a key name or key string could not be parsed
//! - [`MenuError`]: a menu operation was called in a state where it has no
//!   meaning (surfaced to the caller, never swallowed)
//! - [`ActionError`]: a bound action failed or panicked; caught at the
//!   dispatch boundary and routed to the registry's error handler
//!
//! Navigation no-ops (moving past either end of a page, activating the
//! title) are not errors and never produce one of these.

use std::{any::Any, error::Error as StdError, fmt};

use thiserror::Error;

/// Errors from key name and key string parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// Key name was empty.
    #[error("empty key name")]
    Empty,

    /// Key name contained the modifier separator.
    #[error("key name {name:?} contains '+'")]
    Separator {
        /// Rejected key name.
        name: String,
    },

    /// Modifier token was not one of `ctrl`, `control`, `alt`, `shift`.
    #[error("unknown modifier {token:?}")]
    UnknownModifier {
        /// Unrecognized token.
        token: String,
    },

    /// Same modifier appeared twice.
    #[error("duplicate modifier {token:?}")]
    DuplicateModifier {
        /// Repeated token.
        token: String,
    },
}

/// Errors from menu stack operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MenuError {
    /// Operation requires a page on the stack.
    #[error("invalid state: cannot {operation} with an empty page stack (push a page first)")]
    InvalidState {
        /// Operation that was attempted.
        operation: &'static str,
    },
}

/// Failure raised by a bound action.
///
/// Returned errors and caught panics both end up here. The dispatcher never
/// lets one escape: it is handed to the registry's error handler and input
/// processing carries on.
#[derive(Error, Debug)]
pub enum ActionError {
    /// The action returned an error.
    #[error("action failed: {0}")]
    Failed(#[source] Box<dyn StdError + Send + Sync>),

    /// The action panicked.
    #[error("action panicked: {message}")]
    Panicked {
        /// Panic payload, if it was a string.
        message: String,
    },

    /// A menu operation invoked by the action was rejected.
    #[error(transparent)]
    Menu(#[from] MenuError),
}

impl ActionError {
    /// Build a failure from any displayable message.
    pub fn msg(message: impl fmt::Display) -> Self {
        Self::Failed(message.to_string().into())
    }

    /// Wrap any error type.
    pub fn other(err: impl StdError + Send + Sync + 'static) -> Self {
        Self::Failed(Box::new(err))
    }

    /// Convert a payload caught by `std::panic::catch_unwind`.
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self::Panicked { message }
    }

    /// True if this failure came from a panic rather than a returned error.
    pub fn is_panic(&self) -> bool {
        matches!(self, Self::Panicked { .. })
    }
}
