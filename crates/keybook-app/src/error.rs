//! Runtime errors.

use keybook_core::MenuError;
use thiserror::Error;

/// Errors that stop the [`Runtime`](crate::Runtime).
///
/// Action failures never appear here; they are handled by the keyboard's
/// error handler.
#[derive(Error, Debug)]
pub enum RuntimeError<E: std::error::Error + 'static> {
    /// The driver failed to poll or render.
    #[error("driver error: {0}")]
    Driver(#[source] E),

    /// The book was in a state the runtime cannot run from.
    #[error(transparent)]
    Menu(#[from] MenuError),
}
