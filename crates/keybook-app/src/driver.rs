//! Driver trait for abstracting host I/O.
//!
//! The [`Driver`] trait decouples the runtime from the platform. The terminal
//! frontend and the simulation harness both implement it, and the same
//! [`Runtime`](crate::Runtime) runs on top of either.

use std::future::Future;

use keybook_core::Timestamp;
use keybook_menu::Book;

use crate::{Announcer, InputEvent, SoundPlayer};

/// Platform-specific I/O for the runtime.
///
/// A driver is also the runtime's [`SoundPlayer`] and [`Announcer`]. Menu
/// actions hold `Rc` closures, so nothing here is `Send`; the runtime is
/// meant for a single-threaded executor.
///
/// # Associated Types
///
/// - [`Error`](Driver::Error): platform-specific error type
/// - [`Instant`](Driver::Instant): time representation (real or virtual)
pub trait Driver: SoundPlayer + Announcer {
    /// Platform-specific error type.
    type Error: std::error::Error + 'static;

    /// Time instant type. Enables virtual time in simulation.
    type Instant: Timestamp;

    /// Wait for the next input event.
    ///
    /// Returns `None` once `deadline` passes with no input. With no deadline
    /// the driver may wait indefinitely.
    ///
    /// # Errors
    ///
    /// Returns an error if the input source fails.
    fn poll_event(
        &mut self,
        deadline: Option<Self::Instant>,
    ) -> impl Future<Output = Result<Option<InputEvent>, Self::Error>>;

    /// Current time instant.
    fn now(&self) -> Self::Instant;

    /// Render the book.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, book: &Book<Self::Instant>) -> Result<(), Self::Error>;

    /// Release platform resources. Called once when the runtime exits.
    fn shutdown(&mut self);
}
