//! Host runtime for keybook.
//!
//! Connects a platform [`Driver`] (terminal, window, simulation) to the pure
//! state machines: key events go to the [`Keyboard`](keybook_input::Keyboard)
//! with the [`Book`](keybook_menu::Book) as context, and the book's queued
//! feedback is executed against the driver's speech and sound outputs.
//!
//! # Components
//!
//! - [`InputEvent`]: platform-neutral input
//! - [`SoundPlayer`] / [`Announcer`]: output collaborators
//! - [`FeedbackRouter`]: maps feedback channels to live sound handles
//! - [`Driver`]: trait for platform-specific I/O
//! - [`Runtime`]: generic event loop over a `Driver`

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod driver;
mod error;
mod event;
mod output;
mod router;
mod runtime;

pub use driver::Driver;
pub use error::RuntimeError;
pub use event::InputEvent;
pub use output::{Announcer, SoundPlayer};
pub use router::FeedbackRouter;
pub use runtime::Runtime;
