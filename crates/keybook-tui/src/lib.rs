//! Terminal UI for keybook
//!
//! A thin shell over [`keybook_app::Driver`] that provides terminal-specific
//! I/O. All orchestration lives in the generic [`keybook_app::Runtime`].
//!
//! This crate only handles terminal input, rendering and the demo menu.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod demo;
pub mod terminal;
pub mod ui;

pub use keybook_app::{Driver, Runtime};
pub use terminal::{TerminalDriver, TerminalError};
pub use ui::Status;
