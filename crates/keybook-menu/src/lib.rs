//! Menu stack for keyboard-driven, screen-reader friendly interfaces.
//!
//! A [`Book`] is a stack of [`Page`]s. Only the top page is interactive. Each
//! page has a title and a list of [`Line`]s; focus sits either on the title or
//! on one line. Every focus change queues [`Feedback`] (text to announce,
//! sounds to play or stop) which the host drains with
//! [`Book::take_feedback`] and hands to its speech and audio backends.
//!
//! The book never touches I/O and never reads a clock: search timing takes
//! `now` as a parameter, exactly like the hotkey registry in `keybook-input`.
//!
//! # Components
//!
//! - [`Book`]: the page stack and its navigation operations
//! - [`Page`] and [`Line`]: the menu content
//! - [`pages`]: ready-made confirm, picker and hotkey-listing pages
//! - [`navigation`]: the standard hotkey set (arrows, Enter, Escape, search)

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod book;
mod config;
mod feedback;
mod line;
pub mod navigation;
mod page;
pub mod pages;

pub use book::Book;
pub use config::{BookConfig, DEFAULT_SEARCH_TIMEOUT, SoundSet};
pub use feedback::{Channel, Feedback, SoundId};
pub use keybook_core::{ActionError, MenuError};
pub use line::{Line, MenuAction};
pub use page::Page;
