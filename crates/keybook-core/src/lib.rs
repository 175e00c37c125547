//! Core types for the keybook hotkey and menu engine.
//!
//! Everything here is pure data: key identity ([`KeyState`]), late-bound
//! values ([`Source`]), the time abstraction used by every state machine
//! ([`Environment`], [`Timestamp`]) and the shared error taxonomy.
//!
//! # Components
//!
//! - [`KeyState`]: normalized key plus modifier flags, used both as an input
//!   event payload and as a binding key
//! - [`Source`]: a value that is either fixed or computed at read time
//! - [`Environment`]: clock abstraction enabling virtual time in simulation

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod env;
pub mod error;
pub mod key;
pub mod source;

pub use env::{Environment, SystemEnv, Timestamp};
pub use error::{ActionError, KeyError, MenuError};
pub use key::{Key, KeyState, Modifiers, NamedKey};
pub use source::Source;
