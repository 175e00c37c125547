//! Hotkey dispatch engine.
//!
//! Turns raw key press/release events into bound actions, one-shot or
//! auto-repeating, while keeping a misbehaving action from breaking the
//! input pipeline.
//!
//! # Components
//!
//! - [`Hotkey`]: a single binding (trigger, action, optional repeat interval,
//!   guard and title)
//! - [`Keyboard`]: the registry; owns held keys, bindings and repeat timers
//! - [`RepeatTimer`]: scheduled repeat for a held key, driven by
//!   [`Keyboard::tick`]
//!
//! The registry is generic over a context `C`: the value actions operate on
//! (usually the menu stack). Actions receive `&mut C`, guards receive `&C`.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod dispatch;
mod hotkey;
mod keyboard;
mod timer;

pub use dispatch::{ErrorContext, ErrorHandler, Origin, log_errors};
pub use hotkey::{Action, Guard, Hotkey};
pub use keyboard::{HotkeyId, Keyboard, UnhandledKey};
pub use keybook_core::{ActionError, Key, KeyState, Modifiers, NamedKey};
pub use timer::RepeatTimer;
