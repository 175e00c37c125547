//! Deterministic simulation harness for keybook.
//!
//! Virtual-time implementations of the [`Environment`](keybook_core::Environment)
//! and [`Driver`](keybook_app::Driver) traits, so the production runtime can
//! be driven by a script with exact, reproducible timing.
//!
//! # Model-Based Testing
//!
//! The `model` module wraps a keyboard and book wired the way a host wires
//! them, and applies arbitrary [`Operation`]s to it. Property tests and fuzz
//! targets feed it random sequences and check invariants after every step.
//!
//! # Invariant Testing
//!
//! The `invariants` module checks WHAT must hold across all execution paths.
//! Use [`InvariantRegistry::standard()`] for the common set.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod invariants;
pub mod model;
pub mod sim_driver;
pub mod sim_env;

pub use invariants::{
    FocusInRange, HeldKeysUnique, Invariant, InvariantRegistry, InvariantResult, PageSnapshot,
    SearchBufferFolded, SystemSnapshot, TimerSnapshot, TimersOnlyWhileHeld, Violation,
};
pub use model::{NavKey, Operation, World, sample_menu};
pub use sim_driver::{Output, SimDriver, SimDriverError};
pub use sim_env::{SimEnv, SimInstant};
