//! Environment abstraction for deterministic testing.
//!
//! Decouples the hotkey and menu state machines from the system clock. Every
//! time-dependent operation takes a `now` parameter instead of reading the
//! clock itself; hosts obtain that instant from an [`Environment`]. Production
//! uses [`SystemEnv`] (monotonic `std::time::Instant`), simulation uses a
//! manually advanced virtual clock.

use std::{
    future::Future,
    ops::{Add, Sub},
    time::{Duration, Instant},
};

/// Point in time usable by the state machines.
///
/// Blanket-implemented for any type with the required arithmetic, so both
/// `std::time::Instant` and virtual instants qualify.
pub trait Timestamp:
    Copy + Ord + Sub<Output = Duration> + Add<Duration, Output = Self> + 'static
{
}

impl<T> Timestamp for T where
    T: Copy + Ord + Sub<Output = Duration> + Add<Duration, Output = T> + 'static
{
}

/// Abstract environment providing time.
///
/// # Invariants
///
/// - `now()` never goes backwards within a single execution context
pub trait Environment: Clone + 'static {
    /// The instant type used by this environment.
    ///
    /// Production environments use `std::time::Instant`, while simulation
    /// environments use virtual time.
    type Instant: Timestamp;

    /// Current time (monotonic).
    fn now(&self) -> Self::Instant;

    /// Sleeps for the specified duration.
    ///
    /// Only driver code should sleep; state machines never do.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()>;
}

/// Production environment backed by the system monotonic clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a new system environment.
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> {
        tokio::time::sleep(duration)
    }
}
