//! Virtual clock.

use std::{
    cell::Cell,
    future::Future,
    ops::{Add, Sub},
    rc::Rc,
    time::Duration,
};

use keybook_core::Environment;

/// Instant on the virtual clock, measured from the start of the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SimInstant(Duration);

impl SimInstant {
    /// Start of the simulation.
    pub const EPOCH: Self = Self(Duration::ZERO);

    /// Instant `millis` milliseconds after the epoch.
    pub const fn from_millis(millis: u64) -> Self {
        Self(Duration::from_millis(millis))
    }

    /// Time since the epoch.
    pub const fn since_epoch(self) -> Duration {
        self.0
    }
}

impl Add<Duration> for SimInstant {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self {
        Self(self.0 + rhs)
    }
}

/// Saturates at zero, like `std::time::Instant`.
impl Sub for SimInstant {
    type Output = Duration;

    fn sub(self, rhs: Self) -> Duration {
        self.0.saturating_sub(rhs.0)
    }
}

/// Environment with a manually advanced clock.
///
/// Clones share the same clock. `sleep` advances it instead of waiting.
#[derive(Debug, Clone, Default)]
pub struct SimEnv {
    clock: Rc<Cell<SimInstant>>,
}

impl SimEnv {
    /// Create a clock at the epoch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward by `duration`.
    pub fn advance(&self, duration: Duration) {
        self.clock.set(self.clock.get() + duration);
    }

    /// Move the clock to `instant`. Never moves it backwards.
    pub fn advance_to(&self, instant: SimInstant) {
        if instant > self.clock.get() {
            self.clock.set(instant);
        }
    }
}

impl Environment for SimEnv {
    type Instant = SimInstant;

    fn now(&self) -> SimInstant {
        self.clock.get()
    }

    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> {
        let clock = Rc::clone(&self.clock);
        async move {
            clock.set(clock.get() + duration);
        }
    }
}
