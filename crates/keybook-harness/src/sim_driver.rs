//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` provides the same interface as the terminal driver but replays
//! a script of timed input events on a virtual clock and records everything
//! the runtime asks it to say or play. The production
//! [`Runtime`](keybook_app::Runtime) runs on top of it unchanged.

use std::collections::VecDeque;

use keybook_app::{Announcer, Driver, InputEvent, SoundPlayer};
use keybook_core::Environment;
use keybook_menu::{Book, SoundId};

use crate::{
    SimEnv, SimInstant,
    invariants::{InvariantRegistry, SystemSnapshot},
};

/// Error type for simulation driver.
#[derive(Debug, Clone)]
pub struct SimDriverError(pub String);

impl std::fmt::Display for SimDriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SimDriverError: {}", self.0)
    }
}

impl std::error::Error for SimDriverError {}

/// Something the runtime asked the driver to output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// Announced text.
    Message(String),
    /// Sound started.
    Play {
        /// Handle returned to the runtime.
        handle: u64,
        /// Sound requested.
        sound: SoundId,
    },
    /// Sound stopped.
    Stop {
        /// Handle being stopped.
        handle: u64,
    },
}

/// Simulation driver for deterministic testing.
///
/// Events are delivered at their scheduled virtual time; the clock jumps
/// straight to the next event or repeat deadline, whichever is earlier. Once
/// the script is exhausted the driver reports [`InputEvent::Quit`].
pub struct SimDriver {
    env: SimEnv,
    script: VecDeque<(SimInstant, InputEvent)>,
    output: Vec<Output>,
    next_handle: u64,
    renders: usize,
    fail_render_at: Option<usize>,
    shut_down: bool,
    invariants: Option<InvariantRegistry>,
}

impl SimDriver {
    /// Create a driver reading time from `env`.
    pub fn new(env: SimEnv) -> Self {
        Self {
            env,
            script: VecDeque::new(),
            output: Vec::new(),
            next_handle: 0,
            renders: 0,
            fail_render_at: None,
            shut_down: false,
            invariants: None,
        }
    }

    /// Enable invariant checking on every render.
    #[must_use]
    pub fn with_invariants(mut self, registry: InvariantRegistry) -> Self {
        self.invariants = Some(registry);
        self
    }

    /// Schedule `event` at `millis` after the epoch.
    ///
    /// Events at the same instant are delivered in scheduling order.
    pub fn at(&mut self, millis: u64, event: InputEvent) -> &mut Self {
        let at = SimInstant::from_millis(millis);
        let index = self.script.partition_point(|(scheduled, _)| *scheduled <= at);
        self.script.insert(index, (at, event));
        self
    }

    /// Make the `n`th render (1-based) fail.
    pub fn fail_render_at(&mut self, n: usize) {
        self.fail_render_at = Some(n);
    }

    /// The virtual clock.
    pub fn env(&self) -> &SimEnv {
        &self.env
    }

    /// Everything output so far, in order.
    pub fn output(&self) -> &[Output] {
        &self.output
    }

    /// Drain recorded output.
    pub fn take_output(&mut self) -> Vec<Output> {
        std::mem::take(&mut self.output)
    }

    /// Announced texts, in order.
    pub fn messages(&self) -> Vec<&str> {
        self.output
            .iter()
            .filter_map(|out| match out {
                Output::Message(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Number of renders so far.
    pub fn renders(&self) -> usize {
        self.renders
    }

    /// True once the runtime has shut the driver down.
    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// Events not yet delivered.
    pub fn pending(&self) -> usize {
        self.script.len()
    }
}

impl SoundPlayer for SimDriver {
    type Handle = u64;

    fn play(&mut self, sound: &SoundId) -> Option<u64> {
        self.next_handle += 1;
        self.output.push(Output::Play { handle: self.next_handle, sound: sound.clone() });
        Some(self.next_handle)
    }

    fn stop(&mut self, handle: u64) {
        self.output.push(Output::Stop { handle });
    }
}

impl Announcer for SimDriver {
    fn message(&mut self, text: &str) {
        self.output.push(Output::Message(text.to_string()));
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;
    type Instant = SimInstant;

    async fn poll_event(
        &mut self,
        deadline: Option<SimInstant>,
    ) -> Result<Option<InputEvent>, SimDriverError> {
        let Some(&(at, _)) = self.script.front() else {
            return Ok(Some(InputEvent::Quit));
        };

        if let Some(deadline) = deadline
            && deadline < at
        {
            self.env.advance_to(deadline);
            return Ok(None);
        }

        self.env.advance_to(at);
        Ok(self.script.pop_front().map(|(_, event)| event))
    }

    fn now(&self) -> SimInstant {
        self.env.now()
    }

    fn render(&mut self, book: &Book<SimInstant>) -> Result<(), SimDriverError> {
        self.renders += 1;
        if self.fail_render_at == Some(self.renders) {
            return Err(SimDriverError(format!("render {} failed", self.renders)));
        }
        if let Some(registry) = &self.invariants {
            registry.assert_all(&SystemSnapshot::from_book(book), "after render");
        }
        Ok(())
    }

    fn shutdown(&mut self) {
        tracing::debug!(renders = self.renders, "sim driver shut down");
        self.shut_down = true;
    }
}
