//! Fuzz target for keyboard-driven menu navigation
//!
//! Drives the sample menu with arbitrary presses, releases, clock advances
//! and focus loss.
//!
//! # Invariants
//!
//! - Focus always points at a line of its page, or the title
//! - The search buffer is always case-folded
//! - Held keys are unique and repeat timers only run while their key is held
//! - The non-dismissible root page is never popped

#![no_main]

use keybook_harness::{Operation, World};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|ops: Vec<Operation>| {
    let mut world = World::new();

    for op in &ops {
        world.apply(op);

        if let Err(violations) = world.check() {
            panic!("invariants violated after {op:?}: {violations:?}");
        }
        assert!(world.book().depth() >= 1, "root page dismissed after {op:?}");
    }
});
