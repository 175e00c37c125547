//! Fuzz target for key string parsing
//!
//! # Invariants
//!
//! - Parsing arbitrary text never panics
//! - A parsed key state's canonical string parses back to the same state
//! - Canonical strings are stable: formatting the re-parsed state is a no-op

#![no_main]

use keybook_core::KeyState;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: &str| {
    let Ok(state) = input.parse::<KeyState>() else {
        return;
    };

    let canonical = state.canonical();
    let reparsed: KeyState = match canonical.parse() {
        Ok(reparsed) => reparsed,
        Err(e) => panic!("canonical form {canonical:?} of {input:?} failed to parse: {e}"),
    };

    assert_eq!(reparsed, state, "round trip changed {input:?}");
    assert_eq!(reparsed.canonical(), canonical);
});
