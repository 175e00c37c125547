//! Standard invariant checks.

use std::collections::HashSet;

use super::{Invariant, InvariantResult, SystemSnapshot, Violation};

/// Focus is the title or a valid line index on every page.
///
/// Navigation clamps at both ends and search only focuses lines it found, so
/// an out-of-range focus means a cursor update skipped its bounds check.
pub struct FocusInRange;

impl Invariant for FocusInRange {
    fn name(&self) -> &'static str {
        "focus_in_range"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for (depth, page) in state.pages.iter().enumerate() {
            if let Some(focus) = page.focus
                && focus >= page.len
            {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!(
                        "page {depth} ({:?}): focus {focus} with {} lines",
                        page.title, page.len
                    ),
                });
            }
        }
        Ok(())
    }
}

/// The search buffer only ever holds case-folded text.
pub struct SearchBufferFolded;

impl Invariant for SearchBufferFolded {
    fn name(&self) -> &'static str {
        "search_buffer_folded"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        if state.search_buffer != state.search_buffer.to_lowercase() {
            return Err(Violation {
                invariant: self.name(),
                message: format!("search buffer {:?} is not lowercase", state.search_buffer),
            });
        }
        Ok(())
    }
}

/// No key state appears twice in the held set.
pub struct HeldKeysUnique;

impl Invariant for HeldKeysUnique {
    fn name(&self) -> &'static str {
        "held_keys_unique"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        let mut seen = HashSet::new();
        for key in &state.held {
            if !seen.insert(key) {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!("{key} held twice"),
                });
            }
        }
        Ok(())
    }
}

/// A repeat timer exists only while its trigger is held.
///
/// A timer outliving its key would keep firing after release.
pub struct TimersOnlyWhileHeld;

impl Invariant for TimersOnlyWhileHeld {
    fn name(&self) -> &'static str {
        "timers_only_while_held"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        match state.timers.iter().find(|timer| !timer.held) {
            Some(timer) => Err(Violation {
                invariant: self.name(),
                message: format!("timer armed for {} which is not held", timer.trigger),
            }),
            None => Ok(()),
        }
    }
}
