//! Book configuration.

use std::time::Duration;

use crate::SoundId;

/// Gap after which the incremental search buffer starts over.
pub const DEFAULT_SEARCH_TIMEOUT: Duration = Duration::from_secs(1);

/// Sounds used for the standard feedback events. `None` keeps a slot silent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundSet {
    /// Played when focus lands on a line that has no sound of its own.
    pub movement: Option<SoundId>,
    /// Played when a line is activated.
    pub activate: Option<SoundId>,
    /// Played when cancel is refused.
    pub no_cancel: Option<SoundId>,
    /// Played when a search matches.
    pub search_success: Option<SoundId>,
    /// Played when a search finds nothing.
    pub search_fail: Option<SoundId>,
}

impl SoundSet {
    /// All slots silent.
    pub fn silent() -> Self {
        Self {
            movement: None,
            activate: None,
            no_cancel: None,
            search_success: None,
            search_fail: None,
        }
    }
}

impl Default for SoundSet {
    fn default() -> Self {
        Self {
            movement: Some("menu/move".into()),
            activate: Some("menu/activate".into()),
            no_cancel: Some("menu/no_cancel".into()),
            search_success: Some("menu/search_success".into()),
            search_fail: Some("menu/search_fail".into()),
        }
    }
}

/// Configuration for a [`Book`](crate::Book).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookConfig {
    /// Inactivity gap that resets the search buffer.
    pub search_timeout: Duration,
    /// Standard sounds.
    pub sounds: SoundSet,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self { search_timeout: DEFAULT_SEARCH_TIMEOUT, sounds: SoundSet::default() }
    }
}
