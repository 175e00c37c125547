//! Feedback produced by menu operations.

use std::fmt;

/// Name of a sound asset. Resolved to audio by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SoundId(String);

impl SoundId {
    /// Create a sound identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Identifier as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SoundId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for SoundId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for SoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Playback slot. At most one sound plays per channel; a new play on the same
/// channel is expected to replace the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Channel {
    /// Focus moved to a line.
    Move,
    /// A line was activated.
    Activate,
    /// Cancel was refused on a non-dismissible page.
    NoCancel,
    /// Incremental search found a match.
    SearchSuccess,
    /// Incremental search found nothing.
    SearchFail,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Move => "move",
            Self::Activate => "activate",
            Self::NoCancel => "no_cancel",
            Self::SearchSuccess => "search_success",
            Self::SearchFail => "search_fail",
        };
        f.write_str(name)
    }
}

/// One output request, in the order the book produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    /// Speak (or display) text.
    Announce(String),

    /// Start `sound` on `channel`.
    Play {
        /// Slot to play on.
        channel: Channel,
        /// Sound to play.
        sound: SoundId,
    },

    /// Stop whatever is playing on `channel`. No-op if nothing is.
    Stop {
        /// Slot to silence.
        channel: Channel,
    },
}

impl Feedback {
    /// Announced text, if this is an announcement.
    pub fn announcement(&self) -> Option<&str> {
        match self {
            Self::Announce(text) => Some(text),
            _ => None,
        }
    }
}
