//! Output collaborators.

use keybook_menu::SoundId;

/// Plays sounds and stops them by handle.
pub trait SoundPlayer {
    /// Handle identifying a playing sound.
    type Handle;

    /// Start playing `sound`. `None` if it could not be started.
    fn play(&mut self, sound: &SoundId) -> Option<Self::Handle>;

    /// Stop a sound started by [`play`](SoundPlayer::play). Stopping a sound
    /// that already finished is a no-op.
    fn stop(&mut self, handle: Self::Handle);
}

/// Speaks or displays text.
pub trait Announcer {
    /// Announce `text`, interrupting any announcement in progress.
    fn message(&mut self, text: &str);
}
