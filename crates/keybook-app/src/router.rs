//! Executes queued feedback against the output collaborators.

use std::collections::HashMap;

use keybook_menu::{Channel, Feedback};

use crate::{Announcer, SoundPlayer};

/// Tracks which sound handle is live on each [`Channel`].
///
/// Playing on a busy channel stops the previous sound first, so each channel
/// has at most one sound at a time.
#[derive(Debug)]
pub struct FeedbackRouter<H> {
    playing: HashMap<Channel, H>,
}

impl<H> Default for FeedbackRouter<H> {
    fn default() -> Self {
        Self { playing: HashMap::new() }
    }
}

impl<H> FeedbackRouter<H> {
    /// Create a router with no live sounds.
    pub fn new() -> Self {
        Self::default()
    }

    /// True if a sound is tracked on `channel`.
    pub fn is_playing(&self, channel: Channel) -> bool {
        self.playing.contains_key(&channel)
    }

    /// Execute `feedback` in order.
    pub fn apply<O>(&mut self, feedback: impl IntoIterator<Item = Feedback>, output: &mut O)
    where
        O: SoundPlayer<Handle = H> + Announcer,
    {
        for item in feedback {
            match item {
                Feedback::Announce(text) => output.message(&text),
                Feedback::Play { channel, sound } => {
                    if let Some(previous) = self.playing.remove(&channel) {
                        output.stop(previous);
                    }
                    match output.play(&sound) {
                        Some(handle) => {
                            self.playing.insert(channel, handle);
                        },
                        None => tracing::warn!(%channel, %sound, "sound not started"),
                    }
                },
                Feedback::Stop { channel } => {
                    if let Some(handle) = self.playing.remove(&channel) {
                        output.stop(handle);
                    }
                },
            }
        }
    }

    /// Stop every live sound.
    pub fn stop_all<O: SoundPlayer<Handle = H>>(&mut self, output: &mut O) {
        for (_, handle) in self.playing.drain() {
            output.stop(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use keybook_menu::SoundId;

    use super::*;

    #[derive(Default)]
    struct Log {
        next: u32,
        events: Vec<String>,
    }

    impl SoundPlayer for Log {
        type Handle = u32;

        fn play(&mut self, sound: &SoundId) -> Option<u32> {
            self.next += 1;
            self.events.push(format!("play {sound} #{}", self.next));
            Some(self.next)
        }

        fn stop(&mut self, handle: u32) {
            self.events.push(format!("stop #{handle}"));
        }
    }

    impl Announcer for Log {
        fn message(&mut self, text: &str) {
            self.events.push(format!("say {text}"));
        }
    }

    #[test]
    fn play_replaces_previous_on_same_channel() {
        let mut router = FeedbackRouter::new();
        let mut log = Log::default();

        router.apply(
            [
                Feedback::Play { channel: Channel::Move, sound: "a".into() },
                Feedback::Play { channel: Channel::Activate, sound: "b".into() },
                Feedback::Play { channel: Channel::Move, sound: "c".into() },
                Feedback::Announce("hello".to_string()),
            ],
            &mut log,
        );

        assert_eq!(log.events, ["play a #1", "play b #2", "stop #1", "play c #3", "say hello"]);
        assert!(router.is_playing(Channel::Move));
    }

    #[test]
    fn stop_on_idle_channel_is_noop() {
        let mut router = FeedbackRouter::new();
        let mut log = Log::default();

        router.apply([Feedback::Stop { channel: Channel::SearchFail }], &mut log);
        assert!(log.events.is_empty());

        router.apply([Feedback::Play { channel: Channel::SearchFail, sound: "x".into() }], &mut log);
        router.stop_all(&mut log);
        assert_eq!(log.events, ["play x #1", "stop #1"]);
        assert!(!router.is_playing(Channel::SearchFail));
    }
}
