//! Core types for playback management

use serde::{Deserialize, Serialize};
use std::fmt;

/// Loop mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopMode {
    /// Stop when queue ends
    #[default]
    Off,

    /// Repeat current track
    Song,

    /// Wrap to the start of the queue
    Queue,
}

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackState {
    /// No active stream
    #[default]
    Idle,

    /// Stream active
    Playing,

    /// Stream active but paused on the sink
    Paused,
}

/// Identity of one `start` on the voice sink
///
/// Strictly increasing per session. A completion carrying anything other
/// than the current token belongs to a stream the session already
/// abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlayToken(u64);

impl PlayToken {
    pub(crate) fn first() -> Self {
        Self(1)
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for PlayToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loop_mode_defaults_off() {
        assert_eq!(LoopMode::default(), LoopMode::Off);
        assert_eq!(PlaybackState::default(), PlaybackState::Idle);
    }

    #[test]
    fn loop_mode_deserializes_lowercase() {
        let mode: LoopMode = serde_json::from_str("\"queue\"").unwrap();
        assert_eq!(mode, LoopMode::Queue);
    }

    #[test]
    fn tokens_increase() {
        let first = PlayToken::first();
        assert!(first.next() > first);
        assert_eq!(first.next().to_string(), "#2");
    }
}
