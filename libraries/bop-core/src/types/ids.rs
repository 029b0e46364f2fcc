/// ID types for voice channels and command issuers
use serde::{Deserialize, Serialize};
use std::fmt;

/// Voice channel identifier
///
/// One playback session exists per voice channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(u64);

impl ChannelId {
    /// Create a new channel ID
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw value
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ChannelId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Identifier of the user who queued a track
///
/// Opaque to the playback engine; only carried for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequesterId(u64);

impl RequesterId {
    /// Create a new requester ID
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw value
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequesterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RequesterId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_id_roundtrips_through_json() {
        let id = ChannelId::new(730136766748819609);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "730136766748819609");

        let back: ChannelId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn requester_id_displays_raw_value() {
        assert_eq!(RequesterId::from(42).to_string(), "42");
    }
}
