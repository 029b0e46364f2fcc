//! Error types for playback management

use bop_core::ChannelId;
use thiserror::Error;

/// Playlist navigation/mutation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlaylistError {
    /// Index does not address a track
    #[error("Index {index} out of bounds for playlist of {len}")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// Playback errors
///
/// Resolution and voice-sink failures never show up here; they are absorbed
/// into `false`/`None` results by the session.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Playlist contract violation (e.g. removing a missing index)
    #[error(transparent)]
    Playlist(#[from] PlaylistError),

    /// The session's worker has shut down
    #[error("Session closed")]
    SessionClosed,

    /// A session already exists for the channel
    #[error("Session already exists for channel {0}")]
    SessionExists(ChannelId),

    /// No session for the channel
    #[error("No session for channel {0}")]
    SessionNotFound(ChannelId),

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
