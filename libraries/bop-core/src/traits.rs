//! Collaborator traits for the playback engine
//!
//! The playback engine never talks to extractors, HTTP or voice gateways
//! directly; platform code provides these.

use crate::error::{Result, SinkError};
use crate::types::{AudioStream, CompletionNotifier, PlaylistEntry, ResolvedMedia};
use async_trait::async_trait;

/// Metadata and stream-URL lookup
///
/// Implementations must report every failure (including transient network
/// errors) as an `Err`, never panic.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait MediaResolver: Send + Sync {
    /// Resolve a single video URL to its metadata and candidate formats
    async fn resolve(&self, url: &str) -> Result<ResolvedMedia>;

    /// Expand a playlist URL into its entries
    async fn expand_playlist(&self, url: &str) -> Result<Vec<PlaylistEntry>>;
}

/// Cheap existence check for a resolved stream URL
///
/// Resolved endpoints are signed URLs that expire; this is asked right
/// before handing one to the sink.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait EndpointProbe: Send + Sync {
    /// Whether the endpoint currently answers
    async fn is_live(&self, endpoint_url: &str) -> bool;
}

/// Real-time audio output for one voice connection
///
/// At most one stream is active at a time. Every successful `start` must
/// eventually fire its [`CompletionNotifier`], either when the audio runs
/// out or when the stream is stopped/replaced. Notification is expected to
/// arrive from the sink's own execution context.
#[async_trait]
pub trait VoiceSink: Send + Sync {
    /// Start streaming, implicitly stopping any prior stream
    ///
    /// # Errors
    /// Returns an error if the transport cannot accept the stream; the
    /// notifier is dropped in that case.
    async fn start(
        &self,
        stream: AudioStream,
        completion: CompletionNotifier,
    ) -> std::result::Result<(), SinkError>;

    /// Stop the active stream, if any
    async fn stop(&self);

    /// Pause the active stream
    async fn pause(&self);

    /// Resume a paused stream
    async fn resume(&self);

    /// Whether a stream is active and not paused
    fn is_playing(&self) -> bool;

    /// Whether a stream is active but paused
    fn is_paused(&self) -> bool;

    /// Leave the voice channel; called once when the session is destroyed
    async fn release(&self) {}
}
