//! Bop Core
//!
//! Shared types, collaborator traits, and error handling for the Bop
//! playback engine.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `ChannelId`, `ResolvedMedia`, `TrackMetadata`, `AudioStream`, etc.
//! - **Collaborator Traits**: `MediaResolver`, `EndpointProbe`, `VoiceSink`
//! - **Error Handling**: `ResolveError` and `SinkError`
//!
//! # Example
//!
//! ```rust
//! use bop_core::types::{ResolvedMedia, TrackMetadata, MediaFormat};
//!
//! let resolved = ResolvedMedia {
//!     title: Some("Never Gonna Give You Up".to_string()),
//!     duration_secs: Some(213),
//!     formats: Some(vec![MediaFormat {
//!         id: "251".to_string(),
//!         audio_codec: Some("opus".to_string()),
//!         url: "https://media.example/251".to_string(),
//!     }]),
//! };
//!
//! let meta = TrackMetadata::from_resolved("https://youtu.be/dQw4w9WgXcQ", resolved).unwrap();
//! assert_eq!(meta.duration.as_secs(), 213);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{ResolveError, Result, SinkError};
pub use traits::{EndpointProbe, MediaResolver, VoiceSink};

#[cfg(any(test, feature = "mock"))]
pub use traits::{MockEndpointProbe, MockMediaResolver};

pub use types::{
    AudioEndpoint, AudioStream, ChannelId, CompletionNotifier, MediaFormat, MissingField,
    PlaylistEntry, RequesterId, ResolvedMedia, StreamEnd, TrackMetadata,
};
