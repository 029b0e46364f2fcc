//! Bop - Playback Sessions
//!
//! Per-voice-channel playback for a chat bot: a playlist of lazily
//! resolved tracks feeding a voice sink, with automatic advance when a
//! track ends.
//!
//! This crate provides:
//! - Playlist with cursor, shuffle, jump and removal semantics
//! - Tracks with expiring metadata and endpoint re-validation
//! - Loop modes (Off, Song, Queue)
//! - Playback session worker with stop/skip suppression
//! - Session store keyed by voice channel
//! - Source URL classification and playlist expansion
//! - HTTP endpoint liveness probe
//!
//! # Architecture
//!
//! `bop-playback` knows nothing about the chat platform or the extractor:
//! - Metadata comes from a [`MediaResolver`](bop_core::MediaResolver)
//! - Stream URLs are checked by an [`EndpointProbe`](bop_core::EndpointProbe)
//! - Audio goes out through a [`VoiceSink`](bop_core::VoiceSink)
//!
//! # Example: Playlist
//!
//! ```rust
//! use bop_playback::Playlist;
//!
//! let mut playlist = Playlist::new();
//! playlist.extend(["a", "b", "c"]);
//!
//! assert_eq!(playlist.now_playing(), Some(&"a"));
//! playlist.go_next();
//! assert_eq!(playlist.now_playing(), Some(&"b"));
//!
//! // Removing before the cursor keeps the same track current
//! playlist.remove(0).unwrap();
//! assert_eq!(playlist.now_playing(), Some(&"b"));
//! ```
//!
//! # Example: Session
//!
//! ```rust,ignore
//! use bop_playback::{MediaContext, PlaybackConfig, SessionStore};
//!
//! let config = PlaybackConfig::load(Some("bop.toml".as_ref()))?;
//! let media = Arc::new(MediaContext::new(resolver, probe, &config));
//! let store = SessionStore::new(config);
//!
//! let session = store.get_or_create(channel, sink, media).await;
//! session.queue("https://youtu.be/dQw4w9WgXcQ", Some(requester)).await;
//! session.play().await?;
//! ```

#![forbid(unsafe_code)]

pub mod config;
mod error;
pub mod playlist;
pub mod probe;
pub mod session;
mod shuffle;
pub mod source;
pub mod store;
pub mod track;
pub mod types;

// Public exports
pub use config::PlaybackConfig;
pub use error::{PlaybackError, PlaylistError, Result};
pub use playlist::{Playlist, PlaylistSnapshot, PlaylistWindow};
pub use probe::HttpEndpointProbe;
pub use session::PlaybackSession;
pub use source::UrlKind;
pub use store::SessionStore;
pub use track::{MediaContext, Track, ERROR_TITLE};
pub use types::{LoopMode, PlayToken, PlaybackState};
