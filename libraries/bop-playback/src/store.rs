//! Per-channel session registry

use crate::config::PlaybackConfig;
use crate::error::{PlaybackError, Result};
use crate::session::PlaybackSession;
use crate::track::MediaContext;
use bop_core::{ChannelId, VoiceSink};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// At most one playback session per voice channel
pub struct SessionStore {
    config: PlaybackConfig,
    sessions: RwLock<HashMap<ChannelId, PlaybackSession>>,
}

impl SessionStore {
    pub fn new(config: PlaybackConfig) -> Self {
        Self {
            config,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// Create the session for `channel`
    ///
    /// Fails with [`PlaybackError::SessionExists`] if one is already bound.
    pub async fn create(
        &self,
        channel: ChannelId,
        sink: Arc<dyn VoiceSink>,
        media: Arc<MediaContext>,
    ) -> Result<PlaybackSession> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&channel) {
            return Err(PlaybackError::SessionExists(channel));
        }

        let session = PlaybackSession::spawn(channel, sink, media, &self.config);
        sessions.insert(channel, session.clone());
        info!(%channel, "Session created");
        Ok(session)
    }

    /// Existing session for `channel`, or a new one bound to `sink`
    ///
    /// `sink` is dropped unused when the session already exists.
    pub async fn get_or_create(
        &self,
        channel: ChannelId,
        sink: Arc<dyn VoiceSink>,
        media: Arc<MediaContext>,
    ) -> PlaybackSession {
        let mut sessions = self.sessions.write().await;
        sessions
            .entry(channel)
            .or_insert_with(|| {
                info!(%channel, "Session created");
                PlaybackSession::spawn(channel, sink, media, &self.config)
            })
            .clone()
    }

    pub async fn lookup(&self, channel: ChannelId) -> Option<PlaybackSession> {
        self.sessions.read().await.get(&channel).cloned()
    }

    /// Stop playback, release the sink, and forget the session
    pub async fn destroy(&self, channel: ChannelId) -> Result<()> {
        let session = self
            .sessions
            .write()
            .await
            .remove(&channel)
            .ok_or(PlaybackError::SessionNotFound(channel))?;

        // A worker that already exited has nothing left to release
        match session.shutdown().await {
            Ok(()) | Err(PlaybackError::SessionClosed) => {}
            Err(e) => return Err(e),
        }

        info!(%channel, "Session destroyed");
        Ok(())
    }

    pub async fn channels(&self) -> Vec<ChannelId> {
        self.sessions.read().await.keys().copied().collect()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
