//! Queued track with lazily resolved, expiring metadata
//!
//! Stream URLs handed out by resolvers are signed and time-limited, so a
//! track keeps its metadata only for a fixed TTL and re-validates the
//! selected endpoint right before playback.

use crate::config::PlaybackConfig;
use bop_core::{
    AudioEndpoint, EndpointProbe, MediaFormat, MediaResolver, RequesterId, TrackMetadata,
};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Title reported for tracks whose metadata cannot be resolved
pub const ERROR_TITLE: &str = "(error)";

/// Collaborators and policy shared by every track of a session
pub struct MediaContext {
    resolver: Arc<dyn MediaResolver>,
    probe: Arc<dyn EndpointProbe>,
    metadata_ttl: Duration,
    endpoint_attempts: u32,
}

impl MediaContext {
    pub fn new(
        resolver: Arc<dyn MediaResolver>,
        probe: Arc<dyn EndpointProbe>,
        config: &PlaybackConfig,
    ) -> Self {
        Self {
            resolver,
            probe,
            metadata_ttl: config.metadata_ttl(),
            endpoint_attempts: config.endpoint_attempts.max(1),
        }
    }

    pub fn resolver(&self) -> &dyn MediaResolver {
        self.resolver.as_ref()
    }

    pub fn metadata_ttl(&self) -> Duration {
        self.metadata_ttl
    }
}

#[derive(Debug, Default)]
struct MetadataCache {
    metadata: Option<TrackMetadata>,
    expires_at: Option<Instant>,
}

impl MetadataCache {
    fn is_fresh(&self, now: Instant) -> bool {
        self.metadata.is_some() && self.expires_at.is_some_and(|at| now < at)
    }

    /// Keep the data but force a refresh on next access
    fn expire(&mut self, now: Instant) {
        self.expires_at = Some(now);
    }

    fn store(&mut self, metadata: TrackMetadata, expires_at: Instant) {
        self.metadata = Some(metadata);
        self.expires_at = Some(expires_at);
    }

    fn reset(&mut self) {
        self.metadata = None;
        self.expires_at = None;
    }
}

/// A single playable item
///
/// The URL is the track's identity. Metadata is fetched on first use and
/// cached until it goes stale; a failed resolution marks the track invalid
/// for good.
pub struct Track {
    url: String,
    requester: Option<RequesterId>,
    media: Arc<MediaContext>,
    cache: Mutex<MetadataCache>,
    valid: AtomicBool,
}

impl Track {
    pub fn new(
        url: impl Into<String>,
        requester: Option<RequesterId>,
        media: Arc<MediaContext>,
    ) -> Self {
        Self {
            url: url.into(),
            requester,
            media,
            cache: Mutex::new(MetadataCache::default()),
            valid: AtomicBool::new(true),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn requester(&self) -> Option<RequesterId> {
        self.requester
    }

    /// False once resolution has failed or returned incomplete data
    pub fn is_valid(&self) -> bool {
        self.valid.load(Ordering::Acquire)
    }

    /// Whether cached metadata can be used without asking the resolver
    pub async fn is_fresh(&self) -> bool {
        self.cache.lock().await.is_fresh(Instant::now())
    }

    /// Title, or [`ERROR_TITLE`] if it cannot be resolved
    pub async fn title(&self) -> String {
        self.metadata()
            .await
            .map(|meta| meta.title)
            .unwrap_or_else(|| ERROR_TITLE.to_string())
    }

    /// Duration, zero if it cannot be resolved
    pub async fn duration(&self) -> Duration {
        self.metadata()
            .await
            .map(|meta| meta.duration)
            .unwrap_or_default()
    }

    /// Validated metadata, refreshed if stale
    pub async fn metadata(&self) -> Option<TrackMetadata> {
        let mut cache = self.cache.lock().await;
        self.refresh_if_stale(&mut cache).await;
        cache.metadata.clone()
    }

    /// Select and validate a live audio endpoint
    ///
    /// Prefers an Opus format, else the first format with audio. A dead
    /// endpoint expires the cache and the whole resolve+probe cycle is
    /// retried, up to the configured number of attempts.
    pub async fn audio_endpoint(&self) -> Option<AudioEndpoint> {
        let attempts = self.media.endpoint_attempts;
        let mut cache = self.cache.lock().await;

        for attempt in 1..=attempts {
            self.refresh_if_stale(&mut cache).await;

            let Some(metadata) = cache.metadata.as_ref() else {
                // Resolution failed; track already marked invalid
                return None;
            };

            let Some(endpoint) = select_endpoint(&metadata.formats) else {
                debug!(url = %self.url, "No format with audio");
                return None;
            };

            if self.media.probe.is_live(&endpoint.url).await {
                debug!(url = %self.url, format = %endpoint.format_id, attempt, "Endpoint live");
                return Some(endpoint);
            }

            warn!(
                url = %self.url,
                format = %endpoint.format_id,
                attempt,
                attempts,
                "Endpoint failed liveness check"
            );
            cache.expire(Instant::now());
        }

        warn!(url = %self.url, attempts, "Giving up on endpoint");
        self.invalidate();
        None
    }

    async fn refresh_if_stale(&self, cache: &mut MetadataCache) {
        let now = Instant::now();
        if cache.is_fresh(now) {
            return;
        }

        debug!(url = %self.url, "Resolving metadata");
        match self.media.resolver.resolve(&self.url).await {
            Ok(resolved) => match TrackMetadata::from_resolved(&self.url, resolved) {
                Ok(metadata) => cache.store(metadata, now + self.media.metadata_ttl),
                Err(missing) => {
                    warn!(url = %self.url, ?missing, "Resolved metadata incomplete");
                    cache.reset();
                    self.invalidate();
                }
            },
            Err(e) => {
                warn!(url = %self.url, error = %e, "Metadata resolution failed");
                cache.reset();
                self.invalidate();
            }
        }
    }

    fn invalidate(&self) {
        self.valid.store(false, Ordering::Release);
    }
}

impl fmt::Debug for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Track")
            .field("url", &self.url)
            .field("requester", &self.requester)
            .field("valid", &self.is_valid())
            .finish_non_exhaustive()
    }
}

fn select_endpoint(formats: &[MediaFormat]) -> Option<AudioEndpoint> {
    let format = formats
        .iter()
        .find(|f| f.is_opus())
        .or_else(|| formats.iter().find(|f| f.has_audio()))?;

    Some(AudioEndpoint {
        url: format.url.clone(),
        format_id: format.id.clone(),
        codec: format.audio_codec.clone(),
    })
}
