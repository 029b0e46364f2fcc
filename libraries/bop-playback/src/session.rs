//! Playback session - one playlist driving one voice sink
//!
//! Every session runs a worker task that owns the voice sink. Commands
//! (play, skip, pause, stop) and stream-completion events travel through
//! the same inbox and are handled strictly one at a time, so a completion
//! can never interleave with an in-flight `play`.
//!
//! Each stream started on the sink gets a fresh [`PlayToken`]. The active
//! token is cleared *before* the session stops or replaces a stream, so the
//! completion that stop produces arrives with a token that is no longer
//! current and is ignored. Only a completion carrying the current token
//! counts as the track ending on its own and triggers auto-advance.

use crate::config::PlaybackConfig;
use crate::error::{PlaybackError, Result};
use crate::playlist::{Playlist, PlaylistSnapshot, PlaylistWindow};
use crate::source::{self, UrlKind};
use crate::track::{MediaContext, Track};
use crate::types::{LoopMode, PlayToken, PlaybackState};
use bop_core::{AudioStream, ChannelId, CompletionNotifier, RequesterId, StreamEnd, VoiceSink};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch, RwLock};
use tracing::{debug, info, info_span, warn, Instrument};

/// Playlist plus the state that must change together with it
struct QueueState {
    playlist: Playlist<Arc<Track>>,
    loop_mode: LoopMode,

    /// Bumped whenever the current track may have changed under the worker
    generation: u64,
}

impl QueueState {
    fn bump(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    fn current(&self) -> Option<Arc<Track>> {
        self.playlist.now_playing().cloned()
    }

    /// Bump only if the current track is no longer `before`
    fn bump_if_moved(&mut self, before: Option<&Arc<Track>>) {
        let unchanged = match (before, self.playlist.now_playing()) {
            (Some(before), Some(now)) => Arc::ptr_eq(before, now),
            (None, None) => true,
            _ => false,
        };
        if !unchanged {
            self.bump();
        }
    }
}

struct SessionShared {
    queue: RwLock<QueueState>,
    media: Arc<MediaContext>,
}

impl SessionShared {
    /// Current track together with the generation it was read under
    async fn target(&self) -> Option<(Arc<Track>, u64)> {
        let queue = self.queue.read().await;
        queue
            .playlist
            .now_playing()
            .map(|track| (Arc::clone(track), queue.generation))
    }

    async fn is_current(&self, track: &Arc<Track>, generation: u64) -> bool {
        let queue = self.queue.read().await;
        queue.generation == generation
            && queue
                .playlist
                .now_playing()
                .is_some_and(|current| Arc::ptr_eq(current, track))
    }
}

enum SessionMessage {
    Play(oneshot::Sender<bool>),
    PlayNext(oneshot::Sender<bool>),
    Pause(oneshot::Sender<()>),
    Resume(oneshot::Sender<()>),
    Stop(oneshot::Sender<()>),
    Shutdown(oneshot::Sender<()>),
    Completed { token: PlayToken, end: StreamEnd },
}

/// Handle to a playback session
///
/// Cheap to clone; all clones talk to the same worker. Playlist reads take
/// tracks and cursor under one lock, so they never observe a torn state.
#[derive(Clone)]
pub struct PlaybackSession {
    channel: ChannelId,
    shared: Arc<SessionShared>,
    inbox: mpsc::UnboundedSender<SessionMessage>,
    state: watch::Receiver<PlaybackState>,
}

impl PlaybackSession {
    /// Start a session worker for `channel`
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(
        channel: ChannelId,
        sink: Arc<dyn VoiceSink>,
        media: Arc<MediaContext>,
        config: &PlaybackConfig,
    ) -> Self {
        let shared = Arc::new(SessionShared {
            queue: RwLock::new(QueueState {
                playlist: Playlist::new(),
                loop_mode: config.initial_loop_mode,
                generation: 0,
            }),
            media,
        });

        let (inbox, messages) = mpsc::unbounded_channel();
        let (state_tx, state) = watch::channel(PlaybackState::Idle);

        let worker = SessionWorker {
            channel,
            shared: Arc::clone(&shared),
            sink,
            inbox: inbox.downgrade(),
            active: None,
            next_token: PlayToken::first(),
            settle_delay: config.settle_delay(),
            state: state_tx,
        };

        tokio::spawn(
            worker
                .run(messages)
                .instrument(info_span!("session", channel = %channel)),
        );

        debug!(%channel, "Session started");

        Self {
            channel,
            shared,
            inbox,
            state,
        }
    }

    pub fn channel(&self) -> ChannelId {
        self.channel
    }

    pub fn media(&self) -> &Arc<MediaContext> {
        &self.shared.media
    }

    // ===== Queueing =====

    /// Queue a video or playlist URL
    ///
    /// Playlists are expanded now, one track per entry. Returns the queued
    /// tracks; empty if the URL is unsupported or expansion failed.
    pub async fn queue(&self, url: &str, requester: Option<RequesterId>) -> Vec<Arc<Track>> {
        let urls = match source::classify(url) {
            UrlKind::Single(url) => vec![url],
            UrlKind::Playlist(url) => {
                match source::expand_playlist(self.shared.media.resolver(), &url).await {
                    Ok(urls) => urls,
                    Err(e) => {
                        warn!(channel = %self.channel, %url, error = %e, "Playlist expansion failed");
                        return Vec::new();
                    }
                }
            }
            UrlKind::Unsupported => {
                info!(channel = %self.channel, %url, "Unsupported URL");
                return Vec::new();
            }
        };

        let tracks: Vec<Arc<Track>> = urls
            .into_iter()
            .map(|url| Arc::new(Track::new(url, requester, Arc::clone(&self.shared.media))))
            .collect();

        self.shared
            .queue
            .write()
            .await
            .playlist
            .extend(tracks.iter().cloned());

        info!(channel = %self.channel, count = tracks.len(), "Queued tracks");
        tracks
    }

    // ===== Playback Control =====

    /// (Re)start the current track
    ///
    /// Unplayable tracks are skipped the same way auto-advance skips them.
    /// Returns `false` if nothing could be started.
    pub async fn play(&self) -> Result<bool> {
        self.request(SessionMessage::Play).await
    }

    /// Advance according to the loop mode and play
    ///
    /// Returns `false` at the end of the queue (session left idle).
    pub async fn play_next(&self) -> Result<bool> {
        self.request(SessionMessage::PlayNext).await
    }

    /// Pause playback
    pub async fn pause(&self) -> Result<()> {
        self.request(SessionMessage::Pause).await
    }

    /// Resume playback
    pub async fn resume(&self) -> Result<()> {
        self.request(SessionMessage::Resume).await
    }

    /// Stop the active stream without touching the playlist
    pub async fn stop(&self) -> Result<()> {
        self.request(SessionMessage::Stop).await
    }

    /// Stop playback, release the sink, and end the worker
    pub(crate) async fn shutdown(&self) -> Result<()> {
        self.request(SessionMessage::Shutdown).await
    }

    pub fn state(&self) -> PlaybackState {
        *self.state.borrow()
    }

    /// Watch state transitions
    pub fn subscribe_state(&self) -> watch::Receiver<PlaybackState> {
        self.state.clone()
    }

    // ===== Playlist Access =====

    pub async fn now_playing(&self) -> Option<Arc<Track>> {
        self.shared.queue.read().await.playlist.now_playing().cloned()
    }

    pub async fn list(&self) -> Vec<Arc<Track>> {
        self.shared.queue.read().await.playlist.tracks().to_vec()
    }

    pub async fn index(&self) -> usize {
        self.shared.queue.read().await.playlist.index()
    }

    pub async fn len(&self) -> usize {
        self.shared.queue.read().await.playlist.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.shared.queue.read().await.playlist.is_empty()
    }

    pub async fn snapshot(&self) -> PlaylistSnapshot<Arc<Track>> {
        self.shared.queue.read().await.playlist.snapshot()
    }

    pub async fn window(&self, before: usize, after: usize) -> PlaylistWindow<Arc<Track>> {
        self.shared.queue.read().await.playlist.window(before, after)
    }

    // ===== Playlist Mutation =====

    /// Remove track by index, returning it
    pub async fn remove(&self, index: usize) -> Result<Arc<Track>> {
        let mut queue = self.shared.queue.write().await;
        let before = queue.current();
        let track = queue.playlist.remove(index)?;
        queue.bump_if_moved(before.as_ref());
        Ok(track)
    }

    pub async fn clear(&self) {
        let mut queue = self.shared.queue.write().await;
        queue.playlist.clear();
        queue.bump();
    }

    /// Shuffle, keeping the current track current
    pub async fn shuffle(&self) {
        self.shared.queue.write().await.playlist.shuffle();
    }

    /// Move the cursor (see [`Playlist::jump`]); does not start playback
    pub async fn jump(&self, n: i64, relative: bool) -> Option<Arc<Track>> {
        let mut queue = self.shared.queue.write().await;
        let before = queue.current();
        let track = queue.playlist.jump(n, relative).cloned();
        queue.bump_if_moved(before.as_ref());
        track
    }

    pub async fn loop_mode(&self) -> LoopMode {
        self.shared.queue.read().await.loop_mode
    }

    pub async fn set_loop_mode(&self, mode: LoopMode) {
        self.shared.queue.write().await.loop_mode = mode;
        debug!(channel = %self.channel, ?mode, "Loop mode changed");
    }

    async fn request<R>(&self, message: impl FnOnce(oneshot::Sender<R>) -> SessionMessage) -> Result<R> {
        let (reply, response) = oneshot::channel();
        self.inbox
            .send(message(reply))
            .map_err(|_| PlaybackError::SessionClosed)?;
        response.await.map_err(|_| PlaybackError::SessionClosed)
    }
}

enum StartOutcome {
    Started,
    /// Track cannot be played; skip past it
    Unplayable,
    /// Playlist moved while the endpoint was resolving
    Superseded,
    SinkFailed,
}

struct SessionWorker {
    channel: ChannelId,
    shared: Arc<SessionShared>,
    sink: Arc<dyn VoiceSink>,
    inbox: mpsc::WeakUnboundedSender<SessionMessage>,
    active: Option<PlayToken>,
    next_token: PlayToken,
    settle_delay: Duration,
    state: watch::Sender<PlaybackState>,
}

impl SessionWorker {
    async fn run(mut self, mut messages: mpsc::UnboundedReceiver<SessionMessage>) {
        while let Some(message) = messages.recv().await {
            match message {
                SessionMessage::Play(reply) => {
                    let started = self.play().await;
                    let _ = reply.send(started);
                }
                SessionMessage::PlayNext(reply) => {
                    let started = self.play_next().await;
                    let _ = reply.send(started);
                }
                SessionMessage::Pause(reply) => {
                    self.pause().await;
                    let _ = reply.send(());
                }
                SessionMessage::Resume(reply) => {
                    self.resume().await;
                    let _ = reply.send(());
                }
                SessionMessage::Stop(reply) => {
                    self.halt().await;
                    let _ = reply.send(());
                }
                SessionMessage::Completed { token, end } => {
                    self.on_completed(token, end).await;
                }
                SessionMessage::Shutdown(reply) => {
                    self.close().await;
                    let _ = reply.send(());
                    return;
                }
            }
        }

        // Every handle dropped without an explicit shutdown
        self.close().await;
    }

    async fn play(&mut self) -> bool {
        let mut skips_left = self.shared.queue.read().await.playlist.len();

        loop {
            let Some((track, generation)) = self.shared.target().await else {
                debug!("Nothing to play");
                return false;
            };

            match self.start_track(&track, generation).await {
                StartOutcome::Started => return true,
                StartOutcome::Superseded | StartOutcome::SinkFailed => return false,
                StartOutcome::Unplayable => {
                    info!(url = %track.url(), "Skipping unplayable track");
                    if skips_left == 0 || !self.advance(true).await {
                        self.halt().await;
                        return false;
                    }
                    skips_left -= 1;
                }
            }
        }
    }

    async fn play_next(&mut self) -> bool {
        if !self.advance(false).await {
            info!("End of queue");
            self.halt().await;
            return false;
        }
        self.play().await
    }

    /// Move the cursor for the next play
    ///
    /// `skipping` ignores song-loop so an unplayable track is never retried
    /// forever.
    async fn advance(&self, skipping: bool) -> bool {
        let mut queue = self.shared.queue.write().await;

        if queue.loop_mode == LoopMode::Song && !skipping {
            return queue.playlist.now_playing().is_some();
        }

        if queue.playlist.has_next() {
            queue.playlist.go_next();
        } else if queue.loop_mode == LoopMode::Queue && !queue.playlist.is_empty() {
            queue.playlist.jump(0, false);
        } else {
            return false;
        }

        queue.bump();
        true
    }

    async fn start_track(&mut self, track: &Arc<Track>, generation: u64) -> StartOutcome {
        if !track.is_valid() {
            return StartOutcome::Unplayable;
        }

        let Some(endpoint) = track.audio_endpoint().await else {
            return StartOutcome::Unplayable;
        };

        if !self.shared.is_current(track, generation).await {
            debug!(url = %track.url(), "Dropping endpoint for superseded track");
            return StartOutcome::Superseded;
        }

        let token = self.next_token;
        self.next_token = token.next();

        // Clear before stopping so the old stream's completion is ignored
        if let Some(previous) = self.active.take() {
            debug!(%previous, "Replacing active stream");
            self.sink.stop().await;
        }

        let (notifier, completion) = CompletionNotifier::channel();
        let stream = AudioStream {
            track_url: track.url().to_string(),
            endpoint,
        };

        self.active = Some(token);
        if let Err(e) = self.sink.start(stream, notifier).await {
            warn!(url = %track.url(), error = %e, "Voice sink refused stream");
            self.active = None;
            self.set_state(PlaybackState::Idle);
            return StartOutcome::SinkFailed;
        }

        self.forward_completion(token, completion);
        self.set_state(PlaybackState::Playing);
        info!(%token, url = %track.url(), "Now playing");

        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }

        StartOutcome::Started
    }

    /// Relay the sink's completion into the inbox, tagged with its token
    fn forward_completion(&self, token: PlayToken, completion: oneshot::Receiver<StreamEnd>) {
        let inbox = self.inbox.clone();
        tokio::spawn(async move {
            let end = completion.await.unwrap_or(StreamEnd::Stopped);
            if let Some(inbox) = inbox.upgrade() {
                let _ = inbox.send(SessionMessage::Completed { token, end });
            }
        });
    }

    async fn on_completed(&mut self, token: PlayToken, end: StreamEnd) {
        if self.active != Some(token) {
            debug!(%token, ?end, "Ignoring completion of replaced stream");
            return;
        }

        self.active = None;
        self.set_state(PlaybackState::Idle);

        match end {
            StreamEnd::Finished => {
                debug!(%token, "Track finished");
                self.play_next().await;
            }
            StreamEnd::Stopped => {
                info!(%token, "Stream stopped by voice sink");
            }
        }
    }

    async fn pause(&mut self) {
        if self.active.is_none() || self.sink.is_paused() || !self.sink.is_playing() {
            return;
        }
        self.sink.pause().await;
        self.set_state(PlaybackState::Paused);
    }

    async fn resume(&mut self) {
        if self.active.is_none() || !self.sink.is_paused() {
            return;
        }
        self.sink.resume().await;
        self.set_state(PlaybackState::Playing);
    }

    /// Stop the active stream, suppressing its completion
    async fn halt(&mut self) {
        if let Some(token) = self.active.take() {
            debug!(%token, "Stopping active stream");
            self.sink.stop().await;
        }
        self.set_state(PlaybackState::Idle);
    }

    async fn close(&mut self) {
        self.halt().await;
        self.sink.release().await;
        debug!(channel = %self.channel, "Session closed");
    }

    fn set_state(&self, state: PlaybackState) {
        self.state.send_replace(state);
    }
}
