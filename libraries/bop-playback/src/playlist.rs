//! Cursor-addressed playlist
//!
//! Index-based queue with a "now playing" cursor:
//!
//! ```text
//!   0: Track A
//!   1: Track B   <- cursor (now playing)
//!   2: Track C
//! ```
//!
//! The cursor stays in `0..=len`. `cursor == len` means the queue is
//! exhausted and nothing is current.

use crate::error::PlaylistError;
use crate::shuffle::shuffle_around;

/// Ordered playlist with a current-position cursor
///
/// Generic over the item so navigation can be exercised without media
/// plumbing; sessions use `Playlist<Arc<Track>>`.
#[derive(Debug, Clone)]
pub struct Playlist<T> {
    /// Tracks in play order
    tracks: Vec<T>,

    /// Index of the current track
    cursor: usize,
}

/// Tracks and cursor read together
#[derive(Debug, Clone)]
pub struct PlaylistSnapshot<T> {
    pub tracks: Vec<T>,
    pub cursor: usize,
}

impl<T> PlaylistSnapshot<T> {
    /// Current track of the snapshot
    pub fn now_playing(&self) -> Option<&T> {
        self.tracks.get(self.cursor)
    }
}

/// Display slice around the cursor
#[derive(Debug, Clone)]
pub struct PlaylistWindow<T> {
    /// Absolute index of `tracks[0]`
    pub start: usize,

    /// Position of the cursor within `tracks` (may equal `tracks.len()`)
    pub cursor: usize,

    pub tracks: Vec<T>,

    /// Total playlist length
    pub total: usize,
}

impl<T> Playlist<T> {
    /// Create new empty playlist
    pub fn new() -> Self {
        Self {
            tracks: Vec::new(),
            cursor: 0,
        }
    }

    /// Append a track; the cursor does not move
    pub fn insert(&mut self, track: T) {
        self.tracks.push(track);
    }

    /// Append several tracks at once
    pub fn extend(&mut self, tracks: impl IntoIterator<Item = T>) {
        self.tracks.extend(tracks);
    }

    /// Remove track by index
    ///
    /// Removing before the cursor shifts the cursor back so the same track
    /// stays current. On error the playlist is unchanged.
    pub fn remove(&mut self, index: usize) -> Result<T, PlaylistError> {
        let len = self.tracks.len();
        if index >= len {
            return Err(PlaylistError::IndexOutOfBounds { index, len });
        }

        let track = self.tracks.remove(index);
        if index < self.cursor {
            self.cursor -= 1;
        }
        self.cursor = self.cursor.min(self.tracks.len());

        Ok(track)
    }

    /// Clear entire playlist
    pub fn clear(&mut self) {
        self.tracks.clear();
        self.cursor = 0;
    }

    /// Shuffle, keeping the current track current
    ///
    /// The current track moves to index 0 and the cursor follows it.
    pub fn shuffle(&mut self) {
        self.cursor = shuffle_around(&mut self.tracks, self.cursor);
    }

    /// Move the cursor
    ///
    /// `relative` moves by `n` from the current position, otherwise `n` is
    /// an absolute index. Either way the result is clamped to a valid
    /// track. Returns the new current track, `None` if the list is empty.
    pub fn jump(&mut self, n: i64, relative: bool) -> Option<&T> {
        if self.tracks.is_empty() {
            return None;
        }

        let last = (self.tracks.len() - 1) as i64;
        let target = if relative {
            (self.cursor as i64).saturating_add(n)
        } else {
            n
        };

        self.cursor = target.clamp(0, last) as usize;
        self.tracks.get(self.cursor)
    }

    /// Check if a track follows the current one
    pub fn has_next(&self) -> bool {
        self.cursor + 1 < self.tracks.len()
    }

    /// Check if a track precedes the current one
    pub fn has_prev(&self) -> bool {
        self.cursor > 0
    }

    /// Advance one track if possible
    pub fn go_next(&mut self) -> Option<&T> {
        if self.has_next() {
            self.cursor += 1;
        }
        self.now_playing()
    }

    /// Step back one track if possible
    pub fn go_prev(&mut self) -> Option<&T> {
        if self.has_prev() {
            self.cursor -= 1;
        }
        self.now_playing()
    }

    /// Current track, `None` when the cursor is past the end
    pub fn now_playing(&self) -> Option<&T> {
        self.tracks.get(self.cursor)
    }

    /// Get track at index
    pub fn get(&self, index: usize) -> Option<&T> {
        self.tracks.get(index)
    }

    /// All tracks in play order
    pub fn tracks(&self) -> &[T] {
        &self.tracks
    }

    /// Current cursor position
    pub fn index(&self) -> usize {
        self.cursor
    }

    /// Total number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Check if playlist is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

impl<T: Clone> Playlist<T> {
    /// Copy of tracks and cursor, taken together
    pub fn snapshot(&self) -> PlaylistSnapshot<T> {
        PlaylistSnapshot {
            tracks: self.tracks.clone(),
            cursor: self.cursor,
        }
    }

    /// Up to `before` tracks preceding the cursor and `after` tracks from it
    pub fn window(&self, before: usize, after: usize) -> PlaylistWindow<T> {
        let start = self.cursor.saturating_sub(before);
        let end = self.cursor.saturating_add(after).min(self.tracks.len());
        let start = start.min(end);

        PlaylistWindow {
            start,
            cursor: self.cursor - start,
            tracks: self.tracks[start..end].to_vec(),
            total: self.tracks.len(),
        }
    }
}

impl<T> Default for Playlist<T> {
    fn default() -> Self {
        Self::new()
    }
}
