//! Shuffle for playlist randomization
//!
//! Fisher-Yates over everything except the current track

use rand::seq::SliceRandom;
use rand::thread_rng;

/// Shuffle `tracks`, keeping `tracks[cursor]` current
///
/// The current track is held out, the rest are permuted, and the held-out
/// track is put back at index 0. Returns the new cursor.
///
/// With no current track (`cursor >= len`) every track is permuted and the
/// cursor is returned unchanged.
pub fn shuffle_around<T>(tracks: &mut [T], cursor: usize) -> usize {
    let mut rng = thread_rng();

    if cursor >= tracks.len() {
        tracks.shuffle(&mut rng);
        return cursor;
    }

    // Bring current to the front, then shuffle the tail
    tracks[..=cursor].rotate_right(1);
    tracks[1..].shuffle(&mut rng);
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn current_moves_to_front() {
        let mut tracks = vec![1, 2, 3, 4, 5, 6];
        let cursor = shuffle_around(&mut tracks, 4);

        assert_eq!(cursor, 0);
        assert_eq!(tracks[0], 5);
    }

    #[test]
    fn shuffle_preserves_all_tracks() {
        let mut tracks: Vec<u32> = (0..20).collect();
        shuffle_around(&mut tracks, 7);

        let ids: HashSet<u32> = tracks.iter().copied().collect();
        assert_eq!(ids.len(), 20);
        assert_eq!(tracks[0], 7);
    }

    #[test]
    fn shuffle_changes_order_of_rest() {
        let mut tracks: Vec<u32> = (0..10).collect();
        let original = tracks.clone();

        shuffle_around(&mut tracks, 0);

        // Very unlikely to be in same order (probability: 1/9!)
        // If this fails occasionally, it's just bad luck, not a bug
        assert_eq!(tracks[0], 0);
        assert_ne!(original, tracks);
    }

    #[test]
    fn exhausted_cursor_shuffles_everything() {
        let mut tracks = vec![1, 2, 3];
        let cursor = shuffle_around(&mut tracks, 3);

        assert_eq!(cursor, 3);
        let ids: HashSet<i32> = tracks.iter().copied().collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn shuffle_empty_and_single() {
        let mut empty: Vec<u32> = vec![];
        assert_eq!(shuffle_around(&mut empty, 0), 0);
        assert!(empty.is_empty());

        let mut single = vec![9];
        assert_eq!(shuffle_around(&mut single, 0), 0);
        assert_eq!(single, vec![9]);
    }
}
