/// Media metadata as reported by a resolver
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Codec name resolvers use for "no audio track in this format"
const NO_CODEC: &str = "none";

/// One candidate encoding of a video/track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaFormat {
    /// Resolver-specific format identifier (e.g. "251")
    pub id: String,

    /// Audio codec name, `None` (or "none") when the format carries no audio
    pub audio_codec: Option<String>,

    /// Signed, time-limited stream URL
    pub url: String,
}

impl MediaFormat {
    /// Whether this format carries an audio stream
    pub fn has_audio(&self) -> bool {
        self.audio_codec
            .as_deref()
            .is_some_and(|codec| !codec.is_empty() && codec != NO_CODEC)
    }

    /// Whether the audio stream is Opus
    pub fn is_opus(&self) -> bool {
        self.audio_codec
            .as_deref()
            .is_some_and(|codec| codec.eq_ignore_ascii_case("opus"))
    }
}

/// Raw resolver output for a single URL
///
/// Every field is optional because upstream extractors routinely omit
/// data; use [`TrackMetadata::from_resolved`] to validate it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedMedia {
    /// Video title
    pub title: Option<String>,

    /// Length in whole seconds (required)
    pub duration_secs: Option<u64>,

    /// Candidate encodings (required)
    pub formats: Option<Vec<MediaFormat>>,
}

/// Required field missing from a [`ResolvedMedia`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    /// `duration_secs` was absent
    Duration,

    /// `formats` was absent
    Formats,
}

/// Validated metadata for a playable track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackMetadata {
    /// Display title (falls back to the source URL)
    pub title: String,

    /// Track length
    pub duration: Duration,

    /// Candidate encodings, in resolver order
    pub formats: Vec<MediaFormat>,
}

impl TrackMetadata {
    /// Validate raw resolver output
    ///
    /// Duration and the format list are required; a missing title falls
    /// back to `source_url`.
    pub fn from_resolved(
        source_url: &str,
        resolved: ResolvedMedia,
    ) -> std::result::Result<Self, MissingField> {
        let duration_secs = resolved.duration_secs.ok_or(MissingField::Duration)?;
        let formats = resolved.formats.ok_or(MissingField::Formats)?;

        Ok(Self {
            title: resolved
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| source_url.to_string()),
            duration: Duration::from_secs(duration_secs),
            formats,
        })
    }
}

/// One entry of an expanded playlist
///
/// Entries carry either a video ID, an explicit URL, or both. Entries with
/// neither are malformed and skipped at queue time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    /// Video ID
    pub id: Option<String>,

    /// Full video URL
    pub url: Option<String>,
}

impl PlaylistEntry {
    /// Entry identified by video ID
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            url: None,
        }
    }

    /// Entry identified by full URL
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            id: None,
            url: Some(url.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(id: &str, codec: Option<&str>) -> MediaFormat {
        MediaFormat {
            id: id.to_string(),
            audio_codec: codec.map(str::to_string),
            url: format!("https://media.example/{}", id),
        }
    }

    #[test]
    fn codec_none_means_no_audio() {
        assert!(!format("137", Some("none")).has_audio());
        assert!(!format("137", None).has_audio());
        assert!(format("140", Some("mp4a.40.2")).has_audio());
        assert!(format("251", Some("opus")).is_opus());
    }

    #[test]
    fn missing_duration_is_rejected() {
        let resolved = ResolvedMedia {
            title: Some("Song".into()),
            duration_secs: None,
            formats: Some(vec![]),
        };
        assert_eq!(
            TrackMetadata::from_resolved("https://youtu.be/x", resolved),
            Err(MissingField::Duration)
        );
    }

    #[test]
    fn missing_formats_are_rejected() {
        let resolved = ResolvedMedia {
            title: Some("Song".into()),
            duration_secs: Some(10),
            formats: None,
        };
        assert_eq!(
            TrackMetadata::from_resolved("https://youtu.be/x", resolved),
            Err(MissingField::Formats)
        );
    }

    #[test]
    fn blank_title_falls_back_to_url() {
        let resolved = ResolvedMedia {
            title: Some("   ".into()),
            duration_secs: Some(213),
            formats: Some(vec![format("251", Some("opus"))]),
        };
        let meta = TrackMetadata::from_resolved("https://youtu.be/x", resolved).unwrap();
        assert_eq!(meta.title, "https://youtu.be/x");
        assert_eq!(meta.duration, Duration::from_secs(213));
        assert_eq!(meta.formats.len(), 1);
    }
}
