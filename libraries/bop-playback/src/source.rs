//! Source URL classification
//!
//! Decides whether a queued URL is a single video or a playlist, and turns
//! playlist entries into per-track URLs.

use bop_core::{MediaResolver, PlaylistEntry, ResolveError};
use tracing::{debug, warn};
use url::Url;

/// Short-link base used for playlist entries that only carry an ID
const SHORT_LINK_BASE: &str = "https://youtu.be/";

/// Query parameters that would make an extractor treat a video link as a playlist
const PLAYLIST_PARAMS: [&str; 3] = ["list", "index", "start_radio"];

/// What a queued URL refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlKind {
    /// One video; the URL is normalized to resolve only that video
    Single(String),

    /// A playlist to expand at queue time
    Playlist(String),

    /// Not an http(s) URL we know how to play
    Unsupported,
}

/// Classify a user-supplied URL
pub fn classify(raw: &str) -> UrlKind {
    let Ok(mut url) = Url::parse(raw.trim()) else {
        return UrlKind::Unsupported;
    };

    if !matches!(url.scheme(), "http" | "https") {
        return UrlKind::Unsupported;
    }

    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host).to_string();

    if host == "youtu.be" && url.path().len() > 1 {
        strip_playlist_params(&mut url);
        return UrlKind::Single(url.into());
    }

    if url.path() == "/watch" && has_param(&url, "v") {
        strip_playlist_params(&mut url);
        return UrlKind::Single(url.into());
    }

    if (host == "youtube.com" || host.ends_with(".youtube.com"))
        && url.path() == "/playlist" && has_param(&url, "list") {
        return UrlKind::Playlist(url.into());
    }

    UrlKind::Unsupported
}

/// Track URL for a playlist entry, `None` if the entry is malformed
pub fn entry_url(entry: &PlaylistEntry) -> Option<String> {
    if let Some(id) = entry.id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
        return Some(format!("{}{}", SHORT_LINK_BASE, id));
    }

    entry
        .url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
}

/// Expand a playlist into track URLs
///
/// Malformed entries are skipped; the rest keep their order.
pub async fn expand_playlist(
    resolver: &dyn MediaResolver,
    playlist_url: &str,
) -> Result<Vec<String>, ResolveError> {
    let entries = resolver.expand_playlist(playlist_url).await?;
    let total = entries.len();

    let urls: Vec<String> = entries.iter().filter_map(entry_url).collect();

    if urls.len() < total {
        warn!(
            url = %playlist_url,
            skipped = total - urls.len(),
            total,
            "Skipped malformed playlist entries"
        );
    }
    debug!(url = %playlist_url, count = urls.len(), "Expanded playlist");

    Ok(urls)
}

fn has_param(url: &Url, name: &str) -> bool {
    url.query_pairs().any(|(key, value)| key == name && !value.is_empty())
}

fn strip_playlist_params(url: &mut Url) {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !PLAYLIST_PARAMS.iter().any(|param| key == param))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(kept);
    }
}
