mod ids;
mod media;
mod stream;

pub use ids::{ChannelId, RequesterId};
pub use media::{MediaFormat, MissingField, PlaylistEntry, ResolvedMedia, TrackMetadata};
pub use stream::{AudioEndpoint, AudioStream, CompletionNotifier, StreamEnd};
