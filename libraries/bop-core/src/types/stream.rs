/// Stream handles exchanged with the voice sink
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

/// A validated, currently-live audio endpoint for one track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioEndpoint {
    /// Stream URL (signed and time-limited)
    pub url: String,

    /// Format the endpoint was selected from
    pub format_id: String,

    /// Audio codec of the selected format
    pub codec: Option<String>,
}

/// What the sink is asked to play
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioStream {
    /// Source URL of the track (identity, for logging)
    pub track_url: String,

    /// Resolved endpoint to stream from
    pub endpoint: AudioEndpoint,
}

/// How a stream ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreamEnd {
    /// Reached the end of the audio on its own
    Finished,

    /// Stopped before the end (explicit stop, replaced, or transport loss)
    Stopped,
}

/// One-shot completion callback handed to the sink with every stream
///
/// `notify` consumes the notifier, so a stream can report its end at most
/// once. Dropping an unfired notifier is reported as [`StreamEnd::Stopped`].
#[derive(Debug)]
pub struct CompletionNotifier {
    tx: oneshot::Sender<StreamEnd>,
}

impl CompletionNotifier {
    /// Create a notifier and the receiver that observes it
    pub fn channel() -> (Self, oneshot::Receiver<StreamEnd>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    /// Report how the stream ended
    pub fn notify(self, end: StreamEnd) {
        // Receiver gone means the session was torn down; nothing to tell.
        let _ = self.tx.send(end);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn notifier_delivers_once() {
        let (notifier, rx) = CompletionNotifier::channel();
        notifier.notify(StreamEnd::Finished);
        assert_eq!(rx.await.unwrap(), StreamEnd::Finished);
    }

    #[tokio::test]
    async fn dropped_notifier_closes_receiver() {
        let (notifier, rx) = CompletionNotifier::channel();
        drop(notifier);
        assert!(rx.await.is_err());
    }
}
