//! Streaming emitter
//!
//! The pipeline runs on a blocking thread and pushes artifacts into a bounded
//! channel; the async side reads them back as an [`ArtifactStream`].

use futures::Stream;
use pak_parser_core::{AssetArtifact, ParseError, Result};
use std::pin::Pin;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

/// Artifacts of one request, in emission order
///
/// A stream ends after the metadata artifact on success, or after a single
/// `Err` item when the run failed and errors are surfaced.
pub type ArtifactStream = Pin<Box<dyn Stream<Item = Result<AssetArtifact>> + Send>>;

/// Sending half used by the blocking pipeline
#[derive(Debug, Clone)]
pub struct ArtifactSender {
    tx: mpsc::Sender<Result<AssetArtifact>>,
}

impl ArtifactSender {
    /// Create a bounded channel and its stream
    pub fn channel(capacity: usize) -> (Self, ArtifactStream) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, Box::pin(ReceiverStream::new(rx)))
    }

    /// Send one artifact, waiting while the channel is full.
    ///
    /// Must not be called from an async context. Fails with
    /// [`ParseError::Cancelled`] once the stream has been dropped.
    pub fn emit(&self, artifact: AssetArtifact) -> Result<()> {
        self.tx
            .blocking_send(Ok(artifact))
            .map_err(|_| ParseError::Cancelled)
    }

    /// Send the terminal error of a run; ignored when nobody listens
    pub fn fail(&self, error: ParseError) {
        let _ = self.tx.blocking_send(Err(error));
    }

    /// Check if the consumer went away
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
