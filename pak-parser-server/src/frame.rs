//! Wire frames
//!
//! Each artifact travels as one JSON object on its own line. A failed run
//! ends with a single error frame.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use pak_parser_core::{AssetArtifact, ParseError};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::error;

/// Media type of the response body
pub const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";

/// Error carried by a failure frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireError {
    /// Stable label, see [`ParseError::kind`]
    pub kind: String,
    pub message: String,
}

impl From<&ParseError> for WireError {
    fn from(error: &ParseError) -> Self {
        Self {
            kind: error.kind().to_string(),
            message: error.to_string(),
        }
    }
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for WireError {}

/// One line of the response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireFrame {
    Artifact {
        path: String,
        /// Base64 (standard alphabet, padded)
        data: String,
    },
    Error {
        error: WireError,
    },
}

impl WireFrame {
    /// Frame for one item of an artifact stream
    pub fn from_item(item: &Result<AssetArtifact, ParseError>) -> Self {
        match item {
            Ok(artifact) => WireFrame::Artifact {
                path: artifact.path.clone(),
                data: STANDARD.encode(&artifact.data),
            },
            Err(e) => WireFrame::Error { error: e.into() },
        }
    }

    /// Serialize as one newline-terminated line
    pub fn to_line(&self) -> Bytes {
        match serde_json::to_vec(self) {
            Ok(mut line) => {
                line.push(b'\n');
                Bytes::from(line)
            }
            Err(e) => {
                error!(error = %e, "Failed to serialize frame");
                Bytes::new()
            }
        }
    }

    /// Parse one line of a response body
    pub fn from_line(line: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(line)
    }

    /// Turn the frame back into an artifact, or the error it carries
    pub fn into_artifact(self) -> Result<AssetArtifact, WireError> {
        match self {
            WireFrame::Artifact { path, data } => {
                let data = STANDARD.decode(data.as_bytes()).map_err(|e| WireError {
                    kind: "internal".to_string(),
                    message: format!("Invalid base64 payload for {}: {}", path, e),
                })?;
                Ok(AssetArtifact::new(path, data))
            }
            WireFrame::Error { error } => Err(error),
        }
    }
}

/// Split a response body into frames, skipping blank lines
pub fn parse_body(body: &[u8]) -> serde_json::Result<Vec<WireFrame>> {
    body.split(|&b| b == b'\n')
        .filter(|line| !line.iter().all(u8::is_ascii_whitespace))
        .map(WireFrame::from_line)
        .collect()
}
