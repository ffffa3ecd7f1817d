//! Error types for archive parsing requests

use thiserror::Error;

/// Result type alias for pak-parser operations
pub type Result<T> = std::result::Result<T, ParseError>;

/// Errors that can terminate (or, under a lenient policy, skip part of) a parse request
#[derive(Error, Debug)]
pub enum ParseError {
    /// The caller asked for an engine version we have no parser configuration for
    #[error("Unsupported engine version: {version}")]
    UnsupportedVersion { version: String },

    /// The request payload is not a readable archive
    #[error("Archive extraction failed: {0}")]
    Extraction(String),

    /// An archive entry would be written outside the workspace
    #[error("Archive entry escapes the workspace: {entry}")]
    PathTraversal { entry: String },

    /// Scratch directory could not be created
    #[error("Workspace error: {0}")]
    Workspace(String),

    /// Type-mapping file is missing or malformed
    #[error("Type mappings error: {0}")]
    Mappings(String),

    /// The asset provider rejected its configuration or content
    #[error("Provider initialization failed: {0}")]
    ProviderInit(String),

    /// Loading the object graph of one entry failed
    #[error("Failed to load '{path}': {message}")]
    Load { path: String, message: String },

    /// A texture payload could not be turned into a bitmap
    #[error("Failed to decode texture '{texture}': {message}")]
    Decode { texture: String, message: String },

    /// A bitmap could not be written in the output image format
    #[error("Image encoding failed: {0}")]
    Encode(String),

    /// Metadata serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The consumer went away before the run finished
    #[error("Stream closed by the caller")]
    Cancelled,

    /// I/O errors when reading/writing files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ParseError {
    /// Create an unsupported version error
    pub fn unsupported_version<S: Into<String>>(version: S) -> Self {
        Self::UnsupportedVersion {
            version: version.into(),
        }
    }

    /// Create an extraction error
    pub fn extraction<S: Into<String>>(msg: S) -> Self {
        Self::Extraction(msg.into())
    }

    /// Create a path traversal error
    pub fn path_traversal<S: Into<String>>(entry: S) -> Self {
        Self::PathTraversal {
            entry: entry.into(),
        }
    }

    /// Create a workspace error
    pub fn workspace<S: Into<String>>(msg: S) -> Self {
        Self::Workspace(msg.into())
    }

    /// Create a type mappings error
    pub fn mappings<S: Into<String>>(msg: S) -> Self {
        Self::Mappings(msg.into())
    }

    /// Create a provider initialization error
    pub fn provider_init<S: Into<String>>(msg: S) -> Self {
        Self::ProviderInit(msg.into())
    }

    /// Create a load error for an entry
    pub fn load<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::Load {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a decode error for a texture
    pub fn decode<T: Into<String>, M: Into<String>>(texture: T, message: M) -> Self {
        Self::Decode {
            texture: texture.into(),
            message: message.into(),
        }
    }

    /// Create an image encoding error
    pub fn encode<S: Into<String>>(msg: S) -> Self {
        Self::Encode(msg.into())
    }

    /// Stable snake_case label, used on the wire when errors are reported to callers
    pub fn kind(&self) -> &'static str {
        match self {
            ParseError::UnsupportedVersion { .. } => "unsupported_version",
            ParseError::Extraction(_) => "extraction_failure",
            ParseError::PathTraversal { .. } => "extraction_failure",
            ParseError::Workspace(_) => "workspace_failure",
            ParseError::Mappings(_) => "provider_init_failure",
            ParseError::ProviderInit(_) => "provider_init_failure",
            ParseError::Load { .. } => "load_failure",
            ParseError::Decode { .. } => "decode_failure",
            ParseError::Encode(_) => "decode_failure",
            ParseError::Serialization(_) => "internal",
            ParseError::Cancelled => "cancelled",
            ParseError::Io(_) => "internal",
        }
    }

    /// Check if this error only concerns a single entry or texture.
    ///
    /// Recoverable errors may be skipped when the pipeline runs with a lenient
    /// failure policy; everything else always ends the request.
    pub fn is_recoverable(&self) -> bool {
        match self {
            ParseError::Load { .. } => true,
            ParseError::Decode { .. } => true,
            ParseError::Encode(_) => true,
            _ => false,
        }
    }

    /// Attach a texture name to a decode error raised by a format decoder
    pub fn for_texture<S: Into<String>>(self, name: S) -> Self {
        match self {
            ParseError::Decode { message, .. } => ParseError::Decode {
                texture: name.into(),
                message,
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = ParseError::unsupported_version("9.9");
        assert!(matches!(err, ParseError::UnsupportedVersion { .. }));
        assert_eq!(err.to_string(), "Unsupported engine version: 9.9");
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(ParseError::extraction("bad").kind(), "extraction_failure");
        assert_eq!(
            ParseError::path_traversal("../etc/passwd").kind(),
            "extraction_failure"
        );
        assert_eq!(ParseError::provider_init("x").kind(), "provider_init_failure");
        assert_eq!(ParseError::load("a.uasset", "x").kind(), "load_failure");
        assert_eq!(ParseError::Cancelled.kind(), "cancelled");
    }

    #[test]
    fn test_recoverable_errors() {
        assert!(ParseError::load("Game/A.uasset", "truncated").is_recoverable());
        assert!(ParseError::decode("T_Icon", "short payload").is_recoverable());
        assert!(!ParseError::extraction("not a zip").is_recoverable());
        assert!(!ParseError::Cancelled.is_recoverable());
    }

    #[test]
    fn test_for_texture_relabels_decode_errors() {
        let err = ParseError::decode("PF_DXT1", "short payload").for_texture("T_Rock_D");
        assert_eq!(
            err.to_string(),
            "Failed to decode texture 'T_Rock_D': short payload"
        );
        assert!(matches!(
            ParseError::Cancelled.for_texture("T_Rock_D"),
            ParseError::Cancelled
        ));
    }
}
