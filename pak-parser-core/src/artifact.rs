//! Requests and the artifacts streamed back for them

use bytes::Bytes;

/// Path of the metadata artifact that closes every successful stream
pub const METADATA_PATH: &str = "metadata.json";

/// One parse request: an engine version and a zipped content tree
#[derive(Debug, Clone)]
pub struct ParseRequest {
    pub engine_version: String,
    pub archive_data: Bytes,
}

impl ParseRequest {
    /// Create a new request
    pub fn new<V: Into<String>, D: Into<Bytes>>(engine_version: V, archive_data: D) -> Self {
        Self {
            engine_version: engine_version.into(),
            archive_data: archive_data.into(),
        }
    }
}

/// A unit of output: a decoded image or the metadata document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetArtifact {
    /// Output path, `/`-separated
    pub path: String,
    pub data: Bytes,
}

impl AssetArtifact {
    /// Create a new artifact
    pub fn new<P: Into<String>, D: Into<Bytes>>(path: P, data: D) -> Self {
        Self {
            path: path.into(),
            data: data.into(),
        }
    }

    /// Check if this is the metadata artifact
    pub fn is_metadata(&self) -> bool {
        self.path == METADATA_PATH
    }
}

/// Build the output path of a texture artifact.
///
/// The texture lands next to its owning entry: `<entry dir>/<name>.<ext>`.
/// Entries at the root of the tree produce just `<name>.<ext>`. Path
/// separators in the name become `_`.
pub fn texture_output_path(entry_path: &str, texture_name: &str, extension: &str) -> String {
    let file_name = texture_name.replace(['/', '\\'], "_");
    match entry_path.rsplit_once('/') {
        Some((directory, _)) if !directory.is_empty() => {
            format!("{}/{}.{}", directory, file_name, extension)
        }
        _ => format!("{}.{}", file_name, extension),
    }
}
