//! Metadata aggregation
//!
//! Collects, per processed entry, the identifiers of every loaded object and
//! serializes them once at the end of a run as `metadata.json`.

use crate::artifact::{AssetArtifact, METADATA_PATH};
use crate::error::Result;
use crate::object::LoadedObject;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// How objects are written into the metadata document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataStyle {
    /// `{"<entry>": ["<name>", ...]}`
    #[default]
    Identifiers,
    /// `{"<entry>": [{"name": "<name>", "class": "<class>"}, ...]}`
    Described,
}

/// Summary of one loaded object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectSummary {
    pub name: String,
    #[serde(rename = "class")]
    pub class_name: String,
}

impl From<&LoadedObject> for ObjectSummary {
    fn from(object: &LoadedObject) -> Self {
        Self {
            name: object.identifier().to_string(),
            class_name: object.class_name.clone(),
        }
    }
}

/// Insertion-ordered record of entry path → loaded objects
#[derive(Debug, Default)]
pub struct MetadataAggregator {
    entries: IndexMap<String, Vec<ObjectSummary>>,
}

impl MetadataAggregator {
    /// Create an empty aggregator
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the objects loaded for an entry.
    ///
    /// Recording the same path twice replaces the earlier objects but keeps
    /// the entry's original position.
    pub fn record(&mut self, entry_path: &str, objects: &[LoadedObject]) {
        let summaries = objects.iter().map(ObjectSummary::from).collect();
        self.entries.insert(entry_path.to_string(), summaries);
    }

    /// Number of recorded entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Recorded entry paths in insertion order
    pub fn entry_paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Serialize the document in the given style
    pub fn to_json(&self, style: MetadataStyle) -> Result<Vec<u8>> {
        let bytes = match style {
            MetadataStyle::Identifiers => {
                let document: IndexMap<&str, Vec<&str>> = self
                    .entries
                    .iter()
                    .map(|(path, objects)| {
                        (
                            path.as_str(),
                            objects.iter().map(|o| o.name.as_str()).collect(),
                        )
                    })
                    .collect();
                serde_json::to_vec(&document)?
            }
            MetadataStyle::Described => serde_json::to_vec(&self.entries)?,
        };
        Ok(bytes)
    }

    /// Consume the aggregator and produce the metadata artifact
    pub fn finalize(self, style: MetadataStyle) -> Result<AssetArtifact> {
        let data = self.to_json(style)?;
        Ok(AssetArtifact::new(METADATA_PATH, data))
    }
}
