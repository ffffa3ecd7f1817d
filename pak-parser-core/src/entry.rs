//! Asset entries and their classification
//!
//! Providers enumerate a flat list of every file in the extracted tree. Only
//! package headers (`.uasset`) and map containers (`.umap`) are processed;
//! their companion payload files are loaded implicitly by the provider and are
//! never iterated on their own.

use serde::{Deserialize, Serialize};

/// Suffixes of companion payload files (export data, bulk data, optional data)
pub const AUXILIARY_SUFFIXES: [&str; 3] = [".uexp", ".ubulk", ".uptnl"];

/// Suffix of a primary package
pub const ASSET_SUFFIX: &str = ".uasset";

/// Suffix of a map container
pub const MAP_SUFFIX: &str = ".umap";

/// One file enumerated by an asset provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetEntry {
    /// `/`-separated path relative to the provider root
    pub path: String,
}

/// Kind of a primary entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimaryKind {
    /// A regular package; its objects are scanned for textures
    Asset,
    /// A map container; loaded for metadata only
    Map,
}

/// Result of classifying an entry path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryClass {
    /// An entry the pipeline loads
    Primary(PrimaryKind),
    /// Companion data belonging to some primary entry
    Auxiliary,
    /// Anything else in the tree
    Ignored,
}

impl AssetEntry {
    /// Create a new entry
    pub fn new<S: Into<String>>(path: S) -> Self {
        Self { path: path.into() }
    }

    /// Classify this entry
    pub fn classify(&self) -> EntryClass {
        classify(&self.path)
    }
}

/// Classify an entry path.
///
/// Auxiliary suffixes are checked first, then the primary suffixes; every
/// other path is ignored. Matching is case-sensitive.
pub fn classify(path: &str) -> EntryClass {
    if AUXILIARY_SUFFIXES
        .iter()
        .any(|suffix| path.ends_with(suffix))
    {
        return EntryClass::Auxiliary;
    }

    if path.ends_with(ASSET_SUFFIX) {
        EntryClass::Primary(PrimaryKind::Asset)
    } else if path.ends_with(MAP_SUFFIX) {
        EntryClass::Primary(PrimaryKind::Map)
    } else {
        EntryClass::Ignored
    }
}
