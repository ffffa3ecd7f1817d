//! Pak Parser Core
//!
//! Core data structures and capability traits for streaming game-content
//! archives. This crate defines the request/artifact model, the engine version
//! table, entry classification, metadata aggregation and the provider seam
//! that the pipeline crate builds on.

pub mod artifact;
pub mod engine_version;
pub mod entry;
pub mod error;
pub mod mappings;
pub mod metadata;
pub mod object;
pub mod provider;

// Re-export main types
pub use artifact::{AssetArtifact, METADATA_PATH, ParseRequest, texture_output_path};
pub use engine_version::{EngineVersion, Resolution};
pub use entry::{AssetEntry, EntryClass, PrimaryKind, classify};
pub use error::{ParseError, Result};
pub use mappings::{MappingsCompression, TypeMappings};
pub use metadata::{MetadataAggregator, MetadataStyle, ObjectSummary};
pub use object::{LoadedObject, PixelFormat, TextureData};
pub use provider::{
    AesKey, AssetProvider, Language, ProviderConfig, ProviderFactory, ProviderSettings,
};
