//! Pak Parser
//!
//! Streams decoded textures and per-package object metadata out of zipped
//! game-content archives.
//!
//! A request carries an engine version and the archive bytes. The archive is
//! extracted into a private scratch directory, every `.uasset`/`.umap` entry
//! is loaded through an [`AssetProvider`], textures are decoded to PNG and
//! streamed one by one, and a `metadata.json` document closes the stream.
//!
//! # Examples
//!
//! ```rust,no_run
//! use pak_parser::{
//!     AssetPipeline, DirectoryProviderFactory, PackageSummaryLoader, PipelineConfig,
//!     PixelFormatDecoder, ServerConfig, TypeMappings, AppState, start_server,
//! };
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = AssetPipeline::new(
//!     DirectoryProviderFactory::new(PackageSummaryLoader::new()),
//!     PixelFormatDecoder::new(),
//!     TypeMappings::open("Mappings.usmap")?,
//!     PipelineConfig::default(),
//! );
//! start_server(ServerConfig::default(), AppState::new(pipeline)).await?;
//! # Ok(())
//! # }
//! ```

// Re-export from the member crates
pub use pak_parser_core::{
    AesKey, AssetArtifact, AssetEntry, AssetProvider, EngineVersion, EntryClass, Language,
    LoadedObject, METADATA_PATH, MetadataAggregator, MetadataStyle, ParseError, ParseRequest,
    PixelFormat, PrimaryKind, ProviderConfig, ProviderFactory, ProviderSettings, Resolution,
    Result, TextureData, TypeMappings,
};

pub use pak_parser_pipeline::{
    ArtifactSender, ArtifactStream, AssetPipeline, DirectoryProviderFactory, FailurePolicy,
    ImageEncoding, PackageLoader, PackageSummaryLoader, PipelineConfig, PixelFormatDecoder,
    RunOutcome, TextureDecoder,
};

pub use pak_parser_server::{
    AppState, DEFAULT_LISTEN, DEFAULT_MAX_MESSAGE_SIZE, ServerConfig, WireFrame, build_router,
    start_server,
};

