//! Pak Parser Pipeline
//!
//! Turns a zipped content tree into a stream of decoded texture images
//! followed by a metadata document. Each request gets its own scratch
//! workspace, which is removed when the run ends.
//!
//! # Examples
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use pak_parser_core::{ParseRequest, TypeMappings};
//! use pak_parser_pipeline::{
//!     AssetPipeline, DirectoryProviderFactory, PackageSummaryLoader, PipelineConfig,
//!     PixelFormatDecoder,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mappings = TypeMappings::open("Mappings.usmap")?;
//! let pipeline = AssetPipeline::new(
//!     DirectoryProviderFactory::new(PackageSummaryLoader::new()),
//!     PixelFormatDecoder::new(),
//!     mappings,
//!     PipelineConfig::default(),
//! );
//!
//! let archive = std::fs::read("content.zip")?;
//! let mut stream = pipeline.parse(ParseRequest::new("5.2", archive));
//! while let Some(artifact) = stream.next().await {
//!     let artifact = artifact?;
//!     println!("{} ({} bytes)", artifact.path, artifact.data.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod config;
pub mod emitter;
pub mod pipeline;
pub mod provider;
pub mod texture;
pub mod workspace;

// Re-export main types
pub use archive::{ExtractSummary, extract_archive};
pub use config::{FailurePolicy, PipelineConfig};
pub use emitter::{ArtifactSender, ArtifactStream};
pub use pipeline::{AssetPipeline, PipelineState, RunOutcome};
pub use provider::{
    DirectoryProvider, DirectoryProviderFactory, PACKAGE_FILE_TAG, PackageLoader,
    PackageSummaryLoader,
};
pub use texture::{ImageEncoding, PixelFormatDecoder, TextureDecoder, TextureStep};
pub use workspace::{WORKSPACE_PREFIX, Workspace};
