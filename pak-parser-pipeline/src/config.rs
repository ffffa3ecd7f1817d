//! Pipeline configuration

use crate::texture::ImageEncoding;
use pak_parser_core::{MetadataStyle, ProviderSettings};
use std::path::PathBuf;

/// What a load or decode failure does to the rest of the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Any load or decode failure ends the request
    #[default]
    AbortRequest,
    /// Skip the failed entry or texture and keep going
    SkipFailed,
}

/// Configuration shared by every run of an [`AssetPipeline`](crate::AssetPipeline)
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Bound of the artifact channel; the pipeline blocks while it is full
    pub channel_capacity: usize,
    pub failure_policy: FailurePolicy,
    pub metadata_style: MetadataStyle,
    pub encoding: ImageEncoding,
    /// Parent of the per-request workspaces; `None` uses the host temp dir
    pub scratch_root: Option<PathBuf>,
    pub provider: ProviderSettings,
    /// End failed streams with an `Err` item instead of closing silently
    pub surface_errors: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 16,
            failure_policy: FailurePolicy::AbortRequest,
            metadata_style: MetadataStyle::Identifiers,
            encoding: ImageEncoding::Png,
            scratch_root: None,
            provider: ProviderSettings::default(),
            surface_errors: true,
        }
    }
}

impl PipelineConfig {
    /// Skip failed entries and textures instead of aborting
    pub fn lenient() -> Self {
        Self {
            failure_policy: FailurePolicy::SkipFailed,
            ..Default::default()
        }
    }

    /// Close failed streams without an error item
    pub fn silent() -> Self {
        Self {
            surface_errors: false,
            ..Default::default()
        }
    }

    /// Builder-style scratch root
    pub fn with_scratch_root<P: Into<PathBuf>>(mut self, root: P) -> Self {
        self.scratch_root = Some(root.into());
        self
    }
}
