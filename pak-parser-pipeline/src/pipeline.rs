//! Pipeline orchestrator
//!
//! One run per request: resolve the engine version, extract the archive into
//! a fresh workspace, open a provider over it, stream texture artifacts for
//! every primary entry and finish with the metadata document. The workspace
//! is released on every path out of a run.

use crate::archive::extract_archive;
use crate::config::{FailurePolicy, PipelineConfig};
use crate::emitter::{ArtifactSender, ArtifactStream};
use crate::texture::{TextureDecoder, TextureStep};
use crate::workspace::Workspace;
use pak_parser_core::{
    AssetProvider, EngineVersion, EntryClass, MetadataAggregator, ParseError, ParseRequest,
    PrimaryKind, ProviderConfig, ProviderFactory, Resolution, Result, TypeMappings,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Stages of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    VersionResolved,
    WorkspaceAcquired,
    Extracted,
    ProviderReady,
    Enumerating,
    Classifying,
    Loading,
    Decoding,
    Emitting,
    Finalizing,
    Done,
    Failed,
    Cancelled,
    WorkspaceReleased,
}

/// How a run ended
#[derive(Debug)]
pub enum RunOutcome {
    /// Metadata was emitted
    Completed { images: usize, entries: usize },
    /// The engine version has no parser configuration; nothing was touched
    Unsupported(String),
    /// The stream was dropped before the run finished
    Cancelled,
    Failed(ParseError),
}

impl RunOutcome {
    /// Check if the run emitted its metadata
    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed { .. })
    }
}

/// Logs every state change of one run
struct StateTracker {
    state: PipelineState,
}

impl StateTracker {
    fn new() -> Self {
        Self {
            state: PipelineState::Idle,
        }
    }

    fn advance(&mut self, next: PipelineState) {
        debug!(from = ?self.state, to = ?next, "Pipeline transition");
        self.state = next;
    }
}

#[derive(Debug, Default)]
struct RunStats {
    images: usize,
    entries: usize,
}

/// Shared, cloneable pipeline; every clone runs requests independently
pub struct AssetPipeline<F, D> {
    factory: Arc<F>,
    decoder: Arc<D>,
    mappings: Arc<TypeMappings>,
    config: Arc<PipelineConfig>,
}

impl<F, D> Clone for AssetPipeline<F, D> {
    fn clone(&self) -> Self {
        Self {
            factory: Arc::clone(&self.factory),
            decoder: Arc::clone(&self.decoder),
            mappings: Arc::clone(&self.mappings),
            config: Arc::clone(&self.config),
        }
    }
}

impl<F: ProviderFactory, D: TextureDecoder> AssetPipeline<F, D> {
    pub fn new(factory: F, decoder: D, mappings: TypeMappings, config: PipelineConfig) -> Self {
        Self {
            factory: Arc::new(factory),
            decoder: Arc::new(decoder),
            mappings: Arc::new(mappings),
            config: Arc::new(config),
        }
    }

    /// Start a run on the blocking pool and stream its artifacts.
    ///
    /// Must be called from within a tokio runtime. Dropping the stream
    /// cancels the run at its next emit.
    pub fn parse(&self, request: ParseRequest) -> ArtifactStream {
        let (sender, stream) = ArtifactSender::channel(self.config.channel_capacity);
        let pipeline = self.clone();

        tokio::task::spawn_blocking(move || {
            let outcome = pipeline.run(request, &sender);
            debug!(?outcome, "Run finished");
        });

        stream
    }

    /// Run one request to completion on the current thread
    pub fn run(&self, request: ParseRequest, sender: &ArtifactSender) -> RunOutcome {
        let mut tracker = StateTracker::new();
        info!(
            engine_version = %request.engine_version,
            bytes = request.archive_data.len(),
            "Parsing archive"
        );

        let engine = match EngineVersion::resolve(&request.engine_version) {
            Resolution::Resolved(engine) => engine,
            Resolution::Unsupported(version) => {
                error!(version = %version, "Unsupported engine version");
                tracker.advance(PipelineState::Failed);
                if self.config.surface_errors {
                    sender.fail(ParseError::unsupported_version(version.as_str()));
                }
                return RunOutcome::Unsupported(version);
            }
        };
        tracker.advance(PipelineState::VersionResolved);

        let workspace = match Workspace::acquire(self.config.scratch_root.as_deref()) {
            Ok(workspace) => workspace,
            Err(e) => {
                error!(error = %e, "Failed to create workspace");
                tracker.advance(PipelineState::Failed);
                return self.report_failure(e, sender);
            }
        };
        tracker.advance(PipelineState::WorkspaceAcquired);

        let result = self.process(&request, engine, workspace.path(), sender, &mut tracker);

        let outcome = match result {
            Ok(stats) => RunOutcome::Completed {
                images: stats.images,
                entries: stats.entries,
            },
            Err(ParseError::Cancelled) => {
                warn!("Caller closed the stream, abandoning run");
                tracker.advance(PipelineState::Cancelled);
                RunOutcome::Cancelled
            }
            Err(e) => {
                error!(error = %e, kind = e.kind(), "Failed to parse archive");
                tracker.advance(PipelineState::Failed);
                RunOutcome::Failed(e)
            }
        };

        workspace.release();
        tracker.advance(PipelineState::WorkspaceReleased);

        match outcome {
            RunOutcome::Failed(e) => self.report_failure(e, sender),
            other => other,
        }
    }

    fn report_failure(&self, error: ParseError, sender: &ArtifactSender) -> RunOutcome {
        if self.config.surface_errors {
            sender.fail(reportable(&error));
        }
        RunOutcome::Failed(error)
    }

    fn process(
        &self,
        request: &ParseRequest,
        engine: EngineVersion,
        root: &Path,
        sender: &ArtifactSender,
        tracker: &mut StateTracker,
    ) -> Result<RunStats> {
        let summary = extract_archive(&request.archive_data, root)?;
        info!(
            files = summary.files,
            bytes = summary.bytes,
            "Extracted archive"
        );
        tracker.advance(PipelineState::Extracted);

        let provider_config = ProviderConfig {
            root: root.to_path_buf(),
            mappings: Arc::clone(&self.mappings),
            engine,
            aes_key: self.config.provider.aes_key,
            language: self.config.provider.language,
        };
        let provider = self.factory.initialize(&provider_config)?;
        tracker.advance(PipelineState::ProviderReady);

        let entries = provider.entries()?;
        tracker.advance(PipelineState::Enumerating);
        info!(count = entries.len(), engine = %engine.generation(), "Enumerated entries");

        let step = TextureStep::new(self.decoder.as_ref(), self.config.encoding);
        let mut metadata = MetadataAggregator::new();
        let mut stats = RunStats::default();

        for entry in &entries {
            if sender.is_closed() {
                return Err(ParseError::Cancelled);
            }

            tracker.advance(PipelineState::Classifying);
            let kind = match entry.classify() {
                EntryClass::Primary(kind) => kind,
                EntryClass::Auxiliary | EntryClass::Ignored => continue,
            };

            tracker.advance(PipelineState::Loading);
            debug!(path = %entry.path, "Loading all objects");
            let objects = match provider.load_objects(&entry.path) {
                Ok(objects) => objects,
                Err(e) => {
                    self.recover(e)?;
                    continue;
                }
            };

            if kind == PrimaryKind::Asset {
                for object in &objects {
                    tracker.advance(PipelineState::Decoding);
                    let artifact = match step.render(&entry.path, object) {
                        Ok(Some(artifact)) => artifact,
                        Ok(None) => continue,
                        Err(e) => {
                            self.recover(e)?;
                            continue;
                        }
                    };

                    tracker.advance(PipelineState::Emitting);
                    info!(path = %artifact.path, bytes = artifact.data.len(), "Sending texture");
                    sender.emit(artifact)?;
                    stats.images += 1;
                }
            }

            metadata.record(&entry.path, &objects);
        }

        tracker.advance(PipelineState::Finalizing);
        stats.entries = metadata.len();
        let document = metadata.finalize(self.config.metadata_style)?;
        info!(entries = stats.entries, bytes = document.data.len(), "Sending metadata");
        sender.emit(document)?;
        tracker.advance(PipelineState::Done);

        Ok(stats)
    }

    /// Apply the failure policy to a per-entry or per-texture error
    fn recover(&self, error: ParseError) -> Result<()> {
        if self.config.failure_policy == FailurePolicy::SkipFailed && error.is_recoverable() {
            warn!(error = %error, "Skipping after recoverable failure");
            Ok(())
        } else {
            Err(error)
        }
    }
}

/// Copy of an error for the stream; source values are flattened to messages
fn reportable(error: &ParseError) -> ParseError {
    match error {
        ParseError::UnsupportedVersion { version } => ParseError::unsupported_version(version),
        ParseError::Extraction(msg) => ParseError::extraction(msg),
        ParseError::PathTraversal { entry } => ParseError::path_traversal(entry),
        ParseError::Workspace(msg) => ParseError::workspace(msg),
        ParseError::Mappings(msg) => ParseError::mappings(msg),
        ParseError::ProviderInit(msg) => ParseError::provider_init(msg),
        ParseError::Load { path, message } => ParseError::load(path, message),
        ParseError::Decode { texture, message } => ParseError::decode(texture, message),
        ParseError::Encode(msg) => ParseError::encode(msg),
        ParseError::Cancelled => ParseError::Cancelled,
        ParseError::Serialization(e) => ParseError::Io(std::io::Error::other(e.to_string())),
        ParseError::Io(e) => ParseError::Io(std::io::Error::new(e.kind(), e.to_string())),
    }
}
