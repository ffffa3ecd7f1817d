//! Pak Parser server binary
//!
//! Loads the type mappings, then serves parse requests over HTTP.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use pak_parser::{
    AesKey, AppState, AssetPipeline, DEFAULT_LISTEN, DEFAULT_MAX_MESSAGE_SIZE,
    DirectoryProviderFactory, FailurePolicy, MetadataStyle, PackageSummaryLoader, PipelineConfig,
    PixelFormatDecoder, ProviderSettings, ServerConfig, TypeMappings, start_server,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pak_parser")]
#[command(about = "Streams decoded textures and metadata out of zipped game-content archives")]
#[command(version)]
struct Cli {
    /// Type-mapping (.usmap) file used for unversioned packages
    mappings: PathBuf,

    /// Address to listen on
    #[arg(long, default_value = DEFAULT_LISTEN)]
    listen: SocketAddr,

    /// Largest accepted archive in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_MESSAGE_SIZE)]
    max_message_size: usize,

    /// Artifacts buffered per request before the pipeline waits for the client
    #[arg(long, default_value_t = 16)]
    channel_capacity: usize,

    /// What a failing package or texture does to the request
    #[arg(long, value_enum, default_value_t = OnFailure::Abort)]
    on_failure: OnFailure,

    /// Shape of metadata.json entries
    #[arg(long, value_enum, default_value_t = MetadataFormat::Identifiers)]
    metadata: MetadataFormat,

    /// Directory that holds per-request scratch directories
    #[arg(long)]
    scratch_root: Option<PathBuf>,

    /// AES key (64 hex digits) for encrypted containers
    #[arg(long)]
    aes_key: Option<String>,

    /// Close failed streams without an error frame
    #[arg(long)]
    silent_failures: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum OnFailure {
    /// End the request
    Abort,
    /// Skip the failed package or texture
    Skip,
}

#[derive(Clone, Copy, ValueEnum)]
enum MetadataFormat {
    /// Object names only
    Identifiers,
    /// Object names with their classes
    Described,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mappings = TypeMappings::open(&cli.mappings)
        .with_context(|| format!("Failed to load type mappings {}", cli.mappings.display()))?;
    info!(
        path = %mappings.path().display(),
        version = mappings.version(),
        compression = ?mappings.compression(),
        "Loaded type mappings"
    );

    let aes_key = match &cli.aes_key {
        Some(key) => key.parse::<AesKey>().context("Invalid --aes-key")?,
        None => AesKey::zero(),
    };

    let config = PipelineConfig {
        channel_capacity: cli.channel_capacity,
        failure_policy: match cli.on_failure {
            OnFailure::Abort => FailurePolicy::AbortRequest,
            OnFailure::Skip => FailurePolicy::SkipFailed,
        },
        metadata_style: match cli.metadata {
            MetadataFormat::Identifiers => MetadataStyle::Identifiers,
            MetadataFormat::Described => MetadataStyle::Described,
        },
        scratch_root: cli.scratch_root,
        provider: ProviderSettings {
            aes_key,
            ..ProviderSettings::default()
        },
        surface_errors: !cli.silent_failures,
        ..PipelineConfig::default()
    };

    let pipeline = AssetPipeline::new(
        DirectoryProviderFactory::new(PackageSummaryLoader::new()),
        PixelFormatDecoder::new(),
        mappings,
        config,
    );

    let server = ServerConfig {
        listen: cli.listen,
        max_message_size: cli.max_message_size,
    };
    start_server(server, AppState::new(pipeline))
        .await
        .context("Server error")?;

    Ok(())
}
