//! Pak Parser Server
//!
//! HTTP transport for the parse call. `POST /parse?engine_version=<v>` takes
//! the zip archive as its body and streams the resulting artifacts back as
//! newline-delimited JSON frames, in emission order.

pub mod frame;
pub mod handlers;

pub use frame::{NDJSON_CONTENT_TYPE, WireError, WireFrame, parse_body};
pub use handlers::{ParseParams, USAGE_HINT, index, parse_archive};

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use pak_parser_core::ProviderFactory;
use pak_parser_pipeline::{AssetPipeline, TextureDecoder};
use std::net::SocketAddr;
use tracing::info;

/// Default listen address
pub const DEFAULT_LISTEN: &str = "0.0.0.0:50051";

/// Default request size limit (1 GiB)
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 1024 * 1024 * 1024;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen: SocketAddr,
    /// Largest accepted request body in bytes
    pub max_message_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([0, 0, 0, 0], 50051)),
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }
}

/// State shared across handlers
pub struct AppState<F, D> {
    pub pipeline: AssetPipeline<F, D>,
}

impl<F, D> Clone for AppState<F, D> {
    fn clone(&self) -> Self {
        Self {
            pipeline: self.pipeline.clone(),
        }
    }
}

impl<F, D> AppState<F, D> {
    pub fn new(pipeline: AssetPipeline<F, D>) -> Self {
        Self { pipeline }
    }
}

/// Build the router with all endpoints
pub fn build_router<F, D>(state: AppState<F, D>, config: &ServerConfig) -> Router
where
    F: ProviderFactory,
    D: TextureDecoder,
{
    Router::new()
        .route("/", get(index))
        .route("/parse", post(parse_archive::<F, D>))
        .layer(DefaultBodyLimit::max(config.max_message_size))
        .with_state(state)
}

/// Bind and serve until interrupted
pub async fn start_server<F, D>(config: ServerConfig, state: AppState<F, D>) -> std::io::Result<()>
where
    F: ProviderFactory,
    D: TextureDecoder,
{
    let app = build_router(state, &config);
    let listener = tokio::net::TcpListener::bind(config.listen).await?;
    info!(
        addr = %listener.local_addr()?,
        max_message_size = config.max_message_size,
        "Listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
