//! HTTP request handlers

use crate::AppState;
use crate::frame::{NDJSON_CONTENT_TYPE, WireFrame};
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use futures::StreamExt;
use pak_parser_core::{ParseRequest, ProviderFactory};
use pak_parser_pipeline::TextureDecoder;
use serde::Deserialize;
use std::convert::Infallible;
use tracing::info;

/// Returned for plain GET requests
pub const USAGE_HINT: &str = "Archives must be submitted with \
    POST /parse?engine_version=<version> and the zip file as the request body. \
    The response streams one JSON object per line: {\"path\", \"data\"} with \
    base64 data, ending with metadata.json.";

/// Query of the parse endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ParseParams {
    pub engine_version: String,
}

/// Usage hint
pub async fn index() -> &'static str {
    USAGE_HINT
}

/// Stream the artifacts of one archive as newline-delimited JSON
pub async fn parse_archive<F, D>(
    State(state): State<AppState<F, D>>,
    Query(params): Query<ParseParams>,
    body: Bytes,
) -> Response
where
    F: ProviderFactory,
    D: TextureDecoder,
{
    info!(
        engine_version = %params.engine_version,
        bytes = body.len(),
        "Received parse request"
    );

    let artifacts = state
        .pipeline
        .parse(ParseRequest::new(params.engine_version, body));
    let frames = artifacts.map(|item| Ok::<_, Infallible>(WireFrame::from_item(&item).to_line()));

    (
        [(header::CONTENT_TYPE, NDJSON_CONTENT_TYPE)],
        Body::from_stream(frames),
    )
        .into_response()
}
