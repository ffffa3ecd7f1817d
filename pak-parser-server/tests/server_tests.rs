//! Server Tests
//!
//! Drives the handlers directly and decodes the streamed response bodies.

use axum::body::{Bytes, to_bytes};
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use pak_parser_core::{METADATA_PATH, TypeMappings};
use pak_parser_pipeline::{
    AssetPipeline, DirectoryProviderFactory, PACKAGE_FILE_TAG, PackageSummaryLoader,
    PipelineConfig, PixelFormatDecoder,
};
use pak_parser_server::{
    AppState, NDJSON_CONTENT_TYPE, ParseParams, ServerConfig, USAGE_HINT, WireFrame,
    build_router, index, parse_archive, parse_body,
};
use std::io::{Cursor, Write};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

type TestState = AppState<DirectoryProviderFactory<PackageSummaryLoader>, PixelFormatDecoder>;

fn mappings() -> TypeMappings {
    let mut data = Vec::new();
    data.extend_from_slice(&0x30C4u16.to_le_bytes());
    data.extend_from_slice(&[0, 0]);
    data.extend_from_slice(&[0u8; 8]);
    TypeMappings::from_bytes("Mappings.usmap", &data).unwrap()
}

fn state(scratch: &std::path::Path) -> TestState {
    AppState::new(AssetPipeline::new(
        DirectoryProviderFactory::new(PackageSummaryLoader::new()),
        PixelFormatDecoder::new(),
        mappings(),
        PipelineConfig::default().with_scratch_root(scratch),
    ))
}

fn package_archive() -> Bytes {
    let mut package = PACKAGE_FILE_TAG.to_le_bytes().to_vec();
    package.extend_from_slice(&[0u8; 64]);

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in [
        ("FactoryGame/Content/Buildable/Build_Foundation.uasset", package.as_slice()),
        ("FactoryGame/Content/Buildable/Build_Foundation.uexp", b"exports".as_slice()),
        ("FactoryGame/Content/Maps/Persistent_Level.umap", package.as_slice()),
        ("FactoryGame/Content/notes.txt", b"ignored".as_slice()),
    ] {
        writer.start_file(name, SimpleFileOptions::default()).unwrap();
        writer.write_all(data).unwrap();
    }
    Bytes::from(writer.finish().unwrap().into_inner())
}

async fn call_parse(
    state: TestState,
    version: &str,
    body: Bytes,
) -> (StatusCode, String, Vec<WireFrame>) {
    let params = ParseParams {
        engine_version: version.to_string(),
    };
    let response = parse_archive(State(state), Query(params), body).await;
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, parse_body(&body).unwrap())
}

#[tokio::test]
async fn test_index_returns_usage_hint() {
    assert_eq!(index().await, USAGE_HINT);
    assert!(USAGE_HINT.contains("/parse?engine_version="));
}

#[tokio::test]
async fn test_parse_streams_metadata_last() {
    let scratch = tempfile::tempdir().unwrap();
    let (status, content_type, frames) =
        call_parse(state(scratch.path()), "5.2", package_archive()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, NDJSON_CONTENT_TYPE);
    assert_eq!(frames.len(), 1);

    let metadata = frames.into_iter().next().unwrap().into_artifact().unwrap();
    assert_eq!(metadata.path, METADATA_PATH);
    let document: serde_json::Value = serde_json::from_slice(&metadata.data).unwrap();
    assert_eq!(
        document,
        serde_json::json!({
            "FactoryGame/Content/Buildable/Build_Foundation.uasset": ["Build_Foundation"],
            "FactoryGame/Content/Maps/Persistent_Level.umap": ["Persistent_Level"],
        })
    );
    assert!(std::fs::read_dir(scratch.path()).unwrap().next().is_none());
}

#[tokio::test]
async fn test_unsupported_version_yields_error_frame_only() {
    let scratch = tempfile::tempdir().unwrap();
    let (status, _, frames) = call_parse(state(scratch.path()), "9.9", package_archive()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(frames.len(), 1);
    let err = frames[0].clone().into_artifact().unwrap_err();
    assert_eq!(err.kind, "unsupported_version");
}

#[tokio::test]
async fn test_invalid_archive_yields_extraction_failure() {
    let scratch = tempfile::tempdir().unwrap();
    let (_, _, frames) = call_parse(
        state(scratch.path()),
        "4.26",
        Bytes::from_static(b"this is not a zip archive"),
    )
    .await;

    assert_eq!(frames.len(), 1);
    assert!(matches!(
        &frames[0],
        WireFrame::Error { error } if error.kind == "extraction_failure"
    ));
    assert!(std::fs::read_dir(scratch.path()).unwrap().next().is_none());
}

#[tokio::test]
async fn test_router_builds_with_custom_limit() {
    let scratch = tempfile::tempdir().unwrap();
    let config = ServerConfig {
        max_message_size: 1024,
        ..ServerConfig::default()
    };
    let _router = build_router(state(scratch.path()), &config);
}
