//! Integration tests for response storage
//!
//! Exercises the file backends and fallback chains as they are built from
//! configuration.

use std::sync::Arc;

use super::common::sample_response;
use lookback::submit::csv::{parse_records, HEADERS};
use lookback::submit::mock::MockBackend;
use lookback::submit::{
    BackendConfig, BackendError, Capability, CsvFileBackend, FallbackChain, JsonArchiveBackend,
    SaveBackend,
};
use lookback::survey::SurveyResponse;
use tempfile::TempDir;

/// Test that the CSV file gets one header and one row per response
#[tokio::test]
async fn test_csv_file_appends_rows_under_one_header() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let backend = CsvFileBackend::new(dir.path().join("nested").join("responses.csv"));

    backend.save(&sample_response("Alice")).await.unwrap();
    backend.save(&sample_response("Bob")).await.unwrap();

    let content = std::fs::read_to_string(backend.path()).unwrap();
    let records = parse_records(&content).unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0], HEADERS.to_vec());
    assert_eq!(records[1][1], "Alice");
    assert_eq!(records[2][1], "Bob");

    // Lists are joined and embedded newlines survive quoting
    assert!(records[1].contains(&"Shipped the thing | Mentored, a lot".to_string()));
    assert!(records[1].contains(&"Line one\nLine two".to_string()));
}

/// Test that concurrent saves never interleave partial rows
#[tokio::test]
async fn test_csv_file_concurrent_saves() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let backend = Arc::new(CsvFileBackend::new(dir.path().join("responses.csv")));

    let mut tasks = Vec::new();
    for i in 0..8 {
        let backend = backend.clone();
        tasks.push(tokio::spawn(async move {
            backend.save(&sample_response(&format!("User{}", i))).await
        }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let rows = backend.read_responses().await.unwrap();
    assert_eq!(rows.len(), 8);
    assert!(rows.iter().all(|row| row.len() == HEADERS.len()));
}

/// Test that the archive keeps one document per response plus a running list
#[tokio::test]
async fn test_json_archive_collects_responses() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let backend = JsonArchiveBackend::new(dir.path());

    backend.save(&sample_response("Alice")).await.unwrap();
    let receipt = backend.save(&sample_response("Bob")).await.unwrap();
    assert_eq!(receipt.message, "Response saved successfully (2 total)");

    let archive: Vec<serde_json::Value> =
        serde_json::from_str(&std::fs::read_to_string(backend.archive_path()).unwrap()).unwrap();
    assert_eq!(archive.len(), 2);
    assert!(archive.iter().all(|entry| entry.get("submittedAt").is_some()));

    let details = receipt.details.expect("document name");
    assert!(details.ends_with("-Bob.json"));
    let document: SurveyResponse =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join(details)).unwrap()).unwrap();
    assert_eq!(document.name, "Bob");
}

/// Test that a chain falls through a failing backend to a file backend
#[tokio::test]
async fn test_chain_falls_back_to_csv() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let failing = MockBackend::failing("remote", Capability::Forward, "connection refused");
    let csv = CsvFileBackend::new(dir.path().join("responses.csv"));
    let chain = FallbackChain::new(vec![Arc::new(failing.clone()), Arc::new(csv)]);

    let receipt = chain.save(&sample_response("Alice")).await.unwrap();
    assert_eq!(receipt.backend, "csv-file");
    assert_eq!(failing.call_count(), 1);
    assert_eq!(chain.capability(), Capability::Forward);
}

/// Test that every failure is reported when no backend succeeds
#[tokio::test]
async fn test_chain_reports_every_failure() {
    let chain = FallbackChain::new(vec![
        Arc::new(MockBackend::failing("a", Capability::Forward, "down")),
        Arc::new(MockBackend::failing("b", Capability::AppendRow, "full")),
    ]);

    match chain.save(&sample_response("Alice")).await {
        Err(BackendError::Exhausted(attempts)) => assert_eq!(attempts.len(), 2),
        other => panic!("expected exhausted chain, got {:?}", other),
    }
}

/// Test building a chain from TOML with paths rooted at the data directory
#[tokio::test]
async fn test_backend_config_from_toml() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config: BackendConfig = toml::from_str(
        r#"
        kind = "chain"

        [[backends]]
        kind = "json-archive"
        dir = "archive"

        [[backends]]
        kind = "csv-file"
        path = "responses/all.csv"
        "#,
    )
    .unwrap();
    let config = config.rooted_at(dir.path());
    assert_eq!(
        config.csv_path(),
        Some(dir.path().join("responses/all.csv").as_path())
    );

    let backend = config.build().unwrap();
    let receipt = backend.save(&sample_response("Alice")).await.unwrap();
    assert_eq!(receipt.backend, "json-archive");
    assert!(dir.path().join("archive").join("all-responses.json").exists());
    assert!(!dir.path().join("responses/all.csv").exists());
}

/// Test that backends refuse a response without identity
#[tokio::test]
async fn test_missing_identity_rejected() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let backend = CsvFileBackend::new(dir.path().join("responses.csv"));
    let response = SurveyResponse {
        email: String::new(),
        ..sample_response("Alice")
    };

    assert!(matches!(
        backend.save(&response).await,
        Err(BackendError::MissingIdentity)
    ));
    assert!(!backend.path().exists());
}
