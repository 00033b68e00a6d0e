//! Integration tests for the non-interactive subcommands

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use super::common::sample_response;
use lookback::submit::{CsvFileBackend, SaveBackend};

fn lookback(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("lookback").expect("binary built");
    cmd.arg("--data-dir").arg(data_dir.path());
    cmd.env_remove("LOOKBACK_DATA_DIR");
    cmd
}

#[test]
fn test_export_without_responses_fails() {
    let dir = TempDir::new().expect("Failed to create temp dir");

    lookback(&dir)
        .arg("export")
        .assert()
        .failure()
        .stderr(predicate::str::contains("CSV file not found. No responses yet."));

    // First run writes the example config
    assert!(dir.path().join("config.toml").exists());
}

#[tokio::test]
async fn test_export_writes_collected_csv() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let csv = CsvFileBackend::new(
        dir.path()
            .join("survey-responses")
            .join("survey-responses.csv"),
    );
    csv.save(&sample_response("Alice")).await.unwrap();

    lookback(&dir)
        .arg("export")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Timestamp,Name,Email"))
        .stdout(predicate::str::contains("Alice"));

    let out = dir.path().join("export.csv");
    lookback(&dir)
        .args(["export", "--output"])
        .arg(&out)
        .assert()
        .success();
    let exported = std::fs::read_to_string(&out).unwrap();
    assert_eq!(exported.lines().filter(|l| l.starts_with("Timestamp")).count(), 1);
}

#[test]
fn test_draft_show_and_clear() {
    let dir = TempDir::new().expect("Failed to create temp dir");

    lookback(&dir)
        .args(["draft", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No saved draft"));

    let drafts = dir.path().join("drafts");
    std::fs::create_dir_all(&drafts).unwrap();
    std::fs::write(
        drafts.join("survey-form-draft.json"),
        r#"{"formData":{"name":"Alice"},"currentSection":3}"#,
    )
    .unwrap();

    lookback(&dir)
        .args(["draft", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"Alice\""))
        .stdout(predicate::str::contains("\"currentSection\": 3"));

    lookback(&dir)
        .args(["draft", "clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Draft cleared"));
    assert!(!drafts.join("survey-form-draft.json").exists());
}
