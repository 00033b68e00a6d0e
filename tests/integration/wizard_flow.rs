//! Integration tests for the wizard lifecycle
//!
//! Drafts live in real files, so these cover what a respondent sees across
//! restarts, failed submissions and double submits.

use std::sync::Arc;
use std::time::{Duration, Instant};

use super::common::terminal::{assert_buffer_contains, buffer_to_string, render_app};
use super::common::{mounted_wizard, start_with_identity, walk_to_review};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use lookback::draft::{DraftStore, FileDraftStore, SavedDraft, DEFAULT_DRAFT_KEY};
use lookback::submit::mock::MockBackend;
use lookback::submit::{Capability, CsvFileBackend, SubmitError};
use lookback::survey::{Section, TextField};
use lookback::{App, WizardPhase};
use ratatui::layout::Rect;
use tempfile::TempDir;

fn file_store(dir: &TempDir) -> Arc<FileDraftStore> {
    Arc::new(FileDraftStore::new(dir.path().join("drafts")))
}

fn mock() -> MockBackend {
    MockBackend::new("mock", Capability::AppendRow)
}

/// Test that progress survives closing and reopening the wizard
#[test]
fn test_draft_restored_after_restart() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let now = Instant::now();

    let mut first = mounted_wizard(file_store(&dir), Arc::new(mock()), now);
    start_with_identity(&mut first, now, "Alice", "alice@example.com");
    first.advance(now).expect("identity is filled");
    first.advance(now).expect("intro has no requirements");
    first.set_text(now, TextField::MeaningfulImpact, "Helped onboarding");
    first.unload(now);

    let second = mounted_wizard(file_store(&dir), Arc::new(mock()), now);
    assert!(second.restored_draft());
    assert_eq!(second.section(), Section::LookingBack);
    assert_eq!(second.response().name, "Alice");
    assert_eq!(second.response().meaningful_impact, "Helped onboarding");
    assert!(second.last_saved().is_some());
}

/// Test that debounced edits reach the draft file only after the quiet period
#[test]
fn test_debounced_autosave_writes_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = file_store(&dir);
    let now = Instant::now();

    let mut wizard = mounted_wizard(store.clone(), Arc::new(mock()), now);
    start_with_identity(&mut wizard, now, "Bob", "bob@example.com");

    assert!(!wizard.tick(now + Duration::from_millis(500)));
    assert!(store.read(DEFAULT_DRAFT_KEY).unwrap().is_none());

    assert!(wizard.tick(now + Duration::from_secs(3)));
    let raw = store
        .read(DEFAULT_DRAFT_KEY)
        .unwrap()
        .expect("draft written after debounce");
    let draft = SavedDraft::parse(&raw).unwrap();
    assert_eq!(draft.current_section, Some(0));
    assert_eq!(
        draft.form_data.and_then(|d| d.name).as_deref(),
        Some("Bob")
    );
}

/// Test that a failed save keeps the draft and a retry clears it
#[tokio::test]
async fn test_failed_submit_keeps_draft_until_success() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = file_store(&dir);
    let backend = MockBackend::failing("mock", Capability::AppendRow, "offline");
    let now = Instant::now();

    let mut wizard = mounted_wizard(store.clone(), Arc::new(backend.clone()), now);
    start_with_identity(&mut wizard, now, "Carol", "carol@example.com");
    walk_to_review(&mut wizard, now);

    let err = wizard.submit(now).await.unwrap_err();
    assert!(matches!(err, SubmitError::Backend(_)));
    match wizard.phase() {
        WizardPhase::Failed { message } => {
            assert!(message.starts_with("There was an error saving your response"));
        }
        other => panic!("expected failure, got {:?}", other),
    }
    assert!(store.read(DEFAULT_DRAFT_KEY).unwrap().is_some());

    backend.set_failure(None);
    wizard.submit(now).await.expect("retry succeeds");
    assert!(matches!(wizard.phase(), WizardPhase::Submitted(_)));
    assert!(store.read(DEFAULT_DRAFT_KEY).unwrap().is_none());
    assert_eq!(backend.call_count(), 2);
}

/// Test that a second submit is rejected while the first is in flight
#[tokio::test]
async fn test_second_submit_rejected_while_in_flight() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let backend = mock().gated();
    let now = Instant::now();

    let mut wizard = mounted_wizard(file_store(&dir), Arc::new(backend.clone()), now);
    start_with_identity(&mut wizard, now, "Dan", "dan@example.com");
    walk_to_review(&mut wizard, now);

    let pending = wizard.begin_submit(now).expect("first submit accepted");
    assert!(wizard.is_submitting());
    assert!(matches!(
        wizard.begin_submit(now),
        Err(SubmitError::InFlight)
    ));

    let task = tokio::spawn(pending.run());
    backend.release();
    let result = task.await.expect("submission task panicked");
    wizard.finish_submit(result).expect("save succeeds");

    assert_eq!(backend.call_count(), 1);
    assert_eq!(backend.saved().len(), 1);
}

/// Test a keyboard-driven run that quits on the review screen, then
/// resumes and submits into a CSV file
#[tokio::test]
async fn test_tui_progress_resumes_and_submits() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let csv_path = dir.path().join("responses.csv");
    let now = Instant::now();
    let wizard = mounted_wizard(
        file_store(&dir),
        Arc::new(CsvFileBackend::new(&csv_path)),
        now,
    );
    let mut app = App::new(wizard);

    let header = Rect::new(0, 0, 100, 3);
    assert!(buffer_to_string(&render_app(&app)).contains("Begin Reflection"));

    let press = |app: &mut App, code: KeyCode| {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE), Instant::now());
    };
    press(&mut app, KeyCode::Enter);
    assert_buffer_contains(&render_app(&app), header, "Basic Info");

    for c in "Erin".chars() {
        press(&mut app, KeyCode::Char(c));
    }
    press(&mut app, KeyCode::Tab);
    for c in "erin@example.com".chars() {
        press(&mut app, KeyCode::Char(c));
    }
    while !app.wizard().is_final_section() {
        press(&mut app, KeyCode::PageDown);
    }
    assert_buffer_contains(&render_app(&app), header, "Final");

    press(&mut app, KeyCode::Esc);
    assert!(app.should_quit());

    let mut resumed = mounted_wizard(
        file_store(&dir),
        Arc::new(CsvFileBackend::new(&csv_path)),
        now,
    );
    assert!(resumed.restored_draft());
    assert_eq!(resumed.section(), Section::Review);
    resumed.begin();
    resumed.submit(now).await.expect("save succeeds");

    let rows = CsvFileBackend::new(&csv_path)
        .read_responses()
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][1], "Erin");
    assert_eq!(rows[0][2], "erin@example.com");
}
