//! End-to-end tests for the upload page and its draft handling

mod common;

use chrono::{Duration, Utc};
use common::TestApp;
use config_hub::app::navigation::Page;
use config_hub::constants::{STORAGE_UPLOAD_AUTOSAVE, UPLOAD_REDIRECT_DELAY};
use config_hub::domain::draft::{InputMode, UploadDraft};
use config_hub::domain::parameter::{ParameterRow, ParameterType};
use config_hub::eventing::AppEvent;
use config_hub::features::upload::{UploadController, UploadEntry};
use config_hub::state::UploadForm;
use config_hub::utils::config_store::{LocalStore, save_json};
use serde_json::json;

fn draft_saved(hours_ago: i64) -> UploadDraft {
    let mut form = UploadForm::new();
    form.title = "Half done".to_string();
    form.game = "Chess".to_string();
    form.snapshot(Utc::now() - Duration::hours(hours_ago))
}

#[tokio::test]
async fn test_missing_title_makes_no_request() {
    let mut test = TestApp::signed_in().await;
    let mut upload = UploadController::new(test.ctx());
    assert_eq!(upload.open(Utc::now()), UploadEntry::Ready { draft: None });

    let before = test.backend.request_count();
    upload.edit(|form| form.game = "Chess".to_string());
    assert!(upload.submit().await.is_none());

    assert_eq!(test.backend.request_count(), before);
    assert_eq!(test.messages(), vec!["Title and game are required"]);
}

#[tokio::test]
async fn test_upload_sends_typed_parameters() {
    let mut test = TestApp::signed_in().await;
    let mut upload = UploadController::new(test.ctx());
    upload.open(Utc::now());

    upload.edit(|form| {
        form.title = "  Opening book ".to_string();
        form.game = "Chess".to_string();
        form.tags = "classic, openings, ".to_string();
        form.rows = vec![
            ParameterRow::new("depth", ParameterType::Number, "12"),
            ParameterRow::new("ponder", ParameterType::Boolean, "true"),
            ParameterRow::new("book", ParameterType::String, "eco-a"),
        ];
    });
    let route = upload.submit().await.expect("uploaded");

    assert_eq!(route.page, Page::Detail);
    assert!(route.id.is_some());
    assert_eq!(test.backend.config_count(), 1);
    assert_eq!(
        test.backend.stored_parameters("Opening book"),
        Some(json!({ "depth": 12, "ponder": true, "book": "eco-a" }))
    );
    // The form starts over
    assert!(upload.form().is_blank());

    let events = test.events();
    assert!(events.iter().any(|e| matches!(
        e,
        AppEvent::Redirect { to, after } if *to == route && *after == UPLOAD_REDIRECT_DELAY
    )));
}

#[tokio::test]
async fn test_upload_from_json_editor() {
    let test = TestApp::signed_in().await;
    let mut upload = UploadController::new(test.ctx());
    upload.open(Utc::now());

    upload.edit(|form| {
        form.title = "Raw".to_string();
        form.game = "Quake".to_string();
    });
    assert!(upload.switch_mode(InputMode::Json));
    upload.edit(|form| form.json_text = r#"{"fov": 110, "binds": {"jump": "space"}}"#.to_string());
    assert!(upload.submit().await.is_some());

    assert_eq!(
        test.backend.stored_parameters("Raw"),
        Some(json!({ "fov": 110, "binds": { "jump": "space" } }))
    );
}

#[tokio::test]
async fn test_invalid_json_is_rejected_locally() {
    let mut test = TestApp::signed_in().await;
    let mut upload = UploadController::new(test.ctx());
    upload.open(Utc::now());

    upload.edit(|form| {
        form.title = "Raw".to_string();
        form.game = "Quake".to_string();
    });
    upload.switch_mode(InputMode::Json);
    upload.edit(|form| form.json_text = "[1, 2".to_string());

    let before = test.backend.request_count();
    assert!(upload.submit().await.is_none());
    assert_eq!(test.backend.request_count(), before);
    assert_eq!(test.messages(), vec!["Parameters JSON is not valid"]);
}

#[tokio::test]
async fn test_day_old_draft_is_discarded() {
    let test = TestApp::signed_in().await;
    save_json(test.store.as_ref(), STORAGE_UPLOAD_AUTOSAVE, &draft_saved(25)).expect("save draft");

    let mut upload = UploadController::new(test.ctx());
    assert_eq!(upload.open(Utc::now()), UploadEntry::Ready { draft: None });
    assert!(test.store.get(STORAGE_UPLOAD_AUTOSAVE).is_none());
}

#[tokio::test]
async fn test_recent_draft_is_offered_and_restored() {
    let test = TestApp::signed_in().await;
    let stored = draft_saved(1);
    save_json(test.store.as_ref(), STORAGE_UPLOAD_AUTOSAVE, &stored).expect("save draft");

    let mut upload = UploadController::new(test.ctx());
    let UploadEntry::Ready { draft: Some(draft) } = upload.open(Utc::now()) else {
        panic!("expected a draft prompt");
    };
    assert_eq!(draft, stored);

    upload.restore_draft(&draft);
    assert_eq!(upload.form().title, "Half done");
    assert_eq!(upload.form().game, "Chess");
}

#[tokio::test]
async fn test_resumed_structured_draft_keeps_parameters() {
    let test = TestApp::signed_in().await;
    let mut first = UploadController::new(test.ctx());
    first.open(Utc::now());
    first.edit(|form| {
        form.title = "Tournament clock".to_string();
        form.game = "Chess".to_string();
        form.rows = vec![ParameterRow::new("clock", ParameterType::Number, "300")];
    });
    assert!(first.save_draft_now(Utc::now()).expect("save"));
    drop(first);

    let mut resumed = UploadController::new(test.ctx());
    let UploadEntry::Ready { draft: Some(draft) } = resumed.open(Utc::now()) else {
        panic!("expected a draft prompt");
    };
    resumed.restore_draft(&draft);
    assert_eq!(resumed.form().mode(), InputMode::Json);
    let payload = resumed.preview().expect("payload");
    assert_eq!(serde_json::Value::Object(payload.parameters), json!({ "clock": 300 }));

    assert!(resumed.submit().await.is_some());
    assert_eq!(
        test.backend.stored_parameters("Tournament clock"),
        Some(json!({ "clock": 300 }))
    );
}

#[tokio::test]
async fn test_successful_upload_removes_draft() {
    let test = TestApp::signed_in().await;
    let mut upload = UploadController::new(test.ctx());
    upload.open(Utc::now());
    upload.edit(|form| {
        form.title = "Keep me".to_string();
        form.game = "Chess".to_string();
    });

    assert!(upload.save_draft_now(Utc::now()).expect("save"));
    assert!(test.store.get(STORAGE_UPLOAD_AUTOSAVE).is_some());

    assert!(upload.submit().await.is_some());
    assert!(test.store.get(STORAGE_UPLOAD_AUTOSAVE).is_none());
}

#[tokio::test(start_paused = true)]
async fn test_autosave_persists_edits() {
    let test = TestApp::signed_in().await;
    let mut upload = UploadController::new(test.ctx());
    upload.open(Utc::now());
    upload.start_autosave();

    upload.edit(|form| {
        form.title = "Typing".to_string();
        form.game = "Chess".to_string();
    });
    tokio::time::sleep(std::time::Duration::from_secs(31)).await;

    let saved = test.store.get(STORAGE_UPLOAD_AUTOSAVE).expect("autosaved");
    assert!(saved.contains("Typing"));
    upload.stop_autosave();
}
