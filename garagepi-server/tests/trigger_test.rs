use std::sync::atomic::Ordering;
use std::time::Duration;

use serde_json::json;

mod common;
use common::mock_app::MockApp;

#[tokio::test(start_paused = true)]
async fn test_trigger_pulses_relay() {
    let app = MockApp::new().await;

    let (status, body) = app.get("/trigger").await;

    assert_eq!(status, 200);
    assert_eq!(body["response"], json!("door triggered"));
    assert_eq!(app.handles.relay.writes(), vec![true]);

    tokio::time::sleep(app.settings.relay.dwell() + Duration::from_millis(50)).await;

    assert_eq!(app.handles.relay.writes(), vec![true, false]);
}

#[tokio::test(start_paused = true)]
async fn test_trigger_during_dwell_extends_pulse() {
    let app = MockApp::new().await;
    let dwell = app.settings.relay.dwell();

    app.get("/trigger").await;
    tokio::time::sleep(dwell / 2).await;
    app.get("/trigger").await;

    tokio::time::sleep(dwell * 3 / 4).await;
    assert_eq!(app.handles.relay.level(), Some(true));

    tokio::time::sleep(dwell).await;
    assert_eq!(app.handles.relay.writes(), vec![true, true, false]);
}

#[tokio::test]
async fn test_trigger_failure_reports_error() {
    let app = MockApp::new().await;
    app.handles.relay.fail.store(true, Ordering::SeqCst);

    let (status, body) = app.get("/trigger").await;

    assert_eq!(status, 500);
    assert_eq!(body["error"]["code"], json!(500));
    assert_eq!(body["error"]["message"], json!("Door trigger failed"));
    assert!(body["error"]["error_id"].is_string());
}
