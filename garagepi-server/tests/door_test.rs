use garagepi_api::{DoorDirection, DoorPosition};
use serde_json::json;

mod common;
use common::mock_app::MockApp;

#[tokio::test]
async fn test_door_starts_unknown() {
    let app = MockApp::new().await;

    let (status, body) = app.get("/door").await;

    assert_eq!(status, 200);
    assert_eq!(body["response"]["position"], json!("UNKNOWN"));
    assert_eq!(body["response"]["direction"], json!("UNKNOWN"));
    assert!(body["response"]["updated"].is_string());
}

#[tokio::test]
async fn test_door_opening_sequence() {
    let app = MockApp::new().await;
    let pins = app.settings.hardware.pins.clone();

    app.send_edge(pins.door_bot, false).await;
    app.wait_for_door(|s| s.position == DoorPosition::Moving).await;

    let (_, body) = app.get("/door").await;
    assert_eq!(body["response"]["position"], json!("MOVING"));
    assert_eq!(body["response"]["direction"], json!("UP"));

    app.send_edge(pins.door_mid, true).await;
    let status = app.wait_for_door(|s| s.position == DoorPosition::Middle).await;
    assert_eq!(status.direction, DoorDirection::Up);

    app.send_edge(pins.door_mid, false).await;
    app.send_edge(pins.door_top, true).await;
    app.wait_for_door(|s| s.position == DoorPosition::Top).await;

    let (_, body) = app.get("/door").await;
    assert_eq!(body["response"]["position"], json!("TOP"));
    assert_eq!(body["response"]["direction"], json!("STATIONARY"));
}

#[tokio::test]
async fn test_unknown_pin_is_ignored() {
    let app = MockApp::new().await;
    let pins = app.settings.hardware.pins.clone();

    app.send_edge(pins.relay, true).await;
    app.send_edge(pins.door_bot, true).await;
    app.wait_for_door(|s| s.position == DoorPosition::Bottom).await;

    let (_, body) = app.get("/door").await;
    assert_eq!(body["response"]["position"], json!("BOTTOM"));
    assert_eq!(body["response"]["direction"], json!("STATIONARY"));
}

#[tokio::test]
async fn test_repeated_reads_identical() {
    let app = MockApp::new().await;
    let pins = app.settings.hardware.pins.clone();

    let (_, first) = app.get("/door").await;
    let (_, second) = app.get("/door").await;
    assert_eq!(first, second);

    app.send_edge(pins.door_top, false).await;
    app.wait_for_door(|s| s.direction == DoorDirection::Down).await;

    let (_, first) = app.get("/door").await;
    let (_, second) = app.get("/door").await;
    assert_eq!(first, second);
    assert_eq!(first["response"]["position"], json!("MOVING"));
}
