use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::extract::connect_info::MockConnectInfo;
use axum::http::{Request, StatusCode};
use garagepi_api::DoorStatus;
use garagepi_server::app::{App, AppServices, create_app};
use garagepi_server::configs::Settings;
use garagepi_server::hardware::mock::{MockHandles, mock_hardware};
use garagepi_server::models::RawEdge;
use serde_json::Value;
use tower::ServiceExt;

const DEFAULT_CONFIG: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../configs/default.toml"));

pub struct MockApp {
    pub app: App,
    pub services: AppServices,
    pub handles: MockHandles,
    pub settings: Settings,
}

impl MockApp {
    pub async fn new() -> Self {
        Self::with_settings(|_| {}).await
    }

    pub async fn with_settings(configure: impl FnOnce(&mut Settings)) -> Self {
        let mut settings = Settings::from_toml(DEFAULT_CONFIG).unwrap();
        // Keep the background sampler out of the way; tests sample explicitly.
        settings.sampling.interval_ms = 3_600_000;
        configure(&mut settings);

        let (hardware, handles) = mock_hardware(settings.door.channel_capacity);
        let app = create_app(&settings, hardware);
        let services = app.services.clone();

        // Let the sampler consume its immediate first tick against the empty script.
        for _ in 0..3 {
            tokio::task::yield_now().await;
        }

        Self { app, services, handles, settings }
    }

    pub fn router_from(&self, peer: SocketAddr) -> Router {
        self.app.router.clone().layer(MockConnectInfo(peer))
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.get_from("127.0.0.1:50000".parse().unwrap(), uri).await
    }

    pub async fn get_from(&self, peer: SocketAddr, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();

        let response = self.router_from(peer).oneshot(request).await.unwrap();
        let status = response.status();

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    pub async fn send_edge(&self, pin: u32, level: bool) {
        self.handles.edges.send(RawEdge { pin, level }).await.unwrap();
    }

    /// Poll until the door listener has produced a status matching `done`.
    pub async fn wait_for_door(&self, done: impl Fn(&DoorStatus) -> bool) -> DoorStatus {
        for _ in 0..200 {
            let status = self.services.door.status().await;
            if done(&status) {
                return status;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        panic!("door status never settled: {:?}", self.services.door.status().await);
    }
}
