use std::sync::Arc;
use std::time::Duration;

use axum::{Router, middleware};
use time::OffsetDateTime;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;

use crate::configs::Settings;
use crate::handles::*;
use crate::hardware::{Hardware, LineRelease};
use crate::middlewares::{AccessState, origin_filter};
use crate::services::{ActuatorService, AirService, DoorService, InfoService, SignalNormalizer};

#[derive(Clone)]
pub struct AppServices {
    pub door: Arc<DoorService>,
    pub air: Arc<AirService>,
    pub actuator: Arc<ActuatorService>,
    pub info: Arc<InfoService>,
}

pub struct App {
    pub router: Router,
    pub services: AppServices,
    tasks: Vec<JoinHandle<()>>,
    release: Box<dyn LineRelease>,
}

pub fn create_router(settings: &Settings, services: &AppServices) -> Router {
    Router::new()
        .merge(info_router(InfoState {
            info_service: services.info.clone(),
        }))
        .merge(door_router(DoorState {
            door_service: services.door.clone(),
        }))
        .merge(air_router(AirState {
            air_service: services.air.clone(),
        }))
        .merge(trigger_router(TriggerState {
            actuator_service: services.actuator.clone(),
        }))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(AccessState::new(&settings.access), origin_filter))
        .layer(TraceLayer::new_for_http())
}

/// Wire the services to acquired hardware and start the background tasks.
pub fn create_app(settings: &Settings, hardware: Hardware) -> App {
    let Hardware { relay, climate, edges, release } = hardware;
    let pins = &settings.hardware.pins;

    let door = Arc::new(DoorService::new(SignalNormalizer::new(pins), OffsetDateTime::now_utc()));
    let air = Arc::new(AirService::new(&settings.sampling, climate, pins.climate));
    let actuator = Arc::new(ActuatorService::new(relay, settings.relay.dwell()));
    let info = Arc::new(InfoService::new(&settings.server));

    let tasks = vec![
        door.clone().start_listening(edges),
        air.clone().start_sampling(),
    ];

    let services = AppServices { door, air, actuator, info };

    App {
        router: create_router(settings, &services),
        services,
        tasks,
        release,
    }
}

impl App {
    /// Stop the background tasks and hand the lines back to the system.
    /// Release is best effort: failures and timeouts are logged only.
    pub async fn shutdown(mut self, timeout: Duration) {
        for task in &self.tasks {
            task.abort();
        }

        match tokio::time::timeout(timeout, self.release.release()).await {
            Ok(Ok(())) => tracing::info!("GPIO lines released"),
            Ok(Err(e)) => tracing::error!("failed to release GPIO lines: {}", e),
            Err(_) => tracing::error!("GPIO release timed out after {:?}", timeout),
        }
    }
}
