use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use garagepi_api::ApiResponse;

use crate::errors::ApiError;
use crate::services::ActuatorService;

#[derive(Clone)]
pub struct TriggerState {
    pub actuator_service: Arc<ActuatorService>,
}

pub fn trigger_router(trigger_state: TriggerState) -> Router {
    Router::new()
        .route("/trigger", get(trigger_door))
        .with_state(trigger_state)
}

#[utoipa::path(
    get,
    path = "/trigger",
    tag = "trigger",
    responses(
        (status = 200, description = "Relay pulsed; responds before the relay is released", body = ApiResponse<String>),
        (status = 403, description = "Client address not allowed"),
        (status = 500, description = "Relay could not be driven")
    )
)]
pub async fn trigger_door(State(state): State<TriggerState>) -> Result<Json<ApiResponse<&'static str>>, ApiError> {
    state.actuator_service.pulse().await?;

    Ok(Json(ApiResponse::new("door triggered")))
}
