use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use garagepi_api::{ApiResponse, DoorStatus};

use crate::services::DoorService;

#[derive(Clone)]
pub struct DoorState {
    pub door_service: Arc<DoorService>,
}

pub fn door_router(door_state: DoorState) -> Router {
    Router::new()
        .route("/door", get(get_door))
        .with_state(door_state)
}

#[utoipa::path(
    get,
    path = "/door",
    tag = "door",
    responses(
        (status = 200, description = "Current door position and direction", body = ApiResponse<DoorStatus>),
        (status = 403, description = "Client address not allowed")
    )
)]
pub async fn get_door(State(state): State<DoorState>) -> Json<ApiResponse<DoorStatus>> {
    Json(ApiResponse::new(state.door_service.status().await))
}
