use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use garagepi_api::{AirResponse, ApiResponse};

use crate::services::AirService;

#[derive(Clone)]
pub struct AirState {
    pub air_service: Arc<AirService>,
}

pub fn air_router(air_state: AirState) -> Router {
    Router::new()
        .route("/air", get(get_air))
        .with_state(air_state)
}

#[utoipa::path(
    get,
    path = "/air",
    tag = "air",
    responses(
        (status = 200, description = "Recent samples and hourly history, newest first", body = ApiResponse<AirResponse>),
        (status = 403, description = "Client address not allowed")
    )
)]
pub async fn get_air(State(state): State<AirState>) -> Json<ApiResponse<AirResponse>> {
    Json(ApiResponse::new(state.air_service.snapshot().await))
}
