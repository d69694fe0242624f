use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use garagepi_api::ServiceInfo;

use crate::services::InfoService;

#[derive(Clone)]
pub struct InfoState {
    pub info_service: Arc<InfoService>,
}

pub fn info_router(info_state: InfoState) -> Router {
    Router::new()
        .route("/", get(get_info))
        .with_state(info_state)
}

#[utoipa::path(
    get,
    path = "/",
    tag = "info",
    responses(
        (status = 200, description = "Host status at boot and now, plus the endpoint list", body = ServiceInfo),
        (status = 403, description = "Client address not allowed")
    )
)]
pub async fn get_info(State(state): State<InfoState>) -> Json<ServiceInfo> {
    Json(state.info_service.info())
}
