pub mod api;
pub mod hardware;

pub use api::ApiError;
pub use hardware::HardwareError;

use axum::Json;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use uuid::Uuid;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let (error_message, error_id) = match &self {
            ApiError::Forbidden | ApiError::NotFound => (self.to_string(), None),
            ApiError::ActuationFailed(e) => {
                let error_id = Uuid::new_v4();
                tracing::error!(error_id = ?error_id, "Actuation error: {}", e);
                ("Door trigger failed".to_string(), Some(error_id.to_string()))
            }
        };

        let mut error_obj = json!({
            "code": status.as_u16(),
            "message": error_message
        });

        if let Some(error_id) = error_id {
            error_obj["error_id"] = json!(error_id);
        }

        let body = Json(json!({
            "error": error_obj
        }));

        (status, body).into_response()
    }
}
