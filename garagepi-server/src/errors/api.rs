use axum::http::StatusCode;

use super::HardwareError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Forbidden")]
    Forbidden,

    #[error("Not found")]
    NotFound,

    #[error("Actuation failed: {0}")]
    ActuationFailed(#[from] HardwareError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::ActuationFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
