mod air_handle;
mod door_handle;
mod info_handle;
mod trigger_handle;

pub use air_handle::*;
pub use door_handle::*;
pub use info_handle::*;
pub use trigger_handle::*;

use crate::errors::ApiError;

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
