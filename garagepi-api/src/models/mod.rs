mod air;
mod door;
mod info;

pub use air::*;
pub use door::*;
pub use info::*;

use serde::{Deserialize, Serialize};

/// Envelope wrapping every successful payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
pub struct ApiResponse<T> {
    pub response: T,
}

impl<T> ApiResponse<T> {
    pub fn new(response: T) -> Self {
        Self { response }
    }
}
