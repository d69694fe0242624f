use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemStatus {
    /// Snapshot time
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// Address the host is reachable on
    pub ip: Option<String>,
    /// 1, 5 and 15 minute load averages
    pub load: Option<[f64; 3]>,
    /// Host uptime in seconds
    pub uptime: Option<u64>,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointInfo {
    pub name: String,
    pub path: String,
    pub description: String,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// Host status captured at process start
    pub boot_status: SystemStatus,
    /// Host status at request time
    pub current_status: SystemStatus,
    /// Public endpoints
    pub api: Vec<EndpointInfo>,
}
