use std::collections::HashSet;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::configs::Access;
use crate::errors::ApiError;

#[derive(Clone)]
pub struct AccessState {
    enabled: bool,
    allow: Arc<HashSet<IpAddr>>,
}

impl AccessState {
    pub fn new(access: &Access) -> Self {
        Self {
            enabled: access.enabled,
            allow: Arc::new(access.allow.iter().map(IpAddr::to_canonical).collect()),
        }
    }

    /// IPv4-mapped IPv6 peers match their IPv4 entry.
    pub fn allows(&self, ip: IpAddr) -> bool {
        !self.enabled || self.allow.contains(&ip.to_canonical())
    }
}

pub async fn origin_filter(
    State(state): State<AccessState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    if !state.enabled {
        return Ok(next.run(req).await);
    }

    match connect_info {
        Some(ConnectInfo(peer)) if state.allows(peer.ip()) => Ok(next.run(req).await),
        Some(ConnectInfo(peer)) => {
            tracing::warn!("rejected {} {} from {}", req.method(), req.uri(), peer.ip());
            Err(ApiError::Forbidden)
        }
        None => {
            tracing::warn!("rejected {} {} from unknown peer", req.method(), req.uri());
            Err(ApiError::Forbidden)
        }
    }
}
