use std::sync::Arc;

use garagepi_api::{DoorDirection, DoorPosition, DoorStatus};
use time::OffsetDateTime;
use tokio::sync::{RwLock, mpsc};
use tokio::task::JoinHandle;

use crate::models::{DoorChannel, RawEdge, SensorEvent};
use crate::services::SignalNormalizer;

/// Apply one sensor event to the current estimate.
///
/// | channel | engaged                 | released              |
/// |---------|-------------------------|-----------------------|
/// | top     | `TOP`, `STATIONARY`     | `MOVING`, `DOWN`      |
/// | mid     | `MIDDLE`, direction kept| `MOVING`, direction kept |
/// | bot     | `BOTTOM`, `STATIONARY`  | `MOVING`, `UP`        |
///
/// Cross-sensor consistency is not checked; out-of-order events can leave a
/// transient estimate that the next event overwrites.
pub fn reduce(current: &DoorStatus, event: &SensorEvent) -> DoorStatus {
    let (position, direction) = match (event.channel, event.level) {
        (DoorChannel::Top, true) => (DoorPosition::Top, DoorDirection::Stationary),
        (DoorChannel::Top, false) => (DoorPosition::Moving, DoorDirection::Down),
        (DoorChannel::Mid, true) => (DoorPosition::Middle, current.direction),
        (DoorChannel::Mid, false) => (DoorPosition::Moving, current.direction),
        (DoorChannel::Bot, true) => (DoorPosition::Bottom, DoorDirection::Stationary),
        (DoorChannel::Bot, false) => (DoorPosition::Moving, DoorDirection::Up),
    };

    DoorStatus {
        updated: current.updated.max(event.time),
        position,
        direction,
    }
}

pub struct DoorService {
    status: RwLock<DoorStatus>,
    normalizer: SignalNormalizer,
}

impl DoorService {
    pub fn new(normalizer: SignalNormalizer, started: OffsetDateTime) -> Self {
        Self {
            status: RwLock::new(DoorStatus::unknown(started)),
            normalizer,
        }
    }

    pub async fn status(&self) -> DoorStatus {
        *self.status.read().await
    }

    pub async fn apply(&self, event: SensorEvent) -> DoorStatus {
        let mut status = self.status.write().await;
        *status = reduce(&status, &event);

        tracing::info!("door status change: {} & {}", status.position, status.direction);

        *status
    }

    pub async fn handle_edge(&self, edge: RawEdge) -> Option<DoorStatus> {
        let event = self.normalizer.normalize_now(edge)?;

        Some(self.apply(event).await)
    }

    /// Consume edges in arrival order until every sender is dropped.
    pub fn start_listening(self: Arc<Self>, mut edges: mpsc::Receiver<RawEdge>) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(edge) = edges.recv().await {
                self.handle_edge(edge).await;
            }

            tracing::debug!("door edge source closed");
        })
    }
}
