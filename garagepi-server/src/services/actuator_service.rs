use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::errors::HardwareError;
use crate::hardware::RelayPin;

struct RelayState {
    pin: Box<dyn RelayPin>,
    active: bool,
    /// Bumped by every successful pulse; a release timer only fires for the
    /// pulse that scheduled it.
    generation: u64,
}

/// Pulses the door button relay. Every trigger restarts the dwell, so the
/// relay is released exactly `dwell` after the most recent trigger.
pub struct ActuatorService {
    relay: Arc<Mutex<RelayState>>,
    dwell: Duration,
}

impl ActuatorService {
    pub fn new(pin: Box<dyn RelayPin>, dwell: Duration) -> Self {
        Self {
            relay: Arc::new(Mutex::new(RelayState {
                pin,
                active: false,
                generation: 0,
            })),
            dwell,
        }
    }

    /// Drive the relay active and return without waiting for the release.
    pub async fn pulse(&self) -> Result<(), HardwareError> {
        let generation = {
            let mut relay = self.relay.lock().await;
            relay.pin.set_active(true)?;
            relay.active = true;
            relay.generation += 1;
            relay.generation
        };

        let relay = self.relay.clone();
        let dwell = self.dwell;
        tokio::spawn(async move {
            tokio::time::sleep(dwell).await;

            let mut relay = relay.lock().await;
            if relay.generation != generation {
                return;
            }

            match relay.pin.set_active(false) {
                Ok(()) => relay.active = false,
                Err(e) => tracing::error!("failed to release relay: {}", e),
            }
        });

        tracing::info!("door triggered");

        Ok(())
    }

    pub async fn is_active(&self) -> bool {
        self.relay.lock().await.active
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::hardware::mock::MockRelay;

    const DWELL: Duration = Duration::from_millis(500);

    #[tokio::test(start_paused = true)]
    async fn test_pulse_returns_before_release() {
        let relay = MockRelay::default();
        let service = ActuatorService::new(Box::new(relay.clone()), DWELL);

        service.pulse().await.unwrap();

        assert!(service.is_active().await);
        assert_eq!(relay.writes(), vec![true]);

        tokio::time::sleep(DWELL + Duration::from_millis(10)).await;

        assert!(!service.is_active().await);
        assert_eq!(relay.writes(), vec![true, false]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_triggers_restart_dwell() {
        let relay = MockRelay::default();
        let service = ActuatorService::new(Box::new(relay.clone()), DWELL);

        service.pulse().await.unwrap();
        tokio::time::sleep(Duration::from_millis(300)).await;
        service.pulse().await.unwrap();

        // The first pulse's timer has expired but must not release the relay.
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(service.is_active().await);
        assert_eq!(relay.level(), Some(true));

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert!(!service.is_active().await);
        assert_eq!(relay.writes(), vec![true, true, false]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_write_is_reported() {
        let relay = MockRelay::default();
        relay.fail.store(true, Ordering::SeqCst);
        let service = ActuatorService::new(Box::new(relay.clone()), DWELL);

        let result = service.pulse().await;

        assert!(matches!(result, Err(HardwareError::Write { line: "relay", .. })));
        assert!(!service.is_active().await);
        assert!(relay.writes().is_empty());
    }
}
