//! In-memory hardware for tests: a recording relay, a scripted climate sensor
//! and a sender for injecting door edges.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use embedded_hal::digital::{self, ErrorKind, ErrorType, OutputPin};
use tokio::sync::mpsc;

use super::{ClimateReading, ClimateSensor, Hardware, LineRelease};
use crate::errors::HardwareError;
use crate::models::RawEdge;

#[derive(Debug)]
pub struct MockPinError;

impl digital::Error for MockPinError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Relay that records every level written to it.
#[derive(Clone, Default)]
pub struct MockRelay {
    pub writes: Arc<Mutex<Vec<bool>>>,
    pub fail: Arc<AtomicBool>,
}

impl MockRelay {
    pub fn writes(&self) -> Vec<bool> {
        self.writes.lock().map(|w| w.clone()).unwrap_or_default()
    }

    pub fn level(&self) -> Option<bool> {
        self.writes().last().copied()
    }

    fn write(&mut self, level: bool) -> Result<(), MockPinError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(MockPinError);
        }
        if let Ok(mut writes) = self.writes.lock() {
            writes.push(level);
        }
        Ok(())
    }
}

impl ErrorType for MockRelay {
    type Error = MockPinError;
}

impl OutputPin for MockRelay {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write(true)
    }
}

/// Climate sensor replaying a queue of results; an empty queue reads as a failure.
#[derive(Default)]
pub struct ScriptedClimate {
    script: Mutex<VecDeque<Result<ClimateReading, String>>>,
}

impl ScriptedClimate {
    pub fn push_reading(&self, temperature: f64, humidity: f64) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(Ok(ClimateReading { temperature, humidity }));
        }
    }

    pub fn push_failure(&self, reason: &str) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(Err(reason.to_string()));
        }
    }
}

#[async_trait]
impl ClimateSensor for ScriptedClimate {
    async fn read(&self) -> Result<ClimateReading, HardwareError> {
        let next = self.script.lock().ok().and_then(|mut script| script.pop_front());

        match next {
            Some(Ok(reading)) => Ok(reading),
            Some(Err(reason)) => Err(HardwareError::Read(reason)),
            None => Err(HardwareError::Read("no scripted reading".into())),
        }
    }
}

/// Records release attempts; can be switched to fail or to never finish.
#[derive(Clone, Default)]
pub struct MockRelease {
    pub released: Arc<AtomicBool>,
    pub fail: Arc<AtomicBool>,
    pub hang: Arc<AtomicBool>,
}

#[async_trait]
impl LineRelease for MockRelease {
    async fn release(&mut self) -> Result<(), HardwareError> {
        self.released.store(true, Ordering::SeqCst);

        if self.hang.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(HardwareError::Release("unexport #17: device busy".into()));
        }

        Ok(())
    }
}

pub struct MockHandles {
    pub edges: mpsc::Sender<RawEdge>,
    pub relay: MockRelay,
    pub climate: Arc<ScriptedClimate>,
    pub release: MockRelease,
}

pub fn mock_hardware(channel_capacity: usize) -> (Hardware, MockHandles) {
    let (edge_tx, edge_rx) = mpsc::channel(channel_capacity);
    let relay = MockRelay::default();
    let climate = Arc::new(ScriptedClimate::default());
    let release = MockRelease::default();

    let hardware = Hardware {
        relay: Box::new(relay.clone()),
        climate: climate.clone(),
        edges: edge_rx,
        release: Box::new(release.clone()),
    };

    (hardware, MockHandles { edges: edge_tx, relay, climate, release })
}
