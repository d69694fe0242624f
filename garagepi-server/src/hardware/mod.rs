//! Boundary to the physical lines: relay output, door position inputs and the
//! climate sensor. Backends hand the rest of the service a [`Hardware`] bundle.

#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod simulated;
pub mod sysfs;

use std::sync::Arc;

use async_trait::async_trait;
use embedded_hal::digital::OutputPin;
use tokio::sync::mpsc;

use crate::configs::{Backend, ClimateModel, Settings};
use crate::errors::HardwareError;
use crate::models::RawEdge;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateReading {
    /// Celsius
    pub temperature: f64,
    /// Relative humidity percentage
    pub humidity: f64,
}

impl ClimateModel {
    /// Reject readings the sensor cannot physically produce.
    pub fn check(self, reading: ClimateReading) -> Result<ClimateReading, HardwareError> {
        let (temperature, humidity) = match self {
            ClimateModel::Dht11 => (0.0..=50.0, 20.0..=90.0),
            ClimateModel::Dht22 => (-40.0..=80.0, 0.0..=100.0),
        };

        if temperature.contains(&reading.temperature) && humidity.contains(&reading.humidity) {
            Ok(reading)
        } else {
            Err(HardwareError::OutOfRange {
                temperature: reading.temperature,
                humidity: reading.humidity,
            })
        }
    }
}

pub trait RelayPin: Send {
    fn set_active(&mut self, active: bool) -> Result<(), HardwareError>;
}

impl<P> RelayPin for P
where
    P: OutputPin + Send,
{
    fn set_active(&mut self, active: bool) -> Result<(), HardwareError> {
        let result = if active { self.set_high() } else { self.set_low() };

        result.map_err(|e| HardwareError::Write {
            line: "relay",
            reason: format!("{e:?}"),
        })
    }
}

#[async_trait]
pub trait ClimateSensor: Send + Sync {
    async fn read(&self) -> Result<ClimateReading, HardwareError>;
}

#[async_trait]
pub trait LineRelease: Send {
    /// Give every acquired line back to the system. Called once at shutdown.
    async fn release(&mut self) -> Result<(), HardwareError>;
}

pub struct Hardware {
    pub relay: Box<dyn RelayPin>,
    pub climate: Arc<dyn ClimateSensor>,
    pub edges: mpsc::Receiver<RawEdge>,
    pub release: Box<dyn LineRelease>,
}

pub async fn setup(settings: &Settings) -> Result<Hardware, HardwareError> {
    let pins = &settings.hardware.pins;
    tracing::info!("GPIO setup: door top [#{}]", pins.door_top);
    tracing::info!("GPIO setup: door middle [#{}]", pins.door_mid);
    tracing::info!("GPIO setup: door bottom [#{}]", pins.door_bot);
    tracing::info!("GPIO setup: relay [#{}]", pins.relay);
    tracing::info!("GPIO setup: climate sensor {:?} [#{}]", settings.hardware.climate_model, pins.climate);

    match settings.hardware.backend {
        Backend::Simulated => Ok(simulated::setup(settings)),
        Backend::Sysfs => sysfs::setup(settings).await,
    }
}
