use std::convert::Infallible;
use std::f64::consts::PI;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use embedded_hal::digital::{ErrorType, OutputPin};
use rand::Rng;
use time::OffsetDateTime;
use tokio::sync::{Notify, mpsc};
use tokio::task::JoinHandle;

use super::{ClimateReading, ClimateSensor, Hardware, LineRelease};
use crate::configs::{ClimateModel, Pins, Settings};
use crate::errors::HardwareError;
use crate::models::RawEdge;

const MID_BAND: f64 = 0.05;

pub fn setup(settings: &Settings) -> Hardware {
    let simulated = &settings.hardware.simulated;
    let pins = settings.hardware.pins.clone();
    let (edge_tx, edge_rx) = mpsc::channel(settings.door.channel_capacity);
    let press = Arc::new(Notify::new());

    let tick = Duration::from_millis(simulated.tick_ms);
    let door = SimulatedDoor::new(simulated.tick_ms as f64 / simulated.travel_ms as f64);
    let task = tokio::spawn(run_door(door, pins, edge_tx, press.clone(), tick));

    tracing::warn!("using simulated hardware, no physical lines are driven");

    Hardware {
        relay: Box::new(SimulatedRelay { active: false, press }),
        climate: Arc::new(SimulatedClimate {
            model: settings.hardware.climate_model,
            failure_rate: simulated.failure_rate,
        }),
        edges: edge_rx,
        release: Box::new(SimulatedRelease { task: Some(task) }),
    }
}

/// Relay whose rising edge presses the simulated opener button.
pub struct SimulatedRelay {
    active: bool,
    press: Arc<Notify>,
}

impl ErrorType for SimulatedRelay {
    type Error = Infallible;
}

impl OutputPin for SimulatedRelay {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.active = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        if !self.active {
            self.press.notify_one();
        }
        self.active = true;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Motion {
    Stopped,
    Opening,
    Closing,
}

/// Door travelling between 0.0 (closed) and 1.0 (open) with a single-button opener.
#[derive(Debug)]
struct SimulatedDoor {
    position: f64,
    motion: Motion,
    last_travel: Motion,
    step: f64,
}

impl SimulatedDoor {
    fn new(step: f64) -> Self {
        Self {
            position: 0.0,
            motion: Motion::Stopped,
            last_travel: Motion::Closing,
            step,
        }
    }

    /// A press stops a moving door, otherwise starts travel away from where it last went.
    fn press(&mut self) {
        self.motion = match self.motion {
            Motion::Opening | Motion::Closing => Motion::Stopped,
            Motion::Stopped if self.position >= 1.0 => Motion::Closing,
            Motion::Stopped if self.position <= 0.0 => Motion::Opening,
            Motion::Stopped if self.last_travel == Motion::Opening => Motion::Closing,
            Motion::Stopped => Motion::Opening,
        };

        if self.motion != Motion::Stopped {
            self.last_travel = self.motion;
        }
    }

    fn advance(&mut self) {
        match self.motion {
            Motion::Opening => {
                self.position = (self.position + self.step).min(1.0);
                if self.position >= 1.0 {
                    self.motion = Motion::Stopped;
                }
            }
            Motion::Closing => {
                self.position = (self.position - self.step).max(0.0);
                if self.position <= 0.0 {
                    self.motion = Motion::Stopped;
                }
            }
            Motion::Stopped => {}
        }
    }

    /// Sensor levels as `[top, mid, bot]`.
    fn levels(&self) -> [bool; 3] {
        let band = MID_BAND.max(self.step);

        [
            self.position >= 1.0,
            (self.position - 0.5).abs() <= band,
            self.position <= 0.0,
        ]
    }
}

async fn run_door(
    mut door: SimulatedDoor,
    pins: Pins,
    edges: mpsc::Sender<RawEdge>,
    press: Arc<Notify>,
    tick: Duration,
) {
    let lines = [pins.door_top, pins.door_mid, pins.door_bot];
    let mut levels = door.levels();
    let mut interval = tokio::time::interval(tick);

    loop {
        tokio::select! {
            _ = press.notified() => door.press(),
            _ = interval.tick() => door.advance(),
        }

        let next = door.levels();
        for ((&pin, &level), previous) in lines.iter().zip(next.iter()).zip(levels.iter()) {
            if level != *previous && edges.send(RawEdge { pin, level }).await.is_err() {
                return;
            }
        }
        levels = next;
    }
}

pub struct SimulatedClimate {
    model: ClimateModel,
    failure_rate: f64,
}

impl SimulatedClimate {
    fn sample(&self, day_fraction: f64) -> Result<ClimateReading, HardwareError> {
        let mut rng = rand::thread_rng();

        if rng.gen_bool(self.failure_rate) {
            return Err(HardwareError::Read("simulated checksum mismatch".into()));
        }

        // Warmest mid-afternoon, most humid before dawn.
        let phase = (day_fraction - 0.375) * 2.0 * PI;
        let temperature = 16.0 + 7.0 * phase.sin() + rng.gen_range(-0.3..0.3);
        let humidity = 55.0 - 15.0 * phase.sin() + rng.gen_range(-1.0..1.0);

        Ok(ClimateReading { temperature, humidity })
    }
}

#[async_trait]
impl ClimateSensor for SimulatedClimate {
    async fn read(&self) -> Result<ClimateReading, HardwareError> {
        let now = OffsetDateTime::now_utc();
        let day_fraction = f64::from(now.time().hour()) / 24.0
            + f64::from(now.time().minute()) / 1440.0
            + f64::from(now.time().second()) / 86400.0;

        self.model.check(self.sample(day_fraction)?)
    }
}

pub struct SimulatedRelease {
    task: Option<JoinHandle<()>>,
}

#[async_trait]
impl LineRelease for SimulatedRelease {
    async fn release(&mut self) -> Result<(), HardwareError> {
        if let Some(task) = self.task.take() {
            task.abort();
        }

        Ok(())
    }
}
