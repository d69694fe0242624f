use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use embedded_hal::digital::{self, ErrorKind, ErrorType, InputPin, OutputPin};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::{ClimateReading, ClimateSensor, Hardware, LineRelease};
use crate::configs::{ClimateModel, Settings};
use crate::errors::HardwareError;
use crate::models::{DoorChannel, RawEdge};

#[derive(Debug)]
pub struct SysfsPinError(io::Error);

impl digital::Error for SysfsPinError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Linux sysfs GPIO controller rooted at e.g. `/sys/class/gpio`.
#[derive(Debug, Clone)]
pub struct SysfsGpio {
    root: PathBuf,
}

impl SysfsGpio {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn line_dir(&self, pin: u32) -> PathBuf {
        self.root.join(format!("gpio{pin}"))
    }

    fn value_path(&self, pin: u32) -> PathBuf {
        self.line_dir(pin).join("value")
    }

    /// Returns `false` when the line was already exported by someone else.
    async fn export(&self, pin: u32) -> io::Result<bool> {
        if tokio::fs::metadata(self.line_dir(pin)).await.is_ok() {
            return Ok(false);
        }

        tokio::fs::write(self.root.join("export"), pin.to_string()).await?;

        Ok(true)
    }

    async fn unexport(&self, pin: u32) -> io::Result<()> {
        tokio::fs::write(self.root.join("unexport"), pin.to_string()).await
    }

    async fn configure_input(&self, pin: u32) -> io::Result<SysfsInput> {
        tokio::fs::write(self.line_dir(pin).join("direction"), "in").await?;

        Ok(SysfsInput { value: self.value_path(pin) })
    }

    /// Output direction `low` sets the line to output and drives it inactive in one step.
    async fn configure_output_low(&self, pin: u32) -> io::Result<SysfsOutput> {
        tokio::fs::write(self.line_dir(pin).join("direction"), "low").await?;

        Ok(SysfsOutput { value: self.value_path(pin) })
    }
}

pub struct SysfsInput {
    value: PathBuf,
}

impl ErrorType for SysfsInput {
    type Error = SysfsPinError;
}

impl InputPin for SysfsInput {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        let raw = std::fs::read_to_string(&self.value).map_err(SysfsPinError)?;

        match raw.trim() {
            "1" => Ok(true),
            "0" => Ok(false),
            other => Err(SysfsPinError(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("unexpected line value {other:?}"),
            ))),
        }
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

pub struct SysfsOutput {
    value: PathBuf,
}

impl ErrorType for SysfsOutput {
    type Error = SysfsPinError;
}

impl OutputPin for SysfsOutput {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        std::fs::write(&self.value, "0").map_err(SysfsPinError)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        std::fs::write(&self.value, "1").map_err(SysfsPinError)
    }
}

/// Climate sensor exposed by the kernel DHT11/DHT22 IIO driver.
pub struct IioClimate {
    device: PathBuf,
    model: ClimateModel,
}

impl IioClimate {
    pub fn new(device: impl Into<PathBuf>, model: ClimateModel) -> Self {
        Self { device: device.into(), model }
    }

    async fn read_milli(&self, attribute: &str) -> Result<f64, HardwareError> {
        let raw = tokio::fs::read_to_string(self.device.join(attribute))
            .await
            .map_err(|e| HardwareError::Read(format!("{attribute}: {e}")))?;

        raw.trim()
            .parse::<i64>()
            .map(|value| value as f64 / 1000.0)
            .map_err(|e| HardwareError::Read(format!("{attribute}: {e}")))
    }
}

#[async_trait]
impl ClimateSensor for IioClimate {
    async fn read(&self) -> Result<ClimateReading, HardwareError> {
        let temperature = self.read_milli("in_temp_input").await?;
        let humidity = self.read_milli("in_humidityrelative_input").await?;

        self.model.check(ClimateReading { temperature, humidity })
    }
}

pub async fn setup(settings: &Settings) -> Result<Hardware, HardwareError> {
    let sysfs = &settings.hardware.sysfs;
    let pins = &settings.hardware.pins;
    let gpio = SysfsGpio::new(&sysfs.gpio_root);
    let mut exported = Vec::new();

    let result = acquire(&gpio, settings, &mut exported).await;
    let (inputs, relay) = match result {
        Ok(lines) => lines,
        Err(e) => {
            for pin in exported {
                let _ = gpio.unexport(pin).await;
            }
            return Err(e);
        }
    };

    let climate_device = Path::new(&sysfs.climate_device);
    if let Err(source) = tokio::fs::metadata(climate_device).await {
        for pin in exported {
            let _ = gpio.unexport(pin).await;
        }
        return Err(HardwareError::Setup { line: "climate sensor", pin: pins.climate, source });
    }

    let (edge_tx, edge_rx) = mpsc::channel(settings.door.channel_capacity);
    let poll_interval = Duration::from_millis(sysfs.poll_interval_ms);
    let poller = tokio::spawn(poll_edges(inputs, edge_tx, poll_interval));

    Ok(Hardware {
        relay: Box::new(relay),
        climate: Arc::new(IioClimate::new(climate_device, settings.hardware.climate_model)),
        edges: edge_rx,
        release: Box::new(SysfsRelease {
            gpio,
            relay_pin: pins.relay,
            exported,
            poller: Some(poller),
        }),
    })
}

type Lines = (Vec<(u32, SysfsInput, bool)>, SysfsOutput);

async fn acquire(gpio: &SysfsGpio, settings: &Settings, exported: &mut Vec<u32>) -> Result<Lines, HardwareError> {
    let pins = &settings.hardware.pins;
    let mut inputs = Vec::with_capacity(DoorChannel::ALL.len());

    for (channel, pin) in DoorChannel::ALL.into_iter().zip([pins.door_top, pins.door_mid, pins.door_bot]) {
        let setup_error = |source| HardwareError::Setup { line: channel.line_name(), pin, source };

        if gpio.export(pin).await.map_err(setup_error)? {
            exported.push(pin);
        }

        let mut input = gpio.configure_input(pin).await.map_err(setup_error)?;
        let level = input.is_high().map_err(|SysfsPinError(e)| setup_error(e))?;
        inputs.push((pin, input, level));
    }

    let relay_error = |source| HardwareError::Setup { line: "relay", pin: pins.relay, source };
    if gpio.export(pins.relay).await.map_err(relay_error)? {
        exported.push(pins.relay);
    }
    let relay = gpio.configure_output_low(pins.relay).await.map_err(relay_error)?;

    Ok((inputs, relay))
}

/// Detect edges by polling line values every `period`; the level present at
/// setup is the baseline. A pulse shorter than one period goes unseen.
async fn poll_edges(mut inputs: Vec<(u32, SysfsInput, bool)>, edges: mpsc::Sender<RawEdge>, period: Duration) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        interval.tick().await;

        for (pin, input, last) in inputs.iter_mut() {
            match input.is_high() {
                Ok(level) if level != *last => {
                    *last = level;
                    if edges.send(RawEdge { pin: *pin, level }).await.is_err() {
                        return;
                    }
                }
                Ok(_) => {}
                Err(SysfsPinError(e)) => tracing::warn!("failed to read GPIO #{}: {}", pin, e),
            }
        }
    }
}

pub struct SysfsRelease {
    gpio: SysfsGpio,
    relay_pin: u32,
    exported: Vec<u32>,
    poller: Option<JoinHandle<()>>,
}

#[async_trait]
impl LineRelease for SysfsRelease {
    async fn release(&mut self) -> Result<(), HardwareError> {
        if let Some(poller) = self.poller.take() {
            poller.abort();
        }

        let mut failures = Vec::new();

        if let Err(e) = tokio::fs::write(self.gpio.value_path(self.relay_pin), "0").await {
            failures.push(format!("relay #{}: {}", self.relay_pin, e));
        }

        for pin in self.exported.drain(..) {
            if let Err(e) = self.gpio.unexport(pin).await {
                failures.push(format!("#{pin}: {e}"));
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(HardwareError::Release(failures.join(", ")))
        }
    }
}
