use std::collections::HashSet;
use std::env;
use std::net::IpAddr;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Access {
    pub enabled: bool,
    pub allow: Vec<IpAddr>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sampling {
    pub interval_ms: u64,
    pub recent_capacity: usize,
    pub history_capacity: usize,
    pub read_timeout_ms: u64,
}

impl Sampling {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Door {
    pub channel_capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relay {
    pub dwell_ms: u64,
}

impl Relay {
    pub fn dwell(&self) -> Duration {
        Duration::from_millis(self.dwell_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Simulated,
    Sysfs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClimateModel {
    Dht11,
    Dht22,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pins {
    pub relay: u32,
    pub door_top: u32,
    pub door_mid: u32,
    pub door_bot: u32,
    pub climate: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sysfs {
    pub gpio_root: String,
    pub climate_device: String,
    pub poll_interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Simulated {
    pub travel_ms: u64,
    pub tick_ms: u64,
    pub failure_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hardware {
    pub backend: Backend,
    pub climate_model: ClimateModel,
    pub release_timeout_ms: u64,
    pub pins: Pins,
    pub sysfs: Sysfs,
    pub simulated: Simulated,
}

impl Hardware {
    pub fn release_timeout(&self) -> Duration {
        Duration::from_millis(self.release_timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub logger: Logger,
    pub access: Access,
    pub sampling: Sampling,
    pub door: Door,
    pub relay: Relay,
    pub hardware: Hardware,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or("development".into());
        let config_dir = env::var("GARAGEPI_CONFIG_DIR").unwrap_or("configs".into());

        Self::load(&config_dir, &run_mode)
    }

    /// Layer `{config_dir}/default`, the optional `{config_dir}/{run_mode}` and the environment.
    pub fn load(config_dir: &str, run_mode: &str) -> Result<Self, ConfigError> {
        let settings: Settings = Config::builder()
            .add_source(File::with_name(&format!("{config_dir}/default")))
            .add_source(File::with_name(&format!("{config_dir}/{run_mode}")).required(false))
            .add_source(Environment::with_prefix("GARAGEPI").prefix_separator("__").separator("__"))
            .build()?
            .try_deserialize()?;

        settings.validate()?;

        Ok(settings)
    }

    /// Load settings from a single TOML document, without file or environment layering.
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let settings: Settings = Config::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        settings.validate()?;

        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let sampling = &self.sampling;
        if sampling.recent_capacity == 0 || sampling.history_capacity == 0 {
            return Err(ConfigError::Message("sampling capacities must be at least 1".into()));
        }
        if sampling.interval_ms == 0 || sampling.read_timeout_ms == 0 {
            return Err(ConfigError::Message("sampling interval and read timeout must be positive".into()));
        }
        if self.door.channel_capacity == 0 {
            return Err(ConfigError::Message("door channel capacity must be at least 1".into()));
        }
        if self.relay.dwell_ms == 0 {
            return Err(ConfigError::Message("relay dwell must be positive".into()));
        }

        let pins = &self.hardware.pins;
        let unique: HashSet<u32> = [pins.relay, pins.door_top, pins.door_mid, pins.door_bot, pins.climate]
            .into_iter()
            .collect();
        if unique.len() != 5 {
            return Err(ConfigError::Message("hardware pins must be distinct".into()));
        }

        let simulated = &self.hardware.simulated;
        if !(0.0..=1.0).contains(&simulated.failure_rate) {
            return Err(ConfigError::Message("simulated failure rate must lie in [0, 1]".into()));
        }
        if simulated.tick_ms == 0 || simulated.travel_ms == 0 || self.hardware.sysfs.poll_interval_ms == 0 {
            return Err(ConfigError::Message("hardware timings must be positive".into()));
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const SAMPLE: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../configs/default.toml"));

    #[test]
    fn test_default_file_parses() {
        let settings = Settings::from_toml(SAMPLE).unwrap();

        assert_eq!(settings.server.port, 3009);
        assert_eq!(settings.sampling.recent_capacity, 59);
        assert_eq!(settings.sampling.history_capacity, 2000);
        assert_eq!(settings.sampling.interval(), Duration::from_secs(2));
        assert_eq!(settings.relay.dwell(), Duration::from_millis(500));
        assert_eq!(settings.hardware.pins.door_top, 17);
        assert_eq!(settings.hardware.pins.door_mid, 27);
        assert_eq!(settings.hardware.pins.door_bot, 22);
        assert_eq!(settings.hardware.pins.relay, 4);
        assert_eq!(settings.hardware.climate_model, ClimateModel::Dht22);
    }

    #[test]
    fn test_run_modes_select_backend() {
        let dir = concat!(env!("CARGO_MANIFEST_DIR"), "/../configs");

        let development = Settings::load(dir, "development").unwrap();
        assert_eq!(development.hardware.backend, Backend::Sysfs);
        assert_eq!(development.logger.level, "debug");

        let simulated = Settings::load(dir, "simulated").unwrap();
        assert_eq!(simulated.hardware.backend, Backend::Simulated);

        let unlisted = Settings::load(dir, "production").unwrap();
        assert_eq!(unlisted.hardware.backend, Backend::Sysfs);
    }

    #[test]
    fn test_rejects_zero_capacity() {
        let source = SAMPLE.replace("recent_capacity = 59", "recent_capacity = 0");

        assert!(Settings::from_toml(&source).is_err());
    }

    #[test]
    fn test_rejects_shared_pins() {
        let source = SAMPLE.replace("door_mid = 27", "door_mid = 17");

        assert!(Settings::from_toml(&source).is_err());
    }
}
