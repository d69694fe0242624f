use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    #[error("Failed to set up {line} on pin {pin}: {source}")]
    Setup {
        line: &'static str,
        pin: u32,
        #[source]
        source: std::io::Error,
    },

    #[error("Sensor read failed: {0}")]
    Read(String),

    #[error("Sensor read timed out after {0:?}")]
    Timeout(Duration),

    #[error("Sensor reading out of range: {temperature} C, {humidity} %")]
    OutOfRange { temperature: f64, humidity: f64 },

    #[error("Failed to drive {line}: {reason}")]
    Write { line: &'static str, reason: String },

    #[error("Failed to release hardware: {0}")]
    Release(String),
}
