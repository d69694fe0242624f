use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Round to one decimal place, half away from zero.
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Time the reading was taken
    #[serde(with = "time::serde::rfc3339")]
    pub time: OffsetDateTime,
    /// Temperature in Celsius, one decimal
    pub temp: f64,
    /// Relative humidity percentage, one decimal
    pub humidity: f64,
}

impl Sample {
    /// Build a sample, truncating both readings to the sensor's one-decimal precision.
    pub fn new(time: OffsetDateTime, temp: f64, humidity: f64) -> Self {
        Self {
            time,
            temp: round_tenth(temp),
            humidity: round_tenth(humidity),
        }
    }
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    /// Time of compaction
    #[serde(with = "time::serde::rfc3339")]
    pub time: OffsetDateTime,
    /// Mean temperature over the recent window
    pub temp: f64,
    /// Mean humidity over the recent window
    pub humidity: f64,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AirResponse {
    /// Raw samples, newest first
    pub recent: Vec<Sample>,
    /// Averaged points, newest first
    pub historic: Vec<HistoryPoint>,
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn test_sample_rounds_to_tenth() {
        let sample = Sample::new(datetime!(2024-03-01 07:30:00 UTC), 21.349, 40.05);

        assert_eq!(sample.temp, 21.3);
        assert_eq!(sample.humidity, 40.1);
    }

    #[test]
    fn test_round_negative() {
        assert_eq!(round_tenth(-3.25), -3.3);
        assert_eq!(round_tenth(-0.04), 0.0);
    }
}
