use std::sync::Arc;
use std::time::Duration;

use garagepi_api::{AirResponse, HistoryPoint, Sample};
use time::OffsetDateTime;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::configs::Sampling;
use crate::errors::HardwareError;
use crate::hardware::ClimateSensor;
use crate::models::BoundedBuffer;

/// Two-tier retention: a short window of raw samples and a long history of
/// window means.
#[derive(Debug, Clone)]
pub struct AirHistory {
    recent: BoundedBuffer<Sample>,
    history: BoundedBuffer<HistoryPoint>,
    accepted: usize,
}

impl AirHistory {
    pub fn new(recent_capacity: usize, history_capacity: usize) -> Self {
        Self {
            recent: BoundedBuffer::new(recent_capacity),
            history: BoundedBuffer::new(history_capacity),
            accepted: 0,
        }
    }

    /// Store an accepted sample. Every `recent_capacity` accepted samples the
    /// window is averaged into the history and the returned point is `Some`.
    pub fn record(&mut self, sample: Sample) -> Option<HistoryPoint> {
        let time = sample.time;
        self.recent.push(sample);
        self.accepted += 1;

        if self.accepted < self.recent.capacity() {
            return None;
        }

        self.accepted = 0;
        let point = self.window_mean(time)?;
        self.history.push(point);

        Some(point)
    }

    /// Mean over whatever the window holds right now, not necessarily a full window.
    pub fn window_mean(&self, time: OffsetDateTime) -> Option<HistoryPoint> {
        if self.recent.is_empty() {
            return None;
        }

        let count = self.recent.len() as f64;
        let (temp, humidity) = self
            .recent
            .iter()
            .fold((0.0, 0.0), |(t, h), sample| (t + sample.temp, h + sample.humidity));

        Some(HistoryPoint {
            time,
            temp: temp / count,
            humidity: humidity / count,
        })
    }

    #[cfg(test)]
    fn accepted_since_compaction(&self) -> usize {
        self.accepted
    }

    pub fn snapshot(&self) -> AirResponse {
        AirResponse {
            recent: self.recent.to_vec(),
            historic: self.history.to_vec(),
        }
    }
}

pub struct AirService {
    history: RwLock<AirHistory>,
    sensor: Arc<dyn ClimateSensor>,
    interval: Duration,
    read_timeout: Duration,
    pin: u32,
}

impl AirService {
    pub fn new(sampling: &Sampling, sensor: Arc<dyn ClimateSensor>, pin: u32) -> Self {
        Self {
            history: RwLock::new(AirHistory::new(sampling.recent_capacity, sampling.history_capacity)),
            sensor,
            interval: sampling.interval(),
            read_timeout: sampling.read_timeout(),
            pin,
        }
    }

    pub async fn snapshot(&self) -> AirResponse {
        self.history.read().await.snapshot()
    }

    pub async fn record(&self, sample: Sample) -> Option<HistoryPoint> {
        let point = self.history.write().await.record(sample);

        if let Some(point) = &point {
            tracing::debug!("compacted window: {:.2} C, {:.2} %", point.temp, point.humidity);
        }

        point
    }

    /// One sampling tick. A failed or timed out read leaves all state untouched.
    pub async fn sample_once(&self) -> Result<Option<HistoryPoint>, HardwareError> {
        let reading = tokio::time::timeout(self.read_timeout, self.sensor.read())
            .await
            .map_err(|_| HardwareError::Timeout(self.read_timeout))??;

        let sample = Sample::new(OffsetDateTime::now_utc(), reading.temperature, reading.humidity);

        Ok(self.record(sample).await)
    }

    pub fn start_sampling(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;

                if let Err(e) = self.sample_once().await {
                    tracing::warn!("error reading temperature from GPIO #{}: {}", self.pin, e);
                }
            }
        })
    }
}
