use std::collections::HashMap;

use time::OffsetDateTime;

use crate::configs::Pins;
use crate::models::{DoorChannel, RawEdge, SensorEvent};

/// Maps raw pin-level changes onto door channels.
#[derive(Debug, Clone)]
pub struct SignalNormalizer {
    channels: HashMap<u32, DoorChannel>,
}

impl SignalNormalizer {
    pub fn new(pins: &Pins) -> Self {
        let channels = HashMap::from([
            (pins.door_top, DoorChannel::Top),
            (pins.door_mid, DoorChannel::Mid),
            (pins.door_bot, DoorChannel::Bot),
        ]);

        Self { channels }
    }

    /// Edges on pins outside the three door channels yield `None`.
    pub fn normalize(&self, edge: RawEdge, time: OffsetDateTime) -> Option<SensorEvent> {
        self.channels.get(&edge.pin).map(|&channel| SensorEvent {
            channel,
            level: edge.level,
            time,
        })
    }

    pub fn normalize_now(&self, edge: RawEdge) -> Option<SensorEvent> {
        self.normalize(edge, OffsetDateTime::now_utc())
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    fn pins() -> Pins {
        Pins { relay: 4, door_top: 17, door_mid: 27, door_bot: 22, climate: 11 }
    }

    #[test]
    fn test_maps_door_pins() {
        let normalizer = SignalNormalizer::new(&pins());
        let time = datetime!(2024-03-01 07:30:00 UTC);

        let event = normalizer.normalize(RawEdge { pin: 27, level: true }, time).unwrap();

        assert_eq!(event.channel, DoorChannel::Mid);
        assert!(event.level);
        assert_eq!(event.time, time);
    }

    #[test]
    fn test_drops_unknown_pins() {
        let normalizer = SignalNormalizer::new(&pins());

        assert!(normalizer.normalize_now(RawEdge { pin: 4, level: true }).is_none());
        assert!(normalizer.normalize_now(RawEdge { pin: 99, level: false }).is_none());
    }
}
