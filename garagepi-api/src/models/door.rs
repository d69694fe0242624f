use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DoorPosition {
    /// No sensor has reported since start
    Unknown,
    /// Resting at the open detent
    Top,
    /// Passing the middle sensor
    Middle,
    /// Resting at the closed detent
    Bottom,
    /// Between detents
    Moving,
}

impl fmt::Display for DoorPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DoorPosition::Unknown => "UNKNOWN",
            DoorPosition::Top => "TOP",
            DoorPosition::Middle => "MIDDLE",
            DoorPosition::Bottom => "BOTTOM",
            DoorPosition::Moving => "MOVING",
        };

        f.write_str(name)
    }
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DoorDirection {
    /// No direction inferred yet
    Unknown,
    /// Resting at a detent
    Stationary,
    /// Opening
    Up,
    /// Closing
    Down,
}

impl fmt::Display for DoorDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DoorDirection::Unknown => "UNKNOWN",
            DoorDirection::Stationary => "STATIONARY",
            DoorDirection::Up => "UP",
            DoorDirection::Down => "DOWN",
        };

        f.write_str(name)
    }
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorStatus {
    /// Time of the last applied sensor event
    #[serde(with = "time::serde::rfc3339")]
    pub updated: OffsetDateTime,
    /// Estimated door position
    pub position: DoorPosition,
    /// Estimated travel direction
    pub direction: DoorDirection,
}

impl DoorStatus {
    pub fn unknown(updated: OffsetDateTime) -> Self {
        Self {
            updated,
            position: DoorPosition::Unknown,
            direction: DoorDirection::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn test_status_wire_format() {
        let status = DoorStatus {
            updated: datetime!(2024-03-01 07:30:00 UTC),
            position: DoorPosition::Moving,
            direction: DoorDirection::Down,
        };

        let json = serde_json::to_value(status).unwrap();

        assert_eq!(json["position"], "MOVING");
        assert_eq!(json["direction"], "DOWN");
        assert_eq!(json["updated"], "2024-03-01T07:30:00Z");
    }
}
