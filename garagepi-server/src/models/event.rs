use std::fmt;

use time::OffsetDateTime;

/// The three door position sensors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DoorChannel {
    Top,
    Mid,
    Bot,
}

impl DoorChannel {
    pub const ALL: [DoorChannel; 3] = [DoorChannel::Top, DoorChannel::Mid, DoorChannel::Bot];

    pub fn line_name(self) -> &'static str {
        match self {
            DoorChannel::Top => "door top",
            DoorChannel::Mid => "door middle",
            DoorChannel::Bot => "door bottom",
        }
    }
}

impl fmt::Display for DoorChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.line_name())
    }
}

/// A raw level change reported by the hardware, keyed by pin number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEdge {
    pub pin: u32,
    pub level: bool,
}

/// A level change on a known door channel. `level == true` means the door edge
/// is at that sensor's detent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorEvent {
    pub channel: DoorChannel,
    pub level: bool,
    pub time: OffsetDateTime,
}
