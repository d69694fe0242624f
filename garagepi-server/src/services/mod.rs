mod actuator_service;
mod air_service;
mod door_service;
mod info_service;
mod signal_service;

pub use actuator_service::*;
pub use air_service::*;
pub use door_service::*;
pub use info_service::*;
pub use signal_service::*;
