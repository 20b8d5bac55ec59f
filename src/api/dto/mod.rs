//! Payload schemas: lenient decoding of everything the backend returns and
//! the request bodies the dashboard sends.

pub mod camera_dto;
pub mod common_dto;
pub mod control_dto;
pub mod event_dto;
pub mod gps_dto;
pub mod request_dto;
pub mod snapshot_dto;

pub use camera_dto::CameraDto;
pub use common_dto::UNAVAILABLE;
pub use control_dto::{ControlDto, ControlEventDto, SequenceStateDto};
pub use event_dto::{EventLoadResponse, EventRecord};
pub use gps_dto::{FixQuality, GpsDto};
pub use request_dto::{Ack, SimulationParams};
pub use snapshot_dto::Snapshot;
