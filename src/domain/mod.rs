//! Domain layer: entity identity, camera properties, and the UI event system.
//!
//! This module contains the client-side domain model: the stable keys rows
//! and cells are addressed by, the camera property catalogue, and the event
//! bus that carries notices and render notifications to front ends.

pub mod camera_field;
pub mod entity_key;
pub mod event_bus;
pub mod ui_event;

pub use camera_field::CameraField;
pub use entity_key::{EntityKey, RowId};
pub use event_bus::UiEventBus;
pub use ui_event::{Notice, NoticeLevel, UiEvent};
