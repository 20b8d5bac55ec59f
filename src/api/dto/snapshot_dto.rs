//! Consolidated dashboard snapshot.
//!
//! [`Snapshot`] is the typed result of validating one poll response. Each
//! fragment is optional: `None` means "no change this cycle", and the
//! matching section of the document is left untouched.

use serde_json::Value;

use super::camera_dto::{CameraDto, parse_cameras};
use super::common_dto::value_text;
use super::control_dto::{ControlDto, parse_control};
use super::event_dto::{EventRecord, parse_events};
use super::gps_dto::GpsDto;
use crate::error::DashboardError;

/// One poll cycle's view of backend state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    /// GPS fragment.
    pub gps: Option<GpsDto>,
    /// Detected cameras, in backend order.
    pub cameras: Option<Vec<CameraDto>>,
    /// Event times and ETAs.
    pub events: Option<Vec<EventRecord>>,
    /// Camera-control sequence state.
    pub camera_control: Option<ControlDto>,
    /// Name of the loaded event file.
    pub event_filename: Option<String>,
    /// Name of the loaded camera sequence file.
    pub sequence_filename: Option<String>,
}

impl Snapshot {
    /// Validates a `/api/dashboard_update` body.
    ///
    /// Fragments with the wrong shape are logged and dropped so the rest of
    /// the snapshot still applies.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Payload`] if the body is not a JSON object.
    pub fn from_value(value: &Value) -> Result<Self, DashboardError> {
        let Some(map) = value.as_object() else {
            return Err(DashboardError::Payload(format!(
                "dashboard update must be an object, got {}",
                json_type(value)
            )));
        };

        let cameras = map.get("detected_cameras").or_else(|| map.get("cameras"));

        Ok(Self {
            gps: map.get("gps").and_then(decode_gps),
            cameras: cameras.and_then(|v| fragment("cameras", v, parse_cameras(v))),
            events: map
                .get("events")
                .and_then(|v| fragment("events", v, parse_events(v))),
            camera_control: map
                .get("camera_control")
                .and_then(|v| fragment("camera_control", v, parse_control(v))),
            event_filename: map.get("event_filename").and_then(value_text),
            sequence_filename: map.get("sequence_filename").and_then(value_text),
        })
    }

    /// Assembles a snapshot from the three per-section endpoints used by
    /// earlier backends (`/api/gps`, `/api/cameras`, `/api/events`).
    #[must_use]
    pub fn from_sections(gps: &Value, cameras: &Value, events: &Value) -> Self {
        Self {
            gps: decode_gps(gps),
            cameras: fragment("cameras", cameras, parse_cameras(cameras)),
            events: fragment("events", events, parse_events(events)),
            ..Self::default()
        }
    }

    /// Names of the fragments present, in wire order.
    #[must_use]
    pub fn fragment_names(&self) -> Vec<&'static str> {
        [
            ("gps", self.gps.is_some()),
            ("detected_cameras", self.cameras.is_some()),
            ("events", self.events.is_some()),
            ("camera_control", self.camera_control.is_some()),
            ("event_filename", self.event_filename.is_some()),
            ("sequence_filename", self.sequence_filename.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, present)| present.then_some(name))
        .collect()
    }
}

fn fragment<T>(name: &str, raw: &Value, parsed: Option<T>) -> Option<T> {
    if parsed.is_none() && !raw.is_null() {
        tracing::warn!(fragment = name, kind = json_type(raw), "dropping malformed fragment");
    }
    parsed
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
