//! Request bodies and small response shapes of the command endpoints.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common_dto::{lenient_text, text_list, value_f64, value_text};
use crate::error::DashboardError;

/// Body of the file-loading endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct FilenameRequest<'a> {
    /// File name as listed by the backend.
    pub filename: &'a str,
}

/// Body of `POST /api/camera/update_description`.
#[derive(Debug, Clone, Serialize)]
pub struct DescriptionUpdate<'a> {
    /// Camera serial.
    pub serial: &'a str,
    /// New description.
    pub description: &'a str,
}

/// Body of `POST /api/camera/read_choices`.
#[derive(Debug, Clone, Serialize)]
pub struct ChoiceQuery<'a> {
    /// Camera serial.
    pub serial: &'a str,
    /// Property wire name (e.g. `iso`).
    pub property: &'a str,
}

/// Body of `POST /api/camera/set_choice`.
#[derive(Debug, Clone, Serialize)]
pub struct ChoiceUpdate<'a> {
    /// Camera serial.
    pub serial: &'a str,
    /// Property wire name.
    pub property: &'a str,
    /// Selected value.
    pub value: &'a str,
}

/// Body of `POST /api/camera/trigger`.
#[derive(Debug, Clone, Serialize)]
pub struct TriggerRequest<'a> {
    /// Camera serial.
    pub serial: &'a str,
}

/// Generic `{status, message}` acknowledgement.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ack {
    /// `"success"` or `"error"` when present.
    #[serde(default, deserialize_with = "lenient_text")]
    pub status: Option<String>,
    /// Human-readable detail.
    #[serde(default, deserialize_with = "lenient_text")]
    pub message: Option<String>,
}

impl Ack {
    /// Decodes an acknowledgement. Anything that is not an object is
    /// accepted as a bare success.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Payload`] when a 2xx body still reports
    /// `"status": "error"`.
    pub fn from_value(value: Value) -> Result<Self, DashboardError> {
        let ack = serde_json::from_value::<Self>(value).unwrap_or_default();
        if ack.status.as_deref().is_some_and(|s| s.eq_ignore_ascii_case("error")) {
            return Err(DashboardError::Payload(format!(
                "backend reported an error: {}",
                ack.message.as_deref().unwrap_or("no detail")
            )));
        }
        Ok(ack)
    }
}

/// Decodes a list of names or values.
///
/// Accepts a bare array, or an object carrying the array under `choices`,
/// `data` or `files`.
///
/// # Errors
///
/// Returns [`DashboardError::Payload`] if no array can be found.
pub fn parse_name_list(value: &Value) -> Result<Vec<String>, DashboardError> {
    let list = match value {
        Value::Object(map) => ["choices", "data", "files"]
            .iter()
            .find_map(|key| map.get(*key).and_then(text_list)),
        other => text_list(other),
    };
    list.ok_or_else(|| DashboardError::Payload("expected a list of names".to_string()))
}

/// Query of `GET /api/run_sim`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationParams {
    /// Simulated latitude in degrees.
    pub gps_latitude: f64,
    /// Simulated longitude in degrees.
    pub gps_longitude: f64,
    /// Simulated altitude in metres.
    pub gps_altitude: f64,
    /// Event the simulation is anchored to.
    pub event_id: String,
    /// Seconds relative to the anchor event at simulation start.
    pub event_time_offset: f64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            gps_latitude: 0.0,
            gps_longitude: 0.0,
            gps_altitude: 0.0,
            event_id: String::new(),
            event_time_offset: 0.0,
        }
    }
}

impl SimulationParams {
    /// Builds parameters from the `/api/run_sim/defaults` key/value map.
    /// Missing or non-numeric entries fall back to zero.
    #[must_use]
    pub fn from_defaults(defaults: &BTreeMap<String, String>) -> Self {
        let number = |key: &str| {
            defaults
                .get(key)
                .and_then(|v| value_f64(&Value::String(v.clone())))
                .unwrap_or(0.0)
        };
        Self {
            gps_latitude: number("gps_latitude"),
            gps_longitude: number("gps_longitude"),
            gps_altitude: number("gps_altitude"),
            event_id: defaults.get("event_id").cloned().unwrap_or_default(),
            event_time_offset: number("event_time_offset"),
        }
    }

    /// Checks the parameters before sending them.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::InvalidRequest`] for an empty event id, a
    /// non-finite number, or a coordinate out of range.
    pub fn validate(&self) -> Result<(), DashboardError> {
        if self.event_id.trim().is_empty() {
            return Err(DashboardError::InvalidRequest(
                "simulation needs an event id".to_string(),
            ));
        }
        let numbers = [
            self.gps_latitude,
            self.gps_longitude,
            self.gps_altitude,
            self.event_time_offset,
        ];
        if numbers.iter().any(|n| !n.is_finite()) {
            return Err(DashboardError::InvalidRequest(
                "simulation parameters must be finite".to_string(),
            ));
        }
        if !(-90.0..=90.0).contains(&self.gps_latitude)
            || !(-180.0..=180.0).contains(&self.gps_longitude)
        {
            return Err(DashboardError::InvalidRequest(format!(
                "coordinates out of range: {}, {}",
                self.gps_latitude, self.gps_longitude
            )));
        }
        Ok(())
    }
}

/// Decodes the `/api/run_sim/defaults` body into a string map.
///
/// # Errors
///
/// Returns [`DashboardError::Payload`] if the body is not an object.
pub fn parse_defaults(value: &Value) -> Result<BTreeMap<String, String>, DashboardError> {
    let map = value
        .as_object()
        .ok_or_else(|| DashboardError::Payload("simulation defaults must be an object".to_string()))?;
    Ok(map
        .iter()
        .filter_map(|(k, v)| value_text(v).map(|text| (k.clone(), text)))
        .collect())
}
