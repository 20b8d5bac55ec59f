//! Event fragment of a snapshot and the event-file DTOs.

use serde::Deserialize;
use serde_json::Value;

use super::common_dto::{UNAVAILABLE, lenient_text, text_list, value_text};

/// One scheduled event as shown in the event table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    /// Event identifier (e.g. `"C1"`, `"MAX"`).
    pub event_id: String,
    /// Display time.
    pub time: String,
    /// Estimated time remaining.
    pub eta: String,
}

impl EventRecord {
    /// Builds a record from its three parts.
    #[must_use]
    pub fn new(event_id: impl Into<String>, time: impl Into<String>, eta: impl Into<String>) -> Self {
        Self {
            event_id: event_id.into(),
            time: time.into(),
            eta: eta.into(),
        }
    }
}

/// Decodes the `events` fragment.
///
/// Two shapes are accepted:
///
/// - a mapping `{event_id: [time, eta]}`;
/// - a sequence `[[event_id, time, eta], ...]` (objects with `event_id`,
///   `time` and `eta` keys are accepted in place of the triples).
///
/// Entries with any other shape are logged and skipped; they never abort
/// the rest of the fragment. Returns `None` if `value` is neither a mapping
/// nor a sequence.
#[must_use]
pub fn parse_events(value: &Value) -> Option<Vec<EventRecord>> {
    match value {
        Value::Object(map) => Some(
            map.iter()
                .filter_map(|(event_id, info)| {
                    let record = match info.as_array().map(Vec::as_slice) {
                        Some([time, eta]) => Some(EventRecord::new(
                            event_id.clone(),
                            cell_text(time),
                            cell_text(eta),
                        )),
                        _ => None,
                    };
                    if record.is_none() {
                        tracing::warn!(%event_id, entry = %info, "malformed event entry, expected [time, eta]");
                    }
                    record
                })
                .collect(),
        ),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(|item| {
                    let record = parse_sequence_entry(item);
                    if record.is_none() {
                        tracing::warn!(entry = %item, "malformed event entry, expected [event_id, time, eta]");
                    }
                    record
                })
                .collect(),
        ),
        _ => None,
    }
}

fn parse_sequence_entry(item: &Value) -> Option<EventRecord> {
    match item {
        Value::Array(parts) => match parts.as_slice() {
            [event_id, time, eta] => Some(EventRecord::new(
                value_text(event_id).filter(|id| !id.is_empty())?,
                cell_text(time),
                cell_text(eta),
            )),
            _ => None,
        },
        Value::Object(map) => {
            let event_id = map
                .get("event_id")
                .or_else(|| map.get("id"))
                .and_then(value_text)
                .filter(|id| !id.is_empty())?;
            Some(EventRecord::new(
                event_id,
                map.get("time").map_or_else(|| UNAVAILABLE.to_string(), cell_text),
                map.get("eta").map_or_else(|| UNAVAILABLE.to_string(), cell_text),
            ))
        }
        _ => None,
    }
}

fn cell_text(value: &Value) -> String {
    value_text(value).unwrap_or_else(|| UNAVAILABLE.to_string())
}

/// Response of `POST /api/event_load`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EventLoadResponse {
    /// Event type (`solar`, `lunar`, `custom`).
    #[serde(default, rename = "type", deserialize_with = "lenient_text")]
    pub event_type: Option<String>,
    /// Event identifiers declared by the file, in file order. `None` if the
    /// list is missing or is not an array.
    #[serde(default, deserialize_with = "lenient_id_list")]
    pub events: Option<Vec<String>>,
}

fn lenient_id_list<'de, D: serde::Deserializer<'de>>(d: D) -> Result<Option<Vec<String>>, D::Error> {
    Ok(text_list(&Value::deserialize(d)?))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn mapping_shape() {
        let Some(events) = parse_events(&json!({
            "C1": ["2024-04-08 18:17:27", "01:02:03"],
            "C2": ["Event not visible!", "N/A"]
        })) else {
            panic!("mapping must decode");
        };
        assert_eq!(events.len(), 2);
        assert!(events.contains(&EventRecord::new("C1", "2024-04-08 18:17:27", "01:02:03")));
    }

    #[test]
    fn sequence_shape() {
        let Some(events) = parse_events(&json!([
            ["C1", "18:17:27", "01:02:03"],
            {"event_id": "MAX", "time": "18:19:40", "eta": 3600}
        ])) else {
            panic!("sequence must decode");
        };
        assert_eq!(
            events,
            vec![
                EventRecord::new("C1", "18:17:27", "01:02:03"),
                EventRecord::new("MAX", "18:19:40", "3600"),
            ]
        );
    }

    #[test]
    fn malformed_entries_are_skipped_not_fatal() {
        let Some(events) = parse_events(&json!({
            "C1": ["t", "e"],
            "C2": "computing",
            "C3": ["only time"],
            "C4": ["t", "e", "x", "y"]
        })) else {
            panic!("mapping must decode");
        };
        assert_eq!(events, vec![EventRecord::new("C1", "t", "e")]);
    }

    #[test]
    fn null_cells_render_unavailable() {
        let Some(events) = parse_events(&json!({"C1": [null, ""]})) else {
            panic!("mapping must decode");
        };
        assert_eq!(events, vec![EventRecord::new("C1", "N/A", "")]);
    }

    #[test]
    fn scalar_fragment_is_rejected() {
        assert!(parse_events(&json!(42)).is_none());
    }

    #[test]
    fn load_response_tolerates_missing_list() {
        let Ok(resp) = serde_json::from_value::<EventLoadResponse>(json!({"type": "solar"})) else {
            panic!("load response must decode");
        };
        assert_eq!(resp.event_type.as_deref(), Some("solar"));
        assert!(resp.events.is_none());

        let Ok(resp) = serde_json::from_value::<EventLoadResponse>(
            json!({"type": "lunar", "events": ["P1", "U1", "MAX"]}),
        ) else {
            panic!("load response must decode");
        };
        assert_eq!(resp.events.map(|e| e.len()), Some(3));
    }
}
