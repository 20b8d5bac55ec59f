//! Camera-control fragment of a snapshot.

use serde_json::Value;

use super::common_dto::{value_count, value_text};

/// One queued trigger event of a camera's control sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlEventDto {
    /// Position in the camera's sequence.
    pub pos: u64,
    /// Estimated time until the trigger fires.
    pub eta: String,
    /// Event the trigger is anchored to.
    pub event_id: String,
    /// Offset from the anchor event.
    pub event_time_offset: String,
    /// Output channel (e.g. `trigger`, `iso`).
    pub channel: String,
    /// Value written on that channel.
    pub value: String,
}

/// Sequence state of one camera.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequenceStateDto {
    /// Camera id the sequence belongs to.
    pub id: String,
    /// Total events in the sequence (the list may be truncated).
    pub num_events: u64,
    /// Upcoming events.
    pub events: Vec<ControlEventDto>,
}

/// Camera-control state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlDto {
    /// Controller state (`init`, `scan`, `monitor`, `execute_ready`,
    /// `executing`).
    pub state: Option<String>,
    /// Loaded sequence file, empty when none.
    pub sequence: Option<String>,
    /// Per-camera sequence state.
    pub sequence_state: Vec<SequenceStateDto>,
}

impl ControlDto {
    /// A sequence is active when a file is loaded and at least one camera
    /// has a sequence.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.sequence.as_deref().is_some_and(|s| !s.trim().is_empty())
            && !self.sequence_state.is_empty()
    }
}

/// Decodes the `camera_control` fragment. Returns `None` if `value` is not
/// an object; malformed per-camera entries are logged and skipped.
#[must_use]
pub fn parse_control(value: &Value) -> Option<ControlDto> {
    let map = value.as_object()?;

    let sequence_state = match map.get("sequence_state") {
        Some(Value::Array(items)) => items.iter().filter_map(parse_sequence_state).collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(other) => {
            tracing::warn!(entry = %other, "sequence_state is not a list");
            Vec::new()
        }
    };

    Some(ControlDto {
        state: map.get("state").and_then(value_text),
        sequence: map.get("sequence").and_then(value_text),
        sequence_state,
    })
}

fn parse_sequence_state(item: &Value) -> Option<SequenceStateDto> {
    let Some(map) = item.as_object() else {
        tracing::warn!(entry = %item, "skipping malformed sequence state");
        return None;
    };
    let Some(id) = map.get("id").and_then(value_text) else {
        tracing::warn!(entry = %item, "skipping sequence state without camera id");
        return None;
    };
    let events = map
        .get("events")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(parse_control_event).collect())
        .unwrap_or_default();

    Some(SequenceStateDto {
        id,
        num_events: map.get("num_events").map_or(0, value_count),
        events,
    })
}

fn parse_control_event(item: &Value) -> Option<ControlEventDto> {
    let Some(map) = item.as_object() else {
        tracing::warn!(entry = %item, "skipping malformed control event");
        return None;
    };
    let text = |key: &str| map.get(key).and_then(value_text).unwrap_or_default();
    Some(ControlEventDto {
        pos: map.get("pos").map_or(0, value_count),
        eta: text("eta"),
        event_id: text("event_id"),
        event_time_offset: text("event_time_offset"),
        channel: text("channel"),
        value: text("value"),
    })
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_controller_telemetry() {
        let Some(control) = parse_control(&json!({
            "state": "executing",
            "sequence": "eclipse.seq",
            "sequence_state": [{
                "num_events": 40,
                "id": "Z7",
                "events": [
                    {"pos": 3, "event_id": "C2", "event_time_offset": "-0:00:10",
                     "eta": "0:04:50", "channel": "trigger", "value": "1"}
                ]
            }]
        })) else {
            panic!("control must decode");
        };
        assert!(control.is_active());
        let Some(seq) = control.sequence_state.first() else {
            panic!("one sequence expected");
        };
        assert_eq!(seq.num_events, 40);
        assert_eq!(seq.events.first().map(|e| e.pos), Some(3));
    }

    #[test]
    fn idle_without_sequence_file() {
        let Some(control) = parse_control(&json!({"state": "monitor", "sequence": ""})) else {
            panic!("control must decode");
        };
        assert!(!control.is_active());
    }

    #[test]
    fn skips_bad_camera_entries() {
        let Some(control) = parse_control(&json!({
            "sequence": "a.seq",
            "sequence_state": ["junk", {"num_events": 1}, {"id": "Z6", "events": [7, {"pos": 0}]}]
        })) else {
            panic!("control must decode");
        };
        assert_eq!(control.sequence_state.len(), 1);
        assert_eq!(control.sequence_state.first().map(|s| s.events.len()), Some(1));
    }

    #[test]
    fn non_object_is_rejected() {
        assert!(parse_control(&json!([])).is_none());
    }
}
