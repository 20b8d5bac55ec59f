//! Stable entity keys and DOM-safe row identifiers.
//!
//! [`EntityKey`] names the thing a cell or row belongs to (a scheduled
//! event, or one property of one camera). [`RowId`] is the addressable
//! identifier derived from a key; the derivation is deterministic and
//! injective so two distinct keys never share an id.

use std::fmt;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use super::CameraField;

/// Identifier of a rendered row, safe to use as a DOM element id.
///
/// Only ASCII alphanumerics and `_` appear in the encoded part. `_` is
/// escaped as `__` and every other byte of the UTF-8 encoding becomes
/// `_xx` (lower-case hex), so decoding is unambiguous: after an `_` comes
/// either another `_` or exactly two hex digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(String);

impl RowId {
    /// Builds a row id from a table prefix and a raw key.
    #[must_use]
    pub fn new(prefix: &str, raw_key: &str) -> Self {
        let mut id = String::with_capacity(prefix.len() + raw_key.len());
        id.push_str(prefix);
        for byte in raw_key.bytes() {
            match byte {
                b'_' => id.push_str("__"),
                b if b.is_ascii_alphanumeric() => id.push(char::from(b)),
                b => {
                    let _ = write!(id, "_{b:02x}");
                }
            }
        }
        Self(id)
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stable identity of an on-screen entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntityKey {
    /// A row of the event table, keyed by event identifier.
    Event {
        /// Event identifier as sent by the backend (e.g. `"C2"`).
        event_id: String,
    },
    /// One editable property of one camera.
    CameraField {
        /// Camera serial number.
        serial: String,
        /// Property of that camera.
        field: CameraField,
    },
}

impl EntityKey {
    /// Shorthand for an event key.
    #[must_use]
    pub fn event(event_id: impl Into<String>) -> Self {
        Self::Event {
            event_id: event_id.into(),
        }
    }

    /// Shorthand for a camera property key.
    #[must_use]
    pub fn camera(serial: impl Into<String>, field: CameraField) -> Self {
        Self::CameraField {
            serial: serial.into(),
            field,
        }
    }

    /// Derives the DOM-safe id of the element owned by this key.
    #[must_use]
    pub fn row_id(&self) -> RowId {
        match self {
            Self::Event { event_id } => RowId::new("event_row_", event_id),
            Self::CameraField { serial, field } => {
                RowId::new(&format!("camera_{}_", field.wire_name().replace('-', "")), serial)
            }
        }
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Event { event_id } => write!(f, "event {event_id}"),
            Self::CameraField { serial, field } => write!(f, "camera {serial} {field}"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn alphanumerics_pass_through() {
        assert_eq!(RowId::new("event_row_", "C2").as_str(), "event_row_C2");
    }

    #[test]
    fn whitespace_and_punctuation_are_escaped() {
        assert_eq!(RowId::new("r_", "Max Eclipse").as_str(), "r_Max_20Eclipse");
        assert_eq!(RowId::new("r_", "a-b").as_str(), "r_a_2db");
    }

    #[test]
    fn underscore_is_doubled() {
        assert_eq!(RowId::new("r_", "a_b").as_str(), "r_a__b");
    }

    #[test]
    fn lookalike_keys_do_not_collide() {
        // Collapsing whitespace to `_` and stripping the rest would map
        // all of these onto `a_b` or `ab`.
        let keys = ["a b", "a_b", "a-b", "ab", "a__b", "a  b", "a_20b", "a\tb"];
        let ids: HashSet<RowId> = keys.iter().map(|k| RowId::new("event_row_", k)).collect();
        assert_eq!(ids.len(), keys.len());
    }

    #[test]
    fn non_ascii_is_hex_encoded() {
        let id = RowId::new("r_", "é");
        assert_eq!(id.as_str(), "r__c3_a9");
        assert!(id.as_str().chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
    }

    #[test]
    fn derivation_is_deterministic() {
        let a = EntityKey::event("Sunrise 1").row_id();
        let b = EntityKey::event("Sunrise 1").row_id();
        assert_eq!(a, b);
    }

    #[test]
    fn camera_keys_differ_per_field() {
        let iso = EntityKey::camera("3006513", CameraField::Iso).row_id();
        let fstop = EntityKey::camera("3006513", CameraField::Fstop).row_id();
        assert_ne!(iso, fstop);
        assert_eq!(fstop.as_str(), "camera_fnumber_3006513");
    }

    #[test]
    fn serde_round_trip() {
        let key = EntityKey::camera("A1", CameraField::Description);
        let Ok(json) = serde_json::to_string(&key) else {
            panic!("serialization failed");
        };
        let Ok(back) = serde_json::from_str::<EntityKey>(&json) else {
            panic!("deserialization failed");
        };
        assert_eq!(key, back);
    }
}
