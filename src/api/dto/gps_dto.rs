//! GPS fragment of a snapshot.

use serde::Deserialize;

use super::common_dto::{lenient_bool, lenient_count, lenient_f64, lenient_text};

/// GPS receiver state as reported by the backend.
///
/// Every field is optional on the wire; the reader drops keys it has no
/// value for.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GpsDto {
    /// Whether a receiver is attached and healthy.
    #[serde(default, deserialize_with = "lenient_bool")]
    pub connected: bool,
    /// Fix mode text (`"NO FIX"`, `"2D FIX"`, `"3D FIX"`, ...).
    #[serde(default, deserialize_with = "lenient_text")]
    pub mode: Option<String>,
    /// Time spent in the current mode (`H:MM:SS`).
    #[serde(default, deserialize_with = "lenient_text")]
    pub mode_time: Option<String>,
    /// Satellites used in the fix.
    #[serde(default, deserialize_with = "lenient_count")]
    pub sats_used: u64,
    /// Satellites in view.
    #[serde(default, deserialize_with = "lenient_count")]
    pub sats_seen: u64,
    /// GPS time text.
    #[serde(default, deserialize_with = "lenient_text")]
    pub time: Option<String>,
    /// Latitude in degrees.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lat: Option<f64>,
    /// Longitude in degrees.
    #[serde(default, rename = "long", alias = "lon", deserialize_with = "lenient_f64")]
    pub long: Option<f64>,
    /// Altitude in metres.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub altitude: Option<f64>,
}

/// Fix quality tier derived from the mode text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixQuality {
    /// No usable fix (or unknown mode text).
    NoFix,
    /// Two-dimensional fix.
    TwoD,
    /// Three-dimensional fix.
    ThreeD,
}

impl GpsDto {
    /// Classifies the mode text: `"2D…"` is degraded, `"3D…"` is a full
    /// fix, anything else is no fix.
    #[must_use]
    pub fn fix_quality(&self) -> FixQuality {
        let mode = self
            .mode
            .as_deref()
            .map(|m| m.trim().to_ascii_uppercase())
            .unwrap_or_default();
        if mode.starts_with("3D") {
            FixQuality::ThreeD
        } else if mode.starts_with("2D") {
            FixQuality::TwoD
        } else {
            FixQuality::NoFix
        }
    }
}
