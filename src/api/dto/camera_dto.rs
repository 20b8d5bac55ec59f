//! Camera fragment of a snapshot.

use serde::Deserialize;
use serde_json::Value;

use super::common_dto::{lenient_bool, lenient_text};
use crate::domain::CameraField;

/// One detected camera.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CameraDto {
    /// Serial number; stable identity of the camera.
    #[serde(default, deserialize_with = "lenient_text")]
    pub serial: Option<String>,
    /// User-assigned description.
    #[serde(default, alias = "description", deserialize_with = "lenient_text")]
    pub desc: Option<String>,
    /// Connection flag (`true`, `1`, `"1"`).
    #[serde(default, deserialize_with = "lenient_bool")]
    pub connected: bool,
    /// Battery level.
    #[serde(default, alias = "battery", deserialize_with = "lenient_text")]
    pub batt: Option<String>,
    /// USB port.
    #[serde(default, deserialize_with = "lenient_text")]
    pub port: Option<String>,
    /// Remaining shots.
    #[serde(default, deserialize_with = "lenient_text")]
    pub num_photos: Option<String>,
    /// Image quality.
    #[serde(default, deserialize_with = "lenient_text")]
    pub quality: Option<String>,
    /// Exposure program.
    #[serde(default, deserialize_with = "lenient_text")]
    pub mode: Option<String>,
    /// ISO.
    #[serde(default, deserialize_with = "lenient_text")]
    pub iso: Option<String>,
    /// Aperture.
    #[serde(default, deserialize_with = "lenient_text")]
    pub fstop: Option<String>,
    /// Shutter speed.
    #[serde(default, deserialize_with = "lenient_text")]
    pub shutter: Option<String>,
    /// Frames per burst.
    #[serde(default, alias = "burst_number", deserialize_with = "lenient_text")]
    pub burst: Option<String>,
}

impl CameraDto {
    /// Returns the serial if it is present and non-blank.
    #[must_use]
    pub fn serial(&self) -> Option<&str> {
        self.serial.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// Returns the reported value of a camera property.
    #[must_use]
    pub fn field(&self, field: CameraField) -> Option<&str> {
        let value = match field {
            CameraField::Description => &self.desc,
            CameraField::Battery => &self.batt,
            CameraField::Port => &self.port,
            CameraField::AvailableShots => &self.num_photos,
            CameraField::Quality => &self.quality,
            CameraField::Mode => &self.mode,
            CameraField::Iso => &self.iso,
            CameraField::Fstop => &self.fstop,
            CameraField::Shutter => &self.shutter,
            CameraField::BurstCount => &self.burst,
        };
        value.as_deref()
    }
}

/// Decodes a camera list.
///
/// Accepts either a bare array or the `{num_cameras, detected}` envelope of
/// the per-section endpoint. Entries that are not objects or carry no
/// serial are logged and skipped. Returns `None` if `value` has neither
/// shape.
#[must_use]
pub fn parse_cameras(value: &Value) -> Option<Vec<CameraDto>> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(map) => map.get("detected")?.as_array()?,
        _ => return None,
    };

    let mut cameras = Vec::with_capacity(items.len());
    for item in items {
        match serde_json::from_value::<CameraDto>(item.clone()) {
            Ok(camera) if camera.serial().is_some() => cameras.push(camera),
            Ok(_) => tracing::warn!(entry = %item, "skipping camera without serial"),
            Err(err) => tracing::warn!(entry = %item, error = %err, "skipping malformed camera"),
        }
    }
    Some(cameras)
}
