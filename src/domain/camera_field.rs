//! Camera properties shown in the camera table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DashboardError;

/// A column of the camera table that maps to one camera property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraField {
    /// User-assigned description (renamed through the rename dialog).
    Description,
    /// Battery level.
    Battery,
    /// USB port.
    Port,
    /// Remaining shots on the card.
    AvailableShots,
    /// Image quality (`NEF (Raw)`, `JPEG Fine`, ...).
    Quality,
    /// Exposure program (`M`, `A`, `S`, `P`).
    Mode,
    /// ISO sensitivity.
    Iso,
    /// Aperture.
    Fstop,
    /// Shutter speed.
    Shutter,
    /// Frames per burst.
    BurstCount,
}

impl CameraField {
    /// Capability columns in display order (everything after the
    /// description column).
    pub const CAPABILITIES: [Self; 9] = [
        Self::Battery,
        Self::Port,
        Self::AvailableShots,
        Self::Quality,
        Self::Mode,
        Self::Iso,
        Self::Fstop,
        Self::Shutter,
        Self::BurstCount,
    ];

    /// Property name understood by `read_choices` / `set_choice`.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Description => "description",
            Self::Battery => "batterylevel",
            Self::Port => "port",
            Self::AvailableShots => "availableshots",
            Self::Quality => "imagequality",
            Self::Mode => "expprogram",
            Self::Iso => "iso",
            Self::Fstop => "f-number",
            Self::Shutter => "shutterspeed2",
            Self::BurstCount => "burstnumber",
        }
    }

    /// Column header.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Description => "Description",
            Self::Battery => "Battery",
            Self::Port => "Port",
            Self::AvailableShots => "Shots",
            Self::Quality => "Quality",
            Self::Mode => "Mode",
            Self::Iso => "ISO",
            Self::Fstop => "F-Stop",
            Self::Shutter => "Shutter",
            Self::BurstCount => "Burst",
        }
    }

    /// Whether the value is picked from a backend-provided choice list.
    #[must_use]
    pub const fn is_choice(self) -> bool {
        matches!(
            self,
            Self::Quality | Self::Mode | Self::Iso | Self::Fstop | Self::Shutter | Self::BurstCount
        )
    }
}

impl FromStr for CameraField {
    type Err = DashboardError;

    /// Accepts the wire name (`f-number`) or the label (`F-Stop`), case
    /// insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        std::iter::once(Self::Description)
            .chain(Self::CAPABILITIES)
            .find(|f| {
                f.wire_name().eq_ignore_ascii_case(wanted) || f.label().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| DashboardError::InvalidRequest(format!("unknown camera property {wanted:?}")))
    }
}

impl fmt::Display for CameraField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_fields_are_the_settable_ones() {
        let choices: Vec<_> = CameraField::CAPABILITIES
            .iter()
            .filter(|f| f.is_choice())
            .map(|f| f.wire_name())
            .collect();
        assert_eq!(
            choices,
            ["imagequality", "expprogram", "iso", "f-number", "shutterspeed2", "burstnumber"]
        );
        assert!(!CameraField::Description.is_choice());
    }

    #[test]
    fn parses_wire_names_and_labels() {
        assert_eq!("f-number".parse::<CameraField>().ok(), Some(CameraField::Fstop));
        assert_eq!("ISO".parse::<CameraField>().ok(), Some(CameraField::Iso));
        assert_eq!("description".parse::<CameraField>().ok(), Some(CameraField::Description));
        assert!("zoom".parse::<CameraField>().is_err());
    }
}
