//! GPS panel renderer.

use crate::api::dto::{FixQuality, GpsDto, UNAVAILABLE};
use crate::view::{GpsPanel, Icon};

/// Writes a GPS fragment into the panel.
///
/// A disconnected receiver blanks every numeric field regardless of what
/// else the fragment carries; mode and mode time are still shown.
pub fn render_gps(panel: &mut GpsPanel, gps: &GpsDto) {
    panel.mode = text_or_na(gps.mode.as_deref());
    panel.mode_time = text_or_na(gps.mode_time.as_deref());

    if !gps.connected {
        panel.icon = Icon::GpsDisconnected;
        for field in [
            &mut panel.satellites,
            &mut panel.time,
            &mut panel.latitude,
            &mut panel.longitude,
            &mut panel.altitude,
        ] {
            *field = UNAVAILABLE.to_string();
        }
        return;
    }

    panel.icon = match gps.fix_quality() {
        FixQuality::ThreeD => Icon::GpsConnected,
        FixQuality::TwoD => Icon::GpsDegraded,
        FixQuality::NoFix => Icon::GpsDisconnected,
    };
    panel.satellites = format!("{}/{}", gps.sats_used, gps.sats_seen);
    panel.time = text_or_na(gps.time.as_deref());
    panel.latitude = fixed(gps.lat, 4);
    panel.longitude = fixed(gps.long, 4);
    panel.altitude = fixed(gps.altitude, 1);
}

fn text_or_na(text: Option<&str>) -> String {
    text.filter(|t| !t.trim().is_empty())
        .unwrap_or(UNAVAILABLE)
        .to_string()
}

fn fixed(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| UNAVAILABLE.to_string(), |v| format!("{v:.decimals$}"))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    fn gps(value: serde_json::Value) -> GpsDto {
        let Ok(gps) = serde_json::from_value(value) else {
            panic!("gps fixture must decode");
        };
        gps
    }

    #[test]
    fn disconnected_blanks_numeric_fields() {
        let mut panel = GpsPanel::default();
        render_gps(
            &mut panel,
            &gps(json!({
                "connected": false,
                "mode": "3D FIX",
                "mode_time": "0:12:00",
                "sats_used": 9,
                "sats_seen": 14,
                "time": "18:37:02",
                "lat": 40.918959,
                "long": -1.289364,
                "altitude": 950.26
            })),
        );
        assert_eq!(panel.icon, Icon::GpsDisconnected);
        for field in [
            &panel.satellites,
            &panel.time,
            &panel.latitude,
            &panel.longitude,
            &panel.altitude,
        ] {
            assert_eq!(field, UNAVAILABLE);
        }
        assert_eq!(panel.mode, "3D FIX");
        assert_eq!(panel.mode_time, "0:12:00");
    }

    #[test]
    fn connected_formats_coordinates() {
        let mut panel = GpsPanel::default();
        render_gps(
            &mut panel,
            &gps(json!({
                "connected": true,
                "mode": "3D FIX",
                "sats_used": 9,
                "sats_seen": 14,
                "lat": 40.918959,
                "long": -1.289364,
                "altitude": 950.26
            })),
        );
        assert_eq!(panel.icon, Icon::GpsConnected);
        assert_eq!(panel.satellites, "9/14");
        assert_eq!(panel.latitude, "40.9190");
        assert_eq!(panel.longitude, "-1.2894");
        assert_eq!(panel.altitude, "950.3");
    }

    #[test]
    fn non_numeric_satellites_become_zero() {
        let mut panel = GpsPanel::default();
        render_gps(
            &mut panel,
            &gps(json!({"connected": true, "sats_used": 7, "sats_seen": "x"})),
        );
        assert_eq!(panel.satellites, "7/0");
    }

    #[test]
    fn fix_quality_picks_icon() {
        let mut panel = GpsPanel::default();
        render_gps(&mut panel, &gps(json!({"connected": 1, "mode": "2D FIX"})));
        assert_eq!(panel.icon, Icon::GpsDegraded);
        render_gps(&mut panel, &gps(json!({"connected": 1, "mode": "NO FIX"})));
        assert_eq!(panel.icon, Icon::GpsDisconnected);
    }

    #[test]
    fn missing_coordinates_render_unavailable() {
        let mut panel = GpsPanel::default();
        render_gps(
            &mut panel,
            &gps(json!({"connected": true, "mode": "3D FIX", "lat": "north"})),
        );
        assert_eq!(panel.latitude, UNAVAILABLE);
        assert_eq!(panel.longitude, UNAVAILABLE);
        assert_eq!(panel.time, UNAVAILABLE);
    }
}
