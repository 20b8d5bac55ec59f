//! Camera table renderer.
//!
//! The table body is rebuilt from scratch each cycle. Editable cells consult
//! a [`CellOverlay`] so submitted-but-unresolved edits keep showing their
//! optimistic value across polls.

use crate::api::dto::{CameraDto, UNAVAILABLE};
use crate::domain::{CameraField, EntityKey, RowId};
use crate::view::document::CAMERA_COLUMNS;
use crate::view::{CameraTable, Cell, Highlight, Icon, Row};

/// Text shown when no camera is detected.
pub const NO_CAMERAS: &str = "No cameras detected";

/// Edit state layered over freshly rendered camera cells.
pub trait CellOverlay {
    /// Optimistic value of a cell whose edit is still in flight.
    fn pending_value(&self, key: &EntityKey) -> Option<&str>;

    /// Whether the cell was confirmed recently enough to stay highlighted.
    fn is_confirmed(&self, key: &EntityKey) -> bool;
}

/// Overlay with no edits.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOverlay;

impl CellOverlay for NoOverlay {
    fn pending_value(&self, _key: &EntityKey) -> Option<&str> {
        None
    }

    fn is_confirmed(&self, _key: &EntityKey) -> bool {
        false
    }
}

/// Replaces the table body with one row per camera.
pub fn render_cameras(table: &mut CameraTable, cameras: &[CameraDto], overlay: &dyn CellOverlay) {
    table.rows.clear();

    if cameras.is_empty() {
        table.rows.push(Row::with_cells(
            RowId::new("camera_row_", "placeholder"),
            vec![Cell::text(NO_CAMERAS).spanning(CAMERA_COLUMNS)],
        ));
        return;
    }

    for camera in cameras {
        let Some(serial) = camera.serial() else {
            continue;
        };
        table.rows.push(camera_row(serial, camera, overlay));
    }
}

fn camera_row(serial: &str, camera: &CameraDto, overlay: &dyn CellOverlay) -> Row {
    let mut cells = Vec::with_capacity(CAMERA_COLUMNS);

    cells.push(Cell::icon(if camera.connected {
        Icon::CameraConnected
    } else {
        Icon::CameraDisconnected
    }));
    cells.push(Cell::text(serial));

    let description = camera
        .field(CameraField::Description)
        .unwrap_or(UNAVAILABLE);
    cells.push(overlaid(
        Cell::editable(description, EntityKey::camera(serial, CameraField::Description)),
        overlay,
    ));

    for field in CameraField::CAPABILITIES {
        let value = camera.field(field).unwrap_or(UNAVAILABLE);
        let cell = match (camera.connected, field.is_choice()) {
            (false, _) => Cell::text(UNAVAILABLE),
            (true, true) => overlaid(
                Cell::editable(value, EntityKey::camera(serial, field)),
                overlay,
            ),
            (true, false) => Cell::text(value),
        };
        cells.push(cell);
    }

    Row::with_cells(CameraTable::row_id(serial), cells)
}

fn overlaid(mut cell: Cell, overlay: &dyn CellOverlay) -> Cell {
    let Some(key) = cell.editable.as_ref() else {
        return cell;
    };
    if let Some(value) = overlay.pending_value(key) {
        cell.text = value.to_string();
        cell.highlight = Highlight::Pending;
    } else if overlay.is_confirmed(key) {
        cell.highlight = Highlight::Confirmed;
    }
    cell
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::api::dto::camera_dto::parse_cameras;
    use serde_json::json;

    fn cameras(value: serde_json::Value) -> Vec<CameraDto> {
        let Some(cameras) = parse_cameras(&value) else {
            panic!("camera fixture must decode");
        };
        cameras
    }

    #[test]
    fn disconnected_camera_shows_unavailable_capabilities() {
        let mut table = CameraTable::default();
        render_cameras(
            &mut table,
            &cameras(json!([{"serial": "A1", "connected": "0", "iso": "400"}])),
            &NoOverlay,
        );
        let Some(row) = table.row("A1") else {
            panic!("row for A1 expected");
        };
        assert_eq!(row.cell(0).and_then(|c| c.icon), Some(Icon::CameraDisconnected));
        for field in CameraField::CAPABILITIES {
            assert_eq!(row.text(CameraTable::column_of(field)), Some(UNAVAILABLE));
        }
    }

    #[test]
    fn connected_camera_fills_capabilities() {
        let mut table = CameraTable::default();
        render_cameras(
            &mut table,
            &cameras(json!([{
                "serial": "3006513", "connected": true, "desc": "Z 7",
                "batt": "60%", "iso": "500", "fstop": "f/8"
            }])),
            &NoOverlay,
        );
        let Some(row) = table.row("3006513") else {
            panic!("row expected");
        };
        assert_eq!(row.cell(0).and_then(|c| c.icon), Some(Icon::CameraConnected));
        assert_eq!(row.text(2), Some("Z 7"));
        assert_eq!(row.text(CameraTable::column_of(CameraField::Battery)), Some("60%"));
        assert_eq!(row.text(CameraTable::column_of(CameraField::Shutter)), Some(UNAVAILABLE));
        let iso = EntityKey::camera("3006513", CameraField::Iso);
        assert_eq!(table.cell(&iso).and_then(|c| c.editable.clone()), Some(iso));
    }

    #[test]
    fn zero_cameras_render_placeholder() {
        let mut table = CameraTable::default();
        render_cameras(&mut table, &cameras(json!([{"serial": "A1"}])), &NoOverlay);
        render_cameras(&mut table, &[], &NoOverlay);
        assert_eq!(table.rows.len(), 1);
        let Some(cell) = table.rows.first().and_then(|r| r.cell(0)) else {
            panic!("placeholder cell expected");
        };
        assert_eq!(cell.text, NO_CAMERAS);
        assert_eq!(cell.col_span, CAMERA_COLUMNS);
    }

    struct Pending(EntityKey, &'static str);

    impl CellOverlay for Pending {
        fn pending_value(&self, key: &EntityKey) -> Option<&str> {
            (*key == self.0).then_some(self.1)
        }

        fn is_confirmed(&self, _key: &EntityKey) -> bool {
            false
        }
    }

    #[test]
    fn pending_edit_survives_rebuild() {
        let key = EntityKey::camera("A1", CameraField::Description);
        let mut table = CameraTable::default();
        render_cameras(
            &mut table,
            &cameras(json!([{"serial": "A1", "connected": true, "desc": "Left"}])),
            &Pending(key.clone(), "West rig"),
        );
        let Some(cell) = table.cell(&key) else {
            panic!("description cell expected");
        };
        assert_eq!(cell.text, "West rig");
        assert_eq!(cell.highlight, Highlight::Pending);
    }

    #[test]
    fn rebuild_drops_vanished_cameras() {
        let mut table = CameraTable::default();
        render_cameras(
            &mut table,
            &cameras(json!([{"serial": "A1"}, {"serial": "B2"}])),
            &NoOverlay,
        );
        render_cameras(&mut table, &cameras(json!([{"serial": "B2"}])), &NoOverlay);
        assert!(table.row("A1").is_none());
        assert!(table.row("B2").is_some());
    }
}
