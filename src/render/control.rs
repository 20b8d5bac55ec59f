//! Camera-control panel renderer.

use crate::api::dto::{ControlDto, UNAVAILABLE};
use crate::domain::RowId;
use crate::view::{Cell, ControlPanel, ControlTable, Icon, Row};

/// Rewrites the panel from the control fragment.
///
/// Without an active sequence the panel goes idle and every per-camera
/// table is dropped. Otherwise each camera's table is rebuilt.
pub fn render_control(panel: &mut ControlPanel, control: &ControlDto) {
    panel.status = control
        .state
        .clone()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| UNAVAILABLE.to_string());
    panel.sequence_filename = control.sequence.clone().filter(|s| !s.trim().is_empty());

    if !control.is_active() {
        panel.icon = Icon::ControlIdle;
        panel.tables.clear();
        return;
    }

    panel.icon = Icon::ControlActive;
    panel.tables = control
        .sequence_state
        .iter()
        .map(|seq| ControlTable {
            camera_id: seq.id.clone(),
            num_events: seq.num_events,
            rows: seq
                .events
                .iter()
                .map(|event| {
                    let id = RowId::new(&format!("control_{}_", seq.id), &event.pos.to_string());
                    Row::with_cells(
                        id,
                        vec![
                            Cell::text(event.pos.to_string()),
                            Cell::text(&event.eta),
                            Cell::text(&event.event_id),
                            Cell::text(&event.event_time_offset),
                            Cell::text(&event.channel),
                            Cell::text(&event.value),
                        ],
                    )
                })
                .collect(),
        })
        .collect();
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::api::dto::control_dto::parse_control;
    use crate::view::document::CONTROL_COLUMNS;
    use serde_json::json;

    fn control(value: serde_json::Value) -> ControlDto {
        let Some(control) = parse_control(&value) else {
            panic!("control fixture must decode");
        };
        control
    }

    #[test]
    fn active_sequence_builds_tables() {
        let mut panel = ControlPanel::default();
        render_control(
            &mut panel,
            &control(json!({
                "state": "executing",
                "sequence": "eclipse.seq",
                "sequence_state": [
                    {"id": "Z7", "num_events": 40, "events": [
                        {"pos": 3, "eta": "0:04:50", "event_id": "C2",
                         "event_time_offset": "-0:00:10", "channel": "trigger", "value": "1"},
                        {"pos": 4, "eta": "0:04:55", "event_id": "C2",
                         "event_time_offset": "-0:00:05", "channel": "iso", "value": "100"}
                    ]},
                    {"id": "Z6", "num_events": 0, "events": []}
                ]
            })),
        );
        assert_eq!(panel.icon, Icon::ControlActive);
        assert_eq!(panel.status, "executing");
        assert_eq!(panel.tables.len(), 2);
        let Some(table) = panel.tables.first() else {
            panic!("table expected");
        };
        assert_eq!(table.camera_id, "Z7");
        assert_eq!(table.rows.len(), 2);
        let Some(row) = table.rows.first() else {
            panic!("row expected");
        };
        assert_eq!(row.cells().len(), CONTROL_COLUMNS);
        assert_eq!(row.text(4), Some("trigger"));
        assert_eq!(panel.sequence_filename.as_deref(), Some("eclipse.seq"));
    }

    #[test]
    fn idle_clears_tables() {
        let mut panel = ControlPanel::default();
        render_control(
            &mut panel,
            &control(json!({"sequence": "a.seq", "sequence_state": [{"id": "Z7", "events": []}]})),
        );
        assert_eq!(panel.tables.len(), 1);

        render_control(&mut panel, &control(json!({"state": "monitor", "sequence": ""})));
        assert_eq!(panel.icon, Icon::ControlIdle);
        assert!(panel.tables.is_empty());
        assert_eq!(panel.status, "monitor");
        assert!(panel.sequence_filename.is_none());
    }
}
