//! Event table renderer.
//!
//! Rows are keyed by event id through the table's [`RowCache`]. A poll only
//! overwrites time and ETA cells; rows disappear only when a new file is
//! loaded.
//!
//! [`RowCache`]: crate::view::RowCache

use crate::api::dto::{EventLoadResponse, EventRecord, UNAVAILABLE};
use crate::domain::EntityKey;
use crate::view::EventTable;

/// Synthetic row carrying the event type of the loaded file.
pub const TYPE_ROW: &str = "Type";
/// Synthetic row shown when the loaded file lists no events.
pub const EVENTS_ROW: &str = "Events";
/// Synthetic row shown when a file fails to load.
pub const ERROR_ROW: &str = "Error";

/// Writes time and ETA for every record, creating rows for new ids.
pub fn render_events(table: &mut EventTable, events: &[EventRecord]) {
    for record in events {
        write_event_row(table, &record.event_id, &record.time, &record.eta);
    }
}

/// Writes one row, creating it on first sight.
pub fn write_event_row(table: &mut EventTable, event_id: &str, time: &str, eta: &str) {
    let row = table.rows.get_or_create(&EntityKey::event(event_id));
    row.set_text(0, event_id);
    row.set_text(1, time);
    row.set_text(2, eta);
}

/// Resets the table for a new file: sets the header, drops every row and
/// shows the loading line.
pub fn begin_file_load(table: &mut EventTable, filename: &str) {
    table.filename = filename.to_string();
    table.rows.clear();
    table.loading = Some(format!("Loading details for {filename}..."));
}

/// Fills the table with the event ids a loaded file declares.
pub fn finish_file_load(table: &mut EventTable, loaded: &EventLoadResponse) {
    table.loading = None;
    let event_type = loaded
        .event_type
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or(UNAVAILABLE);
    write_event_row(table, TYPE_ROW, event_type, "");

    match &loaded.events {
        Some(ids) => {
            for id in ids {
                write_event_row(table, id, UNAVAILABLE, "Loading...");
            }
        }
        None => {
            tracing::warn!("loaded event file has no event list");
            write_event_row(table, EVENTS_ROW, "No events defined or format error", "");
        }
    }
}

/// Replaces the loading line with an error row.
pub fn fail_file_load(table: &mut EventTable, filename: &str, reason: &str) {
    table.loading = None;
    write_event_row(table, ERROR_ROW, &format!("Failed to load {filename}"), reason);
}
