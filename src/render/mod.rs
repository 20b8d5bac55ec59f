//! Section renderers.
//!
//! Each renderer is a function of the current document section and one
//! snapshot fragment. [`render_snapshot`] fans a validated snapshot out to
//! them; a missing fragment leaves its section untouched.

pub mod cameras;
pub mod control;
pub mod events;
pub mod gps;

pub use cameras::{CellOverlay, NoOverlay, render_cameras};
pub use control::render_control;
pub use events::{begin_file_load, fail_file_load, finish_file_load, render_events};
pub use gps::render_gps;

use crate::api::dto::Snapshot;
use crate::view::Document;

/// Applies every fragment present in `snapshot` and bumps the document
/// revision.
///
/// With `include_events` false the event fragment and the event-file name
/// are ignored; a poll that raced a file reload passes `false`. When both
/// are present, `camera_control.sequence` decides the sequence file name.
pub fn render_snapshot(
    doc: &mut Document,
    snapshot: &Snapshot,
    overlay: &dyn CellOverlay,
    include_events: bool,
) -> u64 {
    if let Some(gps) = &snapshot.gps {
        render_gps(&mut doc.gps, gps);
    }
    if let Some(cameras) = &snapshot.cameras {
        render_cameras(&mut doc.cameras, cameras, overlay);
    }
    if include_events {
        if let Some(name) = snapshot.event_filename.as_deref().filter(|n| !n.is_empty()) {
            name.clone_into(&mut doc.events.filename);
        }
        if let Some(events) = &snapshot.events {
            render_events(&mut doc.events, events);
        }
    }
    // The control fragment carries its own sequence name and wins over
    // the top-level one.
    if let Some(name) = snapshot.sequence_filename.as_deref().filter(|n| !n.is_empty()) {
        doc.control.sequence_filename = Some(name.to_string());
    }
    if let Some(control) = &snapshot.camera_control {
        render_control(&mut doc.control, control);
    }

    doc.revision += 1;
    doc.revision
}
