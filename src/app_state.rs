//! Shared dashboard state mutated by the poll loop and user operations.
//!
//! Everything a render touches lives in one [`DashboardState`] behind a
//! single lock. The lock is held only for synchronous mutation, never across
//! a network await.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::api::dto::{EventLoadResponse, Snapshot};
use crate::config::DashboardConfig;
use crate::domain::EntityKey;
use crate::error::DashboardError;
use crate::render::{begin_file_load, fail_file_load, finish_file_load, render_snapshot};
use crate::service::edit_coordinator::EditCoordinator;
use crate::view::{DialogAction, DialogState, Document, Highlight};

/// Summary of the last applied snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncStatus {
    /// Current document revision.
    pub revision: u64,
    /// When a snapshot was last applied.
    pub last_success: Option<DateTime<Utc>>,
    /// Fragments the last snapshot carried.
    pub fragments: Vec<&'static str>,
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(at) = self.last_success else {
            return write!(f, "revision {}, no update yet", self.revision);
        };
        let fragments = if self.fragments.is_empty() {
            "no fragments".to_string()
        } else {
            self.fragments.join(", ")
        };
        write!(
            f,
            "revision {}, last update {} ({fragments})",
            self.revision,
            at.format("%H:%M:%S UTC")
        )
    }
}

/// Document, dialog and edit state of one dashboard session.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// Rendered view model.
    pub document: Document,
    /// Open dialog, if any.
    pub dialog: DialogState,
    /// Optimistic edits.
    pub edits: EditCoordinator,
    /// Last applied snapshot.
    pub snapshot: Option<Snapshot>,
    /// Bumped when an event-file reload starts and again when it ends.
    pub file_generation: u64,
    /// When a snapshot was last applied.
    pub last_success: Option<DateTime<Utc>>,
}

impl DashboardState {
    /// Creates an empty session.
    #[must_use]
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            document: Document::default(),
            dialog: DialogState::Closed,
            edits: EditCoordinator::new(config.confirm_highlight()),
            snapshot: None,
            file_generation: 0,
            last_success: None,
        }
    }

    /// Applies a dialog transition. Opening or closing a dialog also drops
    /// the edit it was collecting.
    pub fn dispatch(&mut self, action: DialogAction) {
        if matches!(action, DialogAction::Open(_) | DialogAction::Close)
            && let Some(edit) = self.edits.cancel()
        {
            tracing::debug!(key = %edit.key, "edit cancelled with its dialog");
        }
        self.dialog = std::mem::take(&mut self.dialog).reduce(action);
    }

    /// Renders a validated snapshot and returns the new revision.
    pub fn apply_snapshot(
        &mut self,
        snapshot: Snapshot,
        include_events: bool,
        now: DateTime<Utc>,
    ) -> u64 {
        self.edits.prune(now);
        let revision = render_snapshot(&mut self.document, &snapshot, &self.edits, include_events);
        self.snapshot = Some(snapshot);
        self.last_success = Some(now);
        revision
    }

    /// Starts an event-file reload and returns the new file generation.
    pub fn begin_event_file(&mut self, filename: &str) -> u64 {
        self.file_generation += 1;
        begin_file_load(&mut self.document.events, filename);
        self.file_generation
    }

    /// Completes the reload started at `generation` with its outcome.
    ///
    /// Returns `false` and leaves the table alone if another reload has
    /// started since. Otherwise bumps the generation again, so a poll that
    /// was fetching while the file loaded drops its event fragment.
    pub fn end_event_file(
        &mut self,
        generation: u64,
        filename: &str,
        result: &Result<EventLoadResponse, DashboardError>,
    ) -> bool {
        if self.file_generation != generation {
            return false;
        }
        self.file_generation += 1;
        match result {
            Ok(loaded) => finish_file_load(&mut self.document.events, loaded),
            Err(err) => fail_file_load(&mut self.document.events, filename, &err.to_string()),
        }
        true
    }

    /// Whether a poll that started at `generation` may render its event
    /// fragment: no reload started or ended since, and none is loading.
    #[must_use]
    pub fn events_current(&self, generation: u64) -> bool {
        self.file_generation == generation && self.document.events.loading.is_none()
    }

    /// Summarizes the last applied snapshot.
    #[must_use]
    pub fn status(&self) -> SyncStatus {
        SyncStatus {
            revision: self.document.revision,
            last_success: self.last_success,
            fragments: self
                .snapshot
                .as_ref()
                .map(Snapshot::fragment_names)
                .unwrap_or_default(),
        }
    }

    /// Marks a change made outside a snapshot and returns the new revision.
    pub fn touch(&mut self) -> u64 {
        self.document.revision += 1;
        self.document.revision
    }

    /// Current text of an editable camera cell.
    #[must_use]
    pub fn cell_text(&self, key: &EntityKey) -> Option<String> {
        self.document.cameras.cell(key).map(|c| c.text.clone())
    }

    /// Writes a value into an editable camera cell. Returns `false` if the
    /// cell is not on screen.
    pub fn write_cell(&mut self, key: &EntityKey, text: &str, highlight: Highlight) -> bool {
        match self.document.cameras.cell_mut(key) {
            Some(cell) => {
                text.clone_into(&mut cell.text);
                cell.highlight = highlight;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::CameraField;
    use crate::service::edit_coordinator::EditPhase;
    use crate::view::{DialogKind, FileTarget};
    use serde_json::json;

    fn state() -> DashboardState {
        DashboardState::new(&DashboardConfig::default())
    }

    #[test]
    fn closing_dialog_cancels_edit() {
        let mut state = state();
        let key = EntityKey::camera("A1", CameraField::Description);
        state.dispatch(DialogAction::Open(DialogKind::Rename {
            serial: "A1".to_string(),
            current: "Left".to_string(),
        }));
        state.edits.begin(key, "Left", Utc::now());
        assert_eq!(state.edits.phase(), EditPhase::Editing);

        state.dispatch(DialogAction::Close);
        assert_eq!(state.edits.phase(), EditPhase::Idle);
        assert!(!state.dialog.is_open());
    }

    #[test]
    fn opening_another_dialog_cancels_edit() {
        let mut state = state();
        state
            .edits
            .begin(EntityKey::camera("A1", CameraField::Iso), "400", Utc::now());
        state.dispatch(DialogAction::Open(DialogKind::FileSelect {
            target: FileTarget::Event,
            files: Vec::new(),
        }));
        assert!(state.edits.editing().is_none());
    }

    #[test]
    fn reload_bumps_generation_and_clears_rows() {
        let mut state = state();
        let Ok(snapshot) = Snapshot::from_value(&json!({"events": {"C1": ["a", "b"]}})) else {
            panic!("snapshot must validate");
        };
        state.apply_snapshot(snapshot, true, Utc::now());
        assert_eq!(state.document.events.rows.len(), 1);

        assert_eq!(state.begin_event_file("next.event"), 1);
        assert!(state.document.events.rows.is_empty());
    }

    #[test]
    fn events_are_stale_while_a_file_loads() {
        let mut state = state();
        let before = state.file_generation;
        assert!(state.events_current(before));

        let generation = state.begin_event_file("b.event");
        assert!(!state.events_current(before));
        // A poll that starts after the reset still sees the load outstanding.
        assert!(!state.events_current(generation));

        let loaded = Ok(EventLoadResponse {
            event_type: Some("solar".to_string()),
            events: Some(vec!["C3".to_string()]),
        });
        assert!(state.end_event_file(generation, "b.event", &loaded));
        assert!(!state.events_current(generation));
        assert!(state.events_current(state.file_generation));
        assert_eq!(state.document.events.rows.len(), 2);
    }

    #[test]
    fn superseded_load_leaves_table_alone() {
        let mut state = state();
        let first = state.begin_event_file("a.event");
        let second = state.begin_event_file("b.event");
        let failed = Err(DashboardError::Payload("gone".to_string()));
        assert!(!state.end_event_file(first, "a.event", &failed));
        assert_eq!(state.file_generation, second);
        assert!(state.document.events.rows.is_empty());
        assert!(state.document.events.loading.is_some());
    }

    #[test]
    fn status_reports_last_snapshot() {
        let mut state = state();
        assert_eq!(state.status().to_string(), "revision 0, no update yet");

        let Ok(snapshot) = Snapshot::from_value(&json!({"gps": {"connected": true}, "events": {}}))
        else {
            panic!("snapshot must validate");
        };
        let Some(now) = DateTime::from_timestamp(1_712_598_000, 0) else {
            panic!("valid timestamp");
        };
        state.apply_snapshot(snapshot, true, now);
        let status = state.status();
        assert_eq!(status.last_success, Some(now));
        assert_eq!(status.fragments, ["gps", "events"]);
        assert!(status.to_string().ends_with("(gps, events)"));
    }

    #[test]
    fn write_cell_reports_missing_cell() {
        let mut state = state();
        let key = EntityKey::camera("A1", CameraField::Description);
        assert!(!state.write_cell(&key, "x", Highlight::None));

        let Ok(snapshot) =
            Snapshot::from_value(&json!({"detected_cameras": [{"serial": "A1", "desc": "Left"}]}))
        else {
            panic!("snapshot must validate");
        };
        state.apply_snapshot(snapshot, true, Utc::now());
        assert!(state.write_cell(&key, "Right", Highlight::Pending));
        assert_eq!(state.cell_text(&key).as_deref(), Some("Right"));
    }
}
