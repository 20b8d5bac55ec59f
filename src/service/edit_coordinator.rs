//! Optimistic-edit bookkeeping.
//!
//! An edit moves through `Idle → Editing → Submitting → {Confirmed |
//! RolledBack} → Idle`, or `Editing → Idle` on cancel. At most one edit is
//! being edited at a time; any number may be submitting. The pre-edit value
//! is captured when the dialog opens and is what a failed edit restores.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::domain::EntityKey;
use crate::error::DashboardError;
use crate::render::CellOverlay;

/// Coordinator phase, as seen by the dialog layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditPhase {
    /// No dialog edit in progress and nothing submitting.
    Idle,
    /// A dialog is collecting a value.
    Editing,
    /// No dialog open, but at least one edit awaits the backend.
    Submitting,
}

/// One optimistic edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEdit {
    /// Edit id.
    pub edit_id: Uuid,
    /// Cell being edited.
    pub key: EntityKey,
    /// Value shown when the dialog opened.
    pub pre_edit: String,
    /// Value sent to the backend, once submitted.
    pub new_value: Option<String>,
    /// When the dialog opened.
    pub opened_at: DateTime<Utc>,
}

/// How a submitted edit ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The backend accepted the value.
    Confirmed,
    /// The backend refused; the cell goes back to `restore`.
    RolledBack {
        /// Pre-edit value.
        restore: String,
    },
}

/// Tracks the open edit, submitted edits and recent confirmations.
#[derive(Debug, Clone)]
pub struct EditCoordinator {
    editing: Option<PendingEdit>,
    submitting: Vec<PendingEdit>,
    confirmed: HashMap<EntityKey, DateTime<Utc>>,
    highlight: Duration,
}

impl EditCoordinator {
    /// Creates an idle coordinator whose confirmations stay highlighted for
    /// `highlight`.
    #[must_use]
    pub fn new(highlight: Duration) -> Self {
        Self {
            editing: None,
            submitting: Vec::new(),
            confirmed: HashMap::new(),
            highlight,
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> EditPhase {
        if self.editing.is_some() {
            EditPhase::Editing
        } else if self.submitting.is_empty() {
            EditPhase::Idle
        } else {
            EditPhase::Submitting
        }
    }

    /// Starts editing `key`, capturing `pre_edit`. An edit already being
    /// edited is cancelled.
    pub fn begin(&mut self, key: EntityKey, pre_edit: impl Into<String>, now: DateTime<Utc>) -> Uuid {
        if let Some(previous) = self.editing.take() {
            tracing::debug!(key = %previous.key, "replacing unfinished edit");
        }
        let edit_id = Uuid::new_v4();
        self.editing = Some(PendingEdit {
            edit_id,
            key,
            pre_edit: pre_edit.into(),
            new_value: None,
            opened_at: now,
        });
        edit_id
    }

    /// The edit whose dialog is open.
    #[must_use]
    pub fn editing(&self) -> Option<&PendingEdit> {
        self.editing.as_ref()
    }

    /// Abandons the open edit without touching any cell.
    pub fn cancel(&mut self) -> Option<PendingEdit> {
        self.editing.take()
    }

    /// Moves the open edit to submitting with `new_value`.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::NoActiveEdit`] if no edit is open.
    pub fn submit(&mut self, new_value: impl Into<String>) -> Result<PendingEdit, DashboardError> {
        let mut edit = self.editing.take().ok_or(DashboardError::NoActiveEdit)?;
        edit.new_value = Some(new_value.into());
        self.submitting.push(edit.clone());
        Ok(edit)
    }

    /// Settles a submitted edit. Returns `None` for an unknown id.
    pub fn resolve(
        &mut self,
        edit_id: Uuid,
        accepted: bool,
        now: DateTime<Utc>,
    ) -> Option<(PendingEdit, EditOutcome)> {
        let index = self.submitting.iter().position(|e| e.edit_id == edit_id)?;
        let edit = self.submitting.remove(index);
        let outcome = if accepted {
            self.confirmed.insert(edit.key.clone(), now);
            EditOutcome::Confirmed
        } else {
            self.confirmed.remove(&edit.key);
            EditOutcome::RolledBack {
                restore: edit.pre_edit.clone(),
            }
        };
        tracing::debug!(key = %edit.key, ?outcome, "edit resolved");
        Some((edit, outcome))
    }

    /// Drops confirmations older than the highlight duration.
    pub fn prune(&mut self, now: DateTime<Utc>) {
        let highlight = self.highlight;
        self.confirmed.retain(|_, at| now.signed_duration_since(*at) < highlight);
    }
}

impl CellOverlay for EditCoordinator {
    fn pending_value(&self, key: &EntityKey) -> Option<&str> {
        self.submitting
            .iter()
            .rev()
            .find(|e| e.key == *key)
            .and_then(|e| e.new_value.as_deref())
    }

    fn is_confirmed(&self, key: &EntityKey) -> bool {
        self.confirmed.contains_key(key)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::CameraField;

    fn key() -> EntityKey {
        EntityKey::camera("A1", CameraField::Description)
    }

    fn coordinator() -> EditCoordinator {
        EditCoordinator::new(Duration::milliseconds(1500))
    }

    #[test]
    fn happy_path_confirms() {
        let mut edits = coordinator();
        assert_eq!(edits.phase(), EditPhase::Idle);

        edits.begin(key(), "Left", Utc::now());
        assert_eq!(edits.phase(), EditPhase::Editing);

        let Ok(edit) = edits.submit("West rig") else {
            panic!("submit must succeed");
        };
        assert_eq!(edits.phase(), EditPhase::Submitting);
        assert_eq!(edits.pending_value(&key()), Some("West rig"));

        let Some((_, outcome)) = edits.resolve(edit.edit_id, true, Utc::now()) else {
            panic!("edit must resolve");
        };
        assert_eq!(outcome, EditOutcome::Confirmed);
        assert_eq!(edits.phase(), EditPhase::Idle);
        assert!(edits.is_confirmed(&key()));
        assert!(edits.pending_value(&key()).is_none());
    }

    #[test]
    fn failure_restores_value_from_dialog_open() {
        let mut edits = coordinator();
        edits.begin(key(), "Left", Utc::now());
        let Ok(first) = edits.submit("Intermediate") else {
            panic!("submit must succeed");
        };

        edits.begin(key(), "Intermediate", Utc::now());
        let Ok(second) = edits.submit("Final") else {
            panic!("submit must succeed");
        };
        assert_eq!(edits.pending_value(&key()), Some("Final"));

        let Some((_, outcome)) = edits.resolve(first.edit_id, false, Utc::now()) else {
            panic!("first edit must resolve");
        };
        assert_eq!(
            outcome,
            EditOutcome::RolledBack {
                restore: "Left".to_string()
            }
        );
        // The later edit still owns the cell.
        assert_eq!(edits.pending_value(&key()), Some("Final"));
        assert!(edits.resolve(second.edit_id, true, Utc::now()).is_some());
    }

    #[test]
    fn cancel_returns_to_idle() {
        let mut edits = coordinator();
        edits.begin(key(), "Left", Utc::now());
        assert!(edits.cancel().is_some());
        assert_eq!(edits.phase(), EditPhase::Idle);
        assert!(matches!(edits.submit("x"), Err(DashboardError::NoActiveEdit)));
    }

    #[test]
    fn unknown_id_is_ignored() {
        let mut edits = coordinator();
        assert!(edits.resolve(Uuid::new_v4(), true, Utc::now()).is_none());
    }

    #[test]
    fn confirmations_expire() {
        let mut edits = coordinator();
        let start = Utc::now();
        edits.begin(key(), "Left", start);
        let Ok(edit) = edits.submit("Right") else {
            panic!("submit must succeed");
        };
        edits.resolve(edit.edit_id, true, start);

        edits.prune(start + Duration::milliseconds(1000));
        assert!(edits.is_confirmed(&key()));
        edits.prune(start + Duration::milliseconds(2000));
        assert!(!edits.is_confirmed(&key()));
    }
}
