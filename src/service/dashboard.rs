//! Dashboard service: the poll cycle and every user operation.
//!
//! [`Dashboard`] owns the transport client, the shared [`DashboardState`]
//! and the UI bus. Every method follows the same pattern: lock, mutate
//! synchronously, unlock, await the backend, lock again to apply the
//! outcome, then publish. The state lock is never held across an await.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use tokio::sync::Mutex;

use crate::api::ApiClient;
use crate::api::dto::{Ack, SimulationParams, Snapshot};
use crate::api::paths;
use crate::app_state::{DashboardState, SyncStatus};
use crate::config::{DashboardConfig, PollMode};
use crate::domain::{CameraField, EntityKey, Notice, UiEvent, UiEventBus};
use crate::error::DashboardError;
use crate::render::CellOverlay;
use crate::service::edit_coordinator::{EditOutcome, PendingEdit};
use crate::view::{DialogAction, DialogKind, DialogState, Document, FileTarget, Highlight};

/// Result of one poll cycle.
#[derive(Debug)]
pub enum CycleOutcome {
    /// A snapshot was rendered.
    Applied {
        /// Document revision after the render.
        revision: u64,
    },
    /// Another cycle was still in flight.
    Skipped,
    /// The fetch failed; the document is unchanged.
    Failed(DashboardError),
}

impl CycleOutcome {
    /// Returns `true` for [`CycleOutcome::Applied`].
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Clears the in-flight flag when a cycle ends, however it ends.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Dashboard session bound to one backend.
#[derive(Debug)]
pub struct Dashboard {
    api: ApiClient,
    state: Arc<Mutex<DashboardState>>,
    bus: UiEventBus,
    poll_mode: PollMode,
    in_flight: AtomicBool,
}

impl Dashboard {
    /// Creates a dashboard for the backend in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Config`] if the HTTP client cannot be built.
    pub fn new(config: &DashboardConfig, bus: UiEventBus) -> Result<Self, DashboardError> {
        let api = ApiClient::new(config, bus.clone())?;
        Ok(Self {
            api,
            state: Arc::new(Mutex::new(DashboardState::new(config))),
            bus,
            poll_mode: config.poll_mode,
            in_flight: AtomicBool::new(false),
        })
    }

    /// Returns the UI bus.
    #[must_use]
    pub fn bus(&self) -> &UiEventBus {
        &self.bus
    }

    /// Returns the shared state.
    #[must_use]
    pub fn state(&self) -> &Arc<Mutex<DashboardState>> {
        &self.state
    }

    /// Returns a copy of the current document.
    pub async fn document(&self) -> Document {
        self.state.lock().await.document.clone()
    }

    /// Returns the current dialog.
    pub async fn dialog(&self) -> DialogState {
        self.state.lock().await.dialog.clone()
    }

    /// Renders the current document as text.
    pub async fn render_text(&self) -> String {
        self.state.lock().await.document.to_string()
    }

    /// Summarizes the last applied snapshot.
    pub async fn status(&self) -> SyncStatus {
        self.state.lock().await.status()
    }

    // -- polling --

    /// Runs one fetch-validate-render cycle.
    ///
    /// Returns [`CycleOutcome::Skipped`] if a cycle is already in flight.
    /// A failed fetch leaves the document untouched; its notice has already
    /// been published by the transport.
    pub async fn poll_cycle(&self) -> CycleOutcome {
        let Some(_guard) = InFlightGuard::try_acquire(&self.in_flight) else {
            tracing::debug!("poll skipped, previous cycle still in flight");
            return CycleOutcome::Skipped;
        };

        let generation = self.state.lock().await.file_generation;
        let snapshot = match self.fetch_snapshot().await {
            Ok(snapshot) => snapshot,
            Err(err) => return CycleOutcome::Failed(err),
        };

        let mut state = self.state.lock().await;
        let include_events = state.events_current(generation);
        if !include_events {
            tracing::debug!("event fragment discarded, event file loading or reloaded during fetch");
        }
        let revision = state.apply_snapshot(snapshot, include_events, Utc::now());
        drop(state);

        self.publish_rendered(revision);
        tracing::trace!(revision, "snapshot applied");
        CycleOutcome::Applied { revision }
    }

    async fn fetch_snapshot(&self) -> Result<Snapshot, DashboardError> {
        match self.poll_mode {
            PollMode::Consolidated => self.api.dashboard_update().await,
            PollMode::PerSection => {
                let (gps, cameras, events) = tokio::try_join!(
                    self.api.gps_section(),
                    self.api.cameras_section(),
                    self.api.events_section(),
                )?;
                Ok(Snapshot::from_sections(&gps, &cameras, &events))
            }
        }
    }

    fn publish_rendered(&self, revision: u64) {
        let _ = self.bus.publish(UiEvent::Rendered {
            revision,
            timestamp: Utc::now(),
        });
    }

    // -- event and sequence files --

    /// Lists event files and opens the file dialog.
    ///
    /// # Errors
    ///
    /// Returns any transport error; the dialog stays as it was.
    pub async fn open_event_files(&self) -> Result<Vec<String>, DashboardError> {
        self.open_file_dialog(FileTarget::Event).await
    }

    /// Lists camera sequence files and opens the file dialog.
    ///
    /// # Errors
    ///
    /// Returns any transport error; the dialog stays as it was.
    pub async fn open_sequence_files(&self) -> Result<Vec<String>, DashboardError> {
        self.open_file_dialog(FileTarget::Sequence).await
    }

    async fn open_file_dialog(&self, target: FileTarget) -> Result<Vec<String>, DashboardError> {
        let files = match target {
            FileTarget::Event => self.api.event_list().await?,
            FileTarget::Sequence => self.api.camera_sequence_list().await?,
        };
        if files.is_empty() {
            self.bus.notify(Notice::info("No files found."));
        }
        self.state
            .lock()
            .await
            .dispatch(DialogAction::Open(DialogKind::FileSelect {
                target,
                files: files.clone(),
            }));
        Ok(files)
    }

    /// Loads an event file: resets the event table, lists the file's events
    /// and runs an immediate poll.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::InvalidRequest`] for an empty name, or the
    /// load failure; the table then shows an error row.
    pub async fn select_event_file(&self, filename: &str) -> Result<(), DashboardError> {
        let filename = non_empty(filename, "event file name")?;

        let generation = {
            let mut state = self.state.lock().await;
            state.dispatch(DialogAction::Close);
            let generation = state.begin_event_file(filename);
            let revision = state.touch();
            drop(state);
            self.publish_rendered(revision);
            generation
        };
        tracing::info!(filename, generation, "loading event file");

        let result = self.api.event_load(filename).await;

        {
            let mut state = self.state.lock().await;
            if !state.end_event_file(generation, filename, &result) {
                tracing::debug!(filename, "event file load superseded");
                return result.map(|_| ());
            }
            let revision = state.touch();
            drop(state);
            self.publish_rendered(revision);
        }

        if result.is_ok() {
            let _ = self.poll_cycle().await;
        }
        result.map(|_| ())
    }

    /// Loads a camera sequence file and runs an immediate poll.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::InvalidRequest`] for an empty name, or the
    /// load failure.
    pub async fn select_sequence_file(&self, filename: &str) -> Result<Ack, DashboardError> {
        let filename = non_empty(filename, "sequence file name")?;
        self.state.lock().await.dispatch(DialogAction::Close);

        let ack = self.api.camera_sequence_load(filename).await?;
        tracing::info!(filename, "camera sequence loaded");

        let revision = {
            let mut state = self.state.lock().await;
            state.document.control.sequence_filename = Some(filename.to_string());
            state.touch()
        };
        self.publish_rendered(revision);
        let _ = self.poll_cycle().await;
        Ok(ack)
    }

    // -- optimistic edits --

    /// Opens the rename dialog for a camera, capturing its description.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::InvalidRequest`] if the camera is not shown.
    pub async fn open_rename(&self, serial: &str) -> Result<(), DashboardError> {
        let key = EntityKey::camera(serial, CameraField::Description);
        let mut state = self.state.lock().await;
        let current = state
            .cell_text(&key)
            .ok_or_else(|| DashboardError::InvalidRequest(format!("no camera {serial}")))?;
        state.dispatch(DialogAction::Open(DialogKind::Rename {
            serial: serial.to_string(),
            current: current.clone(),
        }));
        state.edits.begin(key, current, Utc::now());
        Ok(())
    }

    /// Confirms the rename dialog with `description` (trimmed).
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::NoActiveEdit`] if no rename dialog is open,
    /// or the backend failure after the cell has been rolled back.
    pub async fn confirm_rename(&self, description: &str) -> Result<(), DashboardError> {
        self.confirm_edit(description.trim(), |kind| {
            matches!(kind, DialogKind::Rename { .. })
        })
        .await
    }

    /// Opens the choice dialog for a camera property and fetches its values.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::InvalidRequest`] for a non-choice property
    /// or a camera that is not shown, or the `read_choices` failure, in
    /// which case the dialog is closed again.
    pub async fn open_choice(
        &self,
        serial: &str,
        field: CameraField,
    ) -> Result<Vec<String>, DashboardError> {
        if !field.is_choice() {
            return Err(DashboardError::InvalidRequest(format!(
                "{field} is not a choice property"
            )));
        }
        let key = EntityKey::camera(serial, field);
        let edit_id = {
            let mut state = self.state.lock().await;
            let current = state.cell_text(&key).ok_or_else(|| {
                DashboardError::InvalidRequest(format!("no editable {field} for camera {serial}"))
            })?;
            state.dispatch(DialogAction::Open(DialogKind::Choice {
                serial: serial.to_string(),
                field,
                current: current.clone(),
                choices: Vec::new(),
            }));
            state.edits.begin(key, current, Utc::now())
        };

        let result = self.api.read_choices(serial, field).await;

        let mut state = self.state.lock().await;
        let still_open = state.edits.editing().is_some_and(|e| e.edit_id == edit_id);
        match &result {
            Ok(choices) if still_open => state.dispatch(DialogAction::SetChoices(choices.clone())),
            Err(_) if still_open => state.dispatch(DialogAction::Close),
            _ => tracing::debug!(serial, %field, "choice dialog closed before values arrived"),
        }
        result
    }

    /// Confirms the choice dialog with `value`.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::NoActiveEdit`] if no choice dialog is open,
    /// or the backend failure after the cell has been rolled back.
    pub async fn confirm_choice(&self, value: &str) -> Result<(), DashboardError> {
        self.confirm_edit(value, |kind| matches!(kind, DialogKind::Choice { .. }))
            .await
    }

    /// Closes any dialog, abandoning its edit.
    pub async fn cancel_dialog(&self) {
        self.state.lock().await.dispatch(DialogAction::Close);
    }

    async fn confirm_edit(
        &self,
        value: &str,
        dialog_matches: impl Fn(&DialogKind) -> bool,
    ) -> Result<(), DashboardError> {
        let (edit, revision) = {
            let mut state = self.state.lock().await;
            if !state.dialog.kind().is_some_and(&dialog_matches) {
                return Err(DashboardError::NoActiveEdit);
            }
            let edit = state.edits.submit(value)?;
            state.dispatch(DialogAction::Close);
            state.write_cell(&edit.key, value, Highlight::Pending);
            (edit, state.touch())
        };
        self.publish_rendered(revision);

        let EntityKey::CameraField { serial, field } = &edit.key else {
            self.resolve_edit(&edit, false).await;
            return Err(DashboardError::InvalidRequest(format!(
                "{} is not editable",
                edit.key
            )));
        };
        tracing::info!(%serial, %field, value, "submitting edit");
        let result = match field {
            CameraField::Description => self.api.update_description(serial, value).await,
            field => self.api.set_choice(serial, *field, value).await,
        };

        self.resolve_edit(&edit, result.is_ok()).await;
        result.map(|_| ())
    }

    async fn resolve_edit(&self, edit: &PendingEdit, accepted: bool) {
        let mut state = self.state.lock().await;
        let Some((edit, outcome)) = state.edits.resolve(edit.edit_id, accepted, Utc::now()) else {
            return;
        };
        // A later submission on the same cell owns what it shows.
        if state.edits.pending_value(&edit.key).is_none() {
            match &outcome {
                EditOutcome::Confirmed => {
                    let value = edit.new_value.clone().unwrap_or_default();
                    state.write_cell(&edit.key, &value, Highlight::Confirmed);
                }
                EditOutcome::RolledBack { restore } => {
                    state.write_cell(&edit.key, restore, Highlight::None);
                }
            }
        }
        let revision = state.touch();
        drop(state);

        let _ = self.bus.publish(UiEvent::EditResolved {
            key: edit.key,
            confirmed: outcome == EditOutcome::Confirmed,
            timestamp: Utc::now(),
        });
        self.publish_rendered(revision);
    }

    // -- camera commands and simulation --

    /// Fires one exposure on a camera.
    ///
    /// # Errors
    ///
    /// Returns any transport error.
    pub async fn trigger_camera(&self, serial: &str) -> Result<Ack, DashboardError> {
        let serial = non_empty(serial, "camera serial")?;
        let ack = self.api.trigger(serial).await?;
        tracing::info!(serial, "camera triggered");
        Ok(ack)
    }

    /// Fetches default simulation parameters and opens the simulation
    /// dialog with them.
    ///
    /// # Errors
    ///
    /// Returns any transport error.
    pub async fn open_simulation(&self) -> Result<SimulationParams, DashboardError> {
        let defaults = self.api.run_sim_defaults().await?;
        let params = SimulationParams::from_defaults(&defaults);
        self.state
            .lock()
            .await
            .dispatch(DialogAction::Open(DialogKind::Simulation {
                params: params.clone(),
            }));
        Ok(params)
    }

    /// Starts a simulation and closes the simulation dialog.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::InvalidRequest`] for invalid parameters, or
    /// any transport error.
    pub async fn start_simulation(&self, params: &SimulationParams) -> Result<Ack, DashboardError> {
        if let Err(err) = params.validate() {
            self.bus.notify(Notice::failure(paths::RUN_SIM, &err));
            return Err(err);
        }
        let ack = self.api.run_sim(params).await?;
        self.state.lock().await.dispatch(DialogAction::Close);
        tracing::info!(event_id = %params.event_id, "simulation started");
        if let Some(message) = &ack.message {
            self.bus.notify(Notice::info(message.clone()));
        }
        Ok(ack)
    }

    /// Stops the running simulation.
    ///
    /// # Errors
    ///
    /// Returns any transport error.
    pub async fn stop_simulation(&self) -> Result<Ack, DashboardError> {
        let ack = self.api.run_sim_stop().await?;
        tracing::info!("simulation stopped");
        Ok(ack)
    }
}

fn non_empty<'a>(value: &'a str, what: &str) -> Result<&'a str, DashboardError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DashboardError::InvalidRequest(format!("{what} is empty")));
    }
    Ok(trimmed)
}
