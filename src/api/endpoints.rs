//! Typed wrappers for each backend endpoint.

use std::collections::BTreeMap;

use serde_json::Value;

use super::ApiClient;
use super::dto::request_dto::{
    ChoiceQuery, ChoiceUpdate, DescriptionUpdate, FilenameRequest, TriggerRequest,
    parse_defaults, parse_name_list,
};
use super::dto::{Ack, EventLoadResponse, SimulationParams, Snapshot};
use super::paths;
use crate::domain::CameraField;
use crate::error::DashboardError;

impl ApiClient {
    /// Fetches and validates the consolidated snapshot.
    ///
    /// # Errors
    ///
    /// Returns a transport error, or [`DashboardError::Payload`] if the body
    /// is not an object.
    pub async fn dashboard_update(&self) -> Result<Snapshot, DashboardError> {
        self.get(paths::DASHBOARD_UPDATE, |v| Snapshot::from_value(&v))
            .await
    }

    /// Fetches the raw GPS section.
    ///
    /// # Errors
    ///
    /// Returns any transport error.
    pub async fn gps_section(&self) -> Result<Value, DashboardError> {
        self.get(paths::GPS, Ok).await
    }

    /// Fetches the raw camera section.
    ///
    /// # Errors
    ///
    /// Returns any transport error.
    pub async fn cameras_section(&self) -> Result<Value, DashboardError> {
        self.get(paths::CAMERAS, Ok).await
    }

    /// Fetches the raw event section.
    ///
    /// # Errors
    ///
    /// Returns any transport error.
    pub async fn events_section(&self) -> Result<Value, DashboardError> {
        self.get(paths::EVENTS, Ok).await
    }

    /// Lists the event files known to the backend.
    ///
    /// # Errors
    ///
    /// Returns a transport error, or a payload error if no list is returned.
    pub async fn event_list(&self) -> Result<Vec<String>, DashboardError> {
        self.get(paths::EVENT_LIST, |v| parse_name_list(&v)).await
    }

    /// Loads an event file and returns the event ids it declares.
    ///
    /// # Errors
    ///
    /// Returns a transport error, or a payload error if the backend reports
    /// an error status.
    pub async fn event_load(&self, filename: &str) -> Result<EventLoadResponse, DashboardError> {
        self.post(paths::EVENT_LOAD, &FilenameRequest { filename }, |v| {
            Ack::from_value(v.clone())?;
            Ok(serde_json::from_value(v).unwrap_or_default())
        })
        .await
    }

    /// Lists the camera sequence files.
    ///
    /// # Errors
    ///
    /// Returns a transport error, or a payload error if no list is returned.
    pub async fn camera_sequence_list(&self) -> Result<Vec<String>, DashboardError> {
        self.get(paths::CAMERA_SEQUENCE_LIST, |v| parse_name_list(&v))
            .await
    }

    /// Loads a camera sequence file.
    ///
    /// # Errors
    ///
    /// Returns any transport error or an error acknowledgement.
    pub async fn camera_sequence_load(&self, filename: &str) -> Result<Ack, DashboardError> {
        self.post(
            paths::CAMERA_SEQUENCE_LOAD,
            &FilenameRequest { filename },
            Ack::from_value,
        )
        .await
    }

    /// Renames a camera.
    ///
    /// # Errors
    ///
    /// Returns any transport error or an error acknowledgement.
    pub async fn update_description(
        &self,
        serial: &str,
        description: &str,
    ) -> Result<Ack, DashboardError> {
        self.post(
            paths::UPDATE_DESCRIPTION,
            &DescriptionUpdate {
                serial,
                description,
            },
            Ack::from_value,
        )
        .await
    }

    /// Lists the values a camera property can take.
    ///
    /// # Errors
    ///
    /// Returns a transport error, or a payload error if no list is returned.
    pub async fn read_choices(
        &self,
        serial: &str,
        field: CameraField,
    ) -> Result<Vec<String>, DashboardError> {
        let query = ChoiceQuery {
            serial,
            property: field.wire_name(),
        };
        self.post(paths::READ_CHOICES, &query, |v| {
            Ack::from_value(v.clone())?;
            parse_name_list(&v)
        })
        .await
    }

    /// Sets a camera property.
    ///
    /// # Errors
    ///
    /// Returns any transport error or an error acknowledgement.
    pub async fn set_choice(
        &self,
        serial: &str,
        field: CameraField,
        value: &str,
    ) -> Result<Ack, DashboardError> {
        let update = ChoiceUpdate {
            serial,
            property: field.wire_name(),
            value,
        };
        self.post(paths::SET_CHOICE, &update, Ack::from_value).await
    }

    /// Fires one exposure on a camera.
    ///
    /// # Errors
    ///
    /// Returns any transport error or an error acknowledgement.
    pub async fn trigger(&self, serial: &str) -> Result<Ack, DashboardError> {
        self.post(paths::TRIGGER, &TriggerRequest { serial }, Ack::from_value)
            .await
    }

    /// Fetches the default simulation parameters.
    ///
    /// # Errors
    ///
    /// Returns a transport error, or a payload error if the body is not an
    /// object.
    pub async fn run_sim_defaults(&self) -> Result<BTreeMap<String, String>, DashboardError> {
        self.get(paths::RUN_SIM_DEFAULTS, |v| parse_defaults(&v))
            .await
    }

    /// Starts a simulation.
    ///
    /// # Errors
    ///
    /// Returns any transport error or an error acknowledgement.
    pub async fn run_sim(&self, params: &SimulationParams) -> Result<Ack, DashboardError> {
        self.get_with_query(paths::RUN_SIM, params, Ack::from_value)
            .await
    }

    /// Stops the running simulation.
    ///
    /// # Errors
    ///
    /// Returns any transport error or an error acknowledgement.
    pub async fn run_sim_stop(&self) -> Result<Ack, DashboardError> {
        self.get(paths::RUN_SIM_STOP, Ack::from_value).await
    }
}
