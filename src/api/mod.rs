//! Backend API layer: transport client, endpoint wrappers and payload DTOs.
//!
//! Every backend path the dashboard uses is listed in [`paths`].

pub mod client;
pub mod dto;
pub mod endpoints;

pub use client::ApiClient;

/// Backend endpoint paths.
pub mod paths {
    /// Consolidated snapshot.
    pub const DASHBOARD_UPDATE: &str = "/api/dashboard_update";
    /// GPS section (earlier backends).
    pub const GPS: &str = "/api/gps";
    /// Camera section (earlier backends).
    pub const CAMERAS: &str = "/api/cameras";
    /// Event section (earlier backends).
    pub const EVENTS: &str = "/api/events";
    /// Event-file names.
    pub const EVENT_LIST: &str = "/api/event_list";
    /// Loads an event file.
    pub const EVENT_LOAD: &str = "/api/event_load";
    /// Camera sequence-file names.
    pub const CAMERA_SEQUENCE_LIST: &str = "/api/camera_sequence_list";
    /// Loads a camera sequence file.
    pub const CAMERA_SEQUENCE_LOAD: &str = "/api/camera_sequence_load";
    /// Renames a camera.
    pub const UPDATE_DESCRIPTION: &str = "/api/camera/update_description";
    /// Lists the selectable values of a camera property.
    pub const READ_CHOICES: &str = "/api/camera/read_choices";
    /// Sets a camera property.
    pub const SET_CHOICE: &str = "/api/camera/set_choice";
    /// Fires a camera.
    pub const TRIGGER: &str = "/api/camera/trigger";
    /// Default simulation parameters.
    pub const RUN_SIM_DEFAULTS: &str = "/api/run_sim/defaults";
    /// Starts a simulation.
    pub const RUN_SIM: &str = "/api/run_sim";
    /// Stops the running simulation.
    pub const RUN_SIM_STOP: &str = "/api/run_sim/stop";
}
