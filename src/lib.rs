//! # eclipse-dashboard
//!
//! Headless dashboard client for an eclipse camera-control rig.
//!
//! The crate polls the rig's backend HTTP API, validates each response into
//! a typed [`api::dto::Snapshot`], and reconciles it into a retained
//! [`view::Document`] without rebuilding rows that already exist, without
//! leaking state across file reloads, and without clobbering optimistic
//! edits that are still in flight.
//!
//! ## Architecture
//!
//! ```text
//! Terminal front end (main.rs, console)
//!     │
//!     ├── Poller (service/)           fixed-period, cancellable
//!     ├── Dashboard (service/)        poll cycle + user operations
//!     │     ├── EditCoordinator       optimistic edits
//!     │     └── DashboardState        document, dialog, edits
//!     │
//!     ├── Renderers (render/)         gps, cameras, events, control
//!     ├── Document + RowCache (view/)
//!     │
//!     ├── ApiClient (api/)            normalized transport
//!     └── UiEventBus (domain/)        notices and render events
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod console;
pub mod domain;
pub mod error;
pub mod render;
pub mod service;
pub mod view;
