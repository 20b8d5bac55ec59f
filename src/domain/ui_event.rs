//! Events published to front ends.
//!
//! Every user-visible notice and every applied render goes through the
//! [`super::UiEventBus`] as a [`UiEvent`].

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::EntityKey;
use crate::error::{DashboardError, ErrorKind};

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    /// Informational (e.g. a confirmed edit).
    Info,
    /// A request failed.
    Error,
}

/// User-visible notification.
#[derive(Debug, Clone, Serialize)]
pub struct Notice {
    /// Unique notice id (UUID v4).
    pub id: uuid::Uuid,
    /// Severity.
    pub level: NoticeLevel,
    /// Backend path the notice relates to, if any.
    pub path: Option<String>,
    /// Human-readable text.
    pub message: String,
    /// Creation timestamp.
    pub timestamp: DateTime<Utc>,
}

impl Notice {
    /// Builds an error notice for a failed call to `path`.
    #[must_use]
    pub fn failure(path: &str, err: &DashboardError) -> Self {
        let prefix = match err.kind() {
            ErrorKind::Network => "Connection problem",
            ErrorKind::HttpStatus => "Request rejected",
            ErrorKind::Payload => "Unexpected response",
            ErrorKind::Local => "Request not sent",
        };
        Self {
            id: uuid::Uuid::new_v4(),
            level: NoticeLevel::Error,
            path: Some(path.to_string()),
            message: format!("{prefix} ({path}): {err}"),
            timestamp: Utc::now(),
        }
    }

    /// Builds an informational notice.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            level: NoticeLevel::Info,
            path: None,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Event broadcast to every front-end subscriber.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum UiEvent {
    /// Something the user should see.
    Notice(Notice),

    /// A snapshot was applied to the document.
    Rendered {
        /// Document revision after the render.
        revision: u64,
        /// Render timestamp.
        timestamp: DateTime<Utc>,
    },

    /// An optimistic edit resolved.
    EditResolved {
        /// Entity the edit targeted.
        key: EntityKey,
        /// Whether the backend accepted it.
        confirmed: bool,
        /// Resolution timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl UiEvent {
    /// Returns the event type as a static string.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::Notice(_) => "notice",
            Self::Rendered { .. } => "rendered",
            Self::EditResolved { .. } => "edit_resolved",
        }
    }
}
