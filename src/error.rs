//! Dashboard error types with failure-category mapping.
//!
//! [`DashboardError`] is the central error type for the client. Every
//! transport failure is normalized into one of its variants at the
//! [`crate::api::ApiClient`] boundary, and each variant maps to one
//! [`ErrorKind`] of the failure taxonomy.

use serde::Deserialize;

/// Failure taxonomy used for notices and logging.
///
/// | Kind         | Raised by                                        |
/// |--------------|--------------------------------------------------|
/// | `Network`    | connection refused, DNS, timeout, broken body    |
/// | `HttpStatus` | any non-2xx response                             |
/// | `Payload`    | body decoded but not the expected structure      |
/// | `Local`      | configuration or misuse of a dashboard operation |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request never produced a response.
    Network,
    /// The backend answered with a non-2xx status.
    HttpStatus,
    /// The response body did not match the expected schema.
    Payload,
    /// Error raised locally, without talking to the backend.
    Local,
}

/// Error body shapes the backend is known to return on failure.
///
/// The camera backend answers `{"status":"error","message":"..."}` while
/// gateway-style services nest the payload as `{"error":{"message":"..."}}`.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    /// Top-level human-readable message.
    #[serde(default)]
    pub message: Option<String>,
    /// Nested error body.
    #[serde(default)]
    pub error: Option<ErrorBody>,
}

/// Nested error body with a human-readable message.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    /// Human-readable error message.
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorResponse {
    /// Returns the most specific message carried by the body, if any.
    #[must_use]
    pub fn into_message(self) -> Option<String> {
        self.message
            .or_else(|| self.error.and_then(|e| e.message))
            .filter(|m| !m.trim().is_empty())
    }
}

/// Client-side error enum.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// The request failed before a response was read.
    #[error("network error: {0}")]
    Network(String),

    /// The backend returned a non-2xx status.
    #[error("HTTP {status}: {message}")]
    HttpStatus {
        /// Numeric HTTP status code.
        status: u16,
        /// Message extracted from the body, or the status text.
        message: String,
    },

    /// The response body could not be decoded into the expected shape.
    #[error("malformed payload: {0}")]
    Payload(String),

    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A dashboard operation was called with invalid arguments.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A dialog confirm arrived with no edit in the `Editing` phase.
    #[error("no edit is in progress")]
    NoActiveEdit,
}

impl DashboardError {
    /// Returns the taxonomy bucket for this variant.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Network(_) => ErrorKind::Network,
            Self::HttpStatus { .. } => ErrorKind::HttpStatus,
            Self::Payload(_) => ErrorKind::Payload,
            Self::Config(_) | Self::InvalidRequest(_) | Self::NoActiveEdit => ErrorKind::Local,
        }
    }

    /// Returns `true` if the error came from talking to the backend.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        !matches!(self.kind(), ErrorKind::Local)
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Payload(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}
