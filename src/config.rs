//! Dashboard configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Every key is prefixed `DASHBOARD_`.

use std::time::Duration;

use crate::error::DashboardError;

/// How a poll cycle gathers its snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollMode {
    /// One `GET /api/dashboard_update` per cycle.
    #[default]
    Consolidated,
    /// Separate `GET /api/gps`, `/api/cameras` and `/api/events` per cycle,
    /// for backends that predate the consolidated endpoint.
    PerSection,
}

impl std::str::FromStr for PollMode {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "consolidated" => Ok(Self::Consolidated),
            "per_section" | "per-section" => Ok(Self::PerSection),
            other => Err(DashboardError::Config(format!("unknown poll mode {other:?}"))),
        }
    }
}

/// Top-level dashboard configuration.
///
/// Loaded once at startup via [`DashboardConfig::from_env`].
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Base URL of the backend (e.g. `http://raspberrypi.local:5000`).
    pub backend_url: String,

    /// Milliseconds between poll ticks.
    pub poll_interval_ms: u64,

    /// Snapshot source used by each poll cycle.
    pub poll_mode: PollMode,

    /// Per-request timeout in milliseconds.
    pub request_timeout_ms: u64,

    /// How long a confirmed edit stays highlighted.
    pub confirm_highlight_ms: u64,

    /// Maximum characters of a non-JSON error body kept in a notice.
    pub error_body_max_chars: usize,

    /// Capacity of the UI event broadcast channel.
    pub ui_bus_capacity: usize,

    /// Whether the binary prints the document after each applied cycle.
    pub print_document: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:5000".to_string(),
            poll_interval_ms: 1000,
            poll_mode: PollMode::Consolidated,
            request_timeout_ms: 5000,
            confirm_highlight_ms: 1500,
            error_body_max_chars: 200,
            ui_bus_capacity: 1024,
            print_document: true,
        }
    }
}

impl DashboardConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to the [`Default`] values when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Config`] if `DASHBOARD_BACKEND_URL` or
    /// `DASHBOARD_POLL_MODE` cannot be parsed, or if the poll interval is
    /// zero.
    pub fn from_env() -> Result<Self, DashboardError> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let backend_url =
            std::env::var("DASHBOARD_BACKEND_URL").unwrap_or(defaults.backend_url);

        let poll_mode = match std::env::var("DASHBOARD_POLL_MODE") {
            Ok(raw) => raw.parse()?,
            Err(_) => defaults.poll_mode,
        };

        let config = Self {
            backend_url,
            poll_interval_ms: parse_env("DASHBOARD_POLL_INTERVAL_MS", defaults.poll_interval_ms),
            poll_mode,
            request_timeout_ms: parse_env(
                "DASHBOARD_REQUEST_TIMEOUT_MS",
                defaults.request_timeout_ms,
            ),
            confirm_highlight_ms: parse_env(
                "DASHBOARD_CONFIRM_HIGHLIGHT_MS",
                defaults.confirm_highlight_ms,
            ),
            error_body_max_chars: parse_env(
                "DASHBOARD_ERROR_BODY_MAX_CHARS",
                defaults.error_body_max_chars,
            ),
            ui_bus_capacity: parse_env("DASHBOARD_UI_BUS_CAPACITY", defaults.ui_bus_capacity),
            print_document: parse_env_bool("DASHBOARD_PRINT_DOCUMENT", defaults.print_document),
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Config`] when the backend URL does not
    /// parse, or the poll interval or the bus capacity is zero.
    pub fn validate(&self) -> Result<(), DashboardError> {
        self.base_url()?;
        if self.poll_interval_ms == 0 {
            return Err(DashboardError::Config(
                "DASHBOARD_POLL_INTERVAL_MS must be positive".to_string(),
            ));
        }
        if self.ui_bus_capacity == 0 {
            return Err(DashboardError::Config(
                "DASHBOARD_UI_BUS_CAPACITY must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Parsed backend base URL.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Config`] if `backend_url` is not an
    /// absolute HTTP(S) URL.
    pub fn base_url(&self) -> Result<reqwest::Url, DashboardError> {
        let url = reqwest::Url::parse(&self.backend_url)
            .map_err(|e| DashboardError::Config(format!("DASHBOARD_BACKEND_URL: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(DashboardError::Config(format!(
                "DASHBOARD_BACKEND_URL: unsupported scheme {:?}",
                url.scheme()
            )));
        }
        Ok(url)
    }

    /// Poll period as a [`Duration`].
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Request timeout as a [`Duration`].
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Confirmation highlight lifetime as a [`chrono::Duration`].
    #[must_use]
    pub fn confirm_highlight(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(i64::try_from(self.confirm_highlight_ms).unwrap_or(i64::MAX))
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses an environment variable as a boolean. Accepts `"true"`, `"1"`,
/// `"false"`, `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key).ok().as_deref() {
        Some("true") | Some("TRUE") | Some("1") => true,
        Some("false") | Some("FALSE") | Some("0") => false,
        _ => default,
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_backend() {
        let config = DashboardConfig::default();
        let Ok(url) = config.base_url() else {
            panic!("default url must parse");
        };
        assert_eq!(url.as_str(), "http://127.0.0.1:5000/");
        assert_eq!(config.poll_interval(), Duration::from_millis(1000));
        assert_eq!(config.poll_mode, PollMode::Consolidated);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn poll_mode_parses_both_spellings() {
        assert_eq!("per_section".parse::<PollMode>().ok(), Some(PollMode::PerSection));
        assert_eq!("Per-Section".parse::<PollMode>().ok(), Some(PollMode::PerSection));
        assert_eq!(
            " consolidated ".parse::<PollMode>().ok(),
            Some(PollMode::Consolidated)
        );
        assert!("sometimes".parse::<PollMode>().is_err());
    }

    #[test]
    fn zero_interval_is_rejected() {
        let config = DashboardConfig {
            poll_interval_ms: 0,
            ..DashboardConfig::default()
        };
        let Err(err) = config.validate() else {
            panic!("zero interval must be rejected");
        };
        assert!(matches!(err, DashboardError::Config(_)));
    }

    #[test]
    fn non_http_backend_is_rejected() {
        let config = DashboardConfig {
            backend_url: "ftp://camera.local".to_string(),
            ..DashboardConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn highlight_duration_converts() {
        let config = DashboardConfig {
            confirm_highlight_ms: 250,
            ..DashboardConfig::default()
        };
        assert_eq!(config.confirm_highlight(), chrono::Duration::milliseconds(250));
    }
}
