//! HTTP transport wrapper.
//!
//! [`ApiClient`] is the only place the dashboard talks to the backend. It
//! turns every outcome into `Result<T, DashboardError>`:
//!
//! - network failures (including timeouts) become [`DashboardError::Network`];
//! - non-2xx statuses become [`DashboardError::HttpStatus`] with the best
//!   message the body offers;
//! - bodies that do not decode into the requested shape become
//!   [`DashboardError::Payload`].
//!
//! Each failed call publishes exactly one [`Notice`] on the UI bus before the
//! error is handed back to the caller.

use reqwest::{Method, StatusCode, Url};
use serde::Serialize;
use serde_json::Value;

use crate::config::DashboardConfig;
use crate::domain::{Notice, UiEventBus};
use crate::error::{DashboardError, ErrorResponse};

/// Normalizing HTTP client bound to one backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    bus: UiEventBus,
    error_body_max_chars: usize,
}

impl ApiClient {
    /// Creates a client for the backend named in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Config`] if the backend URL is invalid or
    /// the HTTP client cannot be built.
    pub fn new(config: &DashboardConfig, bus: UiEventBus) -> Result<Self, DashboardError> {
        let base = config.base_url()?;
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| DashboardError::Config(format!("http client: {e}")))?;
        Ok(Self {
            http,
            base,
            bus,
            error_body_max_chars: config.error_body_max_chars,
        })
    }

    /// `GET path`, decoded with `decode`.
    ///
    /// # Errors
    ///
    /// Returns any transport or decode failure; a notice has already been
    /// published when this returns `Err`.
    pub async fn get<T>(
        &self,
        path: &str,
        decode: impl FnOnce(Value) -> Result<T, DashboardError>,
    ) -> Result<T, DashboardError> {
        self.call(Method::GET, path, None::<&()>, None::<&()>, decode)
            .await
    }

    /// `GET path?query`, decoded with `decode`.
    ///
    /// # Errors
    ///
    /// Returns any transport or decode failure; a notice has already been
    /// published when this returns `Err`.
    pub async fn get_with_query<Q: Serialize + ?Sized, T>(
        &self,
        path: &str,
        query: &Q,
        decode: impl FnOnce(Value) -> Result<T, DashboardError>,
    ) -> Result<T, DashboardError> {
        self.call(Method::GET, path, Some(query), None::<&()>, decode)
            .await
    }

    /// `POST path` with a JSON body, decoded with `decode`.
    ///
    /// # Errors
    ///
    /// Returns any transport or decode failure; a notice has already been
    /// published when this returns `Err`.
    pub async fn post<B: Serialize + ?Sized, T>(
        &self,
        path: &str,
        body: &B,
        decode: impl FnOnce(Value) -> Result<T, DashboardError>,
    ) -> Result<T, DashboardError> {
        self.call(Method::POST, path, None::<&()>, Some(body), decode)
            .await
    }

    /// Performs a request and decodes it, publishing one notice on failure.
    async fn call<Q, B, T>(
        &self,
        method: Method,
        path: &str,
        query: Option<&Q>,
        body: Option<&B>,
        decode: impl FnOnce(Value) -> Result<T, DashboardError>,
    ) -> Result<T, DashboardError>
    where
        Q: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        let result = match self.execute(method, path, query, body).await {
            Ok(value) => decode(value),
            Err(err) => Err(err),
        };
        if let Err(err) = &result {
            tracing::debug!(path, error = %err, "request failed");
            self.bus.notify(Notice::failure(path, err));
        }
        result
    }

    /// Performs a request and normalizes the response into a JSON value.
    async fn execute<Q, B>(
        &self,
        method: Method,
        path: &str,
        query: Option<&Q>,
        body: Option<&B>,
    ) -> Result<Value, DashboardError>
    where
        Q: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        let url = self
            .base
            .join(path)
            .map_err(|e| DashboardError::InvalidRequest(format!("bad path {path:?}: {e}")))?;

        let mut request = self.http.request(method, url);
        if let Some(query) = query {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DashboardError::Network(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| DashboardError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(http_error(status, &text, self.error_body_max_chars));
        }
        Ok(parse_body(path, &text))
    }
}

/// Parses a 2xx body. Empty and non-JSON bodies become `{}`.
fn parse_body(path: &str, text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Object(serde_json::Map::new());
    }
    match serde_json::from_str(text) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(path, error = %err, "non-JSON success body treated as empty object");
            Value::Object(serde_json::Map::new())
        }
    }
}

/// Builds the error for a non-2xx response: JSON message first, then the
/// truncated text body, then the status itself.
fn http_error(status: StatusCode, text: &str, max_chars: usize) -> DashboardError {
    let from_json = serde_json::from_str::<ErrorResponse>(text)
        .ok()
        .and_then(ErrorResponse::into_message);

    let message = from_json
        .or_else(|| {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| truncate_chars(trimmed, max_chars))
        })
        .unwrap_or_else(|| status.to_string());

    DashboardError::HttpStatus {
        status: status.as_u16(),
        message,
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", text.get(..cut).unwrap_or(text)),
        None => text.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_body_is_empty_object() {
        assert_eq!(parse_body("/api/x", "  \n"), json!({}));
    }

    #[test]
    fn plain_text_body_is_empty_object() {
        assert_eq!(parse_body("/api/x", "OK"), json!({}));
    }

    #[test]
    fn json_body_is_kept() {
        assert_eq!(parse_body("/api/x", r#"["a.event"]"#), json!(["a.event"]));
    }

    #[test]
    fn http_error_prefers_json_message() {
        let err = http_error(
            StatusCode::BAD_REQUEST,
            r#"{"status":"error","message":"Missing serial or description"}"#,
            200,
        );
        let DashboardError::HttpStatus { status, message } = err else {
            panic!("expected http status error");
        };
        assert_eq!(status, 400);
        assert_eq!(message, "Missing serial or description");
    }

    #[test]
    fn http_error_truncates_text_body() {
        let body = "x".repeat(50);
        let DashboardError::HttpStatus { message, .. } =
            http_error(StatusCode::INTERNAL_SERVER_ERROR, &body, 10)
        else {
            panic!("expected http status error");
        };
        assert_eq!(message, "xxxxxxxxxx...");
    }

    #[test]
    fn http_error_falls_back_to_status() {
        let DashboardError::HttpStatus { message, .. } =
            http_error(StatusCode::SERVICE_UNAVAILABLE, "", 10)
        else {
            panic!("expected http status error");
        };
        assert_eq!(message, "503 Service Unavailable");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("ééé", 2), "éé...");
        assert_eq!(truncate_chars("abc", 3), "abc");
    }

    #[tokio::test]
    async fn unreachable_backend_notifies_once() {
        let bus = UiEventBus::new(16);
        let mut rx = bus.subscribe();
        let config = DashboardConfig {
            // Port 9 (discard) on localhost is closed on test machines.
            backend_url: "http://127.0.0.1:9".to_string(),
            request_timeout_ms: 500,
            ..DashboardConfig::default()
        };
        let Ok(client) = ApiClient::new(&config, bus) else {
            panic!("client must build");
        };

        let result = client.get("/api/gps", Ok).await;
        let Err(err) = result else {
            panic!("closed port must fail");
        };
        assert!(err.is_transport());

        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }
}
