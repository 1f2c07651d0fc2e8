// crates/pve-bridge-client/src/client.rs
// ============================================================================
// Module: Request Engine
// Description: HTTP verbs, failure classification, and envelope unwrapping.
// Purpose: Normalize every backend interaction behind the HypervisorApi seam.
// Dependencies: pve-bridge-core, pve-bridge-config, reqwest, serde_json
// ============================================================================

//! ## Overview
//! One [`ApiClient`] serves the whole process. Construction derives the
//! static `PVEAPIToken` authorization header from the configured credential
//! id and secret and applies the TLS-verification toggle; nothing about the
//! client mutates afterwards, so concurrent calls share it freely.
//!
//! ## Invariants
//! - Every failure detail string is sanitized before an [`ApiError`] is
//!   constructed.
//! - Timeouts surface as [`ApiError::Connection`], indistinguishable in kind
//!   from network failures.
//! - The `{"data": ...}` envelope is unwrapped identically for all four
//!   verbs.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pve_bridge_config::BridgeConfig;
use pve_bridge_core::ApiError;
use pve_bridge_core::HypervisorApi;
use pve_bridge_core::SecretRegistry;
use reqwest::Method;
use reqwest::StatusCode;
use reqwest::header;
use serde_json::Value;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Hard per-request timeout applied to every backend call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Version-information endpoint used by connection validation.
const VERSION_PATH: &str = "/version";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failure raised while constructing the request engine.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    /// The configured API root is not a usable URL.
    #[error("invalid api url: {0}")]
    InvalidUrl(String),
    /// The underlying HTTP client could not be constructed.
    #[error("http client construction failed: {0}")]
    Http(String),
}

// ============================================================================
// SECTION: API Client
// ============================================================================

/// Authenticated request engine for the Proxmox VE REST API.
///
/// # Invariants
/// - The authorization header is computed once at construction and reused
///   for every call; there is no per-call credential lookup.
pub struct ApiClient {
    /// Underlying HTTP client with the fixed timeout applied.
    http: reqwest::Client,
    /// API root with no trailing slash.
    base: String,
    /// Precomputed `PVEAPIToken=<id>=<secret>` header value.
    auth_header: String,
    /// Process-wide secret registry used to scrub failure text.
    secrets: Arc<SecretRegistry>,
}

impl ApiClient {
    /// Builds the engine from validated configuration.
    ///
    /// The TLS-verification toggle is applied here, before any request is
    /// issued; the engine performs no further certificate logic.
    ///
    /// # Errors
    ///
    /// Returns [`ClientBuildError`] when the URL is malformed or the HTTP
    /// client cannot be constructed.
    pub fn from_config(
        config: &BridgeConfig,
        secrets: Arc<SecretRegistry>,
    ) -> Result<Self, ClientBuildError> {
        Self::with_request_timeout(config, secrets, REQUEST_TIMEOUT)
    }

    /// Builds the engine with an explicit per-request timeout.
    ///
    /// Production callers go through [`ApiClient::from_config`], which fixes
    /// the timeout at [`REQUEST_TIMEOUT`]; an explicit duration keeps the
    /// timeout-classification behavior exercisable against stub backends.
    ///
    /// # Errors
    ///
    /// Returns [`ClientBuildError`] when the URL is malformed or the HTTP
    /// client cannot be constructed.
    pub fn with_request_timeout(
        config: &BridgeConfig,
        secrets: Arc<SecretRegistry>,
        timeout: Duration,
    ) -> Result<Self, ClientBuildError> {
        let url = Url::parse(&config.api_url)
            .map_err(|err| ClientBuildError::InvalidUrl(err.to_string()))?;
        let base = url.as_str().trim_end_matches('/').to_string();
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()
            .map_err(|err| ClientBuildError::Http(err.to_string()))?;
        let auth_header = format!("PVEAPIToken={}={}", config.token_id, config.token_secret);
        Ok(Self {
            http,
            base,
            auth_header,
            secrets,
        })
    }

    /// Validates backend connectivity and credentials once at startup.
    ///
    /// Issues a single GET against the version endpoint. Authentication
    /// rejections (401/403) surface as [`ApiError::Auth`]; every other
    /// failure is reported as a generic connectivity failure. Success logs
    /// the reported backend version.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the backend is unreachable or rejects the
    /// configured credentials. Callers must treat this as fatal.
    pub async fn validate_connection(&self) -> Result<(), ApiError> {
        match self.get(VERSION_PATH).await {
            Ok(value) => {
                let version =
                    value.get("version").and_then(Value::as_str).unwrap_or("unknown");
                tracing::info!(version, "connected to Proxmox VE API");
                Ok(())
            }
            Err(err) if err.is_auth() => Err(err),
            Err(err @ ApiError::Connection {
                ..
            }) => Err(err),
            Err(other) => Err(ApiError::Connection {
                detail: other.to_string(),
            }),
        }
    }

    /// Issues one request and normalizes the response.
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        let url = self.url_for(path);
        let mut builder = self
            .http
            .request(method, &url)
            .header(header::AUTHORIZATION, self.auth_header.as_str());
        if let Some(body) = &body {
            builder = builder.json(body);
        }
        let response = builder.send().await.map_err(|err| self.send_error(&err))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(self.status_error(status, &body));
        }
        let json_body = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.contains("application/json"));
        let text = response.text().await.map_err(|err| self.send_error(&err))?;
        if !json_body {
            if text.is_empty() {
                return Ok(Value::Null);
            }
            return Ok(Value::String(text));
        }
        let value: Value = serde_json::from_str(&text).map_err(|_| ApiError::Response {
            detail: "response body is not valid json".to_string(),
        })?;
        Ok(unwrap_envelope(value))
    }

    /// Builds the absolute URL for an API path.
    fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base)
        } else {
            format!("{}/{path}", self.base)
        }
    }

    /// Classifies a transport-level send failure.
    ///
    /// Timeouts and network failures are deliberately the same kind.
    fn send_error(&self, err: &reqwest::Error) -> ApiError {
        tracing::debug!(error = %self.secrets.sanitize(&err.to_string()), "request failed");
        let detail = if err.is_timeout() {
            "request timed out".to_string()
        } else {
            self.secrets.sanitize(&err.to_string())
        };
        ApiError::Connection {
            detail,
        }
    }

    /// Classifies a non-success HTTP status.
    fn status_error(&self, status: StatusCode, body: &str) -> ApiError {
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return ApiError::Auth {
                status: status.as_u16(),
            };
        }
        ApiError::Status {
            status: status.as_u16(),
            detail: self.secrets.sanitize(&error_detail(status, body)),
        }
    }
}

// ============================================================================
// SECTION: Response Normalization
// ============================================================================

/// Unwraps the backend response envelope.
///
/// An object carrying a `data` field yields that field's value; any other
/// shape is returned unchanged. Applied uniformly across all four verbs.
fn unwrap_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut map) => match map.remove("data") {
            Some(data) => data,
            None => Value::Object(map),
        },
        other => other,
    }
}

/// Extracts structured error detail from a failure body.
///
/// Falls back to the bare status line when the body carries no parseable
/// `errors` object.
fn error_detail(status: StatusCode, body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    if let Some(errors) =
        parsed.as_ref().and_then(|value| value.get("errors")).and_then(Value::as_object)
        && !errors.is_empty()
    {
        let pairs = errors
            .iter()
            .map(|(field, message)| {
                let message = message.as_str().map_or_else(|| message.to_string(), str::to_string);
                format!("{field}: {message}")
            })
            .collect::<Vec<_>>();
        return pairs.join("; ");
    }
    status.to_string()
}

// ============================================================================
// SECTION: HypervisorApi Implementation
// ============================================================================

#[async_trait]
impl HypervisorApi for ApiClient {
    async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.request(Method::GET, path, None).await
    }

    async fn post(&self, path: &str, body: Option<Value>) -> Result<Value, ApiError> {
        self.request(Method::POST, path, body).await
    }

    async fn put(&self, path: &str, body: Option<Value>) -> Result<Value, ApiError> {
        self.request(Method::PUT, path, body).await
    }

    async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        self.request(Method::DELETE, path, None).await
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        reason = "Test-only assertions favor direct unwrap/expect for clarity."
    )]

    use serde_json::json;

    use super::error_detail;
    use super::unwrap_envelope;

    #[test]
    fn envelope_with_data_field_is_unwrapped() {
        assert_eq!(unwrap_envelope(json!({"data": {"foo": 1}})), json!({"foo": 1}));
        assert_eq!(unwrap_envelope(json!({"data": null})), json!(null));
    }

    #[test]
    fn non_envelope_values_pass_through() {
        assert_eq!(unwrap_envelope(json!([1, 2, 3])), json!([1, 2, 3]));
        assert_eq!(unwrap_envelope(json!({"foo": 1})), json!({"foo": 1}));
        assert_eq!(unwrap_envelope(json!("plain")), json!("plain"));
    }

    #[test]
    fn error_detail_extracts_field_messages() {
        let body = r#"{"errors": {"vmid": "invalid format"}}"#;
        let detail = error_detail(reqwest::StatusCode::BAD_REQUEST, body);
        assert_eq!(detail, "vmid: invalid format");
    }

    #[test]
    fn error_detail_falls_back_to_status_line() {
        let detail = error_detail(reqwest::StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        assert!(detail.contains("500"));
    }
}
