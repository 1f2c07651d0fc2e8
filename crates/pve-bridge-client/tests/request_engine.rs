// crates/pve-bridge-client/tests/request_engine.rs
// ============================================================================
// Module: Request Engine Tests
// Description: Backend call lifecycle against a local HTTP stub.
// Purpose: Validate auth header reuse, envelope unwrapping, failure
//          classification, and credential redaction.
// Dependencies: pve-bridge-client, pve-bridge-core, tiny_http, tokio
// ============================================================================

//! ## Overview
//! Exercises the request engine against `tiny_http` stub servers: envelope
//! unwrapping across verbs, empty and non-JSON bodies, structured error
//! bodies, authentication classification, connection failures, and the
//! guarantee that registered credentials never appear in failure text.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test-only assertions favor direct unwrap/expect for clarity."
)]

use std::net::TcpListener;
use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use pve_bridge_client::ApiClient;
use pve_bridge_client::REQUEST_TIMEOUT;
use pve_bridge_config::BridgeConfig;
use pve_bridge_config::ServerTransport;
use pve_bridge_core::ApiError;
use pve_bridge_core::HypervisorApi;
use pve_bridge_core::REDACTION_MARKER;
use pve_bridge_core::SecretRegistry;
use serde_json::Value;
use serde_json::json;
use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;

// ============================================================================
// SECTION: Test Helpers
// ============================================================================

/// Token secret used by every test client.
const TOKEN_SECRET: &str = "f4d2a9e1-7b3c-4d5e-8f90-112233445566";

/// Builds a client pointed at the given local address, with the credentials
/// registered for redaction.
fn client_for(addr: &str) -> ApiClient {
    client_with_timeout(addr, REQUEST_TIMEOUT)
}

/// Like [`client_for`] but with an explicit per-request timeout.
fn client_with_timeout(addr: &str, timeout: Duration) -> ApiClient {
    let config = BridgeConfig {
        api_url: format!("http://{addr}"),
        token_id: "root@pam!bridge".to_string(),
        token_secret: TOKEN_SECRET.to_string(),
        access_tier: pve_bridge_core::AccessTier::Full,
        categories: Vec::new(),
        verify_tls: true,
        transport: ServerTransport::Stdio,
        bind: None,
        max_body_bytes: 1024 * 1024,
    };
    let secrets = Arc::new(SecretRegistry::new());
    secrets.register(config.token_id.clone());
    secrets.register(config.token_secret.clone());
    ApiClient::with_request_timeout(&config, secrets, timeout).unwrap()
}

/// Captured request metadata forwarded from the stub server.
struct CapturedRequest {
    /// Authorization header value, when present.
    authorization: Option<String>,
    /// Raw request body.
    body: String,
}

/// Serves exactly one request with the given status/body/content-type and
/// reports what the server saw.
fn serve_one(
    status: u16,
    body: &'static str,
    content_type: Option<&'static str>,
) -> (String, mpsc::Receiver<CapturedRequest>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap().to_string();
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        if let Ok(mut request) = server.recv() {
            let authorization = request
                .headers()
                .iter()
                .find(|header| header.field.equiv("Authorization"))
                .map(|header| header.value.as_str().to_string());
            let mut body_in = String::new();
            let _ = request.as_reader().read_to_string(&mut body_in);
            let _ = tx.send(CapturedRequest {
                authorization,
                body: body_in,
            });
            let mut response = Response::from_string(body).with_status_code(status);
            if let Some(content_type) = content_type {
                let header =
                    Header::from_bytes(&b"Content-Type"[..], content_type.as_bytes()).unwrap();
                response = response.with_header(header);
            }
            let _ = request.respond(response);
        }
    });
    (addr, rx)
}

// ============================================================================
// SECTION: Response Normalization
// ============================================================================

#[tokio::test]
async fn get_unwraps_data_envelope() {
    let (addr, _rx) = serve_one(200, r#"{"data": {"foo": 1}}"#, Some("application/json"));
    let client = client_for(&addr);
    let value = client.get("/nodes").await.unwrap();
    assert_eq!(value, json!({"foo": 1}));
}

#[tokio::test]
async fn bare_json_array_passes_through() {
    let (addr, _rx) = serve_one(200, "[1, 2, 3]", Some("application/json"));
    let client = client_for(&addr);
    let value = client.get("/nodes").await.unwrap();
    assert_eq!(value, json!([1, 2, 3]));
}

#[tokio::test]
async fn empty_non_json_body_returns_null() {
    let (addr, _rx) = serve_one(200, "", Some("text/plain"));
    let client = client_for(&addr);
    let value = client.delete("/nodes/pve1/tasks/UPID").await.unwrap();
    assert_eq!(value, Value::Null);
}

#[tokio::test]
async fn non_json_body_returns_raw_text() {
    let (addr, _rx) = serve_one(200, "plain task log line", Some("text/plain"));
    let client = client_for(&addr);
    let value = client.get("/nodes/pve1/tasks/UPID/log").await.unwrap();
    assert_eq!(value, Value::String("plain task log line".to_string()));
}

#[tokio::test]
async fn put_unwraps_envelope_like_get() {
    let (addr, _rx) = serve_one(200, r#"{"data": null}"#, Some("application/json"));
    let client = client_for(&addr);
    let value = client.put("/nodes/pve1/network", Some(json!({}))).await.unwrap();
    assert_eq!(value, Value::Null);
}

// ============================================================================
// SECTION: Request Construction
// ============================================================================

#[tokio::test]
async fn static_auth_header_is_attached() {
    let (addr, rx) = serve_one(200, r#"{"data": []}"#, Some("application/json"));
    let client = client_for(&addr);
    client.get("/nodes").await.unwrap();
    let captured = rx.recv().unwrap();
    assert_eq!(
        captured.authorization.as_deref(),
        Some(format!("PVEAPIToken=root@pam!bridge={TOKEN_SECRET}").as_str())
    );
}

#[tokio::test]
async fn post_serializes_json_body() {
    let (addr, rx) = serve_one(200, r#"{"data": null}"#, Some("application/json"));
    let client = client_for(&addr);
    client.post("/nodes/pve1/qemu", Some(json!({"vmid": 100}))).await.unwrap();
    let captured = rx.recv().unwrap();
    assert!(captured.body.contains("\"vmid\":100"));
}

// ============================================================================
// SECTION: Failure Classification
// ============================================================================

#[tokio::test]
async fn forbidden_status_classifies_as_authentication_failure() {
    let (addr, _rx) = serve_one(403, r#"{"data": null}"#, Some("application/json"));
    let client = client_for(&addr);
    let err = client.get("/nodes").await.unwrap_err();
    assert!(err.is_auth());
    assert_eq!(err.status(), Some(403));
    assert!(err.to_string().contains("authentication"));
}

#[tokio::test]
async fn structured_error_body_is_appended_to_detail() {
    let (addr, _rx) = serve_one(
        400,
        r#"{"errors": {"vmid": "invalid format - 'abc'"}}"#,
        Some("application/json"),
    );
    let client = client_for(&addr);
    let err = client.post("/nodes/pve1/qemu", Some(json!({}))).await.unwrap_err();
    match err {
        ApiError::Status {
            status,
            ref detail,
        } => {
            assert_eq!(status, 400);
            assert!(detail.contains("vmid: invalid format"));
        }
        other => panic!("expected status error, got {other}"),
    }
}

#[tokio::test]
async fn unparseable_error_body_falls_back_to_status_line() {
    let (addr, _rx) = serve_one(500, "<html>boom</html>", Some("text/html"));
    let client = client_for(&addr);
    let err = client.get("/nodes").await.unwrap_err();
    match err {
        ApiError::Status {
            status,
            ref detail,
        } => {
            assert_eq!(status, 500);
            assert!(detail.contains("500"));
        }
        other => panic!("expected status error, got {other}"),
    }
}

#[tokio::test]
async fn unreachable_backend_classifies_as_connection_failure() {
    // Reserve a port, then close it so the connection is refused.
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    drop(listener);
    let client = client_for(&addr);
    let err = client.get("/nodes").await.unwrap_err();
    assert!(matches!(err, ApiError::Connection { .. }));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn stalled_backend_classifies_as_connection_failure() {
    // The stub accepts the request and then sits on it past the client's
    // per-request timeout before answering.
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap().to_string();
    let handle = thread::spawn(move || {
        if let Ok(request) = server.recv() {
            thread::sleep(Duration::from_millis(1500));
            let _ = request.respond(Response::from_string(r#"{"data": []}"#));
        }
    });
    let client = client_with_timeout(&addr, Duration::from_millis(200));
    let err = client.get("/nodes").await.unwrap_err();
    assert!(matches!(err, ApiError::Connection { .. }));
    assert_eq!(err.status(), None);
    assert!(err.to_string().contains("request timed out"));
    let _ = handle.join();
}

#[tokio::test]
async fn error_body_echoing_secret_is_redacted() {
    let (addr, _rx) = serve_one(
        400,
        r#"{"errors": {"token": "rejected value f4d2a9e1-7b3c-4d5e-8f90-112233445566"}}"#,
        Some("application/json"),
    );
    let client = client_for(&addr);
    let err = client.get("/access/users").await.unwrap_err();
    let text = err.to_string();
    assert!(!text.contains(TOKEN_SECRET));
    assert!(text.contains(REDACTION_MARKER));
}

// ============================================================================
// SECTION: Connection Validation
// ============================================================================

#[tokio::test]
async fn validate_connection_succeeds_on_version_response() {
    let (addr, _rx) =
        serve_one(200, r#"{"data": {"version": "8.2.4", "release": "8.2"}}"#, Some("application/json"));
    let client = client_for(&addr);
    client.validate_connection().await.unwrap();
}

#[tokio::test]
async fn validate_connection_reports_auth_failure_distinctly() {
    let (addr, _rx) = serve_one(401, "", Some("application/json"));
    let client = client_for(&addr);
    let err = client.validate_connection().await.unwrap_err();
    assert!(err.is_auth());
}

#[tokio::test]
async fn validate_connection_maps_other_failures_to_connectivity() {
    let (addr, _rx) = serve_one(500, "backend exploded", Some("text/plain"));
    let client = client_for(&addr);
    let err = client.validate_connection().await.unwrap_err();
    assert!(matches!(err, ApiError::Connection { .. }));
}
