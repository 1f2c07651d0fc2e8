// crates/pve-bridge-mcp/src/server.rs
// ============================================================================
// Module: MCP Server
// Description: JSON-RPC 2.0 server over stdio and HTTP transports.
// Purpose: Expose the tool dispatcher to MCP clients.
// Dependencies: pve-bridge-config, axum, serde, serde_json, tokio
// ============================================================================

//! ## Overview
//! The server speaks JSON-RPC 2.0 and routes every request through
//! [`crate::dispatch::ToolDispatcher`]. The stdio transport frames messages
//! with `Content-Length` headers; the HTTP transport accepts one request per
//! POST to `/rpc`. Notifications (requests without an id) never receive a
//! response on either transport.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::post;
use pve_bridge_config::BridgeConfig;
use pve_bridge_config::ServerTransport;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;
use tokio::io::AsyncBufRead;
use tokio::io::AsyncBufReadExt;
use tokio::io::AsyncReadExt;
use tokio::io::AsyncWrite;
use tokio::io::AsyncWriteExt;
use tokio::io::BufReader;

use crate::dispatch::DispatchError;
use crate::dispatch::ToolDispatcher;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// MCP protocol revision announced during initialization.
const PROTOCOL_VERSION: &str = "2025-06-18";

/// Server name announced during initialization.
const SERVER_NAME: &str = "pve-bridge";

// ============================================================================
// SECTION: MCP Server
// ============================================================================

/// MCP server instance.
pub struct McpServer {
    /// Validated server configuration.
    config: BridgeConfig,
    /// Dispatcher shared across transport handlers.
    dispatcher: Arc<ToolDispatcher>,
}

impl McpServer {
    /// Builds a server from validated configuration and a dispatcher.
    #[must_use]
    pub fn new(config: BridgeConfig, dispatcher: ToolDispatcher) -> Self {
        Self {
            config,
            dispatcher: Arc::new(dispatcher),
        }
    }

    /// Serves requests using the configured transport until shutdown.
    ///
    /// The stdio transport returns cleanly when stdin closes; the HTTP
    /// transport runs until the process is terminated.
    ///
    /// # Errors
    ///
    /// Returns [`McpServerError`] when the transport fails.
    pub async fn serve(self) -> Result<(), McpServerError> {
        tracing::info!(
            transport = self.config.transport.as_str(),
            tools = self.dispatcher.len(),
            "serving MCP requests"
        );
        match self.config.transport {
            ServerTransport::Stdio => {
                serve_stdio(&self.dispatcher, self.config.max_body_bytes).await
            }
            ServerTransport::Http => serve_http(&self.config, self.dispatcher).await,
        }
    }
}

// ============================================================================
// SECTION: Stdio Transport
// ============================================================================

/// Serves JSON-RPC requests over stdin/stdout until stdin closes.
///
/// Per-frame failures with a known recovery point, such as an over-cap
/// payload, are answered in-band and the loop continues. Only stream
/// corruption the reader cannot resynchronize from ends the transport.
async fn serve_stdio(
    dispatcher: &ToolDispatcher,
    max_body_bytes: usize,
) -> Result<(), McpServerError> {
    let mut reader = BufReader::new(tokio::io::stdin());
    let mut writer = tokio::io::stdout();
    loop {
        let bytes = match read_framed(&mut reader, max_body_bytes).await? {
            Frame::Closed => return Ok(()),
            Frame::Oversized => {
                let response =
                    error_response(Value::Null, -32600, "payload too large".to_string());
                let payload = serde_json::to_vec(&response).map_err(|_| {
                    McpServerError::Transport("json-rpc serialization failed".to_string())
                })?;
                write_framed(&mut writer, &payload).await?;
                continue;
            }
            Frame::Payload(bytes) => bytes,
        };
        let response = match serde_json::from_slice::<JsonRpcRequest>(&bytes) {
            Ok(request) => handle_request(dispatcher, request).await,
            Err(_) => Some(invalid_request(Value::Null)),
        };
        let Some(response) = response else {
            continue;
        };
        let payload = serde_json::to_vec(&response)
            .map_err(|_| McpServerError::Transport("json-rpc serialization failed".to_string()))?;
        write_framed(&mut writer, &payload).await?;
    }
}

// ============================================================================
// SECTION: HTTP Transport
// ============================================================================

/// Shared state for HTTP handlers.
struct HttpState {
    /// Dispatcher shared across requests.
    dispatcher: Arc<ToolDispatcher>,
    /// Maximum allowed request body size.
    max_body_bytes: usize,
}

/// Serves JSON-RPC requests over HTTP.
async fn serve_http(
    config: &BridgeConfig,
    dispatcher: Arc<ToolDispatcher>,
) -> Result<(), McpServerError> {
    let bind = config
        .bind
        .as_ref()
        .ok_or_else(|| McpServerError::Config("bind address required".to_string()))?;
    let addr: SocketAddr =
        bind.parse().map_err(|_| McpServerError::Config("invalid bind address".to_string()))?;
    let state = Arc::new(HttpState {
        dispatcher,
        max_body_bytes: config.max_body_bytes,
    });
    let app = Router::new().route("/rpc", post(handle_http)).with_state(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|_| McpServerError::Transport("http bind failed".to_string()))?;
    tracing::info!(%addr, "listening for MCP requests over http");
    axum::serve(listener, app)
        .await
        .map_err(|_| McpServerError::Transport("http server failed".to_string()))
}

/// Handles one HTTP JSON-RPC request.
async fn handle_http(State(state): State<Arc<HttpState>>, bytes: Bytes) -> Response {
    if bytes.len() > state.max_body_bytes {
        let response = error_response(Value::Null, -32600, "request body too large".to_string());
        return (StatusCode::PAYLOAD_TOO_LARGE, axum::Json(response)).into_response();
    }
    let response = match serde_json::from_slice::<JsonRpcRequest>(bytes.as_ref()) {
        Ok(request) => handle_request(&state.dispatcher, request).await,
        Err(_) => Some(invalid_request(Value::Null)),
    };
    match response {
        Some(response) => {
            let status = if response.error.is_some() {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::OK
            };
            (status, axum::Json(response)).into_response()
        }
        None => StatusCode::ACCEPTED.into_response(),
    }
}

// ============================================================================
// SECTION: JSON-RPC Types
// ============================================================================

/// Incoming JSON-RPC request payload.
///
/// A missing `id` marks a notification, which never receives a response.
#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    /// JSON-RPC protocol version.
    jsonrpc: String,
    /// Request identifier, absent for notifications.
    id: Option<Value>,
    /// Method name.
    method: String,
    /// Optional parameters payload.
    params: Option<Value>,
}

/// JSON-RPC response envelope.
#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    /// JSON-RPC protocol version.
    jsonrpc: &'static str,
    /// Request identifier.
    id: Value,
    /// Successful result payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    /// Error payload when the request fails.
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

/// JSON-RPC error payload.
#[derive(Debug, Serialize)]
struct JsonRpcError {
    /// Error code.
    code: i64,
    /// Human-readable error message.
    message: String,
}

/// Tool call parameters for `tools/call` requests.
#[derive(Debug, Deserialize)]
struct ToolCallParams {
    /// Tool name.
    name: String,
    /// Raw JSON arguments; absent means an empty object.
    arguments: Option<Value>,
}

/// One content block in a tool call result.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ToolContent {
    /// Textual tool output.
    Text {
        /// Text payload.
        text: String,
    },
}

/// Tool call response payload.
#[derive(Debug, Serialize)]
struct ToolCallResult {
    /// Tool output content blocks.
    content: Vec<ToolContent>,
    /// True when the execution failed.
    #[serde(rename = "isError")]
    is_error: bool,
}

// ============================================================================
// SECTION: JSON-RPC Handling
// ============================================================================

/// Dispatches one JSON-RPC request.
///
/// Returns `None` for notifications, which must not be answered.
async fn handle_request(
    dispatcher: &ToolDispatcher,
    request: JsonRpcRequest,
) -> Option<JsonRpcResponse> {
    let Some(id) = request.id else {
        // Notification; initialized and cancelled notifications land here.
        return None;
    };
    if request.jsonrpc != "2.0" {
        return Some(invalid_request(id));
    }
    match request.method.as_str() {
        "initialize" => Some(ok_response(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {"tools": {}},
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": env!("CARGO_PKG_VERSION"),
                },
            }),
        )),
        "tools/list" => Some(ok_response(id, json!({"tools": dispatcher.list_tools()}))),
        "tools/call" => {
            let params = request.params.unwrap_or(Value::Null);
            let Ok(call) = serde_json::from_value::<ToolCallParams>(params) else {
                return Some(error_response(id, -32602, "invalid tool params".to_string()));
            };
            let arguments = call.arguments.unwrap_or_else(|| json!({}));
            match dispatcher.call(&call.name, arguments).await {
                Ok(outcome) => {
                    let result = ToolCallResult {
                        content: vec![ToolContent::Text {
                            text: outcome.text,
                        }],
                        is_error: outcome.is_error,
                    };
                    match serde_json::to_value(result) {
                        Ok(value) => Some(ok_response(id, value)),
                        Err(_) => Some(error_response(
                            id,
                            -32603,
                            "result serialization failed".to_string(),
                        )),
                    }
                }
                Err(err) => Some(dispatch_error(id, err)),
            }
        }
        _ => Some(error_response(id, -32601, "method not found".to_string())),
    }
}

/// Builds a successful JSON-RPC response.
fn ok_response(id: Value, result: Value) -> JsonRpcResponse {
    JsonRpcResponse {
        jsonrpc: "2.0",
        id,
        result: Some(result),
        error: None,
    }
}

/// Builds a JSON-RPC error response.
fn error_response(id: Value, code: i64, message: String) -> JsonRpcResponse {
    JsonRpcResponse {
        jsonrpc: "2.0",
        id,
        result: None,
        error: Some(JsonRpcError {
            code,
            message,
        }),
    }
}

/// Builds the canonical invalid-request response.
fn invalid_request(id: Value) -> JsonRpcResponse {
    error_response(id, -32600, "invalid json-rpc request".to_string())
}

/// Maps a dispatcher failure onto JSON-RPC error codes.
fn dispatch_error(id: Value, error: DispatchError) -> JsonRpcResponse {
    match error {
        DispatchError::UnknownTool(name) => {
            error_response(id, -32601, format!("unknown tool: {name}"))
        }
        DispatchError::InvalidParams(message) => error_response(id, -32602, message),
        DispatchError::InvalidSchema(name) => {
            error_response(id, -32603, format!("invalid input schema for tool {name}"))
        }
    }
}

// ============================================================================
// SECTION: Framing Helpers
// ============================================================================

/// One framing outcome from the stdio reader.
enum Frame {
    /// A complete payload within the size cap.
    Payload(Vec<u8>),
    /// A frame whose declared length exceeds the cap. The payload bytes have
    /// been drained, so the reader is positioned at the next frame.
    Oversized,
    /// The stream closed cleanly between frames.
    Closed,
}

/// Reads one framed stdio payload using MCP `Content-Length` headers.
///
/// Header names are matched case-insensitively. An over-cap frame is drained
/// and reported as [`Frame::Oversized`] so the caller can answer it and keep
/// serving; only a missing or unparseable length, where the resynchronization
/// point is unknown, is an error.
async fn read_framed<R>(reader: &mut R, max_body_bytes: usize) -> Result<Frame, McpServerError>
where
    R: AsyncBufRead + Unpin,
{
    let mut content_length: Option<usize> = None;
    let mut line = String::new();
    loop {
        line.clear();
        let bytes = reader
            .read_line(&mut line)
            .await
            .map_err(|_| McpServerError::Transport("stdio read failed".to_string()))?;
        if bytes == 0 {
            if content_length.is_some() {
                return Err(McpServerError::Transport("stdio closed mid-frame".to_string()));
            }
            return Ok(Frame::Closed);
        }
        if line.trim().is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':')
            && name.trim().eq_ignore_ascii_case("content-length")
        {
            let parsed = value
                .trim()
                .parse::<usize>()
                .map_err(|_| McpServerError::Transport("invalid content length".to_string()))?;
            content_length = Some(parsed);
        }
    }
    let len = content_length
        .ok_or_else(|| McpServerError::Transport("missing content length".to_string()))?;
    if len > max_body_bytes {
        drain_payload(reader, len).await?;
        return Ok(Frame::Oversized);
    }
    let mut buf = vec![0u8; len];
    reader
        .read_exact(&mut buf)
        .await
        .map_err(|_| McpServerError::Transport("stdio read failed".to_string()))?;
    Ok(Frame::Payload(buf))
}

/// Discards `len` payload bytes through a fixed-size scratch buffer.
///
/// The declared length is caller-controlled, so the drain never allocates
/// proportionally to it.
async fn drain_payload<R>(reader: &mut R, len: usize) -> Result<(), McpServerError>
where
    R: AsyncBufRead + Unpin,
{
    let mut remaining = len;
    let mut scratch = [0u8; 8192];
    while remaining > 0 {
        let take = remaining.min(scratch.len());
        reader
            .read_exact(&mut scratch[..take])
            .await
            .map_err(|_| McpServerError::Transport("stdio read failed".to_string()))?;
        remaining -= take;
    }
    Ok(())
}

/// Writes one framed stdio payload using MCP `Content-Length` headers.
async fn write_framed<W>(writer: &mut W, payload: &[u8]) -> Result<(), McpServerError>
where
    W: AsyncWrite + Unpin,
{
    let header = format!("Content-Length: {}\r\n\r\n", payload.len());
    writer
        .write_all(header.as_bytes())
        .await
        .map_err(|_| McpServerError::Transport("stdio write failed".to_string()))?;
    writer
        .write_all(payload)
        .await
        .map_err(|_| McpServerError::Transport("stdio write failed".to_string()))?;
    writer
        .flush()
        .await
        .map_err(|_| McpServerError::Transport("stdio write failed".to_string()))
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// MCP server errors.
#[derive(Debug, thiserror::Error)]
pub enum McpServerError {
    /// Configuration errors surfaced at transport startup.
    #[error("config error: {0}")]
    Config(String),
    /// Transport errors.
    #[error("transport error: {0}")]
    Transport(String),
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
        reason = "Test-only framing assertions."
    )]

    use tokio::io::BufReader;

    use super::Frame;
    use super::read_framed;
    use super::write_framed;

    /// Renders one Content-Length frame around the payload.
    fn frame(payload: &[u8]) -> String {
        format!("Content-Length: {}\r\n\r\n{}", payload.len(), String::from_utf8_lossy(payload))
    }

    #[tokio::test]
    async fn oversized_frame_is_reported_not_fatal() {
        let payload = br#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#;
        let framed = frame(payload);
        let mut reader = BufReader::new(framed.as_bytes());
        let result = read_framed(&mut reader, payload.len() - 1).await.expect("recoverable");
        assert!(matches!(result, Frame::Oversized));
    }

    #[tokio::test]
    async fn serving_continues_after_an_oversized_frame() {
        let big = br#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#;
        let small = br#"{"jsonrpc":"2.0"}"#;
        let stream = format!("{}{}", frame(big), frame(small));
        let mut reader = BufReader::new(stream.as_bytes());
        let first = read_framed(&mut reader, small.len()).await.expect("recoverable");
        assert!(matches!(first, Frame::Oversized));
        let second = read_framed(&mut reader, small.len()).await.expect("next frame intact");
        match second {
            Frame::Payload(bytes) => assert_eq!(bytes, small),
            _ => panic!("expected the following frame to parse"),
        }
    }

    #[tokio::test]
    async fn read_framed_accepts_payload_at_limit() {
        let payload = br#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#;
        let framed = frame(payload);
        let mut reader = BufReader::new(framed.as_bytes());
        let result = read_framed(&mut reader, payload.len()).await.expect("frame read");
        match result {
            Frame::Payload(bytes) => assert_eq!(bytes, payload),
            _ => panic!("expected a payload frame"),
        }
    }

    #[tokio::test]
    async fn header_name_is_case_insensitive() {
        let payload = br#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#;
        let framed = format!(
            "content-length: {}\r\n\r\n{}",
            payload.len(),
            String::from_utf8_lossy(payload)
        );
        let mut reader = BufReader::new(framed.as_bytes());
        let result = read_framed(&mut reader, payload.len()).await.expect("frame read");
        match result {
            Frame::Payload(bytes) => assert_eq!(bytes, payload),
            _ => panic!("expected a payload frame"),
        }
    }

    #[tokio::test]
    async fn read_framed_signals_clean_close() {
        let mut reader = BufReader::new(&b""[..]);
        let result = read_framed(&mut reader, 1024).await.expect("clean close");
        assert!(matches!(result, Frame::Closed));
    }

    #[tokio::test]
    async fn write_framed_emits_content_length_header() {
        let mut out = Vec::new();
        write_framed(&mut out, b"{}").await.expect("frame write");
        assert_eq!(out, b"Content-Length: 2\r\n\r\n{}");
    }
}
