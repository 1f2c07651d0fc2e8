// crates/pve-bridge-core/src/api.rs
// ============================================================================
// Module: Hypervisor API Seam
// Description: Backend client trait and typed request failures.
// Purpose: Decouple capability handlers from the concrete HTTP engine.
// Dependencies: async-trait, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Capability handlers reach the backend REST API exclusively through
//! [`HypervisorApi`]. The concrete request engine lives in
//! `pve-bridge-client`; tests substitute stub implementations. Every failure
//! crossing this seam is already sanitized and classified into [`ApiError`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Typed failure raised by the request engine.
///
/// # Invariants
/// - Free-text detail fields are sanitized before construction; no credential
///   material may be embedded in a variant.
/// - Timeouts and network failures are indistinguishable in kind: both are
///   [`ApiError::Connection`].
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The backend rejected the request credentials (HTTP 401/403).
    #[error("authentication failed (status {status}): verify the configured API token id and secret")]
    Auth {
        /// HTTP status code reported by the backend.
        status: u16,
    },
    /// The backend returned a non-success status other than 401/403.
    #[error("api request failed (status {status}): {detail}")]
    Status {
        /// HTTP status code reported by the backend.
        status: u16,
        /// Sanitized failure detail (structured error body or status line).
        detail: String,
    },
    /// The request never completed: network failure or timeout.
    #[error("connection failed: {detail}")]
    Connection {
        /// Sanitized failure detail.
        detail: String,
    },
    /// The backend response could not be decoded.
    #[error("invalid response: {detail}")]
    Response {
        /// Sanitized failure detail.
        detail: String,
    },
}

impl ApiError {
    /// Returns the HTTP status code carried by the failure, when present.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Auth {
                status,
            }
            | Self::Status {
                status, ..
            } => Some(*status),
            Self::Connection {
                ..
            }
            | Self::Response {
                ..
            } => None,
        }
    }

    /// Returns true for authentication failures (HTTP 401/403).
    #[must_use]
    pub const fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Authenticated access to the hypervisor REST API.
///
/// Paths are absolute within the API root (for example `/nodes` or
/// `/nodes/pve1/qemu/100/status/start`). Returned values are the unwrapped
/// response payload; the caller's input contract, not this layer, defines the
/// expected structure.
#[async_trait]
pub trait HypervisorApi: Send + Sync {
    /// Issues a GET request.
    async fn get(&self, path: &str) -> Result<Value, ApiError>;

    /// Issues a POST request with an optional JSON body.
    async fn post(&self, path: &str, body: Option<Value>) -> Result<Value, ApiError>;

    /// Issues a PUT request with an optional JSON body.
    async fn put(&self, path: &str, body: Option<Value>) -> Result<Value, ApiError>;

    /// Issues a DELETE request.
    async fn delete(&self, path: &str) -> Result<Value, ApiError>;
}
