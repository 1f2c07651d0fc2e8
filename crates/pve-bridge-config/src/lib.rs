// crates/pve-bridge-config/src/lib.rs
// ============================================================================
// Module: PVE Bridge Configuration
// Description: Environment-derived, validated process configuration.
// Purpose: Supply backend address, credentials, tier, and transport settings.
// Dependencies: pve-bridge-core, serde, thiserror, url
// ============================================================================

//! ## Overview
//! Configuration is read once from the environment at startup and validated
//! before any component is constructed. Parsing is exposed through a pure
//! `from_lookup` seam so tests never touch process-global environment state.
//! Error messages name environment variables only and never echo credential
//! values.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::str::FromStr;

use pve_bridge_core::AccessTier;
use pve_bridge_core::ToolCategory;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Environment Variables
// ============================================================================

/// Backend API root, for example `https://pve1.example:8006/api2/json`.
pub const ENV_API_URL: &str = "PVE_API_URL";
/// API token identifier, for example `root@pam!bridge`.
pub const ENV_TOKEN_ID: &str = "PVE_TOKEN_ID";
/// API token secret value.
pub const ENV_TOKEN_SECRET: &str = "PVE_TOKEN_SECRET";
/// Process access tier: `read-only`, `read-execute`, or `full`.
pub const ENV_ACCESS_TIER: &str = "PVE_BRIDGE_TIER";
/// Optional comma-separated category allow-list.
pub const ENV_CATEGORIES: &str = "PVE_BRIDGE_CATEGORIES";
/// TLS certificate verification toggle (`true`/`false`, default `true`).
pub const ENV_VERIFY_TLS: &str = "PVE_VERIFY_TLS";
/// Server transport: `stdio` (default) or `http`.
pub const ENV_TRANSPORT: &str = "PVE_BRIDGE_TRANSPORT";
/// Bind address for the HTTP transport, for example `127.0.0.1:8756`.
pub const ENV_BIND: &str = "PVE_BRIDGE_BIND";

/// Default inbound message-size cap in bytes.
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration failure raised before startup completes.
///
/// # Invariants
/// - Messages name environment variables only; credential values are never
///   echoed (nothing is registered for redaction this early).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required environment variable is absent or empty.
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
    /// An environment variable holds an unusable value.
    #[error("invalid value for {name}: {detail}")]
    Invalid {
        /// Environment variable name.
        name: &'static str,
        /// Human-readable parse failure detail.
        detail: String,
    },
}

// ============================================================================
// SECTION: Transport
// ============================================================================

/// Transport used to carry tool-call requests and responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ServerTransport {
    /// Content-Length framed JSON-RPC over stdin/stdout.
    #[default]
    Stdio,
    /// JSON-RPC over HTTP POST.
    Http,
}

impl ServerTransport {
    /// Returns the stable configuration label for the transport.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stdio => "stdio",
            Self::Http => "http",
        }
    }
}

// ============================================================================
// SECTION: Configuration Record
// ============================================================================

/// Validated process configuration, immutable for the process lifetime.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Backend API root URL.
    pub api_url: String,
    /// API token identifier (credential id).
    pub token_id: String,
    /// API token secret (credential secret).
    pub token_secret: String,
    /// Declared process trust tier.
    pub access_tier: AccessTier,
    /// Category allow-list; empty means all categories are permitted.
    pub categories: Vec<ToolCategory>,
    /// Whether to verify the backend TLS certificate.
    pub verify_tls: bool,
    /// Transport carrying tool-call traffic.
    pub transport: ServerTransport,
    /// Bind address, required for the HTTP transport.
    pub bind: Option<String>,
    /// Inbound message-size cap in bytes.
    pub max_body_bytes: usize,
}

impl BridgeConfig {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is absent or a value
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through a lookup function.
    ///
    /// This is the testable seam: `from_env` is a thin wrapper over it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is absent or a value
    /// cannot be parsed.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let api_url = require(&lookup, ENV_API_URL)?;
        let token_id = require(&lookup, ENV_TOKEN_ID)?;
        let token_secret = require(&lookup, ENV_TOKEN_SECRET)?;
        let access_tier = match lookup(ENV_ACCESS_TIER) {
            Some(raw) if !raw.trim().is_empty() => {
                AccessTier::from_str(&raw).map_err(|err| ConfigError::Invalid {
                    name: ENV_ACCESS_TIER,
                    detail: err.to_string(),
                })?
            }
            _ => AccessTier::ReadOnly,
        };
        let categories = lookup(ENV_CATEGORIES)
            .map(|raw| parse_categories(&raw))
            .unwrap_or_default();
        let verify_tls = parse_bool(&lookup, ENV_VERIFY_TLS, true)?;
        let transport = match lookup(ENV_TRANSPORT) {
            Some(raw) if !raw.trim().is_empty() => match raw.trim() {
                "stdio" => ServerTransport::Stdio,
                "http" => ServerTransport::Http,
                other => {
                    return Err(ConfigError::Invalid {
                        name: ENV_TRANSPORT,
                        detail: format!("unknown transport {other}; expected stdio or http"),
                    });
                }
            },
            _ => ServerTransport::Stdio,
        };
        let bind = lookup(ENV_BIND).filter(|value| !value.trim().is_empty());
        let config = Self {
            api_url,
            token_id,
            token_secret,
            access_tier,
            categories,
            verify_tls,
            transport,
            bind,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates cross-field invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the URL is malformed or the transport is
    /// missing its bind address.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.api_url).map_err(|err| ConfigError::Invalid {
            name: ENV_API_URL,
            detail: err.to_string(),
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Invalid {
                name: ENV_API_URL,
                detail: format!("unsupported scheme {}", url.scheme()),
            });
        }
        if self.transport == ServerTransport::Http && self.bind.is_none() {
            return Err(ConfigError::Invalid {
                name: ENV_BIND,
                detail: "bind address required for http transport".to_string(),
            });
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Parsing Helpers
// ============================================================================

/// Looks up a required, non-empty variable.
fn require(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<String, ConfigError> {
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar(name)),
    }
}

/// Parses a comma-separated category allow-list, dropping empty entries.
fn parse_categories(raw: &str) -> Vec<ToolCategory> {
    raw.split(',')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(ToolCategory::new)
        .collect()
}

/// Parses a boolean toggle with a default for absent values.
fn parse_bool(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: bool,
) -> Result<bool, ConfigError> {
    match lookup(name) {
        None => Ok(default),
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "" => Ok(default),
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            other => Err(ConfigError::Invalid {
                name,
                detail: format!("expected true or false, got {other}"),
            }),
        },
    }
}
