// crates/pve-bridge-config/tests/config_validation.rs
// ============================================================================
// Module: Configuration Validation Tests
// Description: Environment parsing and cross-field validation behavior.
// Purpose: Ensure startup fails fast on absent or malformed settings.
// Dependencies: pve-bridge-config, pve-bridge-core
// ============================================================================

//! ## Overview
//! Exercises the `from_lookup` seam with in-memory variable maps: required
//! variables, tier and category parsing, TLS and transport toggles, and the
//! guarantee that error text never carries credential values.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test-only assertions favor direct unwrap/expect for clarity."
)]

use std::collections::BTreeMap;

use pve_bridge_config::BridgeConfig;
use pve_bridge_config::ConfigError;
use pve_bridge_config::ENV_ACCESS_TIER;
use pve_bridge_config::ENV_API_URL;
use pve_bridge_config::ENV_BIND;
use pve_bridge_config::ENV_CATEGORIES;
use pve_bridge_config::ENV_TOKEN_ID;
use pve_bridge_config::ENV_TOKEN_SECRET;
use pve_bridge_config::ENV_TRANSPORT;
use pve_bridge_config::ENV_VERIFY_TLS;
use pve_bridge_config::ServerTransport;
use pve_bridge_core::AccessTier;
use pve_bridge_core::ToolCategory;

// ============================================================================
// SECTION: Test Helpers
// ============================================================================

/// Returns the minimum viable variable set.
fn base_vars() -> BTreeMap<&'static str, &'static str> {
    BTreeMap::from([
        (ENV_API_URL, "https://pve1.example:8006/api2/json"),
        (ENV_TOKEN_ID, "root@pam!bridge"),
        (ENV_TOKEN_SECRET, "1f6f1f8e-4242-4e4e-9c9c-000011112222"),
    ])
}

/// Parses configuration from a variable map.
fn parse(vars: &BTreeMap<&'static str, &'static str>) -> Result<BridgeConfig, ConfigError> {
    BridgeConfig::from_lookup(|name| vars.get(name).map(ToString::to_string))
}

// ============================================================================
// SECTION: Happy Path and Defaults
// ============================================================================

#[test]
fn minimal_configuration_parses_with_defaults() {
    let config = parse(&base_vars()).unwrap();
    assert_eq!(config.access_tier, AccessTier::ReadOnly);
    assert!(config.categories.is_empty());
    assert!(config.verify_tls);
    assert_eq!(config.transport, ServerTransport::Stdio);
    assert!(config.bind.is_none());
}

#[test]
fn explicit_tier_and_categories_parse() {
    let mut vars = base_vars();
    vars.insert(ENV_ACCESS_TIER, "read-execute");
    vars.insert(ENV_CATEGORIES, "storage, network,,vms ");
    let config = parse(&vars).unwrap();
    assert_eq!(config.access_tier, AccessTier::ReadExecute);
    assert_eq!(
        config.categories,
        vec![
            ToolCategory::new("storage"),
            ToolCategory::new("network"),
            ToolCategory::new("vms"),
        ]
    );
}

#[test]
fn tls_toggle_accepts_false() {
    let mut vars = base_vars();
    vars.insert(ENV_VERIFY_TLS, "false");
    let config = parse(&vars).unwrap();
    assert!(!config.verify_tls);
}

#[test]
fn http_transport_with_bind_parses() {
    let mut vars = base_vars();
    vars.insert(ENV_TRANSPORT, "http");
    vars.insert(ENV_BIND, "127.0.0.1:8756");
    let config = parse(&vars).unwrap();
    assert_eq!(config.transport, ServerTransport::Http);
    assert_eq!(config.bind.as_deref(), Some("127.0.0.1:8756"));
}

// ============================================================================
// SECTION: Failure Modes
// ============================================================================

#[test]
fn each_required_variable_is_enforced() {
    for missing in [ENV_API_URL, ENV_TOKEN_ID, ENV_TOKEN_SECRET] {
        let mut vars = base_vars();
        vars.remove(missing);
        assert_eq!(parse(&vars).unwrap_err(), ConfigError::MissingVar(missing));
    }
}

#[test]
fn empty_required_variable_counts_as_missing() {
    let mut vars = base_vars();
    vars.insert(ENV_TOKEN_SECRET, "  ");
    assert_eq!(parse(&vars).unwrap_err(), ConfigError::MissingVar(ENV_TOKEN_SECRET));
}

#[test]
fn unknown_tier_is_rejected() {
    let mut vars = base_vars();
    vars.insert(ENV_ACCESS_TIER, "root");
    let err = parse(&vars).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { name, .. } if name == ENV_ACCESS_TIER));
}

#[test]
fn malformed_url_is_rejected() {
    let mut vars = base_vars();
    vars.insert(ENV_API_URL, "not a url");
    let err = parse(&vars).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { name, .. } if name == ENV_API_URL));
}

#[test]
fn non_http_scheme_is_rejected() {
    let mut vars = base_vars();
    vars.insert(ENV_API_URL, "ftp://pve1.example/api2/json");
    let err = parse(&vars).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { name, .. } if name == ENV_API_URL));
}

#[test]
fn http_transport_requires_bind() {
    let mut vars = base_vars();
    vars.insert(ENV_TRANSPORT, "http");
    let err = parse(&vars).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { name, .. } if name == ENV_BIND));
}

#[test]
fn invalid_tls_toggle_is_rejected() {
    let mut vars = base_vars();
    vars.insert(ENV_VERIFY_TLS, "maybe");
    let err = parse(&vars).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { name, .. } if name == ENV_VERIFY_TLS));
}

#[test]
fn error_text_never_echoes_credentials() {
    let mut vars = base_vars();
    vars.insert(ENV_TRANSPORT, "carrier-pigeon");
    let err = parse(&vars).unwrap_err();
    let text = err.to_string();
    assert!(!text.contains("1f6f1f8e"));
    assert!(!text.contains("root@pam!bridge"));
}
