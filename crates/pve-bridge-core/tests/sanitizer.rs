// crates/pve-bridge-core/tests/sanitizer.rs
// ============================================================================
// Module: Sanitizer Tests
// Description: Secret redaction and structural pattern behavior.
// Purpose: Validate that no registered secret survives sanitization.
// Dependencies: pve-bridge-core
// ============================================================================

//! ## Overview
//! Exercises literal secret replacement, case-insensitive structural
//! redaction of token parameters and authorization headers, and idempotence
//! of repeated sanitization.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::use_debug,
    reason = "Test-only assertions favor direct unwrap/expect for clarity."
)]

use pve_bridge_core::REDACTION_MARKER;
use pve_bridge_core::SecretRegistry;

// ============================================================================
// SECTION: Literal Redaction
// ============================================================================

#[test]
fn registered_secret_is_replaced() {
    let registry = SecretRegistry::new();
    registry.register("super-secret-uuid");
    let out = registry.sanitize("call failed: token super-secret-uuid rejected");
    assert!(!out.contains("super-secret-uuid"));
    assert!(out.contains(REDACTION_MARKER));
}

#[test]
fn every_occurrence_is_replaced() {
    let registry = SecretRegistry::new();
    registry.register("abc123");
    let out = registry.sanitize("abc123 then again abc123 and abc123");
    assert!(!out.contains("abc123"));
    assert_eq!(out.matches(REDACTION_MARKER).count(), 3);
}

#[test]
fn multiple_secrets_are_all_replaced() {
    let registry = SecretRegistry::new();
    registry.register("agent@pve!bridge");
    registry.register("0f0e0d0c-0b0a-0908-0706-050403020100");
    let out = registry
        .sanitize("auth agent@pve!bridge with 0f0e0d0c-0b0a-0908-0706-050403020100 failed");
    assert!(!out.contains("agent@pve!bridge"));
    assert!(!out.contains("0f0e0d0c"));
}

#[test]
fn text_without_secrets_is_unchanged() {
    let registry = SecretRegistry::new();
    registry.register("hidden");
    let text = "node pve1 is offline";
    assert_eq!(registry.sanitize(text), text);
}

// ============================================================================
// SECTION: Structural Patterns
// ============================================================================

#[test]
fn token_parameter_is_reduced_to_key() {
    let registry = SecretRegistry::new();
    let out = registry.sanitize("header was PVEAPIToken=root@pam!agent=deadbeef in request");
    assert_eq!(out, format!("header was PVEAPIToken={REDACTION_MARKER} in request"));
}

#[test]
fn token_parameter_matches_case_insensitively() {
    let registry = SecretRegistry::new();
    let out = registry.sanitize("pveapitoken=USER@REALM!id=s3cret");
    assert!(!out.contains("s3cret"));
    assert!(out.contains(&format!("pveapitoken={REDACTION_MARKER}")));
}

#[test]
fn authorization_header_value_is_redacted() {
    let registry = SecretRegistry::new();
    let out = registry.sanitize("Authorization: Bearer abcdef012345");
    assert_eq!(out, format!("Authorization: {REDACTION_MARKER}"));
}

#[test]
fn authorization_header_matches_case_insensitively() {
    let registry = SecretRegistry::new();
    let out = registry.sanitize("AUTHORIZATION:   PVEAPIToken=a@b!c=d");
    assert!(!out.contains("a@b!c=d"));
    assert!(out.contains(REDACTION_MARKER));
}

// ============================================================================
// SECTION: Idempotence and Purity
// ============================================================================

#[test]
fn sanitize_is_idempotent() {
    let registry = SecretRegistry::new();
    registry.register("tok-secret");
    let inputs = [
        "tok-secret leaked with PVEAPIToken=u@r!t=tok-secret",
        "Authorization: PVEAPIToken=u@r!t=x",
        "plain text with no secrets",
        "",
    ];
    for input in inputs {
        let once = registry.sanitize(input);
        let twice = registry.sanitize(&once);
        assert_eq!(once, twice, "sanitize must be idempotent for {input:?}");
    }
}

#[test]
fn sanitize_handles_empty_and_unicode_input() {
    let registry = SecretRegistry::new();
    registry.register("geheim");
    assert_eq!(registry.sanitize(""), "");
    let out = registry.sanitize("fehler: geheim / zugriff verweigert ✗");
    assert!(!out.contains("geheim"));
}

#[test]
fn empty_registry_applies_only_structural_patterns() {
    let registry = SecretRegistry::new();
    let out = registry.sanitize("PVEAPIToken=x=y and nothing else");
    assert!(out.contains(REDACTION_MARKER));
    assert_eq!(registry.sanitize("hello"), "hello");
}
