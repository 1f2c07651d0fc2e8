// crates/pve-bridge-core/tests/proptest_sanitize.rs
// ============================================================================
// Module: Sanitizer Property Tests
// Description: Property-based coverage for secret redaction.
// Purpose: Verify redaction and idempotence over generated inputs.
// Dependencies: pve-bridge-core, proptest
// ============================================================================

//! ## Overview
//! Property tests for the sanitizer: a registered secret never survives
//! sanitization regardless of surrounding text, and sanitizing twice yields
//! the same output as sanitizing once.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test-only assertions favor direct unwrap/expect for clarity."
)]

use proptest::prelude::*;
use pve_bridge_core::SecretRegistry;

/// Secrets drawn from token-shaped alphabets, at least four characters so a
/// secret cannot be a substring of the redaction marker.
fn secret_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9]{4,24}"
}

proptest! {
    #[test]
    fn registered_secret_never_survives(
        secret in secret_strategy(),
        prefix in "[ -~]{0,40}",
        suffix in "[ -~]{0,40}",
    ) {
        let registry = SecretRegistry::new();
        registry.register(secret.clone());
        let text = format!("{prefix}{secret}{suffix}");
        let out = registry.sanitize(&text);
        prop_assert!(!out.contains(&secret));
    }

    #[test]
    fn sanitize_twice_equals_sanitize_once(
        secret in secret_strategy(),
        text in "[ -~]{0,120}",
    ) {
        let registry = SecretRegistry::new();
        registry.register(secret);
        let once = registry.sanitize(&text);
        let twice = registry.sanitize(&once);
        prop_assert_eq!(once, twice);
    }
}
