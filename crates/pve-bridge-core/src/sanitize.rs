// crates/pve-bridge-core/src/sanitize.rs
// ============================================================================
// Module: Secret Registry and Sanitizer
// Description: Process-wide append-only secret list with textual redaction.
// Purpose: Scrub credential material from every caller-visible string.
// Dependencies: regex
// ============================================================================

//! ## Overview
//! The secret registry holds the literal credential strings registered at
//! startup (token id and token secret) and scrubs them from any text before
//! it leaves the process boundary. Beyond literal matches, two structural
//! patterns are redacted case-insensitively: embedded `PVEAPIToken=...`
//! authentication parameters and `Authorization:` header values.
//!
//! ## Invariants
//! - The registry is append-only; secrets are registered once at startup and
//!   read concurrently thereafter.
//! - `sanitize` is pure, never fails, and is idempotent: already-redacted
//!   text contains no further matches.
//! - A registered secret must never appear verbatim in sanitized output.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::PoisonError;
use std::sync::RwLock;

use regex::Regex;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Fixed marker substituted for every redacted secret.
pub const REDACTION_MARKER: &str = "[REDACTED]";

/// Case-insensitive pattern for embedded API token parameters.
const TOKEN_PARAM_PATTERN: &str = r#"(?i)\b(pveapitoken)=[^\s'",;]+"#;

/// Case-insensitive pattern for HTTP authorization header values.
const AUTH_HEADER_PATTERN: &str = r"(?i)\b(authorization)\s*:\s*[^\r\n]+";

// ============================================================================
// SECTION: Secret Registry
// ============================================================================

/// Append-only registry of literal secret strings.
///
/// # Invariants
/// - Safe for unsynchronized concurrent reads; writes occur only during
///   startup registration.
/// - Structural patterns are compiled once at construction; a pattern that
///   fails to compile is skipped (covered by unit tests, so this cannot
///   happen for the shipped literals).
pub struct SecretRegistry {
    /// Registered secret literals, in registration order.
    secrets: RwLock<Vec<String>>,
    /// Compiled pattern for embedded token parameters.
    token_pattern: Option<Regex>,
    /// Compiled pattern for authorization header values.
    auth_pattern: Option<Regex>,
}

impl SecretRegistry {
    /// Creates an empty registry with the structural patterns compiled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            secrets: RwLock::new(Vec::new()),
            token_pattern: Regex::new(TOKEN_PARAM_PATTERN).ok(),
            auth_pattern: Regex::new(AUTH_HEADER_PATTERN).ok(),
        }
    }

    /// Appends a literal secret to the registry.
    ///
    /// Empty strings are ignored; duplicates are harmless and kept as-is.
    pub fn register(&self, secret: impl Into<String>) {
        let secret = secret.into();
        if secret.is_empty() {
            return;
        }
        let mut secrets = self.secrets.write().unwrap_or_else(PoisonError::into_inner);
        secrets.push(secret);
    }

    /// Replaces every registered secret and structural credential pattern in
    /// `text` with [`REDACTION_MARKER`].
    #[must_use]
    pub fn sanitize(&self, text: &str) -> String {
        let secrets = self.secrets.read().unwrap_or_else(PoisonError::into_inner);
        let mut out = text.to_string();
        for secret in secrets.iter() {
            if out.contains(secret.as_str()) {
                out = out.replace(secret.as_str(), REDACTION_MARKER);
            }
        }
        drop(secrets);
        if let Some(pattern) = &self.token_pattern {
            out = pattern
                .replace_all(&out, |caps: &regex::Captures<'_>| {
                    let key = caps.get(1).map_or("", |m| m.as_str());
                    format!("{key}={REDACTION_MARKER}")
                })
                .into_owned();
        }
        if let Some(pattern) = &self.auth_pattern {
            out = pattern
                .replace_all(&out, |caps: &regex::Captures<'_>| {
                    let key = caps.get(1).map_or("", |m| m.as_str());
                    format!("{key}: {REDACTION_MARKER}")
                })
                .into_owned();
        }
        out
    }

    /// Returns the number of registered secrets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.secrets.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns true when no secrets are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SecretRegistry {
    fn default() -> Self {
        Self::new()
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

    use super::SecretRegistry;

    #[test]
    fn structural_patterns_compile() {
        let registry = SecretRegistry::new();
        assert!(registry.token_pattern.is_some());
        assert!(registry.auth_pattern.is_some());
    }

    #[test]
    fn register_ignores_empty_secret() {
        let registry = SecretRegistry::new();
        registry.register("");
        assert!(registry.is_empty());
        registry.register("s3cret");
        assert_eq!(registry.len(), 1);
    }
}
