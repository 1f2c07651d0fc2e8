// crates/pve-bridge-core/src/tier.rs
// ============================================================================
// Module: Access Tiers and Tool Categories
// Description: Ordered trust tiers and opaque category labels for tools.
// Purpose: Provide the vocabulary the admission gate filters on.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Access tiers form a total order (`read-only < read-execute < full`); a
//! process configured at tier `T` may expose any capability whose declared
//! minimum tier is at most `T`. Categories are opaque labels grouping tools
//! by subsystem area and are matched exactly against an optional allow-list.
//! Both are immutable for the process lifetime once parsed from
//! configuration.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Access Tier
// ============================================================================

/// Ordered trust tier gating which capabilities a process may expose.
///
/// # Invariants
/// - Variant order is the authoritative total order; derived `Ord` relies on
///   declaration order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "kebab-case")]
pub enum AccessTier {
    /// Inspection-only operations (list, status, config reads).
    #[default]
    ReadOnly,
    /// Side-effecting but non-destructive operations (power actions,
    /// migrations, ad hoc backup runs).
    ReadExecute,
    /// Operations that create or delete durable resources.
    Full,
}

impl AccessTier {
    /// Returns the stable configuration label for the tier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ReadOnly => "read-only",
            Self::ReadExecute => "read-execute",
            Self::Full => "full",
        }
    }
}

impl fmt::Display for AccessTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised when a tier label cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown access tier {0}; expected read-only, read-execute, or full")]
pub struct ParseTierError(String);

impl FromStr for AccessTier {
    type Err = ParseTierError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "read-only" => Ok(Self::ReadOnly),
            "read-execute" => Ok(Self::ReadExecute),
            "full" => Ok(Self::Full),
            other => Err(ParseTierError(other.to_string())),
        }
    }
}

// ============================================================================
// SECTION: Tool Category
// ============================================================================

/// Opaque label grouping capabilities by subsystem area.
///
/// # Invariants
/// - Opaque UTF-8 string; matched exactly, no normalization is applied.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolCategory(String);

impl ToolCategory {
    /// Creates a new category label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Returns the label as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ToolCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for ToolCategory {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ToolCategory {
    fn from(value: String) -> Self {
        Self::new(value)
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

    use std::str::FromStr;

    use super::AccessTier;

    #[test]
    fn tier_order_is_total() {
        assert!(AccessTier::ReadOnly < AccessTier::ReadExecute);
        assert!(AccessTier::ReadExecute < AccessTier::Full);
        assert!(AccessTier::ReadOnly < AccessTier::Full);
    }

    #[test]
    fn tier_labels_round_trip() {
        for tier in [AccessTier::ReadOnly, AccessTier::ReadExecute, AccessTier::Full] {
            assert_eq!(AccessTier::from_str(tier.as_str()).unwrap(), tier);
        }
    }

    #[test]
    fn tier_parse_rejects_unknown_labels() {
        assert!(AccessTier::from_str("admin").is_err());
        assert!(AccessTier::from_str("").is_err());
    }
}
