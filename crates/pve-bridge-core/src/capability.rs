// crates/pve-bridge-core/src/capability.rs
// ============================================================================
// Module: Capability Definitions
// Description: Named, tiered, schema-carrying tool definitions.
// Purpose: Describe one callable operation and its execution logic.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! A capability definition bundles everything the gate needs to decide
//! admission and execute a tool: unique name, description, minimum access
//! tier, category, JSON Schema input contract, an optional destructive flag,
//! and the handler closure. Definitions are created once at catalog-load time
//! and never mutated.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::api::ApiError;
use crate::api::HypervisorApi;
use crate::tier::AccessTier;
use crate::tier::ToolCategory;

// ============================================================================
// SECTION: Tool Name
// ============================================================================

/// Unique, process-wide tool name.
///
/// # Invariants
/// - Opaque UTF-8 string; uniqueness is enforced when the registry is built.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolName(String);

impl ToolName {
    /// Creates a new tool name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for ToolName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// SECTION: Execution Types
// ============================================================================

/// Boxed future returned by a tool handler.
pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = Result<String, ToolExecError>> + Send + 'a>>;

/// Tool execution logic: validated input plus a backend client handle,
/// producing text or a typed failure.
pub type ToolHandler =
    Arc<dyn for<'a> Fn(&'a dyn HypervisorApi, Value) -> HandlerFuture<'a> + Send + Sync>;

/// Failure raised by a tool handler.
#[derive(Debug, Error)]
pub enum ToolExecError {
    /// Backend request failure, already sanitized and classified.
    #[error(transparent)]
    Api(#[from] ApiError),
    /// The input payload did not satisfy the handler's expectations.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Any other execution failure.
    #[error("{0}")]
    Failed(String),
}

/// Result of one wrapped tool execution.
///
/// # Invariants
/// - When `is_error` is true, `text` has passed through the sanitizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolOutcome {
    /// Textual result or sanitized failure description.
    pub text: String,
    /// True when the execution failed.
    pub is_error: bool,
}

// ============================================================================
// SECTION: Capability Definition
// ============================================================================

/// One callable capability supplied by the catalog.
///
/// # Invariants
/// - Created once at catalog-load time; never mutated afterwards.
/// - `name` is unique across the whole catalog.
#[derive(Clone)]
pub struct CapabilityDefinition {
    /// Unique tool name.
    pub name: ToolName,
    /// Human-readable description exposed to callers.
    pub description: String,
    /// Minimum access tier required to expose this tool.
    pub min_tier: AccessTier,
    /// Category label used for optional allow-listing.
    pub category: ToolCategory,
    /// JSON Schema describing the tool input contract.
    pub input_schema: Value,
    /// Whether the tool deletes or irreversibly alters durable resources.
    /// Absent means non-destructive.
    pub destructive: Option<bool>,
    /// Execution logic invoked with validated input.
    pub handler: ToolHandler,
}

impl CapabilityDefinition {
    /// Returns the destructive hint exposed in tool metadata.
    ///
    /// Capabilities without a declared flag are treated as non-destructive.
    #[must_use]
    pub fn destructive_hint(&self) -> bool {
        self.destructive.unwrap_or(false)
    }

    /// Returns the read-only hint exposed in tool metadata.
    #[must_use]
    pub fn read_only_hint(&self) -> bool {
        self.min_tier == AccessTier::ReadOnly
    }
}

impl fmt::Debug for CapabilityDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityDefinition")
            .field("name", &self.name)
            .field("min_tier", &self.min_tier)
            .field("category", &self.category)
            .field("destructive", &self.destructive)
            .finish_non_exhaustive()
    }
}
