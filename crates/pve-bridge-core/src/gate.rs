// crates/pve-bridge-core/src/gate.rs
// ============================================================================
// Module: Capability Gate
// Description: Registration-time admission filter and wrapped execution.
// Purpose: Decide tool exposure once at startup and fail safely per call.
// Dependencies: serde_json, thiserror
// ============================================================================

//! ## Overview
//! The gate applies a pure admission filter exactly once per capability
//! during the startup registration pass, producing an immutable name-indexed
//! registry. At call time, every execution runs through a uniform wrapper
//! that converts handler failures into sanitized, failure-flagged results
//! instead of propagating exceptions.
//!
//! ## Invariants
//! - Admission is decided once per process lifetime; it is never re-evaluated
//!   per call.
//! - A failing capability call never crashes the process and never returns
//!   unsanitized detail.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::api::HypervisorApi;
use crate::capability::CapabilityDefinition;
use crate::capability::ToolName;
use crate::capability::ToolOutcome;
use crate::sanitize::SecretRegistry;
use crate::tier::AccessTier;
use crate::tier::ToolCategory;

// ============================================================================
// SECTION: Admission Filter
// ============================================================================

/// Decides whether a capability is exposed for the process configuration.
///
/// Admission requires the definition's minimum tier to be at most the process
/// tier and, when the category allow-list is non-empty, the definition's
/// category to be listed. Runs exactly once per capability, at startup.
#[must_use]
pub fn admit(
    definition: &CapabilityDefinition,
    tier: AccessTier,
    categories: &[ToolCategory],
) -> bool {
    if definition.min_tier > tier {
        return false;
    }
    if !categories.is_empty() && !categories.contains(&definition.category) {
        return false;
    }
    true
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failure raised while building the tool registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Two catalog entries share the same name.
    #[error("duplicate tool name: {0}")]
    DuplicateName(ToolName),
}

// ============================================================================
// SECTION: Tool Registry
// ============================================================================

/// Immutable set of admitted capabilities, indexed by name.
///
/// # Invariants
/// - Built once per process start; there is no dynamic unregistration path.
/// - Every failure surfaced by [`ToolRegistry::execute`] has passed through
///   the sanitizer.
pub struct ToolRegistry {
    /// Admitted capabilities keyed by unique name.
    tools: BTreeMap<ToolName, CapabilityDefinition>,
    /// Process-wide secret registry used to scrub failure text.
    secrets: Arc<SecretRegistry>,
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tools)
            .finish_non_exhaustive()
    }
}

impl ToolRegistry {
    /// Walks the catalog once, admits eligible capabilities, and indexes them.
    ///
    /// Duplicate names anywhere in the catalog are a startup failure, even
    /// when one of the duplicates would not have been admitted.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateName`] when two definitions collide.
    pub fn build(
        catalog: Vec<CapabilityDefinition>,
        tier: AccessTier,
        categories: &[ToolCategory],
        secrets: Arc<SecretRegistry>,
    ) -> Result<Self, CatalogError> {
        let mut seen = std::collections::BTreeSet::new();
        let mut tools = BTreeMap::new();
        for definition in catalog {
            if !seen.insert(definition.name.clone()) {
                return Err(CatalogError::DuplicateName(definition.name));
            }
            if admit(&definition, tier, categories) {
                tools.insert(definition.name.clone(), definition);
            }
        }
        Ok(Self {
            tools,
            secrets,
        })
    }

    /// Returns the admitted capability with the given name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CapabilityDefinition> {
        self.tools.get(&ToolName::new(name))
    }

    /// Returns true when a capability with the given name is admitted.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(&ToolName::new(name))
    }

    /// Iterates over admitted capabilities in name order.
    pub fn iter(&self) -> impl Iterator<Item = &CapabilityDefinition> {
        self.tools.values()
    }

    /// Returns the number of admitted capabilities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns true when no capability was admitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Scrubs registered secrets from text that may reach a caller.
    ///
    /// Callers that compose failure text outside [`ToolRegistry::execute`],
    /// such as validation-rejection messages that echo the offending input,
    /// route it through here before returning it.
    #[must_use]
    pub fn sanitize(&self, text: &str) -> String {
        self.secrets.sanitize(text)
    }

    /// Executes an admitted capability through the uniform failure wrapper.
    ///
    /// Returns `None` for unknown tool names. On handler failure the outcome
    /// carries the sanitized failure text with `is_error` set; the failure is
    /// never propagated.
    pub async fn execute(
        &self,
        name: &str,
        client: &dyn HypervisorApi,
        input: Value,
    ) -> Option<ToolOutcome> {
        let definition = self.tools.get(&ToolName::new(name))?;
        let outcome = match (definition.handler)(client, input).await {
            Ok(text) => ToolOutcome {
                text,
                is_error: false,
            },
            Err(err) => ToolOutcome {
                text: self.secrets.sanitize(&err.to_string()),
                is_error: true,
            },
        };
        Some(outcome)
    }
}
