// crates/pve-bridge-catalog/src/define.rs
// ============================================================================
// Module: Definition Builders
// Description: Constructors shared by every catalog module.
// Purpose: Keep the mechanical tool enumeration terse and uniform.
// Dependencies: pve-bridge-core, serde_json
// ============================================================================

//! ## Overview
//! Two constructors cover the whole catalog: [`tool`] for ordinary
//! capabilities and [`destructive`] for capabilities that delete or
//! irreversibly alter durable resources.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use pve_bridge_core::AccessTier;
use pve_bridge_core::CapabilityDefinition;
use pve_bridge_core::HandlerFuture;
use pve_bridge_core::HypervisorApi;
use pve_bridge_core::ToolCategory;
use pve_bridge_core::ToolName;
use serde_json::Value;

// ============================================================================
// SECTION: Constructors
// ============================================================================

/// Builds a capability definition with no destructive flag.
pub(crate) fn tool<F>(
    name: &str,
    description: &str,
    min_tier: AccessTier,
    category: &str,
    input_schema: Value,
    handler: F,
) -> CapabilityDefinition
where
    F: for<'a> Fn(&'a dyn HypervisorApi, Value) -> HandlerFuture<'a> + Send + Sync + 'static,
{
    CapabilityDefinition {
        name: ToolName::new(name),
        description: description.to_string(),
        min_tier,
        category: ToolCategory::new(category),
        input_schema,
        destructive: None,
        handler: Arc::new(handler),
    }
}

/// Builds a capability definition flagged destructive.
pub(crate) fn destructive<F>(
    name: &str,
    description: &str,
    min_tier: AccessTier,
    category: &str,
    input_schema: Value,
    handler: F,
) -> CapabilityDefinition
where
    F: for<'a> Fn(&'a dyn HypervisorApi, Value) -> HandlerFuture<'a> + Send + Sync + 'static,
{
    CapabilityDefinition {
        destructive: Some(true),
        ..tool(name, description, min_tier, category, input_schema, handler)
    }
}
