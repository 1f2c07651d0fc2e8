// crates/pve-bridge-mcp/src/dispatch.rs
// ============================================================================
// Module: Tool Dispatch
// Description: Schema-validated dispatch into the admitted tool registry.
// Purpose: Turn named tool calls with raw arguments into wrapped outcomes.
// Dependencies: pve-bridge-core, jsonschema, serde, serde_json
// ============================================================================

//! ## Overview
//! The dispatcher sits between the JSON-RPC transports and the registry. At
//! startup it compiles one validator per admitted tool from the tool's input
//! contract; at call time it validates arguments before the handler runs, so
//! handlers only ever see payloads that satisfy their schema. Listing
//! produces the wire-level descriptors with read-only and destructive
//! annotations.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use jsonschema::Draft;
use jsonschema::Validator;
use pve_bridge_core::HypervisorApi;
use pve_bridge_core::ToolName;
use pve_bridge_core::ToolOutcome;
use pve_bridge_core::ToolRegistry;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failure raised by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The named tool is not in the admitted registry.
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    /// The arguments did not satisfy the tool's input contract.
    #[error("invalid params: {0}")]
    InvalidParams(String),
    /// A tool input contract failed to compile at startup.
    #[error("invalid input schema for tool {0}")]
    InvalidSchema(String),
}

// ============================================================================
// SECTION: Wire Descriptors
// ============================================================================

/// Behavior hints attached to a tool descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolAnnotations {
    /// True when the tool cannot modify backend state.
    #[serde(rename = "readOnlyHint")]
    pub read_only: bool,
    /// True when the tool deletes or irreversibly alters durable resources.
    #[serde(rename = "destructiveHint")]
    pub destructive: bool,
}

/// One tool as presented in a `tools/list` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolDescriptor {
    /// Unique tool name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// JSON Schema input contract.
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
    /// Behavior hints.
    pub annotations: ToolAnnotations,
}

// ============================================================================
// SECTION: Dispatcher
// ============================================================================

/// Schema-validating front door to the admitted registry.
///
/// # Invariants
/// - Holds one compiled validator per admitted tool; no call reaches a
///   handler without passing its validator.
pub struct ToolDispatcher {
    /// Admitted capabilities.
    registry: ToolRegistry,
    /// Backend client shared by every handler invocation.
    client: Arc<dyn HypervisorApi>,
    /// Compiled input contract validators keyed by tool name.
    validators: BTreeMap<ToolName, Validator>,
}

impl ToolDispatcher {
    /// Builds a dispatcher, compiling one validator per admitted tool.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::InvalidSchema`] when a tool's input contract
    /// does not compile. This is a startup failure: the catalog is static, so
    /// a broken contract is a defect rather than a runtime condition.
    pub fn new(
        registry: ToolRegistry,
        client: Arc<dyn HypervisorApi>,
    ) -> Result<Self, DispatchError> {
        let mut validators = BTreeMap::new();
        for definition in registry.iter() {
            let validator = jsonschema::options()
                .with_draft(Draft::Draft202012)
                .build(&definition.input_schema)
                .map_err(|_| DispatchError::InvalidSchema(definition.name.to_string()))?;
            validators.insert(definition.name.clone(), validator);
        }
        Ok(Self {
            registry,
            client,
            validators,
        })
    }

    /// Returns the number of admitted tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Returns true when no tool was admitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Lists admitted tools as wire descriptors, in name order.
    #[must_use]
    pub fn list_tools(&self) -> Vec<ToolDescriptor> {
        self.registry
            .iter()
            .map(|definition| ToolDescriptor {
                name: definition.name.to_string(),
                description: definition.description.clone(),
                input_schema: definition.input_schema.clone(),
                annotations: ToolAnnotations {
                    read_only: definition.read_only_hint(),
                    destructive: definition.destructive_hint(),
                },
            })
            .collect()
    }

    /// Validates arguments and executes the named tool.
    ///
    /// Handler failures do not surface here; the registry wraps them into a
    /// failure-flagged outcome with sanitized text.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::UnknownTool`] for names outside the admitted
    /// registry and [`DispatchError::InvalidParams`] when the arguments fail
    /// schema validation.
    pub async fn call(&self, name: &str, arguments: Value) -> Result<ToolOutcome, DispatchError> {
        let validator = self
            .validators
            .get(&ToolName::new(name))
            .ok_or_else(|| DispatchError::UnknownTool(name.to_string()))?;
        let violations: Vec<String> =
            validator.iter_errors(&arguments).map(|err| err.to_string()).collect();
        if !violations.is_empty() {
            // Violation messages echo the offending instance value, which may
            // be a credential pasted into the wrong field.
            return Err(DispatchError::InvalidParams(
                self.registry.sanitize(&violations.join("; ")),
            ));
        }
        self.registry
            .execute(name, self.client.as_ref(), arguments)
            .await
            .ok_or_else(|| DispatchError::UnknownTool(name.to_string()))
    }
}
