// crates/pve-bridge-core/tests/gate.rs
// ============================================================================
// Module: Capability Gate Tests
// Description: Admission filter and wrapped execution behavior.
// Purpose: Validate tier/category gating and sanitized failure results.
// Dependencies: pve-bridge-core, serde_json, tokio
// ============================================================================

//! ## Overview
//! Exercises the registration-time admission filter with boundary cases for
//! both conjuncts (tier and category), duplicate-name rejection, and the
//! execution wrapper's sanitized failure handling.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test-only assertions favor direct unwrap/expect for clarity."
)]

use std::sync::Arc;

use async_trait::async_trait;
use pve_bridge_core::AccessTier;
use pve_bridge_core::ApiError;
use pve_bridge_core::CapabilityDefinition;
use pve_bridge_core::CatalogError;
use pve_bridge_core::HypervisorApi;
use pve_bridge_core::REDACTION_MARKER;
use pve_bridge_core::SecretRegistry;
use pve_bridge_core::ToolCategory;
use pve_bridge_core::ToolExecError;
use pve_bridge_core::ToolName;
use pve_bridge_core::ToolRegistry;
use pve_bridge_core::admit;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Test Helpers
// ============================================================================

/// Backend stub that rejects every call with a fixed failure message.
struct FailingApi {
    /// Message embedded in every failure.
    message: String,
}

#[async_trait]
impl HypervisorApi for FailingApi {
    async fn get(&self, _path: &str) -> Result<Value, ApiError> {
        Err(ApiError::Connection {
            detail: self.message.clone(),
        })
    }

    async fn post(&self, _path: &str, _body: Option<Value>) -> Result<Value, ApiError> {
        Err(ApiError::Connection {
            detail: self.message.clone(),
        })
    }

    async fn put(&self, _path: &str, _body: Option<Value>) -> Result<Value, ApiError> {
        Err(ApiError::Connection {
            detail: self.message.clone(),
        })
    }

    async fn delete(&self, _path: &str) -> Result<Value, ApiError> {
        Err(ApiError::Connection {
            detail: self.message.clone(),
        })
    }
}

/// Builds a definition with the given name, tier, and category.
fn definition(name: &str, tier: AccessTier, category: &str) -> CapabilityDefinition {
    CapabilityDefinition {
        name: ToolName::new(name),
        description: format!("test tool {name}"),
        min_tier: tier,
        category: ToolCategory::new(category),
        input_schema: json!({"type": "object", "properties": {}}),
        destructive: None,
        handler: Arc::new(|api, _input| {
            Box::pin(async move {
                api.get("/version").await?;
                Ok("ok".to_string())
            })
        }),
    }
}

/// Builds a definition whose handler fails with the given message.
fn failing_definition(name: &str, message: &str) -> CapabilityDefinition {
    let message = message.to_string();
    CapabilityDefinition {
        handler: Arc::new(move |_api, _input| {
            let message = message.clone();
            Box::pin(async move { Err(ToolExecError::Failed(message)) })
        }),
        ..definition(name, AccessTier::ReadOnly, "nodes")
    }
}

// ============================================================================
// SECTION: Admission Filter
// ============================================================================

#[test]
fn admit_accepts_tier_exactly_equal() {
    let def = definition("start_vm", AccessTier::ReadExecute, "vms");
    assert!(admit(&def, AccessTier::ReadExecute, &[]));
}

#[test]
fn admit_rejects_tier_above_process_tier() {
    let def = definition("delete_vm", AccessTier::Full, "vms");
    assert!(!admit(&def, AccessTier::ReadExecute, &[]));
    assert!(!admit(&def, AccessTier::ReadOnly, &[]));
}

#[test]
fn admit_accepts_lower_tier_under_full() {
    let def = definition("list_vms", AccessTier::ReadOnly, "vms");
    assert!(admit(&def, AccessTier::Full, &[]));
}

#[test]
fn admit_empty_category_list_permits_all_categories() {
    let def = definition("list_storage", AccessTier::ReadOnly, "storage");
    assert!(admit(&def, AccessTier::ReadOnly, &[]));
}

#[test]
fn admit_single_matching_category_passes() {
    let def = definition("list_storage", AccessTier::ReadOnly, "storage");
    assert!(admit(&def, AccessTier::ReadOnly, &[ToolCategory::new("storage")]));
}

#[test]
fn admit_category_filter_overrides_tier_eligibility() {
    // Tier-eligible tool in an unlisted category must be rejected.
    let def = definition("list_networks", AccessTier::ReadOnly, "network");
    assert!(!admit(&def, AccessTier::Full, &[ToolCategory::new("storage")]));
}

// ============================================================================
// SECTION: Registry Construction
// ============================================================================

#[test]
fn build_excludes_full_tier_tool_from_read_only_process() {
    let catalog = vec![
        definition("list_vms", AccessTier::ReadOnly, "vms"),
        definition("create_vm", AccessTier::Full, "vms"),
    ];
    let registry =
        ToolRegistry::build(catalog, AccessTier::ReadOnly, &[], Arc::new(SecretRegistry::new()))
            .unwrap();
    assert!(registry.contains("list_vms"));
    assert!(!registry.contains("create_vm"));
    assert_eq!(registry.len(), 1);
}

#[test]
fn build_applies_category_filter_at_full_tier() {
    let catalog = vec![
        definition("list_storage", AccessTier::ReadOnly, "storage"),
        definition("list_networks", AccessTier::ReadOnly, "network"),
    ];
    let registry = ToolRegistry::build(
        catalog,
        AccessTier::Full,
        &[ToolCategory::new("storage")],
        Arc::new(SecretRegistry::new()),
    )
    .unwrap();
    assert!(registry.contains("list_storage"));
    assert!(!registry.contains("list_networks"));
}

#[test]
fn build_rejects_duplicate_names() {
    let catalog = vec![
        definition("list_vms", AccessTier::ReadOnly, "vms"),
        definition("list_vms", AccessTier::Full, "vms"),
    ];
    let err =
        ToolRegistry::build(catalog, AccessTier::Full, &[], Arc::new(SecretRegistry::new()))
            .unwrap_err();
    assert_eq!(err, CatalogError::DuplicateName(ToolName::new("list_vms")));
}

// ============================================================================
// SECTION: Execution Wrapper
// ============================================================================

#[tokio::test]
async fn execute_returns_success_text() {
    let message = "unreachable".to_string();
    let catalog = vec![CapabilityDefinition {
        handler: Arc::new(|_api, _input| Box::pin(async { Ok("3 nodes online".to_string()) })),
        ..definition("list_nodes", AccessTier::ReadOnly, "nodes")
    }];
    let registry =
        ToolRegistry::build(catalog, AccessTier::ReadOnly, &[], Arc::new(SecretRegistry::new()))
            .unwrap();
    let api = FailingApi {
        message,
    };
    let outcome = registry.execute("list_nodes", &api, json!({})).await.unwrap();
    assert!(!outcome.is_error);
    assert_eq!(outcome.text, "3 nodes online");
}

#[tokio::test]
async fn execute_unknown_tool_returns_none() {
    let registry =
        ToolRegistry::build(Vec::new(), AccessTier::Full, &[], Arc::new(SecretRegistry::new()))
            .unwrap();
    let api = FailingApi {
        message: "down".to_string(),
    };
    assert!(registry.execute("missing", &api, json!({})).await.is_none());
}

#[tokio::test]
async fn execute_failure_is_flagged_not_propagated() {
    let catalog = vec![definition("get_status", AccessTier::ReadOnly, "nodes")];
    let registry =
        ToolRegistry::build(catalog, AccessTier::ReadOnly, &[], Arc::new(SecretRegistry::new()))
            .unwrap();
    let api = FailingApi {
        message: "backend unreachable".to_string(),
    };
    let outcome = registry.execute("get_status", &api, json!({})).await.unwrap();
    assert!(outcome.is_error);
    assert!(outcome.text.contains("connection failed"));
}

#[tokio::test]
async fn execute_failure_redacts_registered_secret() {
    let secrets = Arc::new(SecretRegistry::new());
    secrets.register("9a3d2f60-1b5c-4e7d-8f90-abc123def456");
    let catalog = vec![failing_definition(
        "leaky_tool",
        "request rejected for token 9a3d2f60-1b5c-4e7d-8f90-abc123def456",
    )];
    let registry =
        ToolRegistry::build(catalog, AccessTier::ReadOnly, &[], Arc::clone(&secrets)).unwrap();
    let api = FailingApi {
        message: String::new(),
    };
    let outcome = registry.execute("leaky_tool", &api, json!({})).await.unwrap();
    assert!(outcome.is_error);
    assert!(!outcome.text.contains("9a3d2f60-1b5c-4e7d-8f90-abc123def456"));
    assert!(outcome.text.contains(REDACTION_MARKER));
}
