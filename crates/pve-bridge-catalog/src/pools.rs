// crates/pve-bridge-catalog/src/pools.rs
// ============================================================================
// Module: Pool Tools
// Description: Resource pool listing and membership management.
// Purpose: Enumerate pool-scoped capabilities.
// Dependencies: pve-bridge-core, serde_json
// ============================================================================

//! ## Overview
//! Pool inspection sits at `read-only`; creating, updating, and deleting
//! pools require `full`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use pve_bridge_core::AccessTier;
use pve_bridge_core::CapabilityDefinition;
use serde_json::Map;
use serde_json::Value;

use crate::args;
use crate::define::destructive;
use crate::define::tool;
use crate::schema;

/// Category label for pool tools.
const CATEGORY: &str = "pools";

/// Capability definitions for resource pool management.
pub(crate) fn definitions() -> Vec<CapabilityDefinition> {
    vec![
        tool(
            "list_pools",
            "List resource pools in the cluster.",
            AccessTier::ReadOnly,
            CATEGORY,
            schema::empty(),
            |api, _input| Box::pin(async move { args::render(&api.get("/pools").await?) }),
        ),
        tool(
            "get_pool",
            "Read one resource pool and its members.",
            AccessTier::ReadOnly,
            CATEGORY,
            schema::object(&[("poolid", schema::string("Pool identifier"))], &["poolid"]),
            |api, input| {
                Box::pin(async move {
                    let poolid = args::segment(&input, "poolid")?;
                    args::render(&api.get(&format!("/pools/{poolid}")).await?)
                })
            },
        ),
        tool(
            "create_pool",
            "Create a resource pool.",
            AccessTier::Full,
            CATEGORY,
            schema::object(
                &[
                    ("poolid", schema::string("Pool identifier, must be unused")),
                    ("comment", schema::string("Free-form pool comment")),
                ],
                &["poolid"],
            ),
            |api, input| {
                Box::pin(async move {
                    let poolid = args::segment(&input, "poolid")?;
                    let mut body = Map::new();
                    body.insert("poolid".to_string(), Value::from(poolid));
                    args::copy_fields(&mut body, &input, &["comment"]);
                    args::render(&api.post("/pools", Some(Value::Object(body))).await?)
                })
            },
        ),
        tool(
            "update_pool",
            "Update a resource pool's comment or membership.",
            AccessTier::Full,
            CATEGORY,
            schema::object(
                &[
                    ("poolid", schema::string("Pool identifier")),
                    ("comment", schema::string("New pool comment")),
                    ("vms", schema::string("Comma-separated guest identifiers to add or remove")),
                    ("storage", schema::string("Comma-separated storage identifiers to add or remove")),
                    ("delete", schema::boolean("Remove the listed members instead of adding them")),
                ],
                &["poolid"],
            ),
            |api, input| {
                Box::pin(async move {
                    let poolid = args::segment(&input, "poolid")?;
                    let mut body = Map::new();
                    args::copy_fields(&mut body, &input, &["comment", "vms", "storage", "delete"]);
                    args::render(
                        &api.put(&format!("/pools/{poolid}"), Some(Value::Object(body))).await?,
                    )
                })
            },
        ),
        destructive(
            "delete_pool",
            "Delete a resource pool. Members are released, not deleted.",
            AccessTier::Full,
            CATEGORY,
            schema::object(&[("poolid", schema::string("Pool identifier"))], &["poolid"]),
            |api, input| {
                Box::pin(async move {
                    let poolid = args::segment(&input, "poolid")?;
                    args::render(&api.delete(&format!("/pools/{poolid}")).await?)
                })
            },
        ),
    ]
}
