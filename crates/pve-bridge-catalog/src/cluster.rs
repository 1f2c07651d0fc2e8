// crates/pve-bridge-catalog/src/cluster.rs
// ============================================================================
// Module: Cluster Tools
// Description: Cluster-wide status, resources, options, and log.
// Purpose: Enumerate cluster-scoped capabilities.
// Dependencies: pve-bridge-core, serde_json
// ============================================================================

//! ## Overview
//! Every cluster tool is a pure read and sits at `read-only`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use pve_bridge_core::AccessTier;
use pve_bridge_core::CapabilityDefinition;

use crate::args;
use crate::define::tool;
use crate::schema;

/// Category label for cluster tools.
const CATEGORY: &str = "cluster";

/// Capability definitions for cluster-wide inspection.
pub(crate) fn definitions() -> Vec<CapabilityDefinition> {
    vec![
        tool(
            "get_cluster_status",
            "Read quorum and membership status for the whole cluster.",
            AccessTier::ReadOnly,
            CATEGORY,
            schema::empty(),
            |api, _input| {
                Box::pin(async move { args::render(&api.get("/cluster/status").await?) })
            },
        ),
        tool(
            "list_cluster_resources",
            "List all resources known to the cluster, optionally filtered by type.",
            AccessTier::ReadOnly,
            CATEGORY,
            schema::object(
                &[("type", schema::string("Resource type filter: vm, storage, node, or sdn"))],
                &[],
            ),
            |api, input| {
                Box::pin(async move {
                    let mut query = args::Query::new();
                    query.add("type", args::opt_string(&input, "type"));
                    args::render(&api.get(&query.apply("/cluster/resources")).await?)
                })
            },
        ),
        tool(
            "get_cluster_options",
            "Read cluster-wide datacenter options.",
            AccessTier::ReadOnly,
            CATEGORY,
            schema::empty(),
            |api, _input| {
                Box::pin(async move { args::render(&api.get("/cluster/options").await?) })
            },
        ),
        tool(
            "get_next_vmid",
            "Read the next free guest identifier in the cluster.",
            AccessTier::ReadOnly,
            CATEGORY,
            schema::empty(),
            |api, _input| {
                Box::pin(async move { args::render(&api.get("/cluster/nextid").await?) })
            },
        ),
        tool(
            "list_ha_resources",
            "List resources managed by the high availability stack.",
            AccessTier::ReadOnly,
            CATEGORY,
            schema::empty(),
            |api, _input| {
                Box::pin(async move { args::render(&api.get("/cluster/ha/resources").await?) })
            },
        ),
        tool(
            "get_cluster_log",
            "Read recent entries from the cluster-wide log.",
            AccessTier::ReadOnly,
            CATEGORY,
            schema::object(&[("max", schema::integer("Maximum number of entries"))], &[]),
            |api, input| {
                Box::pin(async move {
                    let mut query = args::Query::new();
                    query.add("max", args::opt_unsigned(&input, "max"));
                    args::render(&api.get(&query.apply("/cluster/log")).await?)
                })
            },
        ),
    ]
}
