// crates/pve-bridge-catalog/src/nodes.rs
// ============================================================================
// Module: Node Tools
// Description: Cluster node inspection, services, and power control.
// Purpose: Enumerate node-scoped capabilities.
// Dependencies: pve-bridge-core, serde_json
// ============================================================================

//! ## Overview
//! Node inspection sits at `read-only`; service control and node power
//! actions sit at `read-execute`, with power actions flagged destructive.

// ============================================================================
// SECTION: Imports
// ============================================================================

use pve_bridge_core::AccessTier;
use pve_bridge_core::CapabilityDefinition;
use serde_json::json;

use crate::args;
use crate::define::destructive;
use crate::define::tool;
use crate::schema;

/// Category label for node tools.
const CATEGORY: &str = "nodes";

/// Capability definitions for cluster node management.
pub(crate) fn definitions() -> Vec<CapabilityDefinition> {
    vec![
        tool(
            "list_nodes",
            "List all nodes in the cluster with their status.",
            AccessTier::ReadOnly,
            CATEGORY,
            schema::empty(),
            |api, _input| Box::pin(async move { args::render(&api.get("/nodes").await?) }),
        ),
        tool(
            "get_node_status",
            "Read CPU, memory, and uptime details for a node.",
            AccessTier::ReadOnly,
            CATEGORY,
            schema::object(&[("node", schema::string("Cluster node name"))], &["node"]),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    args::render(&api.get(&format!("/nodes/{node}/status")).await?)
                })
            },
        ),
        tool(
            "get_node_version",
            "Read the package versions installed on a node.",
            AccessTier::ReadOnly,
            CATEGORY,
            schema::object(&[("node", schema::string("Cluster node name"))], &["node"]),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    args::render(&api.get(&format!("/nodes/{node}/version")).await?)
                })
            },
        ),
        tool(
            "get_node_time",
            "Read the system time and timezone of a node.",
            AccessTier::ReadOnly,
            CATEGORY,
            schema::object(&[("node", schema::string("Cluster node name"))], &["node"]),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    args::render(&api.get(&format!("/nodes/{node}/time")).await?)
                })
            },
        ),
        tool(
            "get_node_dns",
            "Read the DNS resolver configuration of a node.",
            AccessTier::ReadOnly,
            CATEGORY,
            schema::object(&[("node", schema::string("Cluster node name"))], &["node"]),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    args::render(&api.get(&format!("/nodes/{node}/dns")).await?)
                })
            },
        ),
        tool(
            "list_node_services",
            "List system services on a node with their run state.",
            AccessTier::ReadOnly,
            CATEGORY,
            schema::object(&[("node", schema::string("Cluster node name"))], &["node"]),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    args::render(&api.get(&format!("/nodes/{node}/services")).await?)
                })
            },
        ),
        tool(
            "get_service_state",
            "Read the run state of one system service on a node.",
            AccessTier::ReadOnly,
            CATEGORY,
            schema::object(
                &[
                    ("node", schema::string("Cluster node name")),
                    ("service", schema::string("Service identifier, for example pveproxy")),
                ],
                &["node", "service"],
            ),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    let service = args::segment(&input, "service")?;
                    args::render(
                        &api.get(&format!("/nodes/{node}/services/{service}/state")).await?,
                    )
                })
            },
        ),
        tool(
            "start_service",
            "Start a system service on a node.",
            AccessTier::ReadExecute,
            CATEGORY,
            schema::object(
                &[
                    ("node", schema::string("Cluster node name")),
                    ("service", schema::string("Service identifier")),
                ],
                &["node", "service"],
            ),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    let service = args::segment(&input, "service")?;
                    args::render(
                        &api.post(&format!("/nodes/{node}/services/{service}/start"), None)
                            .await?,
                    )
                })
            },
        ),
        tool(
            "stop_service",
            "Stop a system service on a node.",
            AccessTier::ReadExecute,
            CATEGORY,
            schema::object(
                &[
                    ("node", schema::string("Cluster node name")),
                    ("service", schema::string("Service identifier")),
                ],
                &["node", "service"],
            ),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    let service = args::segment(&input, "service")?;
                    args::render(
                        &api.post(&format!("/nodes/{node}/services/{service}/stop"), None).await?,
                    )
                })
            },
        ),
        tool(
            "restart_service",
            "Restart a system service on a node.",
            AccessTier::ReadExecute,
            CATEGORY,
            schema::object(
                &[
                    ("node", schema::string("Cluster node name")),
                    ("service", schema::string("Service identifier")),
                ],
                &["node", "service"],
            ),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    let service = args::segment(&input, "service")?;
                    args::render(
                        &api.post(&format!("/nodes/{node}/services/{service}/restart"), None)
                            .await?,
                    )
                })
            },
        ),
        destructive(
            "reboot_node",
            "Reboot a cluster node. Running guests are interrupted unless HA moves them.",
            AccessTier::ReadExecute,
            CATEGORY,
            schema::object(&[("node", schema::string("Cluster node name"))], &["node"]),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    args::render(
                        &api.post(
                            &format!("/nodes/{node}/status"),
                            Some(json!({"command": "reboot"})),
                        )
                        .await?,
                    )
                })
            },
        ),
        destructive(
            "shutdown_node",
            "Shut down a cluster node. Running guests are interrupted unless HA moves them.",
            AccessTier::ReadExecute,
            CATEGORY,
            schema::object(&[("node", schema::string("Cluster node name"))], &["node"]),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    args::render(
                        &api.post(
                            &format!("/nodes/{node}/status"),
                            Some(json!({"command": "shutdown"})),
                        )
                        .await?,
                    )
                })
            },
        ),
    ]
}
