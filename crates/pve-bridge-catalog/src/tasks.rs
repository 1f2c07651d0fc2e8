// crates/pve-bridge-catalog/src/tasks.rs
// ============================================================================
// Module: Task Tools
// Description: Background task listing, status, log, and cancellation.
// Purpose: Enumerate task-scoped capabilities.
// Dependencies: pve-bridge-core, serde_json
// ============================================================================

//! ## Overview
//! Task inspection sits at `read-only`; stopping a running task sits at
//! `read-execute`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use pve_bridge_core::AccessTier;
use pve_bridge_core::CapabilityDefinition;

use crate::args;
use crate::define::tool;
use crate::schema;

/// Category label for task tools.
const CATEGORY: &str = "tasks";

/// Capability definitions for background task management.
pub(crate) fn definitions() -> Vec<CapabilityDefinition> {
    vec![
        tool(
            "list_tasks",
            "List recent background tasks on a node.",
            AccessTier::ReadOnly,
            CATEGORY,
            schema::object(
                &[
                    ("node", schema::string("Cluster node name")),
                    ("limit", schema::integer("Maximum number of tasks to return")),
                    ("vmid", schema::integer("Only list tasks for this guest")),
                ],
                &["node"],
            ),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    let mut query = args::Query::new();
                    query.add("limit", args::opt_unsigned(&input, "limit"));
                    query.add("vmid", args::opt_unsigned(&input, "vmid"));
                    args::render(&api.get(&query.apply(&format!("/nodes/{node}/tasks"))).await?)
                })
            },
        ),
        tool(
            "get_task_status",
            "Read the status of one background task.",
            AccessTier::ReadOnly,
            CATEGORY,
            schema::object(
                &[
                    ("node", schema::string("Cluster node name")),
                    ("upid", schema::string("Task identifier (UPID)")),
                ],
                &["node", "upid"],
            ),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    let upid = args::segment(&input, "upid")?;
                    args::render(&api.get(&format!("/nodes/{node}/tasks/{upid}/status")).await?)
                })
            },
        ),
        tool(
            "get_task_log",
            "Read the log of one background task.",
            AccessTier::ReadOnly,
            CATEGORY,
            schema::object(
                &[
                    ("node", schema::string("Cluster node name")),
                    ("upid", schema::string("Task identifier (UPID)")),
                    ("start", schema::integer("First log line to return")),
                    ("limit", schema::integer("Maximum number of log lines")),
                ],
                &["node", "upid"],
            ),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    let upid = args::segment(&input, "upid")?;
                    let mut query = args::Query::new();
                    query.add("start", args::opt_unsigned(&input, "start"));
                    query.add("limit", args::opt_unsigned(&input, "limit"));
                    args::render(
                        &api.get(&query.apply(&format!("/nodes/{node}/tasks/{upid}/log"))).await?,
                    )
                })
            },
        ),
        tool(
            "stop_task",
            "Stop a running background task.",
            AccessTier::ReadExecute,
            CATEGORY,
            schema::object(
                &[
                    ("node", schema::string("Cluster node name")),
                    ("upid", schema::string("Task identifier (UPID)")),
                ],
                &["node", "upid"],
            ),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    let upid = args::segment(&input, "upid")?;
                    args::render(&api.delete(&format!("/nodes/{node}/tasks/{upid}")).await?)
                })
            },
        ),
    ]
}
