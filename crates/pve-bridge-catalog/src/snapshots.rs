// crates/pve-bridge-catalog/src/snapshots.rs
// ============================================================================
// Module: Snapshot Tools
// Description: Guest snapshot listing, creation, rollback, and removal.
// Purpose: Enumerate snapshot-scoped capabilities.
// Dependencies: pve-bridge-core, serde_json
// ============================================================================

//! ## Overview
//! Snapshot inspection sits at `read-only`. Creating, rolling back, and
//! deleting snapshots all require `full`; rollback discards state newer than
//! the snapshot and is flagged destructive along with deletion.

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

/// Category label for snapshot tools.
const CATEGORY: &str = "snapshots";

/// Capability definitions for guest snapshot management.
pub(crate) fn definitions() -> Vec<CapabilityDefinition> {
    vec![
        tool(
            "list_snapshots",
            "List snapshots of a QEMU virtual machine.",
            AccessTier::ReadOnly,
            CATEGORY,
            schema::object(
                &[
                    ("node", schema::string("Cluster node hosting the VM")),
                    ("vmid", schema::integer("VM identifier")),
                ],
                &["node", "vmid"],
            ),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    let vmid = args::unsigned(&input, "vmid")?;
                    args::render(&api.get(&format!("/nodes/{node}/qemu/{vmid}/snapshot")).await?)
                })
            },
        ),
        tool(
            "get_snapshot_config",
            "Read the configuration stored in one VM snapshot.",
            AccessTier::ReadOnly,
            CATEGORY,
            schema::object(
                &[
                    ("node", schema::string("Cluster node hosting the VM")),
                    ("vmid", schema::integer("VM identifier")),
                    ("snapname", schema::string("Snapshot name")),
                ],
                &["node", "vmid", "snapname"],
            ),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    let vmid = args::unsigned(&input, "vmid")?;
                    let snapname = args::segment(&input, "snapname")?;
                    args::render(
                        &api.get(&format!("/nodes/{node}/qemu/{vmid}/snapshot/{snapname}/config"))
                            .await?,
                    )
                })
            },
        ),
        tool(
            "create_snapshot",
            "Create a snapshot of a QEMU virtual machine.",
            AccessTier::Full,
            CATEGORY,
            schema::object(
                &[
                    ("node", schema::string("Cluster node hosting the VM")),
                    ("vmid", schema::integer("VM identifier")),
                    ("snapname", schema::string("Snapshot name, must be unused")),
                    ("description", schema::string("Free-form snapshot description")),
                    ("vmstate", schema::boolean("Include RAM state in the snapshot")),
                ],
                &["node", "vmid", "snapname"],
            ),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    let vmid = args::unsigned(&input, "vmid")?;
                    let snapname = args::segment(&input, "snapname")?;
                    let mut body = Map::new();
                    body.insert("snapname".to_string(), Value::from(snapname));
                    args::copy_fields(&mut body, &input, &["description", "vmstate"]);
                    args::render(
                        &api.post(
                            &format!("/nodes/{node}/qemu/{vmid}/snapshot"),
                            Some(Value::Object(body)),
                        )
                        .await?,
                    )
                })
            },
        ),
        destructive(
            "rollback_snapshot",
            "Roll a QEMU virtual machine back to a snapshot, discarding newer state.",
            AccessTier::Full,
            CATEGORY,
            schema::object(
                &[
                    ("node", schema::string("Cluster node hosting the VM")),
                    ("vmid", schema::integer("VM identifier")),
                    ("snapname", schema::string("Snapshot name to roll back to")),
                ],
                &["node", "vmid", "snapname"],
            ),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    let vmid = args::unsigned(&input, "vmid")?;
                    let snapname = args::segment(&input, "snapname")?;
                    args::render(
                        &api.post(
                            &format!("/nodes/{node}/qemu/{vmid}/snapshot/{snapname}/rollback"),
                            None,
                        )
                        .await?,
                    )
                })
            },
        ),
        destructive(
            "delete_snapshot",
            "Delete one snapshot of a QEMU virtual machine.",
            AccessTier::Full,
            CATEGORY,
            schema::object(
                &[
                    ("node", schema::string("Cluster node hosting the VM")),
                    ("vmid", schema::integer("VM identifier")),
                    ("snapname", schema::string("Snapshot name to delete")),
                ],
                &["node", "vmid", "snapname"],
            ),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    let vmid = args::unsigned(&input, "vmid")?;
                    let snapname = args::segment(&input, "snapname")?;
                    args::render(
                        &api.delete(&format!("/nodes/{node}/qemu/{vmid}/snapshot/{snapname}"))
                            .await?,
                    )
                })
            },
        ),
        tool(
            "list_container_snapshots",
            "List snapshots of an LXC container.",
            AccessTier::ReadOnly,
            CATEGORY,
            schema::object(
                &[
                    ("node", schema::string("Cluster node hosting the container")),
                    ("vmid", schema::integer("Container identifier")),
                ],
                &["node", "vmid"],
            ),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    let vmid = args::unsigned(&input, "vmid")?;
                    args::render(&api.get(&format!("/nodes/{node}/lxc/{vmid}/snapshot")).await?)
                })
            },
        ),
        tool(
            "create_container_snapshot",
            "Create a snapshot of an LXC container.",
            AccessTier::Full,
            CATEGORY,
            schema::object(
                &[
                    ("node", schema::string("Cluster node hosting the container")),
                    ("vmid", schema::integer("Container identifier")),
                    ("snapname", schema::string("Snapshot name, must be unused")),
                    ("description", schema::string("Free-form snapshot description")),
                ],
                &["node", "vmid", "snapname"],
            ),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    let vmid = args::unsigned(&input, "vmid")?;
                    let snapname = args::segment(&input, "snapname")?;
                    let mut body = Map::new();
                    body.insert("snapname".to_string(), Value::from(snapname));
                    args::copy_fields(&mut body, &input, &["description"]);
                    args::render(
                        &api.post(
                            &format!("/nodes/{node}/lxc/{vmid}/snapshot"),
                            Some(Value::Object(body)),
                        )
                        .await?,
                    )
                })
            },
        ),
        destructive(
            "delete_container_snapshot",
            "Delete one snapshot of an LXC container.",
            AccessTier::Full,
            CATEGORY,
            schema::object(
                &[
                    ("node", schema::string("Cluster node hosting the container")),
                    ("vmid", schema::integer("Container identifier")),
                    ("snapname", schema::string("Snapshot name to delete")),
                ],
                &["node", "vmid", "snapname"],
            ),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    let vmid = args::unsigned(&input, "vmid")?;
                    let snapname = args::segment(&input, "snapname")?;
                    args::render(
                        &api.delete(&format!("/nodes/{node}/lxc/{vmid}/snapshot/{snapname}"))
                            .await?,
                    )
                })
            },
        ),
    ]
}
