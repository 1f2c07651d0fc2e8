// crates/pve-bridge-catalog/src/vms.rs
// ============================================================================
// Module: Virtual Machine Tools
// Description: QEMU virtual machine lifecycle, configuration, and migration.
// Purpose: Enumerate VM-scoped capabilities.
// Dependencies: pve-bridge-core, serde_json
// ============================================================================

//! ## Overview
//! VM inspection sits at `read-only`; power transitions and migration sit at
//! `read-execute`; creating, cloning, reconfiguring, and deleting guests
//! require `full`. Hard stop, reset, and deletion are flagged destructive.

// ============================================================================
// SECTION: Imports
// ============================================================================

use pve_bridge_core::AccessTier;
use pve_bridge_core::CapabilityDefinition;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;

use crate::args;
use crate::define::destructive;
use crate::define::tool;
use crate::schema;

/// Category label for virtual machine tools.
const CATEGORY: &str = "vms";

/// Schema shared by every `{node, vmid}` addressed tool.
fn vm_address() -> Value {
    schema::object(
        &[
            ("node", schema::string("Cluster node hosting the VM")),
            ("vmid", schema::integer("VM identifier")),
        ],
        &["node", "vmid"],
    )
}

/// Capability definitions for QEMU virtual machine management.
pub(crate) fn definitions() -> Vec<CapabilityDefinition> {
    vec![
        tool(
            "list_vms",
            "List QEMU virtual machines on a node.",
            AccessTier::ReadOnly,
            CATEGORY,
            schema::object(&[("node", schema::string("Cluster node name"))], &["node"]),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    args::render(&api.get(&format!("/nodes/{node}/qemu")).await?)
                })
            },
        ),
        tool(
            "get_vm_status",
            "Read the current status of a QEMU virtual machine.",
            AccessTier::ReadOnly,
            CATEGORY,
            vm_address(),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    let vmid = args::unsigned(&input, "vmid")?;
                    args::render(
                        &api.get(&format!("/nodes/{node}/qemu/{vmid}/status/current")).await?,
                    )
                })
            },
        ),
        tool(
            "get_vm_config",
            "Read the configuration of a QEMU virtual machine.",
            AccessTier::ReadOnly,
            CATEGORY,
            vm_address(),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    let vmid = args::unsigned(&input, "vmid")?;
                    args::render(&api.get(&format!("/nodes/{node}/qemu/{vmid}/config")).await?)
                })
            },
        ),
        tool(
            "start_vm",
            "Start a QEMU virtual machine.",
            AccessTier::ReadExecute,
            CATEGORY,
            vm_address(),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    let vmid = args::unsigned(&input, "vmid")?;
                    args::render(
                        &api.post(&format!("/nodes/{node}/qemu/{vmid}/status/start"), None)
                            .await?,
                    )
                })
            },
        ),
        destructive(
            "stop_vm",
            "Hard-stop a QEMU virtual machine without guest shutdown. May lose unsynced data.",
            AccessTier::ReadExecute,
            CATEGORY,
            vm_address(),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    let vmid = args::unsigned(&input, "vmid")?;
                    args::render(
                        &api.post(&format!("/nodes/{node}/qemu/{vmid}/status/stop"), None).await?,
                    )
                })
            },
        ),
        tool(
            "shutdown_vm",
            "Request a clean guest shutdown of a QEMU virtual machine.",
            AccessTier::ReadExecute,
            CATEGORY,
            vm_address(),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    let vmid = args::unsigned(&input, "vmid")?;
                    args::render(
                        &api.post(&format!("/nodes/{node}/qemu/{vmid}/status/shutdown"), None)
                            .await?,
                    )
                })
            },
        ),
        tool(
            "reboot_vm",
            "Request a clean guest reboot of a QEMU virtual machine.",
            AccessTier::ReadExecute,
            CATEGORY,
            vm_address(),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    let vmid = args::unsigned(&input, "vmid")?;
                    args::render(
                        &api.post(&format!("/nodes/{node}/qemu/{vmid}/status/reboot"), None)
                            .await?,
                    )
                })
            },
        ),
        destructive(
            "reset_vm",
            "Hard-reset a QEMU virtual machine, equivalent to pulling the power.",
            AccessTier::ReadExecute,
            CATEGORY,
            vm_address(),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    let vmid = args::unsigned(&input, "vmid")?;
                    args::render(
                        &api.post(&format!("/nodes/{node}/qemu/{vmid}/status/reset"), None)
                            .await?,
                    )
                })
            },
        ),
        tool(
            "suspend_vm",
            "Suspend a QEMU virtual machine.",
            AccessTier::ReadExecute,
            CATEGORY,
            vm_address(),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    let vmid = args::unsigned(&input, "vmid")?;
                    args::render(
                        &api.post(&format!("/nodes/{node}/qemu/{vmid}/status/suspend"), None)
                            .await?,
                    )
                })
            },
        ),
        tool(
            "resume_vm",
            "Resume a suspended QEMU virtual machine.",
            AccessTier::ReadExecute,
            CATEGORY,
            vm_address(),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    let vmid = args::unsigned(&input, "vmid")?;
                    args::render(
                        &api.post(&format!("/nodes/{node}/qemu/{vmid}/status/resume"), None)
                            .await?,
                    )
                })
            },
        ),
        tool(
            "migrate_vm",
            "Migrate a QEMU virtual machine to another node.",
            AccessTier::ReadExecute,
            CATEGORY,
            schema::object(
                &[
                    ("node", schema::string("Cluster node hosting the VM")),
                    ("vmid", schema::integer("VM identifier")),
                    ("target", schema::string("Destination node name")),
                    ("online", schema::boolean("Migrate without stopping the VM")),
                ],
                &["node", "vmid", "target"],
            ),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    let vmid = args::unsigned(&input, "vmid")?;
                    let target = args::segment(&input, "target")?;
                    let mut body = Map::new();
                    body.insert("target".to_string(), Value::from(target));
                    args::copy_fields(&mut body, &input, &["online"]);
                    args::render(
                        &api.post(
                            &format!("/nodes/{node}/qemu/{vmid}/migrate"),
                            Some(Value::Object(body)),
                        )
                        .await?,
                    )
                })
            },
        ),
        tool(
            "create_vm",
            "Create a new QEMU virtual machine.",
            AccessTier::Full,
            CATEGORY,
            schema::object(
                &[
                    ("node", schema::string("Cluster node to create the VM on")),
                    ("vmid", schema::integer("VM identifier, must be unused")),
                    ("name", schema::string("VM display name")),
                    ("cores", schema::integer("CPU cores per socket")),
                    ("sockets", schema::integer("CPU sockets")),
                    ("memory", schema::integer("Memory in MiB")),
                    ("ostype", schema::string("Guest OS type, for example l26")),
                    ("scsi0", schema::string("Primary disk specification")),
                    ("net0", schema::string("Primary network device specification")),
                    ("iso", schema::string("Installer ISO volume id")),
                ],
                &["node", "vmid"],
            ),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    let vmid = args::unsigned(&input, "vmid")?;
                    let mut body = Map::new();
                    body.insert("vmid".to_string(), Value::from(vmid));
                    args::copy_fields(
                        &mut body,
                        &input,
                        &["name", "cores", "sockets", "memory", "ostype", "scsi0", "net0"],
                    );
                    if let Some(iso) = args::opt_string(&input, "iso") {
                        body.insert("ide2".to_string(), Value::from(format!("{iso},media=cdrom")));
                    }
                    args::render(
                        &api.post(&format!("/nodes/{node}/qemu"), Some(Value::Object(body)))
                            .await?,
                    )
                })
            },
        ),
        tool(
            "clone_vm",
            "Clone a QEMU virtual machine to a new VM id.",
            AccessTier::Full,
            CATEGORY,
            schema::object(
                &[
                    ("node", schema::string("Cluster node hosting the source VM")),
                    ("vmid", schema::integer("Source VM identifier")),
                    ("newid", schema::integer("VM identifier for the clone")),
                    ("name", schema::string("Display name for the clone")),
                    ("full", schema::boolean("Full clone instead of linked clone")),
                    ("target", schema::string("Destination node for the clone")),
                ],
                &["node", "vmid", "newid"],
            ),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    let vmid = args::unsigned(&input, "vmid")?;
                    let newid = args::unsigned(&input, "newid")?;
                    let mut body = Map::new();
                    body.insert("newid".to_string(), Value::from(newid));
                    args::copy_fields(&mut body, &input, &["name", "full", "target"]);
                    args::render(
                        &api.post(
                            &format!("/nodes/{node}/qemu/{vmid}/clone"),
                            Some(Value::Object(body)),
                        )
                        .await?,
                    )
                })
            },
        ),
        tool(
            "update_vm_config",
            "Update configuration settings of a QEMU virtual machine.",
            AccessTier::Full,
            CATEGORY,
            schema::object(
                &[
                    ("node", schema::string("Cluster node hosting the VM")),
                    ("vmid", schema::integer("VM identifier")),
                    ("settings", schema::raw_object("Configuration keys to set, as documented by the backend")),
                ],
                &["node", "vmid", "settings"],
            ),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    let vmid = args::unsigned(&input, "vmid")?;
                    let settings = input.get("settings").cloned().unwrap_or_else(|| json!({}));
                    args::render(
                        &api.put(&format!("/nodes/{node}/qemu/{vmid}/config"), Some(settings))
                            .await?,
                    )
                })
            },
        ),
        tool(
            "resize_vm_disk",
            "Grow a disk attached to a QEMU virtual machine.",
            AccessTier::Full,
            CATEGORY,
            schema::object(
                &[
                    ("node", schema::string("Cluster node hosting the VM")),
                    ("vmid", schema::integer("VM identifier")),
                    ("disk", schema::string("Disk slot to resize, for example scsi0")),
                    ("size", schema::string("New size or increment, for example +10G")),
                ],
                &["node", "vmid", "disk", "size"],
            ),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    let vmid = args::unsigned(&input, "vmid")?;
                    let disk = args::segment(&input, "disk")?;
                    let size = args::string(&input, "size")?;
                    args::render(
                        &api.put(
                            &format!("/nodes/{node}/qemu/{vmid}/resize"),
                            Some(json!({"disk": disk, "size": size})),
                        )
                        .await?,
                    )
                })
            },
        ),
        destructive(
            "delete_vm",
            "Delete a QEMU virtual machine and its owned disks. This cannot be undone.",
            AccessTier::Full,
            CATEGORY,
            vm_address(),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    let vmid = args::unsigned(&input, "vmid")?;
                    args::render(&api.delete(&format!("/nodes/{node}/qemu/{vmid}")).await?)
                })
            },
        ),
    ]
}
