// crates/pve-bridge-catalog/src/containers.rs
// ============================================================================
// Module: Container Tools
// Description: LXC container lifecycle, configuration, and migration.
// Purpose: Enumerate container-scoped capabilities.
// Dependencies: pve-bridge-core, serde_json
// ============================================================================

//! ## Overview
//! Container inspection sits at `read-only`; power transitions and migration
//! sit at `read-execute`; create, clone, reconfigure, and delete require
//! `full`. Container creation deliberately takes no root password field;
//! credential material never flows through tool input.

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

/// Category label for container tools.
const CATEGORY: &str = "containers";

/// Schema shared by every `{node, vmid}` addressed container tool.
fn container_address() -> Value {
    schema::object(
        &[
            ("node", schema::string("Cluster node hosting the container")),
            ("vmid", schema::integer("Container identifier")),
        ],
        &["node", "vmid"],
    )
}

/// Capability definitions for LXC container management.
pub(crate) fn definitions() -> Vec<CapabilityDefinition> {
    vec![
        tool(
            "list_containers",
            "List LXC containers on a node.",
            AccessTier::ReadOnly,
            CATEGORY,
            schema::object(&[("node", schema::string("Cluster node name"))], &["node"]),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    args::render(&api.get(&format!("/nodes/{node}/lxc")).await?)
                })
            },
        ),
        tool(
            "get_container_status",
            "Read the current status of an LXC container.",
            AccessTier::ReadOnly,
            CATEGORY,
            container_address(),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    let vmid = args::unsigned(&input, "vmid")?;
                    args::render(
                        &api.get(&format!("/nodes/{node}/lxc/{vmid}/status/current")).await?,
                    )
                })
            },
        ),
        tool(
            "get_container_config",
            "Read the configuration of an LXC container.",
            AccessTier::ReadOnly,
            CATEGORY,
            container_address(),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    let vmid = args::unsigned(&input, "vmid")?;
                    args::render(&api.get(&format!("/nodes/{node}/lxc/{vmid}/config")).await?)
                })
            },
        ),
        tool(
            "start_container",
            "Start an LXC container.",
            AccessTier::ReadExecute,
            CATEGORY,
            container_address(),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    let vmid = args::unsigned(&input, "vmid")?;
                    args::render(
                        &api.post(&format!("/nodes/{node}/lxc/{vmid}/status/start"), None).await?,
                    )
                })
            },
        ),
        destructive(
            "stop_container",
            "Hard-stop an LXC container without clean shutdown. May lose unsynced data.",
            AccessTier::ReadExecute,
            CATEGORY,
            container_address(),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    let vmid = args::unsigned(&input, "vmid")?;
                    args::render(
                        &api.post(&format!("/nodes/{node}/lxc/{vmid}/status/stop"), None).await?,
                    )
                })
            },
        ),
        tool(
            "shutdown_container",
            "Request a clean shutdown of an LXC container.",
            AccessTier::ReadExecute,
            CATEGORY,
            container_address(),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    let vmid = args::unsigned(&input, "vmid")?;
                    args::render(
                        &api.post(&format!("/nodes/{node}/lxc/{vmid}/status/shutdown"), None)
                            .await?,
                    )
                })
            },
        ),
        tool(
            "reboot_container",
            "Reboot an LXC container.",
            AccessTier::ReadExecute,
            CATEGORY,
            container_address(),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    let vmid = args::unsigned(&input, "vmid")?;
                    args::render(
                        &api.post(&format!("/nodes/{node}/lxc/{vmid}/status/reboot"), None)
                            .await?,
                    )
                })
            },
        ),
        tool(
            "migrate_container",
            "Migrate an LXC container to another node.",
            AccessTier::ReadExecute,
            CATEGORY,
            schema::object(
                &[
                    ("node", schema::string("Cluster node hosting the container")),
                    ("vmid", schema::integer("Container identifier")),
                    ("target", schema::string("Destination node name")),
                    ("restart", schema::boolean("Use restart migration for a running container")),
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
                    args::copy_fields(&mut body, &input, &["restart"]);
                    args::render(
                        &api.post(
                            &format!("/nodes/{node}/lxc/{vmid}/migrate"),
                            Some(Value::Object(body)),
                        )
                        .await?,
                    )
                })
            },
        ),
        tool(
            "create_container",
            "Create a new LXC container from an OS template. Set credentials out of band.",
            AccessTier::Full,
            CATEGORY,
            schema::object(
                &[
                    ("node", schema::string("Cluster node to create the container on")),
                    ("vmid", schema::integer("Container identifier, must be unused")),
                    ("ostemplate", schema::string("OS template volume id")),
                    ("hostname", schema::string("Container hostname")),
                    ("cores", schema::integer("CPU core limit")),
                    ("memory", schema::integer("Memory in MiB")),
                    ("rootfs", schema::string("Root filesystem specification")),
                    ("net0", schema::string("Primary network device specification")),
                    ("storage", schema::string("Default storage for the root filesystem")),
                ],
                &["node", "vmid", "ostemplate"],
            ),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    let vmid = args::unsigned(&input, "vmid")?;
                    let ostemplate = args::volume(&input, "ostemplate")?;
                    let mut body = Map::new();
                    body.insert("vmid".to_string(), Value::from(vmid));
                    body.insert("ostemplate".to_string(), Value::from(ostemplate));
                    args::copy_fields(
                        &mut body,
                        &input,
                        &["hostname", "cores", "memory", "rootfs", "net0", "storage"],
                    );
                    args::render(
                        &api.post(&format!("/nodes/{node}/lxc"), Some(Value::Object(body)))
                            .await?,
                    )
                })
            },
        ),
        tool(
            "update_container_config",
            "Update configuration settings of an LXC container.",
            AccessTier::Full,
            CATEGORY,
            schema::object(
                &[
                    ("node", schema::string("Cluster node hosting the container")),
                    ("vmid", schema::integer("Container identifier")),
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
                        &api.put(&format!("/nodes/{node}/lxc/{vmid}/config"), Some(settings))
                            .await?,
                    )
                })
            },
        ),
        tool(
            "clone_container",
            "Clone an LXC container to a new container id.",
            AccessTier::Full,
            CATEGORY,
            schema::object(
                &[
                    ("node", schema::string("Cluster node hosting the source container")),
                    ("vmid", schema::integer("Source container identifier")),
                    ("newid", schema::integer("Container identifier for the clone")),
                    ("hostname", schema::string("Hostname for the clone")),
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
                    args::copy_fields(&mut body, &input, &["hostname", "full", "target"]);
                    args::render(
                        &api.post(
                            &format!("/nodes/{node}/lxc/{vmid}/clone"),
                            Some(Value::Object(body)),
                        )
                        .await?,
                    )
                })
            },
        ),
        destructive(
            "delete_container",
            "Delete an LXC container and its owned volumes. This cannot be undone.",
            AccessTier::Full,
            CATEGORY,
            container_address(),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    let vmid = args::unsigned(&input, "vmid")?;
                    args::render(&api.delete(&format!("/nodes/{node}/lxc/{vmid}")).await?)
                })
            },
        ),
    ]
}
