// crates/pve-bridge-catalog/src/network.rs
// ============================================================================
// Module: Network Tools
// Description: Node network interfaces and cluster firewall rules.
// Purpose: Enumerate network-scoped capabilities.
// Dependencies: pve-bridge-core, serde_json
// ============================================================================

//! ## Overview
//! Interface and firewall reads sit at `read-only`. Applying or reverting
//! staged interface changes sits at `read-execute` because the pending edits
//! already exist. Editing interfaces and firewall rules requires `full`, with
//! deletions flagged destructive.

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

/// Category label for network tools.
const CATEGORY: &str = "network";

/// Capability definitions for network management.
pub(crate) fn definitions() -> Vec<CapabilityDefinition> {
    vec![
        tool(
            "list_networks",
            "List network interfaces on a node, optionally filtered by type.",
            AccessTier::ReadOnly,
            CATEGORY,
            schema::object(
                &[
                    ("node", schema::string("Cluster node name")),
                    ("type", schema::string("Interface type filter, for example bridge or bond")),
                ],
                &["node"],
            ),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    let mut query = args::Query::new();
                    query.add("type", args::opt_string(&input, "type"));
                    args::render(&api.get(&query.apply(&format!("/nodes/{node}/network"))).await?)
                })
            },
        ),
        tool(
            "get_network_interface",
            "Read the configuration of one network interface on a node.",
            AccessTier::ReadOnly,
            CATEGORY,
            schema::object(
                &[
                    ("node", schema::string("Cluster node name")),
                    ("iface", schema::string("Interface name")),
                ],
                &["node", "iface"],
            ),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    let iface = args::segment(&input, "iface")?;
                    args::render(&api.get(&format!("/nodes/{node}/network/{iface}")).await?)
                })
            },
        ),
        tool(
            "create_network_bridge",
            "Stage a new Linux bridge on a node. Changes apply after apply_network_changes.",
            AccessTier::Full,
            CATEGORY,
            schema::object(
                &[
                    ("node", schema::string("Cluster node name")),
                    ("iface", schema::string("Bridge name, for example vmbr1")),
                    ("address", schema::string("IPv4 address in CIDR notation")),
                    ("gateway", schema::string("IPv4 default gateway")),
                    ("bridge_ports", schema::string("Space-separated member ports")),
                    ("autostart", schema::boolean("Bring the bridge up on boot")),
                ],
                &["node", "iface"],
            ),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    let iface = args::segment(&input, "iface")?;
                    let mut body = Map::new();
                    body.insert("iface".to_string(), Value::from(iface));
                    body.insert("type".to_string(), Value::from("bridge"));
                    args::copy_fields(
                        &mut body,
                        &input,
                        &["address", "gateway", "bridge_ports", "autostart"],
                    );
                    args::render(
                        &api.post(&format!("/nodes/{node}/network"), Some(Value::Object(body)))
                            .await?,
                    )
                })
            },
        ),
        tool(
            "update_network_interface",
            "Stage changes to a network interface. Changes apply after apply_network_changes.",
            AccessTier::Full,
            CATEGORY,
            schema::object(
                &[
                    ("node", schema::string("Cluster node name")),
                    ("iface", schema::string("Interface name")),
                    ("type", schema::string("Interface type, for example bridge")),
                    ("settings", schema::raw_object("Interface keys to set, as documented by the backend")),
                ],
                &["node", "iface", "type"],
            ),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    let iface = args::segment(&input, "iface")?;
                    let kind = args::string(&input, "type")?;
                    let mut body = match input.get("settings") {
                        Some(Value::Object(map)) => map.clone(),
                        _ => Map::new(),
                    };
                    body.insert("type".to_string(), Value::from(kind));
                    args::render(
                        &api.put(
                            &format!("/nodes/{node}/network/{iface}"),
                            Some(Value::Object(body)),
                        )
                        .await?,
                    )
                })
            },
        ),
        destructive(
            "delete_network_interface",
            "Stage removal of a network interface. Changes apply after apply_network_changes.",
            AccessTier::Full,
            CATEGORY,
            schema::object(
                &[
                    ("node", schema::string("Cluster node name")),
                    ("iface", schema::string("Interface name")),
                ],
                &["node", "iface"],
            ),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    let iface = args::segment(&input, "iface")?;
                    args::render(&api.delete(&format!("/nodes/{node}/network/{iface}")).await?)
                })
            },
        ),
        tool(
            "apply_network_changes",
            "Apply staged network interface changes on a node.",
            AccessTier::ReadExecute,
            CATEGORY,
            schema::object(&[("node", schema::string("Cluster node name"))], &["node"]),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    args::render(&api.put(&format!("/nodes/{node}/network"), None).await?)
                })
            },
        ),
        tool(
            "revert_network_changes",
            "Discard staged network interface changes on a node.",
            AccessTier::ReadExecute,
            CATEGORY,
            schema::object(&[("node", schema::string("Cluster node name"))], &["node"]),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    args::render(&api.delete(&format!("/nodes/{node}/network")).await?)
                })
            },
        ),
        tool(
            "list_firewall_rules",
            "List cluster-level firewall rules.",
            AccessTier::ReadOnly,
            CATEGORY,
            schema::empty(),
            |api, _input| {
                Box::pin(async move { args::render(&api.get("/cluster/firewall/rules").await?) })
            },
        ),
        tool(
            "get_firewall_options",
            "Read cluster-level firewall options.",
            AccessTier::ReadOnly,
            CATEGORY,
            schema::empty(),
            |api, _input| {
                Box::pin(async move { args::render(&api.get("/cluster/firewall/options").await?) })
            },
        ),
        tool(
            "create_firewall_rule",
            "Add a cluster-level firewall rule.",
            AccessTier::Full,
            CATEGORY,
            schema::object(
                &[
                    ("action", schema::string("Rule action: ACCEPT, DROP, or REJECT")),
                    ("type", schema::string("Rule direction: in, out, or group")),
                    ("source", schema::string("Source address or alias")),
                    ("dest", schema::string("Destination address or alias")),
                    ("proto", schema::string("Protocol, for example tcp or udp")),
                    ("dport", schema::string("Destination port or range")),
                    ("sport", schema::string("Source port or range")),
                    ("comment", schema::string("Free-form rule comment")),
                    ("enable", schema::boolean("Whether the rule starts enabled")),
                ],
                &["action", "type"],
            ),
            |api, input| {
                Box::pin(async move {
                    let action = args::string(&input, "action")?;
                    let kind = args::string(&input, "type")?;
                    let mut body = Map::new();
                    body.insert("action".to_string(), Value::from(action));
                    body.insert("type".to_string(), Value::from(kind));
                    args::copy_fields(
                        &mut body,
                        &input,
                        &["source", "dest", "proto", "dport", "sport", "comment", "enable"],
                    );
                    args::render(
                        &api.post("/cluster/firewall/rules", Some(Value::Object(body))).await?,
                    )
                })
            },
        ),
        destructive(
            "delete_firewall_rule",
            "Delete a cluster-level firewall rule by position.",
            AccessTier::Full,
            CATEGORY,
            schema::object(
                &[("pos", schema::integer("Rule position as reported by list_firewall_rules"))],
                &["pos"],
            ),
            |api, input| {
                Box::pin(async move {
                    let pos = args::unsigned(&input, "pos")?;
                    args::render(&api.delete(&format!("/cluster/firewall/rules/{pos}")).await?)
                })
            },
        ),
    ]
}
