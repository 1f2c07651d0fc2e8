// crates/pve-bridge-catalog/src/storage.rs
// ============================================================================
// Module: Storage Tools
// Description: Storage pool configuration, status, and content listing.
// Purpose: Enumerate storage-scoped capabilities.
// Dependencies: pve-bridge-core, serde_json
// ============================================================================

//! ## Overview
//! Storage inspection sits at `read-only`. Creating pools and deleting pools
//! or volumes require `full`, with both deletions flagged destructive.

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

/// Category label for storage tools.
const CATEGORY: &str = "storage";

/// Capability definitions for storage management.
pub(crate) fn definitions() -> Vec<CapabilityDefinition> {
    vec![
        tool(
            "list_storage",
            "List all configured storage pools in the cluster.",
            AccessTier::ReadOnly,
            CATEGORY,
            schema::empty(),
            |api, _input| Box::pin(async move { args::render(&api.get("/storage").await?) }),
        ),
        tool(
            "get_storage_config",
            "Read the configuration of one storage pool.",
            AccessTier::ReadOnly,
            CATEGORY,
            schema::object(&[("storage", schema::string("Storage pool identifier"))], &["storage"]),
            |api, input| {
                Box::pin(async move {
                    let storage = args::segment(&input, "storage")?;
                    args::render(&api.get(&format!("/storage/{storage}")).await?)
                })
            },
        ),
        tool(
            "get_storage_status",
            "Read usage and availability of a storage pool on one node.",
            AccessTier::ReadOnly,
            CATEGORY,
            schema::object(
                &[
                    ("node", schema::string("Cluster node name")),
                    ("storage", schema::string("Storage pool identifier")),
                ],
                &["node", "storage"],
            ),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    let storage = args::segment(&input, "storage")?;
                    args::render(
                        &api.get(&format!("/nodes/{node}/storage/{storage}/status")).await?,
                    )
                })
            },
        ),
        tool(
            "list_storage_content",
            "List the volumes held by a storage pool on one node.",
            AccessTier::ReadOnly,
            CATEGORY,
            schema::object(
                &[
                    ("node", schema::string("Cluster node name")),
                    ("storage", schema::string("Storage pool identifier")),
                    ("content", schema::string("Filter by content type, for example iso or backup")),
                ],
                &["node", "storage"],
            ),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    let storage = args::segment(&input, "storage")?;
                    let mut query = args::Query::new();
                    query.add("content", args::opt_string(&input, "content"));
                    args::render(
                        &api.get(&query.apply(&format!("/nodes/{node}/storage/{storage}/content")))
                            .await?,
                    )
                })
            },
        ),
        tool(
            "create_storage",
            "Add a storage pool definition to the cluster.",
            AccessTier::Full,
            CATEGORY,
            schema::object(
                &[
                    ("storage", schema::string("Storage pool identifier, must be unused")),
                    ("type", schema::string("Storage type, for example dir, nfs, or lvmthin")),
                    ("path", schema::string("Filesystem path for directory storage")),
                    ("server", schema::string("Remote server address for network storage")),
                    ("export", schema::string("Exported share path for network storage")),
                    ("content", schema::string("Comma-separated content types to allow")),
                    ("nodes", schema::string("Comma-separated nodes the pool is restricted to")),
                ],
                &["storage", "type"],
            ),
            |api, input| {
                Box::pin(async move {
                    let storage = args::segment(&input, "storage")?;
                    let kind = args::string(&input, "type")?;
                    let mut body = Map::new();
                    body.insert("storage".to_string(), Value::from(storage));
                    body.insert("type".to_string(), Value::from(kind));
                    args::copy_fields(
                        &mut body,
                        &input,
                        &["path", "server", "export", "content", "nodes"],
                    );
                    args::render(&api.post("/storage", Some(Value::Object(body))).await?)
                })
            },
        ),
        destructive(
            "delete_storage",
            "Remove a storage pool definition from the cluster. Data on the backing store is kept.",
            AccessTier::Full,
            CATEGORY,
            schema::object(&[("storage", schema::string("Storage pool identifier"))], &["storage"]),
            |api, input| {
                Box::pin(async move {
                    let storage = args::segment(&input, "storage")?;
                    args::render(&api.delete(&format!("/storage/{storage}")).await?)
                })
            },
        ),
        destructive(
            "delete_volume",
            "Delete one volume from a storage pool. This cannot be undone.",
            AccessTier::Full,
            CATEGORY,
            schema::object(
                &[
                    ("node", schema::string("Cluster node name")),
                    ("storage", schema::string("Storage pool identifier")),
                    ("volume", schema::string("Volume identifier within the pool")),
                ],
                &["node", "storage", "volume"],
            ),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    let storage = args::segment(&input, "storage")?;
                    let volume = args::volume(&input, "volume")?;
                    args::render(
                        &api.delete(&format!("/nodes/{node}/storage/{storage}/content/{volume}"))
                            .await?,
                    )
                })
            },
        ),
    ]
}
