// crates/pve-bridge-catalog/src/backups.rs
// ============================================================================
// Module: Backup Tools
// Description: Backup archives, scheduled jobs, ad hoc runs, and restores.
// Purpose: Enumerate backup-scoped capabilities.
// Dependencies: pve-bridge-core, serde_json
// ============================================================================

//! ## Overview
//! Listing archives and jobs sits at `read-only`. Running an ad hoc backup
//! sits at `read-execute` because it only produces a new archive. Managing
//! scheduled jobs and restoring archives require `full`; a restore overwrites
//! the target guest and is flagged destructive along with job deletion.

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

/// Category label for backup tools.
const CATEGORY: &str = "backups";

/// Capability definitions for backup management.
pub(crate) fn definitions() -> Vec<CapabilityDefinition> {
    vec![
        tool(
            "list_backups",
            "List backup archives held by a storage pool on one node.",
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
                        &api.get(&format!(
                            "/nodes/{node}/storage/{storage}/content?content=backup"
                        ))
                        .await?,
                    )
                })
            },
        ),
        tool(
            "list_backup_jobs",
            "List scheduled backup jobs in the cluster.",
            AccessTier::ReadOnly,
            CATEGORY,
            schema::empty(),
            |api, _input| {
                Box::pin(async move { args::render(&api.get("/cluster/backup").await?) })
            },
        ),
        tool(
            "get_backup_job",
            "Read one scheduled backup job.",
            AccessTier::ReadOnly,
            CATEGORY,
            schema::object(&[("id", schema::string("Backup job identifier"))], &["id"]),
            |api, input| {
                Box::pin(async move {
                    let id = args::segment(&input, "id")?;
                    args::render(&api.get(&format!("/cluster/backup/{id}")).await?)
                })
            },
        ),
        tool(
            "run_backup",
            "Run an ad hoc backup of one guest on a node.",
            AccessTier::ReadExecute,
            CATEGORY,
            schema::object(
                &[
                    ("node", schema::string("Cluster node hosting the guest")),
                    ("vmid", schema::integer("Guest identifier to back up")),
                    ("storage", schema::string("Destination storage pool")),
                    ("mode", schema::string("Backup mode: snapshot, suspend, or stop")),
                    ("compress", schema::string("Compression: zstd, gzip, lzo, or 0")),
                ],
                &["node", "vmid"],
            ),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    let vmid = args::unsigned(&input, "vmid")?;
                    let mut body = Map::new();
                    body.insert("vmid".to_string(), Value::from(vmid.to_string()));
                    args::copy_fields(&mut body, &input, &["storage", "mode", "compress"]);
                    args::render(
                        &api.post(&format!("/nodes/{node}/vzdump"), Some(Value::Object(body)))
                            .await?,
                    )
                })
            },
        ),
        tool(
            "create_backup_job",
            "Create a scheduled backup job.",
            AccessTier::Full,
            CATEGORY,
            schema::object(
                &[
                    ("schedule", schema::string("Calendar schedule, for example 21:00 or sat 02:00")),
                    ("storage", schema::string("Destination storage pool")),
                    ("vmid", schema::string("Comma-separated guest identifiers to include")),
                    ("all", schema::boolean("Back up every guest instead of a vmid list")),
                    ("enabled", schema::boolean("Whether the job starts enabled")),
                    ("mode", schema::string("Backup mode: snapshot, suspend, or stop")),
                    ("compress", schema::string("Compression: zstd, gzip, lzo, or 0")),
                ],
                &["schedule", "storage"],
            ),
            |api, input| {
                Box::pin(async move {
                    let schedule = args::string(&input, "schedule")?;
                    let storage = args::segment(&input, "storage")?;
                    let mut body = Map::new();
                    body.insert("schedule".to_string(), Value::from(schedule));
                    body.insert("storage".to_string(), Value::from(storage));
                    args::copy_fields(
                        &mut body,
                        &input,
                        &["vmid", "all", "enabled", "mode", "compress"],
                    );
                    args::render(&api.post("/cluster/backup", Some(Value::Object(body))).await?)
                })
            },
        ),
        destructive(
            "delete_backup_job",
            "Delete a scheduled backup job. Existing archives are kept.",
            AccessTier::Full,
            CATEGORY,
            schema::object(&[("id", schema::string("Backup job identifier"))], &["id"]),
            |api, input| {
                Box::pin(async move {
                    let id = args::segment(&input, "id")?;
                    args::render(&api.delete(&format!("/cluster/backup/{id}")).await?)
                })
            },
        ),
        destructive(
            "restore_backup",
            "Restore a QEMU backup archive into a guest id, overwriting it when forced.",
            AccessTier::Full,
            CATEGORY,
            schema::object(
                &[
                    ("node", schema::string("Cluster node to restore on")),
                    ("vmid", schema::integer("Guest identifier to restore into")),
                    ("archive", schema::string("Backup archive volume id")),
                    ("force", schema::boolean("Overwrite an existing guest with this id")),
                    ("storage", schema::string("Target storage pool for restored disks")),
                ],
                &["node", "vmid", "archive"],
            ),
            |api, input| {
                Box::pin(async move {
                    let node = args::segment(&input, "node")?;
                    let vmid = args::unsigned(&input, "vmid")?;
                    let archive = args::volume(&input, "archive")?;
                    let mut body = Map::new();
                    body.insert("vmid".to_string(), Value::from(vmid));
                    body.insert("archive".to_string(), Value::from(archive));
                    args::copy_fields(&mut body, &input, &["force", "storage"]);
                    args::render(
                        &api.post(&format!("/nodes/{node}/qemu"), Some(Value::Object(body)))
                            .await?,
                    )
                })
            },
        ),
    ]
}
