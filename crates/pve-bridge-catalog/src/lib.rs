// crates/pve-bridge-catalog/src/lib.rs
// ============================================================================
// Module: PVE Bridge Catalog
// Description: Capability definitions for the Proxmox VE management surface.
// Purpose: Enumerate every tool the gate may expose, grouped by category.
// Dependencies: pve-bridge-core, serde_json
// ============================================================================

//! ## Overview
//! The catalog supplies the static capability definitions walked once at
//! startup by the admission gate. Each definition carries its name,
//! description, minimum access tier, category, JSON Schema input contract,
//! destructive flag, and handler. Handlers reach the backend only through the
//! [`pve_bridge_core::HypervisorApi`] seam, so this crate stays free of any
//! HTTP machinery.
//!
//! Tier policy: list/status/config reads sit at `read-only`; power actions,
//! migrations, service restarts, ad hoc backup runs, task stops, and pending
//! network applies sit at `read-execute`; creating or deleting durable
//! resources requires `full`, with deletions flagged destructive.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod access;
mod args;
mod backups;
mod cluster;
mod containers;
mod define;
mod network;
mod nodes;
mod pools;
mod schema;
mod snapshots;
mod storage;
mod tasks;
mod vms;

// ============================================================================
// SECTION: Imports
// ============================================================================

use pve_bridge_core::CapabilityDefinition;

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Returns the full capability catalog, in category order.
///
/// Names are unique across the whole catalog; the gate enforces this when
/// the registry is built.
#[must_use]
pub fn catalog() -> Vec<CapabilityDefinition> {
    let mut definitions = Vec::new();
    definitions.extend(nodes::definitions());
    definitions.extend(vms::definitions());
    definitions.extend(containers::definitions());
    definitions.extend(storage::definitions());
    definitions.extend(cluster::definitions());
    definitions.extend(backups::definitions());
    definitions.extend(network::definitions());
    definitions.extend(tasks::definitions());
    definitions.extend(snapshots::definitions());
    definitions.extend(pools::definitions());
    definitions.extend(access::definitions());
    definitions
}
