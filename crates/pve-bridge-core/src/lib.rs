// crates/pve-bridge-core/src/lib.rs
// ============================================================================
// Module: PVE Bridge Core
// Description: Capability model, admission gate, and secret sanitization.
// Purpose: Provide the tool-gating and credential-scrubbing pipeline core.
// Dependencies: async-trait, regex, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! PVE Bridge Core defines the capability model shared by every other crate:
//! ordered access tiers, opaque tool categories, capability definitions with
//! JSON Schema input contracts, the registration-time admission gate, and the
//! process-wide secret registry that scrubs credential material from every
//! caller-visible string. Security posture: no registered secret may appear
//! verbatim in any text that leaves the process.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod api;
pub mod capability;
pub mod gate;
pub mod sanitize;
pub mod tier;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use api::ApiError;
pub use api::HypervisorApi;
pub use capability::CapabilityDefinition;
pub use capability::HandlerFuture;
pub use capability::ToolExecError;
pub use capability::ToolHandler;
pub use capability::ToolName;
pub use capability::ToolOutcome;
pub use gate::CatalogError;
pub use gate::ToolRegistry;
pub use gate::admit;
pub use sanitize::REDACTION_MARKER;
pub use sanitize::SecretRegistry;
pub use tier::AccessTier;
pub use tier::ToolCategory;
