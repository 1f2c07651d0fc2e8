// crates/pve-bridge-client/src/lib.rs
// ============================================================================
// Module: PVE Bridge Client
// Description: Authenticated async request engine for the Proxmox VE API.
// Purpose: Issue backend calls with timeout, envelope unwrapping, and
//          sanitized failure classification.
// Dependencies: pve-bridge-core, pve-bridge-config, reqwest, serde_json
// ============================================================================

//! ## Overview
//! The request engine performs authenticated calls against the Proxmox VE
//! REST API. The authentication header is computed once at construction, a
//! hard timeout bounds every call, response envelopes are unwrapped
//! uniformly, and every raised failure passes through the secret sanitizer
//! before it leaves this crate.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod client;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use client::ApiClient;
pub use client::ClientBuildError;
pub use client::REQUEST_TIMEOUT;
