// crates/pve-bridge-mcp/src/lib.rs
// ============================================================================
// Module: PVE Bridge MCP
// Description: MCP server exposing the admitted tool registry over JSON-RPC.
// Purpose: Tie dispatch, transports, and startup wiring together.
// Dependencies: pve-bridge-catalog, pve-bridge-client, pve-bridge-config,
//               pve-bridge-core, axum, jsonschema, tokio
// ============================================================================

//! ## Overview
//! This crate hosts the MCP surface of the bridge. [`dispatch`] validates
//! tool call arguments against each tool's input contract and forwards them
//! into the registry; [`server`] speaks JSON-RPC 2.0 over stdio or HTTP.
//! Everything operating below this crate, from admission to sanitization, is
//! decided at startup and never changes while the server runs.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod dispatch;
pub mod server;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use dispatch::DispatchError;
pub use dispatch::ToolAnnotations;
pub use dispatch::ToolDescriptor;
pub use dispatch::ToolDispatcher;
pub use server::McpServer;
pub use server::McpServerError;
