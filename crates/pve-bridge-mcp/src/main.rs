// crates/pve-bridge-mcp/src/main.rs
// ============================================================================
// Module: PVE Bridge Entry Point
// Description: Startup wiring for the Proxmox VE MCP bridge.
// Purpose: Configure, connect, gate, and serve.
// Dependencies: pve-bridge-catalog, pve-bridge-client, pve-bridge-config,
//               pve-bridge-core, tokio, tracing-subscriber
// ============================================================================

//! ## Overview
//! Startup runs the fixed pipeline: read configuration, register the
//! credentials with the secret registry, build the backend client, validate
//! connectivity once, admit catalog capabilities for the configured tier and
//! categories, then serve. Any failure along the way is fatal; nothing is
//! retried or degraded.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::process::ExitCode;
use std::sync::Arc;

use pve_bridge_catalog::catalog;
use pve_bridge_client::ApiClient;
use pve_bridge_client::ClientBuildError;
use pve_bridge_config::BridgeConfig;
use pve_bridge_config::ConfigError;
use pve_bridge_core::ApiError;
use pve_bridge_core::CatalogError;
use pve_bridge_core::HypervisorApi;
use pve_bridge_core::SecretRegistry;
use pve_bridge_core::ToolRegistry;
use pve_bridge_mcp::DispatchError;
use pve_bridge_mcp::McpServer;
use pve_bridge_mcp::McpServerError;
use pve_bridge_mcp::ToolDispatcher;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Startup and serve failures, each fatal.
#[derive(Debug, Error)]
enum BridgeError {
    /// Configuration could not be read or validated.
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    /// The backend client could not be constructed.
    #[error("client: {0}")]
    Client(#[from] ClientBuildError),
    /// Startup connectivity validation failed.
    #[error("backend: {0}")]
    Backend(#[from] ApiError),
    /// The catalog could not be registered.
    #[error("catalog: {0}")]
    Catalog(#[from] CatalogError),
    /// A tool input contract failed to compile.
    #[error("dispatch: {0}")]
    Dispatch(#[from] DispatchError),
    /// The server transport failed.
    #[error("server: {0}")]
    Server(#[from] McpServerError),
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// Process entry point.
#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "pve-bridge failed");
            ExitCode::FAILURE
        }
    }
}

/// Installs the stderr tracing subscriber.
///
/// Stdout stays reserved for the stdio transport; diagnostics must never
/// interleave with framed JSON-RPC payloads.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

/// Runs the startup pipeline and serves until shutdown.
async fn run() -> Result<(), BridgeError> {
    let config = BridgeConfig::from_env()?;
    let secrets = Arc::new(SecretRegistry::new());
    secrets.register(&config.token_id);
    secrets.register(&config.token_secret);
    let client = ApiClient::from_config(&config, Arc::clone(&secrets))?;
    client.validate_connection().await?;
    let registry = ToolRegistry::build(
        catalog(),
        config.access_tier,
        &config.categories,
        Arc::clone(&secrets),
    )?;
    tracing::info!(
        tier = config.access_tier.as_str(),
        categories = config.categories.len(),
        tools = registry.len(),
        "capability gate applied"
    );
    let client: Arc<dyn HypervisorApi> = Arc::new(client);
    let dispatcher = ToolDispatcher::new(registry, client)?;
    McpServer::new(config, dispatcher).serve().await?;
    Ok(())
}
