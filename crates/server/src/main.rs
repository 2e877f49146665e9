//! mcp-search server entry point.
//!
//! This is the main binary that boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use polysearch_core::AppConfig;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod dispatcher;
mod error;
mod handler;
mod state;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    let state = Arc::new(state::AppState::from_config(config)?);

    tracing::info!(
        timeout_ms = state.config.timeout_ms,
        max_concurrency = state.config.max_concurrency,
        cache_capacity = state.config.cache_capacity,
        "Starting mcp-search server on stdio transport"
    );

    let handler = handler::McpSearchServer::new(state);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
