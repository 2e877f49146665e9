//! MCP server handler implementation.
//!
//! Adapts rmcp's [`ServerHandler`] to the [`Dispatcher`]: handshake, tool
//! enumeration and tool calls all go through the same state machine.

use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, InitializeRequestParam, InitializeResult, ListToolsResult,
        PaginatedRequestParam, ServerInfo,
    },
    service::{RequestContext, RoleServer},
};

use crate::dispatcher::Dispatcher;
use crate::state::AppState;

/// The main MCP server handler for mcp-search.
#[derive(Clone)]
pub struct McpSearchServer {
    dispatcher: Arc<Dispatcher>,
}

impl McpSearchServer {
    /// Create a handler for one connection over shared state.
    pub fn new(state: Arc<AppState>) -> Self {
        Self { dispatcher: Arc::new(Dispatcher::new(state)) }
    }
}

impl ServerHandler for McpSearchServer {
    fn get_info(&self) -> ServerInfo {
        self.dispatcher.server_info()
    }

    async fn initialize(
        &self, request: InitializeRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<InitializeResult, McpError> {
        if context.peer.peer_info().is_none() {
            context.peer.set_peer_info(request);
        }
        Ok(self.dispatcher.initialize())
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(self.dispatcher.list_tools()?)
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.dispatcher.call_tool(&request.name, request.arguments).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polysearch_core::{AppConfig, BackendRegistry};

    #[test]
    fn test_get_info() {
        let state = AppState::with_registry(AppConfig::default(), BackendRegistry::new()).unwrap();
        let server = McpSearchServer::new(Arc::new(state));

        let info = server.get_info();
        assert_eq!(info.server_info.name, "mcp-search");
        assert!(info.capabilities.tools.is_some());
    }
}
