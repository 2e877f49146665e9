//! Per-connection request dispatch.
//!
//! A [`Dispatcher`] starts uninitialized and only accepts `initialize`;
//! after that it serves `tools/list` and `tools/call`. There is no shutdown
//! state, the transport ends the connection.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rmcp::model::{
    CallToolResult, Implementation, JsonObject, ListToolsResult, ProtocolVersion, ServerCapabilities, ServerInfo,
};
#[cfg(test)]
use serde::Serialize;
#[cfg(test)]
use serde_json::Value;

use crate::error::DispatchError;
use crate::state::AppState;

/// Name reported in `serverInfo`.
pub const SERVER_NAME: &str = "mcp-search";

pub struct Dispatcher {
    state: Arc<AppState>,
    ready: AtomicBool,
}

impl Dispatcher {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state, ready: AtomicBool::new(false) }
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn server_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: SERVER_NAME.into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    /// Move to the ready state. Repeated calls return the same info.
    pub fn initialize(&self) -> ServerInfo {
        if !self.ready.swap(true, Ordering::AcqRel) {
            tracing::info!(tools = self.state.tools.len(), "session initialized");
        }
        self.server_info()
    }

    fn ensure_ready(&self) -> Result<(), DispatchError> {
        if self.is_ready() { Ok(()) } else { Err(DispatchError::NotInitialized) }
    }

    pub fn list_tools(&self) -> Result<ListToolsResult, DispatchError> {
        self.ensure_ready()?;
        Ok(ListToolsResult { meta: None, tools: self.state.tools.list(), next_cursor: None })
    }

    /// Look up, validate and run one tool.
    ///
    /// Absent arguments are treated as an empty object.
    pub async fn call_tool(&self, name: &str, arguments: Option<JsonObject>) -> Result<CallToolResult, DispatchError> {
        self.ensure_ready()?;

        let spec = self
            .state
            .tools
            .lookup(name)
            .ok_or_else(|| DispatchError::UnknownTool(name.to_string()))?;

        let arguments = arguments.unwrap_or_default();
        spec.validate(&arguments)?;

        tracing::info!(tool = name, "tool call");
        let outcome = spec.kind.call(&self.state, arguments).await;
        if let Err(e) = &outcome {
            tracing::warn!(tool = name, code = e.code(), error = %e, "tool call failed");
        }
        outcome
    }

    /// Route a raw protocol request by method name.
    ///
    /// Transport-agnostic entry point for driving a session without rmcp; the
    /// binary routes through [`crate::handler::McpSearchServer`] instead.
    #[cfg(test)]
    pub async fn handle(&self, method: &str, params: Value) -> Result<Value, DispatchError> {
        match method {
            "initialize" => to_value(&self.initialize()),
            "ping" => Ok(Value::Object(JsonObject::new())),
            "tools/list" => to_value(&self.list_tools()?),
            "tools/call" => {
                self.ensure_ready()?;
                let (name, arguments) = call_params(params)?;
                to_value(&self.call_tool(&name, arguments).await?)
            }
            other => {
                self.ensure_ready()?;
                Err(DispatchError::UnknownMethod(other.to_string()))
            }
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher").field("ready", &self.is_ready()).finish_non_exhaustive()
    }
}

#[cfg(test)]
fn to_value<T: Serialize>(value: &T) -> Result<Value, DispatchError> {
    serde_json::to_value(value).map_err(|e| DispatchError::Internal(e.to_string()))
}

/// Split `tools/call` params into the tool name and its arguments.
#[cfg(test)]
fn call_params(params: Value) -> Result<(String, Option<JsonObject>), DispatchError> {
    let Value::Object(mut params) = params else {
        return Err(DispatchError::InvalidArguments("tools/call params must be an object".into()));
    };

    let name = match params.remove("name") {
        Some(Value::String(name)) => name,
        Some(_) => return Err(DispatchError::InvalidArguments("tool name must be a string".into())),
        None => return Err(DispatchError::InvalidArguments("missing tool name".into())),
    };

    let arguments = match params.remove("arguments") {
        None | Some(Value::Null) => None,
        Some(Value::Object(arguments)) => Some(arguments),
        Some(_) => return Err(DispatchError::InvalidArguments("arguments must be an object".into())),
    };

    Ok((name, arguments))
}
