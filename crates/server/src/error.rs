//! Protocol-level errors for the mcp-search server.

use polysearch_core::Error;
use rmcp::model::{ErrorCode, ErrorData as McpError};

/// Failures surfaced to the caller as JSON-RPC errors.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Method not found: {0}")]
    UnknownMethod(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Anything but `initialize` before the handshake.
    #[error("Server not initialized: call initialize first")]
    NotInitialized,

    /// Schema violation or input rejected by the sanitizer.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DispatchError {
    pub fn code(&self) -> i32 {
        match self {
            Self::UnknownMethod(_) => -32601,
            Self::UnknownTool(_) => -32001,
            Self::NotInitialized => -32002,
            Self::InvalidArguments(_) => -32602,
            Self::Internal(_) => -32603,
        }
    }
}

impl From<Error> for DispatchError {
    fn from(err: Error) -> Self {
        match err {
            Error::InvalidInput(msg) | Error::UnknownBackend(msg) => Self::InvalidArguments(msg),
            other @ (Error::CacheFault(_) | Error::LimiterClosed | Error::Internal(_)) => {
                Self::Internal(other.to_string())
            }
        }
    }
}

impl From<DispatchError> for McpError {
    fn from(err: DispatchError) -> Self {
        McpError { code: ErrorCode(err.code()), message: err.to_string().into(), data: None }
    }
}
