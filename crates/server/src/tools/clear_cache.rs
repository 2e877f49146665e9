//! clear_cache tool implementation.

use rmcp::model::{CallToolResult, Content};

use crate::error::DispatchError;
use crate::state::AppState;

/// Drop every cached result. Fails only on an internal cache fault.
pub fn clear_impl(state: &AppState) -> Result<CallToolResult, DispatchError> {
    let removed = state.cache.clear()?;
    tracing::info!(removed, "search cache cleared");

    let text = format!("✅ Search cache cleared successfully ({removed} entries removed)");
    Ok(CallToolResult::success(vec![Content::text(text)]))
}
