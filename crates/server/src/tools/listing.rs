//! list_engines and list_archives_services tool implementations.
//!
//! Static listings of the registered backends; no sanitization, no cache.

use polysearch_core::BackendClass;
use rmcp::model::{CallToolResult, Content};

use super::format;
use crate::state::AppState;

pub fn engines_impl(state: &AppState) -> CallToolResult {
    let descriptors = state.orchestrator.registry().descriptors(BackendClass::Web);
    let text = format::engine_listing(&descriptors, state.config.default_max_results);
    CallToolResult::success(vec![Content::text(text)])
}

pub fn archives_impl(state: &AppState) -> CallToolResult {
    let descriptors = state.orchestrator.registry().descriptors(BackendClass::Archive);
    CallToolResult::success(vec![Content::text(format::archive_listing(&descriptors))])
}
