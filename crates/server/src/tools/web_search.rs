//! web_search tool implementation.
//!
//! Searches the selected engines in parallel and renders the merged results.

use polysearch_core::config::MAX_RESULTS_LIMIT;
use polysearch_core::{BackendClass, Bounds, Query, sanitize_query};
use rmcp::model::{CallToolResult, Content};

use super::{WebSearchParams, format, search};
use crate::error::DispatchError;
use crate::state::AppState;

/// Build the web query from validated arguments.
pub fn build_query(state: &AppState, params: &WebSearchParams) -> Result<Query, DispatchError> {
    let text = sanitize_query(&params.query)?;
    let target = state.orchestrator.registry().resolve_target(BackendClass::Web, params.engine.as_deref())?;
    let max_results = params
        .max_results
        .unwrap_or(state.config.default_max_results)
        .clamp(1, MAX_RESULTS_LIMIT);

    let bounds = Bounds { max_results: Some(max_results as usize), check_availability: false };
    Ok(Query::new(BackendClass::Web, text, target, bounds))
}

/// Implementation of the web_search tool.
pub async fn search_impl(state: &AppState, params: &WebSearchParams) -> Result<CallToolResult, DispatchError> {
    let query = build_query(state, params)?;
    let result = search::cached_search(state, &query).await?;
    Ok(CallToolResult::success(vec![Content::text(format::web_results(&result, query.text()))]))
}
