//! social_search tool implementation.

use polysearch_core::{BackendClass, Bounds, Query, sanitize_query};
use rmcp::model::{CallToolResult, Content};

use super::{SocialSearchParams, format, search};
use crate::error::DispatchError;
use crate::state::AppState;

pub fn build_query(state: &AppState, params: &SocialSearchParams) -> Result<Query, DispatchError> {
    let text = sanitize_query(&params.query)?;
    let target = state.orchestrator.registry().resolve_target(BackendClass::Social, params.platform.as_deref())?;
    Ok(Query::new(BackendClass::Social, text, target, Bounds::default()))
}

/// Implementation of the social_search tool.
pub async fn search_impl(state: &AppState, params: &SocialSearchParams) -> Result<CallToolResult, DispatchError> {
    let query = build_query(state, params)?;
    let result = search::cached_search(state, &query).await?;
    Ok(CallToolResult::success(vec![Content::text(format::social_results(&result, query.text()))]))
}
