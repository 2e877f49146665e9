//! archives_search tool implementation.
//!
//! The URL is validated and canonicalized before it reaches any archive
//! service. `check_availability` travels in the query bounds, so checked and
//! unchecked lookups of the same URL are cached separately.

use polysearch_core::{BackendClass, Bounds, Query, validate_url};
use rmcp::model::{CallToolResult, Content};

use super::{ArchivesSearchParams, format, search};
use crate::error::DispatchError;
use crate::state::AppState;

pub fn build_query(state: &AppState, params: &ArchivesSearchParams) -> Result<Query, DispatchError> {
    let url = validate_url(&params.url)?;
    let target = state.orchestrator.registry().resolve_target(BackendClass::Archive, params.service.as_deref())?;
    let bounds = Bounds { max_results: None, check_availability: params.check_availability };
    Ok(Query::new(BackendClass::Archive, url, target, bounds))
}

/// Implementation of the archives_search tool.
pub async fn search_impl(state: &AppState, params: &ArchivesSearchParams) -> Result<CallToolResult, DispatchError> {
    let query = build_query(state, params)?;
    let result = search::cached_search(state, &query).await?;

    let descriptors = state.orchestrator.registry().descriptors(BackendClass::Archive);
    let text = format::archive_results(&result, query.text(), &descriptors, params.check_availability);
    Ok(CallToolResult::success(vec![Content::text(text)]))
}
