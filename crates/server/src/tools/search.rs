//! The cache-then-orchestrate pipeline shared by the search tools.

use std::sync::Arc;

use polysearch_core::{CacheKey, MergedResult, Query};

use crate::error::DispatchError;
use crate::state::AppState;

/// Serve `query` from the cache, or fan it out and store the merged result.
///
/// Rounds where every selected backend failed are returned but not cached,
/// so a transient outage is retried on the next call.
pub async fn cached_search(state: &AppState, query: &Query) -> Result<Arc<MergedResult>, DispatchError> {
    let key = CacheKey::for_query(query);

    if let Some(hit) = state.cache.get(&key) {
        tracing::info!(key = %key, intent = %query.intent(), target = %query.target(), "cache hit");
        return Ok(hit);
    }

    let merged = Arc::new(state.orchestrator.search(query).await?);

    if merged.all_failed() {
        tracing::warn!(
            intent = %query.intent(),
            failed = ?merged.failed_backends(),
            "every backend failed, result not cached"
        );
    } else {
        state.cache.put(key, Arc::clone(&merged));
    }

    Ok(merged)
}
