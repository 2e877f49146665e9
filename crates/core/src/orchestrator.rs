//! Concurrent fan-out of one query to its selected backends.
//!
//! # Pipeline
//!
//! 1. Select backends from the registry (all of the intent class, or exactly one)
//! 2. Spawn one task per backend; each waits for a limiter permit, then calls
//!    the backend under the per-call timeout
//! 3. Join every task with [`futures::future::join_all`]
//! 4. Merge outcomes into groups in selection order
//! 5. Truncate each group to `max_results`
//!
//! A failing backend never aborts its siblings: timeouts, transport errors,
//! parse errors and panics are recorded on that backend's group.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::backend::{BackendError, BackendRegistry, SearchBackend};
use crate::limiter::ConcurrencyLimiter;
use crate::{BackendDescriptor, BackendResult, Error, MergedResult, Query};

/// Fans queries out across registered backends under a shared limiter.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    registry: Arc<BackendRegistry>,
    limiter: ConcurrencyLimiter,
    per_call_timeout: Duration,
}

impl Orchestrator {
    pub fn new(registry: Arc<BackendRegistry>, limiter: ConcurrencyLimiter, per_call_timeout: Duration) -> Self {
        Self { registry, limiter, per_call_timeout }
    }

    pub fn registry(&self) -> &BackendRegistry {
        &self.registry
    }

    pub fn limiter(&self) -> &ConcurrencyLimiter {
        &self.limiter
    }

    /// Select backends for `query` and run it against them.
    ///
    /// # Errors
    ///
    /// Only selection can fail ([`Error::UnknownBackend`]). Backend failures,
    /// including every selected backend failing, are reported inside the
    /// returned [`MergedResult`].
    pub async fn search(&self, query: &Query) -> Result<MergedResult, Error> {
        let backends = self.registry.select(query)?;
        Ok(self.run(query, backends).await)
    }

    /// Run `query` against an explicit candidate set, preserving its order.
    pub async fn run(&self, query: &Query, backends: Vec<Arc<dyn SearchBackend>>) -> MergedResult {
        let started = Instant::now();
        let fetched_at = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        let descriptors: Vec<BackendDescriptor> = backends.iter().map(|b| *b.descriptor()).collect();

        tracing::info!(
            intent = %query.intent(),
            target = %query.target(),
            backends = descriptors.len(),
            "starting fan-out"
        );

        let handles: Vec<_> = backends
            .into_iter()
            .map(|backend| {
                let limiter = self.limiter.clone();
                let query = query.clone();
                let timeout = self.per_call_timeout;
                tokio::spawn(async move { invoke_one(backend, &limiter, &query, timeout).await })
            })
            .collect();

        let outcomes = futures::future::join_all(handles).await;

        let groups: Vec<BackendResult> = outcomes
            .into_iter()
            .zip(&descriptors)
            .map(|(outcome, descriptor)| match outcome {
                Ok(group) => group,
                Err(e) => {
                    tracing::warn!(backend = descriptor.id, error = %e, "backend task did not complete");
                    BackendResult::failed(descriptor, BackendError::Panicked.to_string(), 0)
                }
            })
            .collect();

        let mut merged = MergedResult {
            query: query.text().to_string(),
            intent: query.intent(),
            groups,
            elapsed_ms: elapsed_ms(started),
            fetched_at,
        };

        if let Some(max_results) = query.bounds().max_results {
            merged.truncate_groups(max_results);
        }

        tracing::info!(
            succeeded = merged.succeeded().count(),
            failed = merged.failed().count(),
            items = merged.total_items(),
            elapsed_ms = merged.elapsed_ms,
            "fan-out complete"
        );

        merged
    }
}

/// Call one backend while holding a permit. The permit is released on every exit path.
async fn invoke_one(
    backend: Arc<dyn SearchBackend>, limiter: &ConcurrencyLimiter, query: &Query, timeout: Duration,
) -> BackendResult {
    let descriptor = *backend.descriptor();

    let _permit = match limiter.acquire().await {
        Ok(permit) => permit,
        Err(e) => return BackendResult::failed(&descriptor, e.to_string(), 0),
    };

    let started = Instant::now();
    let outcome = tokio::time::timeout(timeout, backend.invoke(query)).await;
    let elapsed = elapsed_ms(started);

    match outcome {
        Ok(Ok(items)) => {
            tracing::debug!(backend = descriptor.id, count = items.len(), elapsed_ms = elapsed, "backend returned results");
            BackendResult::succeeded(&descriptor, items, elapsed)
        }
        Ok(Err(e)) => {
            tracing::warn!(backend = descriptor.id, error = %e, "backend query failed");
            BackendResult::failed(&descriptor, e.to_string(), elapsed)
        }
        Err(_) => {
            let e = BackendError::Timeout(timeout.as_millis() as u64);
            tracing::warn!(backend = descriptor.id, error = %e, "backend query timed out");
            BackendResult::failed(&descriptor, e.to_string(), elapsed)
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
