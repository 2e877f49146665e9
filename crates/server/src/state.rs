//! Process-wide state shared by every connection.

use std::sync::Arc;

use polysearch_core::{AppConfig, BackendRegistry, ConcurrencyLimiter, Error, Orchestrator, ResultCache};

use crate::tools::ToolTable;

/// Cache, limiter, registry and tool table, created once at startup.
#[derive(Debug)]
pub struct AppState {
    pub config: AppConfig,
    pub cache: ResultCache,
    pub orchestrator: Orchestrator,
    pub tools: ToolTable,
}

impl AppState {
    /// Build state with the production backend registry.
    pub fn from_config(config: AppConfig) -> Result<Self, Error> {
        let registry = polysearch_client::default_registry(&config)?;
        Self::with_registry(config, registry)
    }

    /// Build state around an explicit registry.
    pub fn with_registry(config: AppConfig, registry: BackendRegistry) -> Result<Self, Error> {
        let limiter = ConcurrencyLimiter::new(config.max_concurrency);
        let orchestrator = Orchestrator::new(Arc::new(registry), limiter, config.timeout());
        let cache = ResultCache::new(config.cache_capacity, config.cache_ttl());
        let tools = ToolTable::build()?;

        tracing::debug!(
            capacity = cache.capacity(),
            ttl_secs = config.cache_ttl_secs,
            max_concurrency = config.max_concurrency,
            "application state ready"
        );

        Ok(Self { config, cache, orchestrator, tools })
    }
}
