//! Builds the production backend registry from the static catalog.

use std::sync::Arc;

use polysearch_core::catalog;
use polysearch_core::{Adapter, AppConfig, BackendRegistry, Error, SearchBackend};

use crate::archive::{ArchiveService, WaybackMachine};
use crate::engines::HtmlEngine;
use crate::http;
use crate::social::SocialPlatform;

/// Register every catalog backend, in catalog order, sharing one HTTP client.
pub fn default_registry(config: &AppConfig) -> Result<BackendRegistry, Error> {
    let client = http::build_client(config)?;
    let mut registry = BackendRegistry::new();

    for descriptor in catalog::all() {
        let backend: Arc<dyn SearchBackend> = match descriptor.adapter {
            Adapter::HtmlPage(_) => Arc::new(HtmlEngine::new(descriptor, client.clone())),
            Adapter::SearchLink => Arc::new(SocialPlatform::new(descriptor)),
            Adapter::ArchiveLink { .. } => Arc::new(ArchiveService::new(descriptor)),
            Adapter::Wayback => Arc::new(WaybackMachine::new(descriptor, client.clone())),
        };
        registry.register(backend)?;
    }

    tracing::debug!(backends = registry.len(), "backend registry built");
    Ok(registry)
}
