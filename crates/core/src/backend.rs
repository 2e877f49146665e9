//! The backend capability and the registry the orchestrator selects from.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{BackendClass, BackendDescriptor, Error, Query, ResultItem, Target};

/// Failure of a single backend invocation.
///
/// These never escape an orchestration round; they are recorded as the
/// failure reason of that backend's group.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("timed out after {0}ms")]
    Timeout(u64),

    #[error("request failed: {0}")]
    Http(String),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("could not parse response: {0}")]
    Parse(String),

    #[error("unavailable: {0}")]
    Unavailable(String),

    #[error("backend task panicked")]
    Panicked,
}

/// One external information source.
///
/// Implementations receive an already sanitized [`Query`] and return the
/// items they found, in their own ranking order.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Static identity of this backend.
    fn descriptor(&self) -> &BackendDescriptor;

    /// Run the query against the source.
    async fn invoke(&self, query: &Query) -> Result<Vec<ResultItem>, BackendError>;
}

/// Backends enumerated at startup, in registration order.
#[derive(Clone, Default)]
pub struct BackendRegistry {
    backends: Vec<Arc<dyn SearchBackend>>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a backend. Identifiers must be unique across all classes.
    pub fn register(&mut self, backend: Arc<dyn SearchBackend>) -> Result<(), Error> {
        let id = backend.descriptor().id;
        if id == Target::ALL {
            return Err(Error::Internal(format!("backend id '{id}' is reserved")));
        }
        if self.backends.iter().any(|b| b.descriptor().id == id) {
            return Err(Error::Internal(format!("backend '{id}' registered twice")));
        }
        self.backends.push(backend);
        Ok(())
    }

    /// Backends a query should be sent to, in registration order.
    ///
    /// [`Target::All`] selects every backend of the query's intent class;
    /// a specific identifier selects exactly that backend, which must belong
    /// to the same class.
    pub fn select(&self, query: &Query) -> Result<Vec<Arc<dyn SearchBackend>>, Error> {
        let class = query.intent();
        match query.target() {
            Target::All => Ok(self.of_class(class).cloned().collect()),
            Target::Backend(id) => self
                .of_class(class)
                .find(|b| b.descriptor().id == id)
                .map(|b| vec![Arc::clone(b)])
                .ok_or_else(|| Error::UnknownBackend(format!("no {class} backend named '{id}'"))),
        }
    }

    /// Parse a raw target argument for `class`.
    ///
    /// Absent or `"all"` maps to [`Target::All`]; anything else must be a
    /// registered identifier of that class.
    pub fn resolve_target(&self, class: BackendClass, raw: Option<&str>) -> Result<Target, Error> {
        match raw.map(str::trim) {
            None | Some(Target::ALL) => Ok(Target::All),
            Some(id) if self.of_class(class).any(|b| b.descriptor().id == id) => Ok(Target::Backend(id.to_string())),
            Some(id) => Err(Error::UnknownBackend(format!("no {class} backend named '{id}'"))),
        }
    }

    pub fn descriptors(&self, class: BackendClass) -> Vec<BackendDescriptor> {
        self.of_class(class).map(|b| *b.descriptor()).collect()
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    fn of_class(&self, class: BackendClass) -> impl Iterator<Item = &Arc<dyn SearchBackend>> {
        self.backends.iter().filter(move |b| b.descriptor().class == class)
    }
}

impl std::fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ids: Vec<&str> = self.backends.iter().map(|b| b.descriptor().id).collect();
        f.debug_struct("BackendRegistry").field("backends", &ids).finish()
    }
}
