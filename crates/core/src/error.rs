//! Unified error types for polysearch.
//!
//! Protocol codes are assigned where these errors leave the server, not here.

/// Unified error types for the core search pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input rejected by the sanitizer or by query construction.
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// The requested target is not a registered backend of the requested class.
    #[error("UNKNOWN_BACKEND: {0}")]
    UnknownBackend(String),

    /// The result cache failed internally (e.g. a poisoned lock).
    #[error("CACHE_FAULT: {0}")]
    CacheFault(String),

    /// The concurrency limiter was closed while a caller waited for a permit.
    #[error("LIMITER_CLOSED")]
    LimiterClosed,

    /// Any other internal failure.
    #[error("INTERNAL: {0}")]
    Internal(String),
}
