//! Core types and shared functionality for polysearch.
//!
//! This crate provides:
//! - Input sanitization for queries and URLs
//! - In-memory LRU/TTL result cache
//! - Concurrency limiter and fan-out orchestrator
//! - The backend capability trait, registry and static catalog
//! - Unified error types
//! - Configuration structures

pub mod backend;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod limiter;
pub mod orchestrator;
pub mod sanitize;
pub mod types;

pub use backend::{BackendError, BackendRegistry, SearchBackend};
pub use cache::{CacheKey, ResultCache};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use limiter::{ConcurrencyLimiter, Permit};
pub use orchestrator::Orchestrator;
pub use sanitize::{CleanText, sanitize_query, validate_url};
pub use types::{
    Adapter, BackendClass, BackendDescriptor, BackendResult, Bounds, MergedResult, PageLayout, Query, ResultItem, Target,
};
