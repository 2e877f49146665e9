//! In-memory result cache.
//!
//! Merged results are keyed by a SHA-256 fingerprint of the normalized query
//! and held in a bounded LRU with a per-entry TTL. Nothing is persisted.

pub mod hash;
pub mod lru;

pub use hash::CacheKey;
pub use lru::ResultCache;
