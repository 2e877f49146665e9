//! Backend adapters for polysearch.
//!
//! This crate provides the concrete [`polysearch_core::SearchBackend`]
//! implementations (HTML engine scrapers, social link builders, archive
//! services) and the shared HTTP client they use.

pub mod archive;
pub mod engines;
pub mod http;
pub mod registry;
pub mod social;

pub use archive::{AVAILABILITY_TITLE, ArchiveService, WaybackMachine};
pub use engines::{HtmlEngine, ResultParser};
pub use registry::default_registry;
pub use social::SocialPlatform;
