//! Web archive and cache services.
//!
//! Most services are link builders: the lookup URL for the target page is
//! the result. The Wayback Machine can additionally verify availability
//! through its public API (see [`wayback`]).

pub mod wayback;

use async_trait::async_trait;
use polysearch_core::{Adapter, BackendDescriptor, BackendError, Query, ResultItem, SearchBackend};

pub use wayback::{AVAILABILITY_TITLE, WaybackMachine};

use crate::http;

/// A link-only archive service.
pub struct ArchiveService {
    descriptor: &'static BackendDescriptor,
    save_endpoint: Option<&'static str>,
}

impl ArchiveService {
    pub fn new(descriptor: &'static BackendDescriptor) -> Self {
        let save_endpoint = match descriptor.adapter {
            Adapter::ArchiveLink { capture } => capture,
            _ => None,
        };
        Self { descriptor, save_endpoint }
    }

    /// Links for `url`: the lookup link, then the capture link if the service has one.
    pub fn links(&self, url: &str) -> Vec<ResultItem> {
        let lookup = http::fill(self.descriptor.endpoint, "{url}", url);
        match self.save_endpoint {
            Some(save) => vec![
                ResultItem::new("Search Archives", lookup, ""),
                ResultItem::new("Create New Archive", http::fill(save, "{url}", url), ""),
            ],
            None => vec![ResultItem::new("Access Cache", lookup, "")],
        }
    }
}

#[async_trait]
impl SearchBackend for ArchiveService {
    fn descriptor(&self) -> &BackendDescriptor {
        self.descriptor
    }

    async fn invoke(&self, query: &Query) -> Result<Vec<ResultItem>, BackendError> {
        Ok(self.links(query.text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polysearch_core::catalog;

    #[test]
    fn test_cache_link() {
        let service = ArchiveService::new(catalog::find("google_cache").unwrap());
        let links = service.links("https://example.com/");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].title, "Access Cache");
        assert_eq!(links[0].url, "https://webcache.googleusercontent.com/search?q=cache:https%3A%2F%2Fexample.com%2F");
    }

    #[test]
    fn test_archive_today_has_capture_link() {
        let service = ArchiveService::new(catalog::find("archive_today").unwrap());
        let links = service.links("https://example.com/");
        let titles: Vec<&str> = links.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["Search Archives", "Create New Archive"]);
        assert_eq!(links[1].url, "https://archive.ph/?run=1&url=https%3A%2F%2Fexample.com%2F");
    }

    #[test]
    fn test_capture_link_comes_from_descriptor() {
        let mirror: &'static BackendDescriptor = Box::leak(Box::new(BackendDescriptor {
            id: "archive_mirror",
            label: "Archive Mirror",
            adapter: Adapter::ArchiveLink { capture: Some("https://mirror.example/save?u={url}") },
            ..*catalog::find("google_cache").unwrap()
        }));
        let links = ArchiveService::new(mirror).links("https://example.com/");
        assert_eq!(links.len(), 2);
        assert_eq!(links[1].url, "https://mirror.example/save?u=https%3A%2F%2Fexample.com%2F");
    }
}
