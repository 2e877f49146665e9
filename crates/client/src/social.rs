//! Social platform search links.
//!
//! Platforms are not scraped: most require authentication for automated
//! access. Each backend yields the platform's public search URL.

use async_trait::async_trait;
use polysearch_core::{BackendDescriptor, BackendError, Query, ResultItem, SearchBackend};

use crate::http;

pub const SOCIAL_NOTE: &str = "Direct URL for browser use. Automated access may require authentication.";

pub struct SocialPlatform {
    descriptor: &'static BackendDescriptor,
}

impl SocialPlatform {
    pub fn new(descriptor: &'static BackendDescriptor) -> Self {
        Self { descriptor }
    }
}

#[async_trait]
impl SearchBackend for SocialPlatform {
    fn descriptor(&self) -> &BackendDescriptor {
        self.descriptor
    }

    async fn invoke(&self, query: &Query) -> Result<Vec<ResultItem>, BackendError> {
        let url = http::fill(self.descriptor.endpoint, "{query}", query.text());
        Ok(vec![ResultItem::new(self.descriptor.label, url, SOCIAL_NOTE)])
    }
}
