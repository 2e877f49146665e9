//! HTML search engine scrapers.
//!
//! Every engine is a GET against the engine's result page with the query
//! form-encoded into its URL template. The page is parsed by the engine's
//! [`ResultParser`]. Non-200 responses fail the backend with their status.

pub mod parsers;

use async_trait::async_trait;
use polysearch_core::{Adapter, BackendDescriptor, BackendError, PageLayout, Query, ResultItem, SearchBackend};

pub use parsers::ResultParser;

use crate::http;

const HTML_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// A web search engine scraped through its HTML result page.
pub struct HtmlEngine {
    descriptor: &'static BackendDescriptor,
    client: reqwest::Client,
    parser: ResultParser,
}

impl HtmlEngine {
    /// The parser follows the descriptor's page layout; non-page adapters fall back to link harvesting.
    pub fn new(descriptor: &'static BackendDescriptor, client: reqwest::Client) -> Self {
        let layout = match descriptor.adapter {
            Adapter::HtmlPage(layout) => layout,
            _ => PageLayout::Generic,
        };
        Self { descriptor, client, parser: ResultParser::from(layout) }
    }

    pub fn parser(&self) -> ResultParser {
        self.parser
    }

    /// Result page URL for a query.
    pub fn search_url(&self, query: &str) -> String {
        http::fill(self.descriptor.endpoint, "{query}", query)
    }
}

#[async_trait]
impl SearchBackend for HtmlEngine {
    fn descriptor(&self) -> &BackendDescriptor {
        self.descriptor
    }

    async fn invoke(&self, query: &Query) -> Result<Vec<ResultItem>, BackendError> {
        let url = self.search_url(query.text());
        tracing::trace!(engine = self.descriptor.id, %url, "fetching result page");

        let html = http::fetch_text(&self.client, &url, HTML_ACCEPT).await?;
        tracing::trace!(engine = self.descriptor.id, bytes = html.len(), "result page received");

        let items = self.parser.parse(&html)?;
        tracing::debug!(engine = self.descriptor.id, count = items.len(), "result page parsed");
        Ok(items)
    }
}
