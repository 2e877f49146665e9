//! Core types shared by the orchestrator, the cache and the backend adapters.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::sanitize::CleanText;

/// Capability class of a backend, and the intent of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendClass {
    /// General web search engine.
    Web,
    /// Social platform search.
    Social,
    /// Web archive / cache service.
    Archive,
}

impl BackendClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Social => "social",
            Self::Archive => "archive",
        }
    }
}

impl fmt::Display for BackendClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Page layout an HTML result scraper expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageLayout {
    DuckDuckGo,
    Brave,
    Mojeek,
    /// No dedicated parser; links are harvested heuristically.
    Generic,
}

/// How a backend produces results. Chosen per catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Adapter {
    /// GET the endpoint and scrape the result page.
    HtmlPage(PageLayout),
    /// Yield the endpoint itself as the only result.
    SearchLink,
    /// Yield the lookup link, and a capture link when the service has one.
    ArchiveLink { capture: Option<&'static str> },
    /// Wayback Machine links with an optional availability lookup.
    Wayback,
}

/// Static description of one registered backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BackendDescriptor {
    /// Stable identifier used in tool arguments (e.g. `duckduckgo`).
    pub id: &'static str,
    /// Human-readable name.
    pub label: &'static str,
    pub class: BackendClass,
    /// Heading the backend is listed under.
    pub group: &'static str,
    /// Primary lookup URL template; `{query}` or `{url}` is substituted.
    pub endpoint: &'static str,
    /// One-line description for listings.
    pub about: &'static str,
    #[serde(skip)]
    pub adapter: Adapter,
}

/// Which backends of a class a query is aimed at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    /// Every registered backend of the query's class.
    All,
    /// Exactly one backend, by identifier.
    Backend(String),
}

impl Target {
    /// Sentinel accepted in tool arguments for [`Target::All`].
    pub const ALL: &'static str = "all";

    pub fn as_str(&self) -> &str {
        match self {
            Self::All => Self::ALL,
            Self::Backend(id) => id,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-query limits and switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Bounds {
    /// Truncate every backend group to this many items after the merge.
    pub max_results: Option<usize>,
    /// Ask archive backends that support it to verify snapshot availability.
    pub check_availability: bool,
}

/// One logical request, built per incoming tool call.
///
/// The text is always sanitizer output, so no backend ever sees raw input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    intent: BackendClass,
    text: CleanText,
    target: Target,
    bounds: Bounds,
}

impl Query {
    pub fn new(intent: BackendClass, text: CleanText, target: Target, bounds: Bounds) -> Self {
        Self { intent, text, target, bounds }
    }

    pub fn intent(&self) -> BackendClass {
        self.intent
    }

    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Text in the form used for fingerprinting.
    ///
    /// Search intents are case- and whitespace-insensitive; archive lookups
    /// keep the canonical URL exactly.
    pub fn normalized_text(&self) -> String {
        match self.intent {
            BackendClass::Archive => self.text.as_str().to_string(),
            BackendClass::Web | BackendClass::Social => {
                self.text.as_str().split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
            }
        }
    }
}

/// A single result returned by a backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultItem {
    pub title: String,
    pub url: String,
    /// Snippet or source-specific annotation; may be empty.
    #[serde(default)]
    pub snippet: String,
}

impl ResultItem {
    pub fn new(title: impl Into<String>, url: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self { title: title.into(), url: url.into(), snippet: snippet.into() }
    }
}

/// Outcome of one backend invocation within an orchestration round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendResult {
    /// Identifier of the originating backend.
    pub backend: String,
    pub label: String,
    pub items: Vec<ResultItem>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Wall time of the backend call, excluding permit wait.
    pub elapsed_ms: u64,
}

impl BackendResult {
    pub fn succeeded(descriptor: &BackendDescriptor, items: Vec<ResultItem>, elapsed_ms: u64) -> Self {
        Self {
            backend: descriptor.id.to_string(),
            label: descriptor.label.to_string(),
            items,
            success: true,
            error: None,
            elapsed_ms,
        }
    }

    pub fn failed(descriptor: &BackendDescriptor, reason: impl Into<String>, elapsed_ms: u64) -> Self {
        Self {
            backend: descriptor.id.to_string(),
            label: descriptor.label.to_string(),
            items: Vec::new(),
            success: false,
            error: Some(reason.into()),
            elapsed_ms,
        }
    }
}

/// Merged output of one orchestration round. This is what gets cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedResult {
    /// Sanitized query text the round ran for.
    pub query: String,
    pub intent: BackendClass,
    /// One group per selected backend, in registration order.
    pub groups: Vec<BackendResult>,
    /// Wall time of the whole round.
    pub elapsed_ms: u64,
    /// RFC 3339 timestamp of when the round started.
    pub fetched_at: String,
}

impl MergedResult {
    pub fn succeeded(&self) -> impl Iterator<Item = &BackendResult> {
        self.groups.iter().filter(|g| g.success)
    }

    pub fn failed(&self) -> impl Iterator<Item = &BackendResult> {
        self.groups.iter().filter(|g| !g.success)
    }

    /// Identifiers of the backends that failed, in selection order.
    pub fn failed_backends(&self) -> Vec<&str> {
        self.failed().map(|g| g.backend.as_str()).collect()
    }

    pub fn total_items(&self) -> usize {
        self.groups.iter().map(|g| g.items.len()).sum()
    }

    /// True when at least one backend was selected and every one failed.
    pub fn all_failed(&self) -> bool {
        !self.groups.is_empty() && self.groups.iter().all(|g| !g.success)
    }

    /// Truncate each backend group independently.
    pub fn truncate_groups(&mut self, max_results: usize) {
        for group in &mut self.groups {
            group.items.truncate(max_results);
        }
    }
}
