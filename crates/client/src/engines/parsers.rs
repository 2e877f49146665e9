//! Result page parsers, one per engine family.

use polysearch_core::{BackendError, PageLayout, ResultItem};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Generic parser result cap.
const GENERIC_LIMIT: usize = 20;

/// Minimum title length, in characters, for generic link harvesting.
const GENERIC_MIN_TITLE: usize = 10;

/// How an engine's result page is turned into items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultParser {
    DuckDuckGo,
    Brave,
    Mojeek,
    /// Link harvesting for engines without a dedicated parser.
    Generic,
}

impl From<PageLayout> for ResultParser {
    fn from(layout: PageLayout) -> Self {
        match layout {
            PageLayout::DuckDuckGo => Self::DuckDuckGo,
            PageLayout::Brave => Self::Brave,
            PageLayout::Mojeek => Self::Mojeek,
            PageLayout::Generic => Self::Generic,
        }
    }
}

impl ResultParser {
    pub fn parse(self, html: &str) -> Result<Vec<ResultItem>, BackendError> {
        let document = Html::parse_document(html);
        match self {
            Self::DuckDuckGo => parse_duckduckgo(&document),
            Self::Brave => parse_brave(&document),
            Self::Mojeek => parse_mojeek(&document),
            Self::Generic => parse_generic(&document),
        }
    }
}

fn selector(css: &str) -> Result<Selector, BackendError> {
    Selector::parse(css).map_err(|e| BackendError::Parse(format!("invalid selector {css}: {e:?}")))
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().map(str::trim).filter(|s| !s.is_empty()).collect::<Vec<_>>().join(" ")
}

fn class_contains(element: ElementRef<'_>, needle: &str) -> bool {
    element.value().attr("class").is_some_and(|class| class.to_lowercase().contains(needle))
}

/// Unwrap DuckDuckGo's `/l/?uddg=` redirect; other hrefs pass through.
fn unwrap_duckduckgo_redirect(href: &str) -> Option<String> {
    let full = if href.starts_with("//") { format!("https:{href}") } else { href.to_string() };
    let parsed = Url::parse(&full).ok()?;

    if parsed.host_str().is_some_and(|h| h.ends_with("duckduckgo.com")) && parsed.path().starts_with("/l/") {
        parsed.query_pairs().find(|(key, _)| key == "uddg").map(|(_, value)| value.into_owned())
    } else {
        Some(full)
    }
}

fn parse_duckduckgo(document: &Html) -> Result<Vec<ResultItem>, BackendError> {
    let result_sel = selector("div.result")?;
    let title_sel = selector("a.result__a")?;
    let snippet_sel = selector(".result__snippet")?;

    let mut items = Vec::new();
    for result in document.select(&result_sel) {
        let Some(title_el) = result.select(&title_sel).next() else { continue };
        let title = text_of(title_el);
        if title.is_empty() {
            continue;
        }

        let Some(url) = title_el.value().attr("href").and_then(unwrap_duckduckgo_redirect) else { continue };
        let snippet = result.select(&snippet_sel).next().map(text_of).unwrap_or_default();

        items.push(ResultItem::new(title, url, snippet));
    }

    Ok(items)
}

fn parse_brave(document: &Html) -> Result<Vec<ResultItem>, BackendError> {
    let container_sel = selector("div[class]")?;
    let anchor_sel = selector("a[href]")?;
    let heading_sel = selector("h1, h2, h3")?;
    let para_sel = selector("p")?;

    let mut items = Vec::new();
    for container in document.select(&container_sel).filter(|el| class_contains(*el, "snippet")) {
        let Some(anchor) = container.select(&anchor_sel).next() else { continue };
        let Some(href) = anchor.value().attr("href") else { continue };
        if !href.starts_with("http") || items.iter().any(|item: &ResultItem| item.url == href) {
            continue;
        }

        let title = container.select(&heading_sel).next().map(text_of).unwrap_or_else(|| text_of(anchor));
        if title.is_empty() {
            continue;
        }
        let snippet = container.select(&para_sel).next().map(text_of).unwrap_or_default();

        items.push(ResultItem::new(title, href, snippet));
    }

    Ok(items)
}

fn parse_mojeek(document: &Html) -> Result<Vec<ResultItem>, BackendError> {
    let container_sel = selector("div[class], article[class]")?;
    let title_sel = selector("h3, a")?;
    let link_sel = selector("a[href]")?;
    let annotation_sel = selector("p[class], span[class]")?;

    let mut items = Vec::new();
    for container in document.select(&container_sel).filter(|el| class_contains(*el, "result")) {
        let (Some(title_el), Some(link_el)) = (container.select(&title_sel).next(), container.select(&link_sel).next())
        else {
            continue;
        };
        let title = text_of(title_el);
        let url = link_el.value().attr("href").unwrap_or_default();
        if title.is_empty() || url.is_empty() {
            continue;
        }

        let snippet = container
            .select(&annotation_sel)
            .find(|el| class_contains(*el, "desc") || class_contains(*el, "snippet"))
            .map(text_of)
            .unwrap_or_default();

        items.push(ResultItem::new(title, url, snippet));
    }

    Ok(items)
}

fn parse_generic(document: &Html) -> Result<Vec<ResultItem>, BackendError> {
    let anchor_sel = selector("a[href]")?;

    let mut items = Vec::new();
    for anchor in document.select(&anchor_sel) {
        let parent_ok = anchor
            .parent()
            .and_then(ElementRef::wrap)
            .is_some_and(|parent| matches!(parent.value().name(), "div" | "article" | "li"));
        if !parent_ok {
            continue;
        }

        let title = text_of(anchor);
        let url = anchor.value().attr("href").unwrap_or_default();
        if title.chars().count() > GENERIC_MIN_TITLE && url.starts_with("http") {
            items.push(ResultItem::new(title, url, ""));
        }

        if items.len() >= GENERIC_LIMIT {
            break;
        }
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_layout() {
        assert_eq!(ResultParser::from(PageLayout::DuckDuckGo), ResultParser::DuckDuckGo);
        assert_eq!(ResultParser::from(PageLayout::Brave), ResultParser::Brave);
        assert_eq!(ResultParser::from(PageLayout::Mojeek), ResultParser::Mojeek);
        assert_eq!(ResultParser::from(PageLayout::Generic), ResultParser::Generic);
    }

    #[test]
    fn test_parse_duckduckgo() {
        let html = r##"
            <html><body>
              <div class="result results_links">
                <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.rust-lang.org%2F&rut=abc">Rust Programming Language</a>
                <a class="result__snippet" href="#">A language empowering everyone.</a>
              </div>
              <div class="result">
                <a class="result__a" href="https://doc.rust-lang.org/book/">The Book</a>
              </div>
              <div class="result"><span>no title link</span></div>
            </body></html>
        "##;

        let items = ResultParser::DuckDuckGo.parse(html).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Rust Programming Language");
        assert_eq!(items[0].url, "https://www.rust-lang.org/");
        assert_eq!(items[0].snippet, "A language empowering everyone.");
        assert_eq!(items[1].url, "https://doc.rust-lang.org/book/");
        assert_eq!(items[1].snippet, "");
    }

    #[test]
    fn test_unwrap_duckduckgo_redirect() {
        assert_eq!(
            unwrap_duckduckgo_redirect("https://duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com%2Fa").as_deref(),
            Some("https://example.com/a")
        );
        assert_eq!(unwrap_duckduckgo_redirect("https://example.com/").as_deref(), Some("https://example.com/"));
        assert_eq!(unwrap_duckduckgo_redirect("not a url"), None);
    }

    #[test]
    fn test_parse_brave() {
        let html = r#"
            <html><body>
              <div class="snippet fdb" data-type="web">
                <a href="https://tokio.rs/">tokio.rs</a>
                <h2>Tokio - An asynchronous Rust runtime</h2>
                <p>Build reliable network applications.</p>
              </div>
              <div class="Snippet">
                <a href="https://docs.rs/">Docs.rs landing page</a>
              </div>
              <div class="snippet"><a href="/relative">relative</a></div>
              <div class="other"><a href="https://ignored.example/">Ignored</a></div>
            </body></html>
        "#;

        let items = ResultParser::Brave.parse(html).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Tokio - An asynchronous Rust runtime");
        assert_eq!(items[0].url, "https://tokio.rs/");
        assert_eq!(items[0].snippet, "Build reliable network applications.");
        assert_eq!(items[1].title, "Docs.rs landing page");
    }

    #[test]
    fn test_parse_mojeek() {
        let html = r#"
            <html><body>
              <ul>
                <li><div class="results-standard">
                  <a class="ob" href="https://serde.rs/">serde.rs</a>
                  <h3>Serde framework</h3>
                  <p class="s">Serialization framework for Rust</p>
                  <p class="desc-text">Serializing and deserializing data structures.</p>
                </div></li>
              </ul>
            </body></html>
        "#;

        let items = ResultParser::Mojeek.parse(html).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "serde.rs");
        assert_eq!(items[0].url, "https://serde.rs/");
        assert_eq!(items[0].snippet, "Serializing and deserializing data structures.");
    }

    #[test]
    fn test_parse_generic_filters_short_and_relative() {
        let html = r#"
            <html><body>
              <div><a href="https://example.com/long">A sufficiently long title</a></div>
              <div><a href="https://example.com/short">Short</a></div>
              <li><a href="/relative/path">A relative link with long text</a></li>
              <p><a href="https://example.com/para">Wrong parent element here</a></p>
              <article><a href="http://example.org/article">Article link long enough</a></article>
            </body></html>
        "#;

        let items = ResultParser::Generic.parse(html).unwrap();
        let urls: Vec<&str> = items.iter().map(|i| i.url.as_str()).collect();
        assert_eq!(urls, vec!["https://example.com/long", "http://example.org/article"]);
    }

    #[test]
    fn test_parse_generic_caps_results() {
        let links: String = (0..30)
            .map(|i| format!(r#"<div><a href="https://example.com/{i}">Result number {i} title</a></div>"#))
            .collect();
        let html = format!("<html><body>{links}</body></html>");

        let items = ResultParser::Generic.parse(&html).unwrap();
        assert_eq!(items.len(), GENERIC_LIMIT);
    }

    #[test]
    fn test_parse_empty_page() {
        for parser in [ResultParser::DuckDuckGo, ResultParser::Brave, ResultParser::Mojeek, ResultParser::Generic] {
            assert!(parser.parse("<html></html>").unwrap().is_empty());
        }
    }
}
