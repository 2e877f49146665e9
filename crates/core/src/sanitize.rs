//! Input sanitization for queries and URLs.
//!
//! Every untrusted string passes through here before it reaches the cache,
//! a backend or a reply. [`CleanText`] can only be produced by this module,
//! so a [`crate::Query`] always carries sanitized text.

use std::sync::LazyLock;

use regex::Regex;

use crate::Error;
use crate::config::MAX_QUERY_LENGTH;

/// Maximum accepted URL length, in characters.
pub const MAX_URL_LENGTH: usize = 2048;

/// Tag body up to its closing `>`. A `>` inside a quoted attribute value does
/// not close the tag, and an unterminated quote runs to the end of the input.
const TAG_BODY: &str = r#"(?:[^>"']|"[^"]*(?:"|$)|'[^']*(?:'|$))*"#;

/// Script and style blocks, including their content. An unclosed block runs to the end.
static SCRIPT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?is)<\s*(?:script|style)\b{TAG_BODY}(?:>.*?(?:<\s*/\s*(?:script|style)\s*>|$)|$)"))
        .expect("valid regex")
});

/// Any remaining tag-like markup, closed or not.
static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?s)</?[A-Za-z!]{TAG_BODY}(?:>|$)")).expect("valid regex"));

/// Patterns rejected anywhere in a URL, regardless of its scheme.
static BLOCKED_URL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)<\s*/?\s*script",
        r"(?i)javascript\s*:",
        r"(?i)vbscript\s*:",
        r"(?i)\bon[a-z]+\s*=",
        r"(?i)\beval\s*\(",
        r"(?i)\bexpression\s*\(",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("valid regex"))
    .collect()
});

/// Text that has passed sanitization.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CleanText(String);

impl CleanText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for CleanText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Clean a free-text search query.
///
/// Steps:
/// 1. Drop ASCII control characters other than tab, CR and LF
/// 2. Remove script/style blocks with their content
/// 3. Remove remaining tags
/// 4. Trim surrounding whitespace
///
/// Over-long results are rejected, never truncated.
pub fn sanitize_query(raw: &str) -> Result<CleanText, Error> {
    let stripped: String = raw
        .chars()
        .filter(|c| !c.is_ascii_control() || matches!(c, '\t' | '\n' | '\r'))
        .collect();

    let without_scripts = SCRIPT_BLOCK.replace_all(&stripped, " ");
    let without_tags = TAG.replace_all(&without_scripts, " ");
    let cleaned = without_tags.trim();

    if cleaned.is_empty() {
        return Err(Error::InvalidInput("query is empty after sanitization".into()));
    }

    let length = cleaned.chars().count();
    if length > MAX_QUERY_LENGTH {
        return Err(Error::InvalidInput(format!(
            "query too long: {length} chars (max {MAX_QUERY_LENGTH})"
        )));
    }

    Ok(CleanText(cleaned.to_string()))
}

/// Validate a URL supplied for archive lookups and return its canonical form.
///
/// The URL must carry an explicit `http` or `https` scheme and a host. The
/// fragment is dropped; the query string is kept as is.
pub fn validate_url(raw: &str) -> Result<CleanText, Error> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(Error::InvalidInput("Invalid URL: empty URL".into()));
    }

    if trimmed.chars().count() > MAX_URL_LENGTH {
        return Err(Error::InvalidInput(format!("Invalid URL: longer than {MAX_URL_LENGTH} chars")));
    }

    if let Some(pattern) = BLOCKED_URL_PATTERNS.iter().find(|p| p.is_match(trimmed)) {
        tracing::debug!(pattern = pattern.as_str(), "url rejected by blocklist");
        return Err(Error::InvalidInput("Invalid URL: contains a blocked pattern".into()));
    }

    let mut parsed = url::Url::parse(trimmed).map_err(|e| {
        Error::InvalidInput(format!("Invalid URL: {e} (must include scheme http/https and a domain)"))
    })?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(Error::InvalidInput(format!(
                "Invalid URL: unsupported scheme {scheme}, only http and https are allowed"
            )));
        }
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(Error::InvalidInput("Invalid URL: missing host".into()));
    }

    parsed.set_fragment(None);

    Ok(CleanText(parsed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_plain_query() {
        let cleaned = sanitize_query("privacy focused search").unwrap();
        assert_eq!(cleaned.as_str(), "privacy focused search");
    }

    #[test]
    fn test_sanitize_trims_whitespace() {
        let cleaned = sanitize_query("   rust   ").unwrap();
        assert_eq!(cleaned.as_str(), "rust");
    }

    #[test]
    fn test_sanitize_strips_control_characters() {
        let cleaned = sanitize_query("ru\u{0}st\u{7}\u{1b}\u{7f} lang").unwrap();
        assert_eq!(cleaned.as_str(), "rust lang");
    }

    #[test]
    fn test_sanitize_keeps_tabs_and_newlines_inside() {
        let cleaned = sanitize_query("a\tb\nc").unwrap();
        assert_eq!(cleaned.as_str(), "a\tb\nc");
    }

    #[test]
    fn test_sanitize_removes_script_block_and_content() {
        let cleaned = sanitize_query("hello <script>alert(1)</script> world").unwrap();
        assert!(!cleaned.as_str().contains("script"));
        assert!(!cleaned.as_str().contains("alert(1)"));
        assert!(cleaned.as_str().starts_with("hello"));
        assert!(cleaned.as_str().ends_with("world"));
    }

    #[test]
    fn test_sanitize_removes_script_case_insensitive_and_unclosed() {
        let cleaned = sanitize_query("news <ScRiPt type='x'>steal()").unwrap();
        assert_eq!(cleaned.as_str(), "news");

        let cleaned = sanitize_query("a <SCRIPT>\nalert(1)\n</SCRIPT > b").unwrap();
        assert!(!cleaned.as_str().contains("alert"));
    }

    #[test]
    fn test_sanitize_removes_tags_keeps_text() {
        let cleaned = sanitize_query("<b>bold</b> and <img src=x onerror=alert(1)>").unwrap();
        assert!(!cleaned.as_str().contains('<'));
        assert!(!cleaned.as_str().contains("onerror"));
        assert!(cleaned.as_str().contains("bold"));
    }

    #[test]
    fn test_sanitize_quoted_gt_does_not_close_tag() {
        let cleaned = sanitize_query(r#"news <img alt=">" onerror=alert(1)>"#).unwrap();
        assert_eq!(cleaned.as_str(), "news");

        let cleaned = sanitize_query("docs <a title='a>b' href=x onclick=go()>rust</a> book").unwrap();
        assert!(!cleaned.as_str().contains("onclick"));
        assert!(cleaned.as_str().contains("rust"));
        assert!(cleaned.as_str().ends_with("book"));
    }

    #[test]
    fn test_sanitize_unterminated_quote_runs_to_end() {
        let cleaned = sanitize_query(r#"news <img alt="> onerror=alert(1)"#).unwrap();
        assert_eq!(cleaned.as_str(), "news");

        let cleaned = sanitize_query(r#"news <script src=">">steal()</script> today"#).unwrap();
        assert!(!cleaned.as_str().contains("steal"));
        assert!(cleaned.as_str().ends_with("today"));
    }

    #[test]
    fn test_sanitize_keeps_comparison_operators() {
        let cleaned = sanitize_query("a < b and c > d").unwrap();
        assert_eq!(cleaned.as_str(), "a < b and c > d");
    }

    #[test]
    fn test_sanitize_rejects_empty() {
        assert!(matches!(sanitize_query(""), Err(Error::InvalidInput(_))));
        assert!(matches!(sanitize_query("   \u{1}  "), Err(Error::InvalidInput(_))));
        assert!(matches!(sanitize_query("<script>only()</script>"), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_sanitize_rejects_overlong_instead_of_truncating() {
        let at_limit = "a".repeat(MAX_QUERY_LENGTH);
        assert_eq!(sanitize_query(&at_limit).unwrap().as_str().len(), MAX_QUERY_LENGTH);

        let over = "a".repeat(MAX_QUERY_LENGTH + 1);
        assert!(matches!(sanitize_query(&over), Err(Error::InvalidInput(msg)) if msg.contains("too long")));
    }

    #[test]
    fn test_sanitize_length_counts_chars_not_bytes() {
        let query = "é".repeat(MAX_QUERY_LENGTH);
        assert!(sanitize_query(&query).is_ok());
    }

    #[test]
    fn test_validate_url_basic() {
        let url = validate_url("https://example.com/page?a=1").unwrap();
        assert_eq!(url.as_str(), "https://example.com/page?a=1");
    }

    #[test]
    fn test_validate_url_lowercases_host_and_drops_fragment() {
        let url = validate_url("  http://EXAMPLE.com/Path#section ").unwrap();
        assert_eq!(url.as_str(), "http://example.com/Path");
    }

    #[test]
    fn test_validate_url_requires_scheme() {
        assert!(matches!(validate_url("not-a-url"), Err(Error::InvalidInput(_))));
        assert!(matches!(validate_url("example.com"), Err(Error::InvalidInput(_))));
        assert!(matches!(validate_url("//example.com"), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_validate_url_rejects_other_schemes() {
        assert!(validate_url("ftp://example.com").is_err());
        assert!(validate_url("file:///etc/passwd").is_err());
        assert!(validate_url("data:text/html,hi").is_err());
    }

    #[test]
    fn test_validate_url_rejects_blocked_patterns() {
        assert!(validate_url("javascript:alert(1)").is_err());
        assert!(validate_url("https://example.com/<script>alert(1)</script>").is_err());
        assert!(validate_url("https://example.com/?onload=alert(1)").is_err());
        assert!(validate_url("https://example.com/?q=x onmouseover = y").is_err());
        assert!(validate_url("https://example.com/?x=JavaScript:void(0)").is_err());
    }

    #[test]
    fn test_validate_url_allows_lookalike_parameters() {
        assert!(validate_url("https://example.com/?action=go&session=1").is_ok());
        assert!(validate_url("https://example.com/?mongodb_conn=x").is_ok());
    }

    #[test]
    fn test_validate_url_rejects_empty_and_overlong() {
        assert!(validate_url("   ").is_err());
        let long = format!("https://example.com/{}", "a".repeat(MAX_URL_LENGTH));
        assert!(validate_url(&long).is_err());
    }
}
