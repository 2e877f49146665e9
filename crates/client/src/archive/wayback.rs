//! Wayback Machine backend with optional availability lookup.
//!
//! ### Availability check
//! - `GET https://archive.org/wayback/available?url=...` for the closest snapshot
//! - Best effort `GET .../__wb/sparkline` for snapshot count and first/last
//!   capture; on any failure the closest snapshot stands in for both
//! - Timestamps (`YYYYMMDDhhmmss`) are rendered as `YYYY-MM-DD HH:MM:SS UTC`

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use polysearch_core::{BackendDescriptor, BackendError, Query, ResultItem, SearchBackend};
use serde::Deserialize;

use crate::http;

/// Title of the item carrying the availability summary.
pub const AVAILABILITY_TITLE: &str = "Availability";

const API_ENDPOINT: &str = "https://archive.org/wayback/available?url={url}";
const SPARKLINE_ENDPOINT: &str = "https://web.archive.org/__wb/sparkline?url={url}&collection=web&output=json";
const JSON_ACCEPT: &str = "application/json";

#[derive(Debug, Default, Deserialize)]
struct AvailabilityResponse {
    #[serde(default)]
    archived_snapshots: ArchivedSnapshots,
}

#[derive(Debug, Default, Deserialize)]
struct ArchivedSnapshots {
    closest: Option<ClosestSnapshot>,
}

/// Closest snapshot reported by the availability API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ClosestSnapshot {
    #[serde(default)]
    pub available: bool,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub status: String,
}

/// Capture statistics from the sparkline endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SparklineStats {
    pub total: u64,
    pub first_ts: Option<String>,
    pub last_ts: Option<String>,
}

/// Summary of archived captures for one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaybackReport {
    pub snapshots: u64,
    pub first_timestamp: String,
    pub latest_timestamp: String,
    pub latest_url: String,
}

impl WaybackReport {
    pub fn new(closest: &ClosestSnapshot, stats: Option<&SparklineStats>) -> Self {
        let (snapshots, first, last) = match stats {
            Some(stats) => (
                stats.total,
                stats.first_ts.clone().unwrap_or_default(),
                stats.last_ts.clone().unwrap_or_default(),
            ),
            None => (1, closest.timestamp.clone(), closest.timestamp.clone()),
        };

        Self {
            snapshots,
            first_timestamp: format_timestamp(&first),
            latest_timestamp: format_timestamp(&last),
            latest_url: closest.url.clone(),
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "✅ {} snapshots available (first: {}, latest: {})",
            self.snapshots, self.first_timestamp, self.latest_timestamp
        )
    }
}

/// Parse the availability API body. `None` means no usable snapshot.
pub fn parse_availability(body: &str) -> Result<Option<ClosestSnapshot>, BackendError> {
    let response: AvailabilityResponse =
        serde_json::from_str(body).map_err(|e| BackendError::Parse(format!("availability response: {e}")))?;

    Ok(response.archived_snapshots.closest.filter(|closest| closest.available && !closest.url.is_empty()))
}

/// Parse the sparkline body. Year entries may be a count or a list of monthly counts.
pub fn parse_sparkline(body: &str) -> Option<SparklineStats> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    let total = value
        .get("years")
        .and_then(|years| years.as_object())
        .map(|years| {
            years
                .values()
                .map(|entry| match entry {
                    serde_json::Value::Array(months) => months.iter().filter_map(|m| m.as_u64()).sum(),
                    other => other.as_u64().unwrap_or(0),
                })
                .sum()
        })
        .unwrap_or(0);

    let timestamp = |key: &str| match value.get(key)? {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    };

    Some(SparklineStats { total, first_ts: timestamp("first_ts"), last_ts: timestamp("last_ts") })
}

/// Render a Wayback `YYYYMMDDhhmmss` timestamp for display.
pub fn format_timestamp(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return "Unknown".to_string();
    }

    if let Some(full) = raw.get(..14)
        && let Ok(parsed) = NaiveDateTime::parse_from_str(full, "%Y%m%d%H%M%S")
    {
        return parsed.format("%Y-%m-%d %H:%M:%S UTC").to_string();
    }

    if let Some(day) = raw.get(..8)
        && let Ok(parsed) = NaiveDate::parse_from_str(day, "%Y%m%d")
    {
        return parsed.format("%Y-%m-%d").to_string();
    }

    raw.to_string()
}

/// The Internet Archive's Wayback Machine.
pub struct WaybackMachine {
    descriptor: &'static BackendDescriptor,
    client: reqwest::Client,
}

impl WaybackMachine {
    pub fn new(descriptor: &'static BackendDescriptor, client: reqwest::Client) -> Self {
        Self { descriptor, client }
    }

    /// Query the availability API, then the sparkline stats on a hit.
    pub async fn check_availability(&self, url: &str) -> Result<Option<WaybackReport>, BackendError> {
        let body = http::fetch_text(&self.client, &http::fill(API_ENDPOINT, "{url}", url), JSON_ACCEPT).await?;
        let Some(closest) = parse_availability(&body)? else {
            tracing::debug!(%url, "no wayback snapshots");
            return Ok(None);
        };

        let stats = match http::fetch_text(&self.client, &http::fill(SPARKLINE_ENDPOINT, "{url}", url), JSON_ACCEPT).await {
            Ok(body) => parse_sparkline(&body),
            Err(e) => {
                tracing::debug!(%url, error = %e, "sparkline stats unavailable");
                None
            }
        };

        Ok(Some(WaybackReport::new(&closest, stats.as_ref())))
    }

    /// Browse link, optional availability result, then the API link.
    pub fn items(&self, url: &str, report: Option<Option<&WaybackReport>>) -> Vec<ResultItem> {
        let mut items = vec![ResultItem::new("Browse All Snapshots", http::fill(self.descriptor.endpoint, "{url}", url), "")];

        match report {
            Some(Some(report)) => {
                items.push(ResultItem::new(AVAILABILITY_TITLE, report.latest_url.clone(), report.summary()));
                items.push(ResultItem::new("Latest Snapshot", report.latest_url.clone(), ""));
            }
            Some(None) => items.push(ResultItem::new(AVAILABILITY_TITLE, "", "❌ No snapshots found")),
            None => {}
        }

        items.push(ResultItem::new("API Check", http::fill(API_ENDPOINT, "{url}", url), ""));
        items
    }
}

#[async_trait]
impl SearchBackend for WaybackMachine {
    fn descriptor(&self) -> &BackendDescriptor {
        self.descriptor
    }

    async fn invoke(&self, query: &Query) -> Result<Vec<ResultItem>, BackendError> {
        let url = query.text();
        if !query.bounds().check_availability {
            return Ok(self.items(url, None));
        }

        let report = self.check_availability(url).await?;
        Ok(self.items(url, Some(report.as_ref())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polysearch_core::catalog;

    fn wayback() -> WaybackMachine {
        WaybackMachine::new(catalog::find("wayback").unwrap(), reqwest::Client::new())
    }

    #[test]
    fn test_parse_availability_hit() {
        let body = r#"{
            "url": "example.com",
            "archived_snapshots": {
                "closest": {
                    "status": "200",
                    "available": true,
                    "url": "http://web.archive.org/web/20240101120000/https://example.com/",
                    "timestamp": "20240101120000"
                }
            }
        }"#;

        let closest = parse_availability(body).unwrap().unwrap();
        assert_eq!(closest.timestamp, "20240101120000");
        assert!(closest.url.contains("web.archive.org"));
    }

    #[test]
    fn test_parse_availability_miss() {
        assert_eq!(parse_availability(r#"{"url": "x", "archived_snapshots": {}}"#).unwrap(), None);
        assert_eq!(parse_availability(r#"{"url": "x"}"#).unwrap(), None);
    }

    #[test]
    fn test_parse_availability_garbage() {
        assert!(matches!(parse_availability("<html>"), Err(BackendError::Parse(_))));
    }

    #[test]
    fn test_parse_sparkline_monthly_lists() {
        let body = r#"{
            "years": {"2001": [1, 0, 2, 0, 0, 0, 0, 0, 0, 0, 0, 3], "2024": [5]},
            "first_ts": "20010115000000",
            "last_ts": "20240301083000"
        }"#;

        let stats = parse_sparkline(body).unwrap();
        assert_eq!(stats.total, 11);
        assert_eq!(stats.first_ts.as_deref(), Some("20010115000000"));
        assert_eq!(stats.last_ts.as_deref(), Some("20240301083000"));
    }

    #[test]
    fn test_parse_sparkline_counts_and_missing_fields() {
        let stats = parse_sparkline(r#"{"years": {"2010": 4, "2011": 6}}"#).unwrap();
        assert_eq!(stats.total, 10);
        assert_eq!(stats.first_ts, None);
        assert!(parse_sparkline("not json").is_none());
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp("20240101120000"), "2024-01-01 12:00:00 UTC");
        assert_eq!(format_timestamp("20240101"), "2024-01-01");
        assert_eq!(format_timestamp(""), "Unknown");
        assert_eq!(format_timestamp("garbage"), "garbage");
    }

    #[test]
    fn test_report_without_stats_uses_closest() {
        let closest = ClosestSnapshot {
            available: true,
            url: "http://web.archive.org/web/20200202020202/x".into(),
            timestamp: "20200202020202".into(),
            status: "200".into(),
        };

        let report = WaybackReport::new(&closest, None);
        assert_eq!(report.snapshots, 1);
        assert_eq!(report.first_timestamp, "2020-02-02 02:02:02 UTC");
        assert_eq!(report.latest_timestamp, report.first_timestamp);
        assert!(report.summary().contains("1 snapshots available"));
    }

    #[test]
    fn test_items_without_check() {
        let items = wayback().items("https://example.com/", None);
        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Browse All Snapshots", "API Check"]);
        assert_eq!(items[0].url, "https://web.archive.org/web/*/https%3A%2F%2Fexample.com%2F");
    }

    #[test]
    fn test_items_with_report() {
        let report = WaybackReport {
            snapshots: 42,
            first_timestamp: "2001-01-01".into(),
            latest_timestamp: "2024-01-01".into(),
            latest_url: "http://web.archive.org/web/2024/https://example.com/".into(),
        };

        let items = wayback().items("https://example.com/", Some(Some(&report)));
        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Browse All Snapshots", AVAILABILITY_TITLE, "Latest Snapshot", "API Check"]);
        assert!(items[1].snippet.contains("42 snapshots"));

        let items = wayback().items("https://example.com/", Some(None));
        assert_eq!(items[1].snippet, "❌ No snapshots found");
    }
}
