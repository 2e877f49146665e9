//! Markdown rendering of tool replies.

use std::fmt::Write;

use polysearch_client::AVAILABILITY_TITLE;
use polysearch_client::http;
use polysearch_core::{Adapter, BackendDescriptor, BackendResult, MergedResult};

const SOCIAL_FOOTER: &str =
    "*Note: Direct URLs for browser use. Automated scraping may require authentication.*";

const ARCHIVE_TIPS: &[&str] = &[
    "**Wayback Machine**: Best for comprehensive historical archives (1996-present)",
    "**archive.today**: Creates permanent, immutable snapshots on demand",
    "**Google/Bing Cache**: Temporary caches, updated frequently but may disappear",
    "**CachedView**: Aggregator that searches multiple sources automatically",
    "**GhostArchive**: Specialized for social media and video content",
];

const ARCHIVE_FEATURES: &[&str] = &[
    "**Wayback Machine (wayback)**: 800+ billion pages archived since 1996",
    "**archive.today**: On-demand archiving with permanent snapshots",
    "**Google Cache**: Temporary cache updated regularly",
    "**CachedView**: Meta-search across multiple archives",
    "**GhostArchive**: Specialized in social media and video content",
];

fn failure_list(result: &MergedResult) -> String {
    result
        .failed()
        .map(|g| match &g.error {
            Some(reason) => format!("{} ({reason})", g.label),
            None => g.label.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Web search reply: summary header, then one numbered section per engine.
///
/// `query` is the text of the current request. A cached result may have been
/// produced under a different spelling of the same key, so `result.query` is
/// never echoed back.
pub fn web_results(result: &MergedResult, query: &str) -> String {
    let mut out = String::new();
    let failed = failure_list(result);

    if result.total_items() == 0 {
        let _ = writeln!(out, "No results found for: {query}\n");
        if !failed.is_empty() {
            let _ = writeln!(out, "**Failed Engines**: {failed}");
        }
        return out;
    }

    let used: Vec<&str> = result.succeeded().map(|g| g.label.as_str()).collect();

    let _ = writeln!(out, "# Search Results for '{query}'\n");
    let _ = writeln!(
        out,
        "**Engines Used**: {} ({}/{} successful)",
        used.join(", "),
        used.len(),
        result.groups.len()
    );
    if !failed.is_empty() {
        let _ = writeln!(out, "**Failed Engines**: {failed}");
    }
    let _ = writeln!(out, "**Total Results**: {}", result.total_items());
    let _ = writeln!(out, "**Timestamp**: {}\n", result.fetched_at);

    for group in result.succeeded().filter(|g| !g.items.is_empty()) {
        let _ = writeln!(out, "## Results from {} ({} results)\n", group.label, group.items.len());
        for (i, item) in group.items.iter().enumerate() {
            let _ = writeln!(out, "### {}. {}", i + 1, item.title);
            let _ = writeln!(out, "**URL**: {}", item.url);
            if !item.snippet.is_empty() {
                let _ = writeln!(out, "**Snippet**: {}", item.snippet);
            }
            out.push('\n');
        }
    }

    out
}

/// Social search reply: the platform search links.
pub fn social_results(result: &MergedResult, query: &str) -> String {
    let mut out = String::new();
    let platforms: Vec<&str> = result.groups.iter().map(|g| g.backend.as_str()).collect();

    let _ = writeln!(out, "# Social Search: '{query}'\n");
    let _ = writeln!(out, "**Platforms ({})**: {}\n", platforms.len(), platforms.join(", "));

    for group in &result.groups {
        match (group.success, group.items.first()) {
            (true, Some(item)) => {
                let _ = writeln!(out, "**{}**: {}", group.label, item.url);
            }
            (true, None) => {
                let _ = writeln!(out, "**{}**: no link", group.label);
            }
            (false, _) => {
                let _ = writeln!(out, "**{}**: unavailable ({})", group.label, group.error.as_deref().unwrap_or("unknown"));
            }
        }
    }

    let _ = writeln!(out, "\n{SOCIAL_FOOTER}");
    out
}

fn wayback_status(out: &mut String, group: &BackendResult) {
    if !group.success {
        let _ = writeln!(
            out,
            "**Wayback Machine Status**: ⚠️ Availability check failed ({})\n",
            group.error.as_deref().unwrap_or("unknown")
        );
        return;
    }

    match group.items.iter().find(|item| item.title == AVAILABILITY_TITLE) {
        Some(item) => {
            let _ = writeln!(out, "**Wayback Machine Status**: {}", item.snippet);
            if !item.url.is_empty() {
                let _ = writeln!(out, "**Latest URL**: {}", item.url);
            }
            out.push('\n');
        }
        None => {
            let _ = writeln!(out, "**Wayback Machine Status**: not checked\n");
        }
    }
}

/// Archive lookup reply.
///
/// `descriptors` supplies descriptions and lookup templates; the Wayback
/// status line is only rendered when an availability check was requested.
pub fn archive_results(
    result: &MergedResult, url: &str, descriptors: &[BackendDescriptor], check_availability: bool,
) -> String {
    let mut out = String::new();
    let services: Vec<&str> = result.groups.iter().map(|g| g.backend.as_str()).collect();

    let _ = writeln!(out, "# Archived Versions of URL\n");
    let _ = writeln!(out, "**Original URL**: {url}");
    let _ = writeln!(out, "**Services Checked ({})**: {}\n", services.len(), services.join(", "));

    let wayback = descriptors.iter().find(|d| d.adapter == Adapter::Wayback).map(|d| d.id);
    if check_availability && let Some(group) = result.groups.iter().find(|g| Some(g.backend.as_str()) == wayback) {
        wayback_status(&mut out, group);
    }

    let _ = writeln!(out, "## Available Archives\n");

    for group in &result.groups {
        let descriptor = descriptors.iter().find(|d| d.id == group.backend);

        let _ = writeln!(out, "### {}", group.label);
        if let Some(about) = descriptor.map(|d| d.about).filter(|about| !about.is_empty()) {
            let _ = writeln!(out, "**Description**: {about}");
        }

        if group.success {
            for item in group.items.iter().filter(|item| item.title != AVAILABILITY_TITLE) {
                let _ = writeln!(out, "**{}**: {}", item.title, item.url);
            }
        } else {
            let _ = writeln!(out, "**Status**: unavailable ({})", group.error.as_deref().unwrap_or("unknown"));
            if let Some(d) = descriptor {
                let _ = writeln!(out, "**Lookup URL**: {}", http::fill(d.endpoint, "{url}", url));
            }
        }
        out.push('\n');
    }

    let _ = writeln!(out, "## Usage Tips\n");
    for tip in ARCHIVE_TIPS {
        let _ = writeln!(out, "- {tip}");
    }
    let _ = writeln!(
        out,
        "\n*Note: Archive availability varies by service and content age. Some services may require CAPTCHA verification.*"
    );

    out
}

/// Descriptors grouped by listing heading, in first-appearance order.
fn grouped(descriptors: &[BackendDescriptor]) -> Vec<(&'static str, Vec<&BackendDescriptor>)> {
    let mut groups: Vec<(&'static str, Vec<&BackendDescriptor>)> = Vec::new();
    for descriptor in descriptors {
        match groups.iter_mut().find(|(name, _)| *name == descriptor.group) {
            Some((_, members)) => members.push(descriptor),
            None => groups.push((descriptor.group, vec![descriptor])),
        }
    }
    groups
}

/// Grouped listing of the web engines.
pub fn engine_listing(descriptors: &[BackendDescriptor], default_max_results: u32) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# Available Privacy-Focused Search Engines ({} total)\n", descriptors.len());
    let _ = writeln!(out, "**Default Behavior**: Searches ALL engines in parallel\n");

    for (group, members) in grouped(descriptors) {
        let _ = writeln!(out, "## {group}");
        for d in members {
            let _ = writeln!(out, "- **{}**: `{}`", d.id, d.endpoint);
        }
        out.push('\n');
    }

    let _ = writeln!(out, "## Usage");
    let _ = writeln!(out, "- By default, `web_search` searches ALL engines in parallel");
    let _ = writeln!(out, "- Use `engine` parameter to search a specific engine");
    let _ = writeln!(out, "- When using 'all', returns up to {default_max_results} results from each engine");
    let _ = writeln!(out, "- Parallel execution significantly speeds up multi-engine searches");
    out
}

/// Grouped listing of the archive services.
pub fn archive_listing(descriptors: &[BackendDescriptor]) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# Available Archive Services ({} total)\n", descriptors.len());
    let _ = writeln!(out, "These services store archived versions of web pages.\n");

    for (group, members) in grouped(descriptors) {
        let _ = writeln!(out, "## {group}\n");
        for d in members {
            let _ = writeln!(out, "### {}", d.label);
            let _ = writeln!(out, "{}", d.about);
            let _ = writeln!(out, "**Service ID**: `{}`\n", d.id);
        }
    }

    let _ = writeln!(out, "## Key Features by Service\n");
    for feature in ARCHIVE_FEATURES {
        let _ = writeln!(out, "{feature}");
    }
    out
}
