//! Static catalog of known backends.
//!
//! Order within each table is registration order, which is also the order
//! groups appear in merged results and listings.

use crate::{Adapter, BackendClass, BackendDescriptor, PageLayout};

const fn web(
    id: &'static str, label: &'static str, group: &'static str, endpoint: &'static str, layout: PageLayout,
) -> BackendDescriptor {
    BackendDescriptor { id, label, class: BackendClass::Web, group, endpoint, about: "", adapter: Adapter::HtmlPage(layout) }
}

const fn social(id: &'static str, label: &'static str, endpoint: &'static str) -> BackendDescriptor {
    BackendDescriptor {
        id,
        label,
        class: BackendClass::Social,
        group: "Social Platforms",
        endpoint,
        about: "",
        adapter: Adapter::SearchLink,
    }
}

const fn archive(
    id: &'static str, label: &'static str, group: &'static str, endpoint: &'static str, about: &'static str,
) -> BackendDescriptor {
    BackendDescriptor {
        id,
        label,
        class: BackendClass::Archive,
        group,
        endpoint,
        about,
        adapter: Adapter::ArchiveLink { capture: None },
    }
}

const fn with_adapter(descriptor: BackendDescriptor, adapter: Adapter) -> BackendDescriptor {
    BackendDescriptor { adapter, ..descriptor }
}

pub const WEB_ENGINES: &[BackendDescriptor] = &[
    web("duckduckgo", "DuckDuckGo", "Popular Privacy Engines", "https://html.duckduckgo.com/html/?q={query}", PageLayout::DuckDuckGo),
    web("brave", "Brave", "Popular Privacy Engines", "https://search.brave.com/search?q={query}", PageLayout::Brave),
    web("startpage", "Startpage", "Popular Privacy Engines", "https://www.startpage.com/do/search?q={query}", PageLayout::Generic),
    web("ecosia", "Ecosia", "Popular Privacy Engines", "https://www.ecosia.org/search?q={query}", PageLayout::Generic),
    web("mojeek", "Mojeek", "Independent Engines", "https://www.mojeek.com/search?q={query}", PageLayout::Mojeek),
    web("yandex", "Yandex", "International", "https://yandex.com/search/?text={query}", PageLayout::Generic),
];

pub const SOCIAL_PLATFORMS: &[BackendDescriptor] = &[
    social("twitter", "Twitter", "https://twitter.com/search?q={query}&src=typed_query"),
    social("reddit", "Reddit", "https://www.reddit.com/search/?q={query}"),
    social("youtube", "YouTube", "https://www.youtube.com/results?search_query={query}"),
    social("github", "GitHub", "https://github.com/search?q={query}&type=repositories"),
    social("stackoverflow", "Stack Overflow", "https://stackoverflow.com/search?q={query}"),
    social("medium", "Medium", "https://medium.com/search?q={query}"),
    social("pinterest", "Pinterest", "https://www.pinterest.com/search/pins/?q={query}"),
    social("tiktok", "TikTok", "https://www.tiktok.com/search?q={query}"),
    social("instagram", "Instagram", "https://www.instagram.com/explore/tags/{query}/"),
    social("facebook", "Facebook", "https://www.facebook.com/public/{query}"),
    social("linkedin", "LinkedIn", "https://www.linkedin.com/search/results/all/?keywords={query}"),
];

pub const ARCHIVE_SERVICES: &[BackendDescriptor] = &[
    with_adapter(
        archive(
            "wayback",
            "Wayback Machine (Internet Archive)",
            "Long-term Archives",
            "https://web.archive.org/web/*/{url}",
            "Complete historical archive with multiple snapshots since 1996",
        ),
        Adapter::Wayback,
    ),
    with_adapter(
        archive(
            "archive_today",
            "archive.today / archive.ph",
            "Long-term Archives",
            "https://archive.ph/{url}",
            "Permanent, immutable archive, useful for preserving evidence",
        ),
        Adapter::ArchiveLink { capture: Some("https://archive.ph/?run=1&url={url}") },
    ),
    archive(
        "google_cache",
        "Google Cache",
        "Search Engine Caches",
        "https://webcache.googleusercontent.com/search?q=cache:{url}",
        "Temporary Google cache (may be removed)",
    ),
    archive(
        "bing_cache",
        "Bing Cache",
        "Search Engine Caches",
        "https://www.bing.com/search?q=url:{url}",
        "Bing cache (accessed through search)",
    ),
    archive(
        "yandex_cache",
        "Yandex Cache",
        "Search Engine Caches",
        "https://yandex.com/search/?text=url:{url}",
        "Cache of the Russian search engine Yandex",
    ),
    archive(
        "cachedview",
        "CachedView",
        "Aggregators",
        "https://cachedview.com/search?url={url}",
        "Aggregator that searches Google, Wayback and archive.today",
    ),
    archive(
        "ghostarchive",
        "GhostArchive",
        "Long-term Archives",
        "https://ghostarchive.org/search?term={url}",
        "Archive specialized in video and social media content",
    ),
];

/// Catalog table for a class.
pub fn descriptors(class: BackendClass) -> &'static [BackendDescriptor] {
    match class {
        BackendClass::Web => WEB_ENGINES,
        BackendClass::Social => SOCIAL_PLATFORMS,
        BackendClass::Archive => ARCHIVE_SERVICES,
    }
}

/// Identifiers of a class, in registration order.
pub fn ids(class: BackendClass) -> Vec<&'static str> {
    descriptors(class).iter().map(|d| d.id).collect()
}

/// Look up a catalog entry by identifier.
pub fn find(id: &str) -> Option<&'static BackendDescriptor> {
    all().find(|d| d.id == id)
}

/// Every catalog entry: web engines, then social platforms, then archive services.
pub fn all() -> impl Iterator<Item = &'static BackendDescriptor> {
    WEB_ENGINES.iter().chain(SOCIAL_PLATFORMS).chain(ARCHIVE_SERVICES)
}

/// Listing groups of a class, in first-appearance order.
pub fn groups(class: BackendClass) -> Vec<&'static str> {
    let mut groups: Vec<&'static str> = Vec::new();
    for descriptor in descriptors(class) {
        if !groups.contains(&descriptor.group) {
            groups.push(descriptor.group);
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_in_registration_order() {
        assert_eq!(ids(BackendClass::Web), vec!["duckduckgo", "brave", "startpage", "ecosia", "mojeek", "yandex"]);
        assert_eq!(ids(BackendClass::Social).len(), 11);
        assert_eq!(
            ids(BackendClass::Archive),
            vec!["wayback", "archive_today", "google_cache", "bing_cache", "yandex_cache", "cachedview", "ghostarchive"]
        );
    }

    #[test]
    fn test_ids_are_unique_and_not_reserved() {
        let all: Vec<&str> = all().map(|d| d.id).collect();
        let unique: HashSet<&str> = all.iter().copied().collect();
        assert_eq!(all.len(), unique.len());
        assert!(!unique.contains("all"));
    }

    #[test]
    fn test_classes_match_tables() {
        for class in [BackendClass::Web, BackendClass::Social, BackendClass::Archive] {
            assert!(descriptors(class).iter().all(|d| d.class == class));
        }
    }

    #[test]
    fn test_endpoints_have_placeholders() {
        assert!(WEB_ENGINES.iter().chain(SOCIAL_PLATFORMS).all(|d| d.endpoint.contains("{query}")));
        assert!(ARCHIVE_SERVICES.iter().all(|d| d.endpoint.contains("{url}")));
    }

    #[test]
    fn test_groups() {
        assert_eq!(groups(BackendClass::Web), vec!["Popular Privacy Engines", "Independent Engines", "International"]);
        assert_eq!(groups(BackendClass::Archive), vec!["Long-term Archives", "Search Engine Caches", "Aggregators"]);
    }

    #[test]
    fn test_adapters_match_classes() {
        for descriptor in all() {
            let expected = match descriptor.adapter {
                Adapter::HtmlPage(_) => BackendClass::Web,
                Adapter::SearchLink => BackendClass::Social,
                Adapter::ArchiveLink { .. } | Adapter::Wayback => BackendClass::Archive,
            };
            assert_eq!(descriptor.class, expected, "{}", descriptor.id);
        }

        assert_eq!(all().filter(|d| d.adapter == Adapter::Wayback).count(), 1);
        assert_eq!(find("duckduckgo").unwrap().adapter, Adapter::HtmlPage(PageLayout::DuckDuckGo));
        assert_eq!(find("ecosia").unwrap().adapter, Adapter::HtmlPage(PageLayout::Generic));
    }

    #[test]
    fn test_capture_templates() {
        let captures: Vec<(&str, &str)> = ARCHIVE_SERVICES
            .iter()
            .filter_map(|d| match d.adapter {
                Adapter::ArchiveLink { capture: Some(capture) } => Some((d.id, capture)),
                _ => None,
            })
            .collect();
        assert_eq!(captures, vec![("archive_today", "https://archive.ph/?run=1&url={url}")]);
    }

    #[test]
    fn test_find() {
        assert_eq!(find("mojeek").map(|d| d.class), Some(BackendClass::Web));
        assert_eq!(find("ghostarchive").map(|d| d.label), Some("GhostArchive"));
        assert!(find("altavista").is_none());
    }
}
