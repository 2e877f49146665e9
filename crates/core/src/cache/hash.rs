//! Query fingerprints used as cache keys.

use std::fmt;

use sha2::{Digest, Sha256};

use crate::Query;

/// SHA-256 fingerprint of everything that shapes a merged result.
///
/// Two queries that differ only in case or inner whitespace share a key
/// (archive URLs excepted); any difference in intent, target or bounds
/// produces a distinct key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn for_query(query: &Query) -> Self {
        let bounds = query.bounds();
        let max_results = bounds.max_results.map_or_else(|| "-".to_string(), |n| n.to_string());

        let mut hasher = Sha256::new();
        hasher.update(query.intent().as_str().as_bytes());
        hasher.update(b"\n");
        hasher.update(query.target().as_str().as_bytes());
        hasher.update(b"\n");
        hasher.update(query.normalized_text().as_bytes());
        hasher.update(b"\n");
        hasher.update(max_results.as_bytes());
        hasher.update(b"\n");
        hasher.update(if bounds.check_availability { b"check" as &[u8] } else { b"nocheck" });
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitize::{sanitize_query, validate_url};
    use crate::{BackendClass, Bounds, Target};

    fn web(text: &str, target: Target, max_results: Option<usize>) -> Query {
        let bounds = Bounds { max_results, check_availability: false };
        Query::new(BackendClass::Web, sanitize_query(text).unwrap(), target, bounds)
    }

    #[test]
    fn test_key_stability() {
        let a = CacheKey::for_query(&web("rust", Target::All, Some(20)));
        let b = CacheKey::for_query(&web("rust", Target::All, Some(20)));
        assert_eq!(a, b);
    }

    #[test]
    fn test_key_ignores_case_and_whitespace() {
        let a = CacheKey::for_query(&web("Rust  Lang", Target::All, Some(20)));
        let b = CacheKey::for_query(&web("rust lang", Target::All, Some(20)));
        assert_eq!(a, b);
    }

    #[test]
    fn test_key_differs_by_target_and_bounds() {
        let base = CacheKey::for_query(&web("rust", Target::All, Some(20)));
        let targeted = CacheKey::for_query(&web("rust", Target::Backend("brave".into()), Some(20)));
        let bounded = CacheKey::for_query(&web("rust", Target::All, Some(5)));
        let unbounded = CacheKey::for_query(&web("rust", Target::All, None));
        assert_ne!(base, targeted);
        assert_ne!(base, bounded);
        assert_ne!(base, unbounded);
    }

    #[test]
    fn test_key_differs_by_intent() {
        let text = sanitize_query("rust").unwrap();
        let web = Query::new(BackendClass::Web, text.clone(), Target::All, Bounds::default());
        let social = Query::new(BackendClass::Social, text, Target::All, Bounds::default());
        assert_ne!(CacheKey::for_query(&web), CacheKey::for_query(&social));
    }

    #[test]
    fn test_key_differs_by_availability_check() {
        let url = validate_url("https://example.com").unwrap();
        let plain = Query::new(BackendClass::Archive, url.clone(), Target::All, Bounds::default());
        let checked = Query::new(
            BackendClass::Archive,
            url,
            Target::All,
            Bounds { max_results: None, check_availability: true },
        );
        assert_ne!(CacheKey::for_query(&plain), CacheKey::for_query(&checked));
    }

    #[test]
    fn test_archive_key_keeps_url_case() {
        let upper = validate_url("https://example.com/Page").unwrap();
        let lower = validate_url("https://example.com/page").unwrap();
        let a = Query::new(BackendClass::Archive, upper, Target::All, Bounds::default());
        let b = Query::new(BackendClass::Archive, lower, Target::All, Bounds::default());
        assert_ne!(CacheKey::for_query(&a), CacheKey::for_query(&b));
    }

    #[test]
    fn test_key_format() {
        let key = CacheKey::for_query(&web("rust", Target::All, None));
        assert_eq!(key.as_str().len(), 64);
        assert!(key.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }
}
