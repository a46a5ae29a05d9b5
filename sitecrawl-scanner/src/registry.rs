//! Record of processed pages and failed attempts for one crawl run.
//!
//! `VisitedRegistry` is the only place that decides whether a URL has been
//! seen. Keys are compared as raw strings, case-sensitive, exactly as they
//! were fetched.

use crate::result::PageRecord;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::warn;

#[derive(Debug, Clone, Default)]
pub struct VisitedRegistry {
    pages: HashMap<String, PageRecord>,
    order: Vec<String>,
}

impl VisitedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, url: &str) -> bool {
        self.pages.contains_key(url)
    }

    /// Store `page` under `url`. The first write wins; a second attempt for
    /// the same URL is dropped with a warning and returns `false`.
    pub fn record(&mut self, url: String, page: PageRecord) -> bool {
        if self.pages.contains_key(&url) {
            warn!("Ignoring duplicate record for {}", url);
            return false;
        }

        self.order.push(url.clone());
        self.pages.insert(url, page);
        true
    }

    pub fn get(&self, url: &str) -> Option<&PageRecord> {
        self.pages.get(url)
    }

    pub fn keys(&self) -> HashSet<String> {
        self.pages.keys().cloned().collect()
    }

    /// Pages in the order they were recorded.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PageRecord)> {
        self.order
            .iter()
            .filter_map(|url| self.pages.get(url).map(|page| (url.as_str(), page)))
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Pages keyed by URL in lexical order.
    pub fn sorted(&self) -> BTreeMap<&str, &PageRecord> {
        self.iter().collect()
    }
}

impl Serialize for VisitedRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (url, page) in self.iter() {
            map.serialize_entry(url, page)?;
        }
        map.end()
    }
}

/// URLs that were fetched without producing a page, with the last reason.
#[derive(Debug, Clone, Default)]
pub struct FailedAttempts {
    reasons: BTreeMap<String, String>,
}

impl FailedAttempts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, url: String, reason: String) {
        self.reasons.insert(url, reason);
    }

    pub fn contains(&self, url: &str) -> bool {
        self.reasons.contains_key(url)
    }

    pub fn remove(&mut self, url: &str) -> Option<String> {
        self.reasons.remove(url)
    }

    pub fn len(&self) -> usize {
        self.reasons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reasons.is_empty()
    }

    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.reasons.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(title: &str) -> PageRecord {
        PageRecord::new(title.to_string(), vec!["http://localhost:8000/a".to_string()])
    }

    #[test]
    fn test_record_and_has() {
        let mut registry = VisitedRegistry::new();
        assert!(!registry.has("http://localhost:8000/"));

        assert!(registry.record("http://localhost:8000/".to_string(), page("Home")));
        assert!(registry.has("http://localhost:8000/"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_first_write_wins() {
        let mut registry = VisitedRegistry::new();
        assert!(registry.record("http://localhost:8000/".to_string(), page("First")));
        assert!(!registry.record("http://localhost:8000/".to_string(), page("Second")));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("http://localhost:8000/").unwrap().title, "First");
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let mut registry = VisitedRegistry::new();
        registry.record("http://localhost:8000/About".to_string(), page("A"));
        assert!(!registry.has("http://localhost:8000/about"));
    }

    #[test]
    fn test_iter_preserves_record_order() {
        let mut registry = VisitedRegistry::new();
        for path in ["c", "a", "b"] {
            registry.record(format!("http://localhost:8000/{}", path), page(path));
        }

        let titles: Vec<&str> = registry.iter().map(|(_, p)| p.title.as_str()).collect();
        assert_eq!(titles, vec!["c", "a", "b"]);

        let sorted: Vec<&str> = registry.sorted().values().map(|p| p.title.as_str()).collect();
        assert_eq!(sorted, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_keys_snapshot() {
        let mut registry = VisitedRegistry::new();
        registry.record("http://localhost:8000/x".to_string(), page("x"));
        let keys = registry.keys();
        registry.record("http://localhost:8000/y".to_string(), page("y"));

        assert_eq!(keys.len(), 1);
        assert!(keys.contains("http://localhost:8000/x"));
    }

    #[test]
    fn test_serializes_as_url_map() {
        let mut registry = VisitedRegistry::new();
        registry.record("http://localhost:8000/".to_string(), page("Home"));

        let json = serde_json::to_value(&registry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "http://localhost:8000/": {
                    "title": "Home",
                    "links": ["http://localhost:8000/a"]
                }
            })
        );
    }

    #[test]
    fn test_failed_attempts() {
        let mut failed = FailedAttempts::new();
        failed.insert("http://localhost:8000/x".to_string(), "HTTP 500".to_string());
        failed.insert("http://localhost:8000/x".to_string(), "HTTP 404".to_string());

        assert_eq!(failed.len(), 1);
        assert!(failed.contains("http://localhost:8000/x"));
        assert_eq!(failed.remove("http://localhost:8000/x").as_deref(), Some("HTTP 404"));
        assert!(failed.is_empty());
    }
}
