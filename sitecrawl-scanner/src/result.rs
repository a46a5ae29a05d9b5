use crate::crawler::CrawlPhase;
use crate::registry::VisitedRegistry;
use serde::Serialize;
use std::collections::BTreeMap;

/// Title and outbound links captured from one fetched page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRecord {
    pub title: String,
    pub links: Vec<String>,
}

impl PageRecord {
    pub fn new(title: String, links: Vec<String>) -> Self {
        Self { title, links }
    }
}

/// Snapshot of a crawl run.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlResult {
    pub seed: String,
    pub scope_host: Option<String>,
    pub pages: VisitedRegistry,
    /// URLs that were attempted but never recorded, with the last failure reason.
    pub failed: BTreeMap<String, String>,
    pub rounds: usize,
    pub phase: CrawlPhase,
    pub interrupted: bool,
}

impl CrawlResult {
    pub fn new(seed: String, scope_host: Option<String>) -> Self {
        Self {
            seed,
            scope_host,
            pages: VisitedRegistry::new(),
            failed: BTreeMap::new(),
            rounds: 0,
            phase: CrawlPhase::Idle,
            interrupted: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
