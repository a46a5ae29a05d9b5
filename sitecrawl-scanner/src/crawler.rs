use crate::error::{Result, ScanError};
use crate::extract::extract;
use crate::fetcher::{FetchOutcome, PageFetcher};
use crate::normalize::{host_of, netloc};
use crate::registry::{FailedAttempts, VisitedRegistry};
use crate::result::CrawlResult;
use futures::{StreamExt, stream};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;

/// Called with `(round, url)` right before a URL is fetched. The seed is round 0.
pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScopeMode {
    /// Only follow links whose host (and port) match the seed's.
    #[default]
    SameHost,
    AnyHost,
}

/// What happens to a URL whose fetch failed or was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RetryPolicy {
    /// Try again if a page recorded later links to it.
    #[default]
    OnRediscovery,
    /// Never fetch it again during this run.
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CrawlPhase {
    #[default]
    Idle,
    Seeding,
    Round(usize),
    Draining,
    Terminated,
}

/// Everything the workers of a round share. One lock guards both sets.
#[derive(Debug, Default)]
struct CrawlState {
    seed: String,
    scope_host: Option<String>,
    visited: VisitedRegistry,
    failed: FailedAttempts,
    phase: CrawlPhase,
    rounds: usize,
}

/// State of a single crawl run.
///
/// Each run owns its own registry. Keep a clone of the handle to read what a
/// run has recorded so far, including after its future was dropped.
#[derive(Debug, Clone, Default)]
pub struct CrawlHandle {
    state: Arc<Mutex<CrawlState>>,
}

impl CrawlHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything accumulated so far.
    pub async fn snapshot(&self) -> CrawlResult {
        let state = self.state.lock().await;
        let mut result = CrawlResult::new(state.seed.clone(), state.scope_host.clone());
        result.pages = state.visited.clone();
        result.failed = state.failed.to_map();
        result.rounds = state.rounds;
        result.phase = state.phase;
        result
    }

    pub async fn phase(&self) -> CrawlPhase {
        self.state.lock().await.phase
    }

    pub async fn get_visited_count(&self) -> usize {
        self.state.lock().await.visited.len()
    }

    async fn set_phase(&self, phase: CrawlPhase) {
        let mut state = self.state.lock().await;
        debug!("Crawl phase {:?} -> {:?}", state.phase, phase);
        if let CrawlPhase::Round(round) = phase {
            state.rounds = round;
        }
        state.phase = phase;
    }
}

/// Round-based same-site crawler.
///
/// Each round fetches the whole frontier through a bounded worker pool and
/// waits for every fetch before computing the next frontier from the links
/// found on the pages recorded in that round. The crawl ends when that
/// filtered set is empty.
///
/// Fetch order within a round follows frontier order, but completions are
/// unordered once more than one worker is used, so the record order (and the
/// order of the following frontier) can differ between runs.
///
/// The crawler holds configuration and the HTTP client only; every call to
/// [`Crawler::crawl`] works on its own [`CrawlHandle`].
pub struct Crawler {
    fetcher: PageFetcher,
    workers: usize,
    scope: ScopeMode,
    retry_policy: RetryPolicy,
    progress_callback: Option<ProgressCallback>,
}

impl Crawler {
    pub fn new(fetcher: PageFetcher) -> Self {
        Self {
            fetcher,
            workers: 10,
            scope: ScopeMode::default(),
            retry_policy: RetryPolicy::default(),
            progress_callback: None,
        }
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        Ok(Self::new(PageFetcher::new(timeout)?))
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_scope(mut self, scope: ScopeMode) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Crawl outward from `seed_url`.
    ///
    /// Only an unparseable seed is an error. A seed that cannot be fetched
    /// ends the run with an empty result, and every other per-page problem
    /// is logged and skipped.
    pub async fn crawl(&self, seed_url: &str) -> Result<CrawlResult> {
        self.crawl_with(seed_url, CrawlHandle::new()).await
    }

    /// Like [`Crawler::crawl`], recording into `run`. The handle must be
    /// fresh; a handle that already carried a run is refused.
    pub async fn crawl_with(&self, seed_url: &str, run: CrawlHandle) -> Result<CrawlResult> {
        let seed = Url::parse(seed_url)
            .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", seed_url, e)))?;
        let scope_host = match self.scope {
            ScopeMode::SameHost => Some(
                netloc(&seed)
                    .ok_or_else(|| ScanError::InvalidUrl(format!("{}: URL has no host", seed_url)))?,
            ),
            ScopeMode::AnyHost => None,
        };

        {
            let mut state = run.state.lock().await;
            if state.phase != CrawlPhase::Idle {
                return Err(ScanError::HandleInUse(state.seed.clone()));
            }
            state.seed = seed_url.to_string();
            state.scope_host = scope_host.clone();
        }

        info!(
            "Starting crawl of {} with {} workers (scope: {})",
            seed_url,
            self.workers,
            scope_host.as_deref().unwrap_or("any host")
        );

        run.set_phase(CrawlPhase::Seeding).await;
        let mut candidates = match self.visit(&run, seed_url.to_string(), 0).await {
            Some(links) => links,
            None => {
                warn!("Nothing to crawl: seed {} produced no page", seed_url);
                run.set_phase(CrawlPhase::Terminated).await;
                return Ok(run.snapshot().await);
            }
        };

        let mut round = 0;
        loop {
            let frontier = self
                .next_frontier(&run, candidates, scope_host.as_deref())
                .await;
            if frontier.is_empty() {
                break;
            }

            round += 1;
            run.set_phase(CrawlPhase::Round(round)).await;
            info!("Round {}: {} URLs in frontier", round, frontier.len());
            candidates = self.run_round(&run, round, frontier).await;
        }

        run.set_phase(CrawlPhase::Draining).await;
        debug!("Frontier exhausted after {} rounds", round);
        run.set_phase(CrawlPhase::Terminated).await;

        let result = run.snapshot().await;
        info!(
            "Crawl complete. Recorded {} pages, {} URLs failed",
            result.pages.len(),
            result.failed.len()
        );
        Ok(result)
    }

    /// Fetch every frontier URL with at most `workers` requests in flight.
    /// Returns once all of them finished, with the links of the pages
    /// recorded in this round.
    async fn run_round(&self, run: &CrawlHandle, round: usize, frontier: Vec<String>) -> Vec<String> {
        let discovered: Vec<Option<Vec<String>>> = stream::iter(frontier)
            .map(|url| self.visit(run, url, round))
            .buffer_unordered(self.workers)
            .collect()
            .await;

        discovered.into_iter().flatten().flatten().collect()
    }

    /// Fetch and record one URL. Returns its outbound links if a new page
    /// was recorded.
    async fn visit(&self, run: &CrawlHandle, url: String, round: usize) -> Option<Vec<String>> {
        if run.state.lock().await.visited.has(&url) {
            debug!("Already visited {}", url);
            return None;
        }

        if let Some(ref callback) = self.progress_callback {
            callback(round, url.clone());
        }

        let reason = match self.fetcher.fetch(&url).await {
            FetchOutcome::Success {
                status_code,
                page_content,
                ..
            } => {
                let page = extract(&page_content, &url);
                let links = page.links.clone();
                debug!(
                    "{} [{}] {:?}: {} links",
                    url,
                    status_code,
                    page.title,
                    links.len()
                );

                let mut state = run.state.lock().await;
                if !state.visited.record(url.clone(), page) {
                    return None;
                }
                state.failed.remove(&url);
                return Some(links);
            }
            FetchOutcome::RejectedStatus { status_code } => {
                warn!("Skipping {}: HTTP {}", url, status_code);
                format!("HTTP {}", status_code)
            }
            FetchOutcome::FetchFailure { reason } => {
                warn!("Skipping {}: {}", url, reason);
                reason
            }
        };

        run.state.lock().await.failed.insert(url, reason);
        None
    }

    /// Drop candidates that are recorded, blacklisted or out of scope, and
    /// collapse duplicates keeping first-seen order.
    async fn next_frontier(
        &self,
        run: &CrawlHandle,
        candidates: Vec<String>,
        scope_host: Option<&str>,
    ) -> Vec<String> {
        let state = run.state.lock().await;
        let mut seen = HashSet::new();

        candidates
            .into_iter()
            .filter(|url| {
                if state.visited.has(url) {
                    return false;
                }
                if self.retry_policy == RetryPolicy::Never && state.failed.contains(url) {
                    debug!("Not retrying {}", url);
                    return false;
                }
                if let Some(scope) = scope_host
                    && host_of(url).as_deref() != Some(scope)
                {
                    debug!("Out of scope: {}", url);
                    return false;
                }
                seen.insert(url.clone())
            })
            .collect()
    }
}
