use indicatif::{ProgressBar, ProgressStyle};
use sitecrawl_scanner::error::Result;
use sitecrawl_scanner::{CrawlHandle, CrawlResult, Crawler, PageFetcher, RetryPolicy, ScopeMode};
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{info, warn};

/// Options for configuring a crawl operation
pub struct CrawlOptions {
    pub url: String,
    pub threads: usize,
    pub timeout_secs: u64,
    pub scope: ScopeMode,
    pub retry_policy: RetryPolicy,
    pub show_progress_bars: bool,
}

impl CrawlOptions {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            threads: 10,
            timeout_secs: 10,
            scope: ScopeMode::SameHost,
            retry_policy: RetryPolicy::OnRediscovery,
            show_progress_bars: false,
        }
    }
}

/// Callback for reporting crawl progress
pub type CrawlProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Run a crawl until it finishes or the process receives Ctrl-C.
pub async fn execute_crawl(
    options: CrawlOptions,
    progress_callback: Option<CrawlProgressCallback>,
) -> Result<CrawlResult> {
    execute_crawl_until(options, progress_callback, interrupt_signal()).await
}

/// Run a crawl until it finishes or `shutdown` resolves.
///
/// On shutdown the in-flight round is abandoned and the pages recorded so
/// far are returned with `interrupted` set.
pub async fn execute_crawl_until<F>(
    options: CrawlOptions,
    progress_callback: Option<CrawlProgressCallback>,
    shutdown: F,
) -> Result<CrawlResult>
where
    F: Future<Output = ()>,
{
    let CrawlOptions {
        url,
        threads,
        timeout_secs,
        scope,
        retry_policy,
        show_progress_bars,
    } = options;

    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Starting crawl...");
        Some(pb)
    } else {
        None
    };

    let processed_count = Arc::new(AtomicUsize::new(0));
    let count_clone = processed_count.clone();
    let pb_clone = progress_bar.clone();
    let outer_callback = progress_callback.clone();
    let scanner_callback: sitecrawl_scanner::ProgressCallback =
        Arc::new(move |round: usize, url: String| {
            let count = count_clone.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(ref pb) = pb_clone {
                pb.set_message(format!("Round {}: {} URLs processed ({})", round, count, url));
            }
            if let Some(ref callback) = outer_callback {
                callback(format!("[round {}] {}", round, url));
            }
        });

    let fetcher = PageFetcher::new(Duration::from_secs(timeout_secs.max(1)))?;
    let crawler = Crawler::new(fetcher)
        .with_workers(threads)
        .with_scope(scope)
        .with_retry_policy(retry_policy)
        .with_progress_callback(scanner_callback);

    let run = CrawlHandle::new();
    let result = tokio::select! {
        finished = crawler.crawl_with(&url, run.clone()) => finished?,
        _ = shutdown => {
            warn!("Crawl interrupted, keeping pages recorded so far");
            if let Some(ref callback) = progress_callback {
                callback("Interrupted, emitting partial results".to_string());
            }
            let mut partial = run.snapshot().await;
            partial.interrupted = true;
            partial
        }
    };

    let total = processed_count.load(Ordering::Relaxed);
    if let Some(ref pb) = progress_bar {
        if result.interrupted {
            pb.abandon_with_message(format!(
                "Crawl interrupted! {} URLs processed, {} pages recorded",
                total,
                result.pages.len()
            ));
        } else {
            pb.finish_with_message(format!(
                "Crawl complete! {} URLs processed, {} pages recorded",
                total,
                result.pages.len()
            ));
        }
    }
    info!("{} URLs processed in {} rounds", total, result.rounds);

    Ok(result)
}

async fn interrupt_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Unable to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
