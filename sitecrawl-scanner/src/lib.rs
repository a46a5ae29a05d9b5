pub mod crawler;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod normalize;
pub mod registry;
pub mod result;

pub use crawler::{CrawlHandle, CrawlPhase, Crawler, ProgressCallback, RetryPolicy, ScopeMode};
pub use error::ScanError;
pub use fetcher::{FetchOutcome, PageFetcher};
pub use registry::VisitedRegistry;
pub use result::{CrawlResult, PageRecord};
