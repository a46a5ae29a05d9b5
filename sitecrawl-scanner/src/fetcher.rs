use crate::error::{Result, ScanError};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Status codes that mean "nothing to parse here".
pub const BAD_STATUS_CODES: [u16; 7] = [400, 401, 403, 404, 409, 500, 501];

pub fn is_bad_status(status_code: u16) -> bool {
    BAD_STATUS_CODES.contains(&status_code)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Success {
        status_code: u16,
        /// URL after redirects.
        final_url: String,
        page_content: String,
    },
    RejectedStatus {
        status_code: u16,
    },
    FetchFailure {
        reason: String,
    },
}

impl FetchOutcome {
    fn failure(error: ScanError) -> Self {
        FetchOutcome::FetchFailure {
            reason: error.to_string(),
        }
    }
}

/// Issues single GET requests. Owns its HTTP client, so cookies and pooled
/// connections live exactly as long as the fetcher.
pub struct PageFetcher {
    client: Client,
    timeout: Duration,
}

impl PageFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("sitecrawl/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .connect_timeout(timeout / 2)
            .pool_max_idle_per_host(50)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(10))
            .cookie_store(true)
            .build()?;

        Ok(Self { client, timeout })
    }

    /// Fetch `url`. Never fails: network errors become `FetchFailure`.
    pub async fn fetch(&self, url: &str) -> FetchOutcome {
        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                return FetchOutcome::failure(ScanError::InvalidUrl(format!("{}: {}", url, e)));
            }
        };
        if !matches!(parsed.scheme(), "http" | "https") {
            return FetchOutcome::failure(ScanError::InvalidUrl(format!(
                "{}: unsupported scheme '{}'",
                url,
                parsed.scheme()
            )));
        }

        debug!("Fetching {}", url);

        let response = match self.client.get(parsed).send().await {
            Ok(response) => response,
            Err(e) => return FetchOutcome::failure(self.classify(e)),
        };

        let status_code = response.status().as_u16();
        if is_bad_status(status_code) {
            return FetchOutcome::RejectedStatus { status_code };
        }

        let final_url = response.url().to_string();
        if final_url != url {
            debug!("{} redirected to {}", url, final_url);
        }

        match response.text().await {
            Ok(page_content) => FetchOutcome::Success {
                status_code,
                final_url,
                page_content,
            },
            Err(e) => FetchOutcome::failure(self.classify(e)),
        }
    }

    fn classify(&self, error: reqwest::Error) -> ScanError {
        if error.is_timeout() {
            ScanError::Timeout(self.timeout)
        } else {
            ScanError::HttpError(error)
        }
    }
}
