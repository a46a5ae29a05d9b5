use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Crawl handle already used for {0}")]
    HandleInUse(String),
}

pub type Result<T> = std::result::Result<T, ScanError>;
