//! Error types for fetching and parsing storefront pages.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
    #[error("Browser error: {0}")]
    Browser(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
