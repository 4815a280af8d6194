//! Storefront scrapers.
//!
//! Two pipelines share the selector and pricing helpers: the listing proxy
//! fetches server-rendered pages over plain HTTP, and the bestseller scraper
//! drives a headless browser through a lazily loaded grid.

pub mod bestseller;
pub mod browser;
pub mod error;
mod http_client;
pub mod listing;
pub mod selectors;

pub use bestseller::{BestsellerScraper, Category, CATEGORIES};
pub use browser::{BrowserEngineConfig, BrowserFetcher, ScrollSettings};
pub use error::{Result, ScrapeError};
pub use http_client::{resolve_user_agent, HttpClient, USER_AGENT};
pub use listing::{ListingQuery, ListingSource};
