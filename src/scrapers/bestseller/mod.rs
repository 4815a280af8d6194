//! Bestseller snapshot scraper.
//!
//! Loads each category page in a browser, scrolls until the lazily rendered
//! grid stops growing (or holds enough items), then extracts records from the
//! captured HTML.

mod categories;
mod extract;

pub use categories::{find_category, resolve_categories, Category, BESTSELLER_URL, CATEGORIES};
pub use extract::{BestsellerExtractor, ItemError, ITEM_SELECTOR, MAX_ITEMS};

use std::time::Duration;

use anyhow::Result;
use tracing::info;

use super::browser::{BrowserFetcher, ScrollSettings};
use crate::models::SnapshotProduct;

/// Scraper that owns a browser session for the duration of a run.
pub struct BestsellerScraper {
    fetcher: BrowserFetcher,
    extractor: BestsellerExtractor,
    scroll: ScrollSettings,
    initial_wait: Duration,
}

impl BestsellerScraper {
    pub fn new(fetcher: BrowserFetcher, scroll: ScrollSettings, initial_wait: Duration) -> Result<Self> {
        Ok(Self {
            fetcher,
            extractor: BestsellerExtractor::new()?,
            scroll,
            initial_wait,
        })
    }

    /// Start the browser session up front so launch failures surface before
    /// any category is attempted.
    pub async fn start(&mut self) -> Result<()> {
        self.fetcher.ensure_browser().await
    }

    /// Scrape one category page.
    pub async fn scrape_category(&mut self, category: &Category) -> Result<Vec<SnapshotProduct>> {
        let url = category.url();
        info!("Scraping category {} from {}", category.key, url);

        let loaded = self
            .fetcher
            .load_scrolled(&url, ITEM_SELECTOR, &self.scroll, self.initial_wait)
            .await?;
        info!(
            "Category {}: {} items loaded ({:?} after {} attempts)",
            category.key, loaded.report.item_count, loaded.report.outcome, loaded.report.attempts
        );

        let products = self.extractor.extract_page(&loaded.html, category.key);
        info!("Category {}: parsed {} products", category.key, products.len());
        Ok(products)
    }

    /// Release the browser session.
    pub async fn close(&mut self) {
        self.fetcher.close().await;
    }
}
