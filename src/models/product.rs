//! Product record shapes emitted by the proxy and the snapshot scraper.
//!
//! Records are built during a single parse pass and serialized right away,
//! either as an HTTP response body or into a snapshot file. Field names are
//! camelCase on the wire to match what the mobile client already consumes.

use serde::{Deserialize, Serialize};

/// Storefront a record was scraped from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Coupang,
    Naver,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Coupang => "coupang",
            Self::Naver => "naver",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A listing returned by the proxy endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingProduct {
    /// `<source>_<index>_<unix millis>`; not stable across requests.
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub current_price: u64,
    pub average_price: u64,
    pub price_change_percent: f64,
    pub source: Source,
    pub product_url: String,
}

/// A bestseller entry captured in a category snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotProduct {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub current_price: u64,
    /// Strike-through price shown next to the sale price, if any.
    pub original_price: Option<u64>,
    pub average_price: u64,
    pub price_change_percent: f64,
    pub source: Source,
    pub category: String,
    pub is_rocket_delivery: bool,
    pub is_lowest_price: bool,
    pub product_url: String,
    pub review_count: u64,
    pub average_rating: f64,
    /// 1-based position on the bestseller page.
    pub ranking: usize,
}
