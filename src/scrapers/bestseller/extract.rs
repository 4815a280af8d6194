//! Field extraction for bestseller items.
//!
//! Works on the page HTML captured after scrolling, so the whole policy is a
//! pure function of markup.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::warn;

use crate::models::pricing::rating_from_width_percent;
use crate::models::{DerivedPricing, SnapshotProduct, Source};
use crate::scrapers::error::Result;
use crate::scrapers::selectors::{
    element_text, first_attr, normalize_image_url, parse_digits, parse_selector,
    resolve_product_url, SelectorChain,
};

/// List items that make up the bestseller grid.
pub const ITEM_SELECTOR: &str = "li.search-product";

/// Items past this position are ignored.
pub const MAX_ITEMS: usize = 100;

const ORIGIN: &str = "https://www.coupang.com";
const ROCKET_PHRASES: &[&str] = &["로켓배송", "로켓직구"];

static RATING_WIDTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"width:\s*([\d.]+)%").expect("valid rating regex"));

/// Why an item produced no record.
#[derive(Debug, Error, PartialEq)]
pub enum ItemError {
    #[error("no title")]
    MissingTitle,
    #[error("no positive price")]
    MissingPrice,
}

/// Compiled selector chains for bestseller items.
pub struct BestsellerExtractor {
    item: Selector,
    title: SelectorChain,
    price: SelectorChain,
    original_price: SelectorChain,
    image: Selector,
    link: Selector,
    review_count: Selector,
    rating: Selector,
    rocket_badge: Selector,
}

impl BestsellerExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            item: parse_selector(ITEM_SELECTOR)?,
            title: SelectorChain::parse(&["div.name", ".name", "dt.name"])?,
            price: SelectorChain::parse(&["strong.price-value", ".price-value", "em.sale"])?,
            original_price: SelectorChain::parse(&["del.base-price", ".base-price", "del"])?,
            image: parse_selector("img")?,
            link: parse_selector("a.search-product-link")?,
            review_count: parse_selector("span.rating-total-count")?,
            rating: parse_selector("em.rating")?,
            rocket_badge: parse_selector(r#".badge.rocket, .badge-rocket, img[alt*="로켓"]"#)?,
        })
    }

    /// Extract records from every loaded item, skipping incomplete ones.
    pub fn extract_page(&self, html: &str, category: &str) -> Vec<SnapshotProduct> {
        let document = Html::parse_document(html);

        document
            .select(&self.item)
            .take(MAX_ITEMS)
            .enumerate()
            .filter_map(|(index, item)| match self.extract_item(item, index, category) {
                Ok(product) => Some(product),
                Err(e) => {
                    warn!("Item {} skipped: {}", index + 1, e);
                    None
                }
            })
            .collect()
    }

    /// Extract one item at zero-based grid position `index`.
    ///
    /// Only the title and a positive current price are required; every other
    /// field falls back to a default.
    pub fn extract_item(
        &self,
        item: ElementRef<'_>,
        index: usize,
        category: &str,
    ) -> std::result::Result<SnapshotProduct, ItemError> {
        let site_id = first_attr(item, &["data-product-id", "id"]);
        let title = self.title.first_text(item).unwrap_or_default();
        let current_price = self.price.first_number(item).unwrap_or(0);
        let original_price = self.original_price.first_number(item);

        let image_url = item
            .select(&self.image)
            .next()
            .and_then(|img| first_attr(img, &["src", "data-img-src"]))
            .map(|src| normalize_image_url(&src))
            .unwrap_or_default();

        let product_url = item
            .select(&self.link)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(|href| resolve_product_url(ORIGIN, href.trim()))
            .unwrap_or_default();

        let review_count = item
            .select(&self.review_count)
            .next()
            .and_then(|el| parse_digits(&element_text(el)))
            .unwrap_or(0);

        let average_rating = item
            .select(&self.rating)
            .next()
            .and_then(|el| el.value().attr("style"))
            .map(rating_from_style)
            .unwrap_or(0.0);

        let is_rocket_delivery = item.select(&self.rocket_badge).next().is_some() || {
            let text: String = item.text().collect();
            ROCKET_PHRASES.iter().any(|phrase| text.contains(phrase))
        };

        if title.is_empty() {
            return Err(ItemError::MissingTitle);
        }
        if current_price == 0 {
            return Err(ItemError::MissingPrice);
        }

        let pricing = DerivedPricing::compute(current_price, original_price);
        let id = match site_id {
            Some(site_id) => format!("{}_{}", Source::Coupang, site_id),
            None => format!("{}_{}", Source::Coupang, index),
        };

        Ok(SnapshotProduct {
            id,
            title,
            image_url,
            current_price,
            original_price,
            average_price: pricing.average_price,
            price_change_percent: pricing.price_change_percent,
            source: Source::Coupang,
            category: category.to_string(),
            is_rocket_delivery,
            is_lowest_price: pricing.is_lowest_price,
            product_url,
            review_count,
            average_rating,
            ranking: index + 1,
        })
    }
}

/// Star rating from an inline `width: NN%` style; 0 when no usable width is set.
fn rating_from_style(style: &str) -> f64 {
    let Some(caps) = RATING_WIDTH.captures(style) else {
        return 0.0;
    };
    match caps[1].parse::<f64>() {
        Ok(width) => rating_from_width_percent(width),
        Err(_) => {
            warn!("Unreadable rating width in style '{}'", style);
            0.0
        }
    }
}
