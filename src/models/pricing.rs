//! Derived price fields.
//!
//! Everything here is a pure function of already-extracted primitives, so the
//! policy can be checked without fetching a single page.

/// Markup applied to the current price when no reference price is known.
pub const ESTIMATED_MARKUP: f64 = 1.1;

/// Change percent strictly below this marks a product as a lowest-price deal.
pub const LOWEST_PRICE_THRESHOLD: f64 = -20.0;

/// Fixed change percent reported by the listing proxy.
///
/// The proxy never computes this from data, unlike the snapshot scraper.
pub const LISTING_PRICE_CHANGE_PERCENT: f64 = -10.0;

/// Average price estimate: current price plus the fixed markup, rounded.
pub fn estimated_average_price(current_price: u64) -> u64 {
    (current_price as f64 * ESTIMATED_MARKUP).round() as u64
}

/// Average price for a snapshot record.
///
/// Uses the original (strike-through) price when one was found and is
/// non-zero, otherwise falls back to the markup estimate.
pub fn average_price(current_price: u64, original_price: Option<u64>) -> u64 {
    original_price
        .filter(|&p| p > 0)
        .unwrap_or_else(|| estimated_average_price(current_price))
}

/// Percent change of `current` relative to `average`, rounded to two decimals.
pub fn price_change_percent(current_price: u64, average_price: u64) -> f64 {
    if average_price == 0 {
        return 0.0;
    }
    let change =
        (current_price as f64 - average_price as f64) / average_price as f64 * 100.0;
    round_to(change, 2)
}

pub fn is_lowest_price(price_change_percent: f64) -> bool {
    price_change_percent < LOWEST_PRICE_THRESHOLD
}

/// Star rating from a percentage-width rating widget (100% == 5 stars).
pub fn rating_from_width_percent(width_percent: f64) -> f64 {
    round_to(width_percent / 20.0, 1)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Derived fields of a snapshot record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedPricing {
    pub average_price: u64,
    pub price_change_percent: f64,
    pub is_lowest_price: bool,
}

impl DerivedPricing {
    pub fn compute(current_price: u64, original_price: Option<u64>) -> Self {
        let average_price = average_price(current_price, original_price);
        let price_change_percent = price_change_percent(current_price, average_price);
        Self {
            average_price,
            price_change_percent,
            is_lowest_price: is_lowest_price(price_change_percent),
        }
    }
}
