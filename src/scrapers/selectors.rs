//! Fallback selector chains and field cleaning helpers.
//!
//! Storefront markup drifts often, so every field is looked up through an
//! ordered list of candidate selectors. The first candidate that yields a
//! usable value wins; later candidates are never consulted.

use scraper::{ElementRef, Selector};
use url::Url;

use super::error::{Result, ScrapeError};

/// Parse a single CSS selector.
pub fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| ScrapeError::Selector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// Ordered list of CSS selectors with first-success-wins lookup.
#[derive(Debug, Clone)]
pub struct SelectorChain {
    candidates: Vec<Selector>,
}

impl SelectorChain {
    pub fn parse(candidates: &[&str]) -> Result<Self> {
        let candidates = candidates
            .iter()
            .map(|c| parse_selector(c))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { candidates })
    }

    /// First element matched by the earliest candidate that matches anything.
    pub fn first_element<'a>(&self, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
        self.candidates
            .iter()
            .find_map(|selector| scope.select(selector).next())
    }

    /// Apply `extract` to the first match of each candidate in turn and
    /// return the first `Some`.
    pub fn first_map<'a, T>(
        &self,
        scope: ElementRef<'a>,
        extract: impl Fn(ElementRef<'a>) -> Option<T>,
    ) -> Option<T> {
        self.candidates
            .iter()
            .filter_map(|selector| scope.select(selector).next())
            .find_map(extract)
    }

    /// First non-empty trimmed text across the chain.
    pub fn first_text(&self, scope: ElementRef<'_>) -> Option<String> {
        self.first_map(scope, |el| Some(element_text(el)).filter(|t| !t.is_empty()))
    }

    /// First digit-bearing text across the chain, parsed as a number.
    pub fn first_number(&self, scope: ElementRef<'_>) -> Option<u64> {
        self.first_map(scope, |el| parse_digits(&element_text(el)))
    }
}

/// First non-empty attribute value among `attrs`, in order.
pub fn first_attr(element: ElementRef<'_>, attrs: &[&str]) -> Option<String> {
    attrs
        .iter()
        .filter_map(|name| element.value().attr(name))
        .map(str::trim)
        .find(|v| !v.is_empty())
        .map(str::to_string)
}

/// Visible text of an element with whitespace runs collapsed.
pub fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Keep only ASCII digits; `None` when nothing is left.
pub fn parse_digits(text: &str) -> Option<u64> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        None
    } else {
        digits.parse().ok()
    }
}

/// Digit-stripped price, zero when the text carries no digits.
pub fn parse_price(text: &str) -> u64 {
    parse_digits(text).unwrap_or(0)
}

/// Give protocol-relative image URLs an explicit `https:` scheme.
pub fn normalize_image_url(url: &str) -> String {
    if url.starts_with("//") {
        format!("https:{}", url)
    } else {
        url.to_string()
    }
}

/// Resolve a product link against the storefront origin.
///
/// Absolute URLs are returned untouched and an empty link stays empty.
pub fn resolve_product_url(origin: &str, href: &str) -> String {
    if href.is_empty() || href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }
    if href.starts_with("//") {
        return normalize_image_url(href);
    }

    Url::parse(origin)
        .and_then(|base| base.join(href))
        .map(|u| u.to_string())
        .unwrap_or_else(|_| format!("{}{}", origin.trim_end_matches('/'), href))
}
