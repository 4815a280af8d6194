//! Listing pages served through the proxy.
//!
//! One request maps to exactly one outbound fetch: pick the target URL from
//! the query, fetch it with browser-like headers, and map the matched item
//! fragments to [`ListingProduct`] records. Any failure aborts the request.

use chrono::Utc;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};

use super::error::{Result, ScrapeError};
use super::selectors::{
    element_text, first_attr, normalize_image_url, parse_price, parse_selector,
    resolve_product_url, SelectorChain,
};
use super::HttpClient;
use crate::models::pricing::{estimated_average_price, LISTING_PRICE_CHANGE_PERCENT};
use crate::models::{ListingProduct, Source};

pub const DEFAULT_PAGE: u32 = 0;
pub const DEFAULT_LIMIT: usize = 10;
pub const DEFAULT_NAVER_KEYWORD: &str = "노트북";

/// Selector candidates describing a storefront's listing markup.
#[derive(Debug)]
pub struct ListingLayout {
    pub items: &'static str,
    pub title: &'static [&'static str],
    pub image_attrs: &'static [&'static str],
    pub price: &'static [&'static str],
}

pub static COUPANG_LAYOUT: ListingLayout = ListingLayout {
    items: "li.baby-product, li.search-product",
    title: &[".name", ".product-name"],
    image_attrs: &["src", "data-img-src"],
    price: &[".price-value", ".price"],
};

pub static NAVER_LAYOUT: ListingLayout = ListingLayout {
    items: ".product_item, .productList_item, .basicList_item",
    title: &[".product_title", ".basicList_title", "a[class*=\"title\"]"],
    image_attrs: &["src", "data-src"],
    price: &[".price", ".price_num"],
};

/// How a storefront's target URL is chosen.
#[derive(Debug, Clone)]
pub enum ListingTarget {
    /// Fixed listing pages; the page index picks one modulo the list length.
    Rotating(Vec<String>),
    /// Search URL with `{keyword}`, `{page}` (1-based) and `{limit}` placeholders.
    Search {
        template: String,
        default_keyword: String,
    },
}

/// Parsed query parameters of a listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub page: u32,
    pub limit: usize,
    pub keyword: Option<String>,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            keyword: None,
        }
    }
}

impl ListingQuery {
    /// Build a query from raw string parameters, applying defaults.
    pub fn from_params(
        page: Option<&str>,
        limit: Option<&str>,
        keyword: Option<&str>,
    ) -> Result<Self> {
        let page = match page.map(str::trim) {
            None | Some("") => DEFAULT_PAGE,
            Some(raw) => raw
                .parse()
                .map_err(|_| ScrapeError::InvalidQuery(format!("page must be a non-negative integer, got '{}'", raw)))?,
        };
        let limit = match limit.map(str::trim) {
            None | Some("") => DEFAULT_LIMIT,
            Some(raw) => raw
                .parse()
                .map_err(|_| ScrapeError::InvalidQuery(format!("limit must be a non-negative integer, got '{}'", raw)))?,
        };
        // An explicit empty keyword is searched as-is; only a missing one
        // takes the default.
        let keyword = keyword.map(|k| k.trim().to_string());

        Ok(Self {
            page,
            limit,
            keyword,
        })
    }
}

/// A storefront reachable through the proxy.
#[derive(Debug, Clone)]
pub struct ListingSource {
    pub source: Source,
    /// Scheme and host that relative product links are joined onto.
    pub origin: String,
    pub referer: String,
    pub target: ListingTarget,
    pub layout: &'static ListingLayout,
}

impl ListingSource {
    pub fn coupang() -> Self {
        Self {
            source: Source::Coupang,
            origin: "https://www.coupang.com".to_string(),
            referer: "https://www.coupang.com/".to_string(),
            target: ListingTarget::Rotating(vec![
                "https://www.coupang.com/np/bestSeller".to_string(),
                "https://www.coupang.com/np/categories/186764".to_string(),
                "https://www.coupang.com/np/categories/186765".to_string(),
            ]),
            layout: &COUPANG_LAYOUT,
        }
    }

    pub fn naver() -> Self {
        Self {
            source: Source::Naver,
            origin: "https://shopping.naver.com".to_string(),
            referer: "https://shopping.naver.com/".to_string(),
            target: ListingTarget::Search {
                template: "https://search.shopping.naver.com/search/all?query={keyword}&pagingIndex={page}&pagingSize={limit}".to_string(),
                default_keyword: DEFAULT_NAVER_KEYWORD.to_string(),
            },
            layout: &NAVER_LAYOUT,
        }
    }

    /// Pick or build the page to fetch for `query`.
    pub fn target_url(&self, query: &ListingQuery) -> Result<String> {
        match &self.target {
            ListingTarget::Rotating(urls) => {
                if urls.is_empty() {
                    return Err(ScrapeError::InvalidQuery(format!(
                        "no listing pages configured for {}",
                        self.source
                    )));
                }
                let index = query.page as usize % urls.len();
                Ok(urls[index].clone())
            }
            ListingTarget::Search {
                template,
                default_keyword,
            } => {
                let keyword = query.keyword.as_deref().unwrap_or(default_keyword);
                Ok(template
                    .replace("{keyword}", &urlencoding::encode(keyword))
                    .replace("{page}", &query.page.saturating_add(1).to_string())
                    .replace("{limit}", &query.limit.to_string()))
            }
        }
    }

    /// Fetch and parse one listing page.
    pub async fn fetch(&self, client: &HttpClient, query: &ListingQuery) -> Result<Vec<ListingProduct>> {
        let url = self.target_url(query)?;
        info!("[{}] fetching {}", self.source, url);

        let html = client.get_text(&url, Some(&self.referer)).await?;
        let products = self.parse(&html, query.limit, Utc::now().timestamp_millis())?;

        info!("[{}] returning {} products", self.source, products.len());
        Ok(products)
    }

    /// Map up to `limit` item fragments of `html` to listing records.
    ///
    /// Fragments missing a title, image or price (or whose values are empty)
    /// are skipped. `fetched_at_ms` is embedded in the generated IDs.
    pub fn parse(&self, html: &str, limit: usize, fetched_at_ms: i64) -> Result<Vec<ListingProduct>> {
        let compiled = CompiledLayout::compile(self.layout)?;
        let document = Html::parse_document(html);

        let products = document
            .select(&compiled.items)
            .take(limit)
            .enumerate()
            .filter_map(|(index, item)| {
                let product = self.parse_item(&compiled, item, index, fetched_at_ms);
                if product.is_none() {
                    debug!("[{}] skipping incomplete item {}", self.source, index);
                }
                product
            })
            .collect();

        Ok(products)
    }

    fn parse_item(
        &self,
        layout: &CompiledLayout,
        item: ElementRef<'_>,
        index: usize,
        fetched_at_ms: i64,
    ) -> Option<ListingProduct> {
        let title_el = layout.title.first_element(item)?;
        let image_el = item.select(&layout.image).next()?;
        let price_el = layout.price.first_element(item)?;

        let title = element_text(title_el);
        let image_url = first_attr(image_el, self.layout.image_attrs).unwrap_or_default();
        let price_text = element_text(price_el);
        if title.is_empty() || image_url.is_empty() || price_text.is_empty() {
            return None;
        }

        let product_url = item
            .select(&layout.link)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(str::trim)
            .unwrap_or_default();

        let current_price = parse_price(&price_text);

        Some(ListingProduct {
            id: format!("{}_{}_{}", self.source, index, fetched_at_ms),
            title,
            image_url: normalize_image_url(&image_url),
            current_price,
            average_price: estimated_average_price(current_price),
            price_change_percent: LISTING_PRICE_CHANGE_PERCENT,
            source: self.source,
            product_url: resolve_product_url(&self.origin, product_url),
        })
    }
}

/// Parsed selectors for one request.
struct CompiledLayout {
    items: Selector,
    title: SelectorChain,
    image: Selector,
    price: SelectorChain,
    link: Selector,
}

impl CompiledLayout {
    fn compile(layout: &ListingLayout) -> Result<Self> {
        Ok(Self {
            items: parse_selector(layout.items)?,
            title: SelectorChain::parse(layout.title)?,
            image: parse_selector("img")?,
            price: SelectorChain::parse(layout.price)?,
            link: parse_selector("a")?,
        })
    }
}
