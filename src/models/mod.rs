//! Data models for scraped product listings.

pub mod pricing;
mod product;

pub use pricing::DerivedPricing;
pub use product::{ListingProduct, SnapshotProduct, Source};
