//! price-tracker: a listing proxy for Coupang and Naver Shopping, and a
//! headless-browser scraper that snapshots Coupang bestseller categories to
//! dated JSON files.

pub mod cli;
pub mod config;
pub mod models;
pub mod scrapers;
pub mod server;
pub mod storage;
