//! End-to-end extraction on a captured bestseller page: parse, derive, and
//! write the snapshot exactly as the snapshot command does after scrolling.

use chrono::NaiveDate;
use price_tracker::models::{SnapshotProduct, Source};
use price_tracker::scrapers::bestseller::{find_category, BestsellerExtractor};
use price_tracker::storage::SnapshotWriter;

const BEAUTY_PAGE: &str = include_str!("fixtures/bestseller_beauty.html");

fn extract_beauty() -> Vec<SnapshotProduct> {
    let extractor = BestsellerExtractor::new().unwrap();
    extractor.extract_page(BEAUTY_PAGE, "beauty")
}

#[test]
fn test_incomplete_items_are_skipped_without_renumbering() {
    let products = extract_beauty();

    let rankings: Vec<_> = products.iter().map(|p| p.ranking).collect();
    assert_eq!(rankings, vec![1, 2, 4]);
    assert!(products.iter().all(|p| p.source == Source::Coupang));
    assert!(products.iter().all(|p| p.category == "beauty"));
}

#[test]
fn test_discounted_item_fields() {
    let products = extract_beauty();
    let toner = &products[0];

    assert_eq!(toner.id, "coupang_1001");
    assert_eq!(toner.title, "수분 토너 300ml");
    assert_eq!(toner.image_url, "https://thumbnail6.coupangcdn.com/1001.jpg");
    assert_eq!(
        toner.product_url,
        "https://www.coupang.com/vp/products/1001?itemId=1"
    );
    assert_eq!(toner.current_price, 18900);
    assert_eq!(toner.original_price, Some(25000));
    assert_eq!(toner.average_price, 25000);
    assert_eq!(toner.price_change_percent, -24.4);
    assert!(toner.is_lowest_price);
    assert!(toner.is_rocket_delivery);
    assert_eq!(toner.review_count, 8512);
    assert_eq!(toner.average_rating, 4.8);
}

#[test]
fn test_estimated_average_without_original_price() {
    let products = extract_beauty();
    let sunscreen = &products[1];

    assert_eq!(sunscreen.image_url, "https://thumbnail6.coupangcdn.com/1002.jpg");
    assert_eq!(sunscreen.original_price, None);
    assert_eq!(sunscreen.average_price, 13200);
    assert_eq!(sunscreen.price_change_percent, -9.09);
    assert!(!sunscreen.is_lowest_price);
    assert!(sunscreen.is_rocket_delivery);
    assert_eq!(sunscreen.average_rating, 4.0);
}

#[test]
fn test_twenty_percent_off_is_not_lowest_price() {
    let products = extract_beauty();
    let lip_balm = &products[2];

    assert_eq!(lip_balm.price_change_percent, -20.0);
    assert!(!lip_balm.is_lowest_price);
    assert_eq!(lip_balm.product_url, "https://www.coupang.com/vp/products/1004");
    assert_eq!(lip_balm.review_count, 0);
    assert_eq!(lip_balm.average_rating, 0.0);
}

#[test]
fn test_snapshot_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let writer = SnapshotWriter::new(dir.path());
    let category = find_category("beauty").unwrap();
    let date = NaiveDate::from_ymd_opt(2024, 11, 2).unwrap();

    let products = extract_beauty();
    let path = writer.write(category.key, &products, date).unwrap();
    assert_eq!(path.file_name().unwrap(), "2024-11-02_beauty.json");

    let content = std::fs::read_to_string(&path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(json[0]["isRocketDelivery"], true);
    assert_eq!(json[1]["originalPrice"], serde_json::Value::Null);
    assert_eq!(json[2]["ranking"], 4);
    assert!(content.contains("립밤 3개입"));
}
