//! Bestseller snapshot command.

use std::path::PathBuf;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

use crate::config::Settings;
use crate::scrapers::bestseller::{resolve_categories, BestsellerScraper, Category};
use crate::scrapers::BrowserFetcher;
use crate::storage::SnapshotWriter;

/// What happened to one category.
enum CategoryOutcome {
    Saved { count: usize, path: PathBuf },
    Empty,
    Failed(String),
}

/// Scrape the requested categories (all when none are given) and write one
/// snapshot file per category that yielded products.
pub async fn cmd_snapshot(
    settings: &Settings,
    keys: &[String],
    output_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    let (categories, unknown) = resolve_categories(keys);
    for key in &unknown {
        eprintln!("{} Unknown category '{}', skipping", style("!").yellow(), key);
    }
    if categories.is_empty() {
        println!("{} No categories to scrape", style("!").yellow());
        return Ok(());
    }

    let data_dir = output_dir.unwrap_or_else(|| settings.snapshot.data_dir.clone());
    let writer = SnapshotWriter::new(data_dir);

    println!(
        "{} Scraping {} categor{} into {}",
        style("→").cyan(),
        categories.len(),
        if categories.len() == 1 { "y" } else { "ies" },
        writer.data_dir().display()
    );

    let fetcher = BrowserFetcher::new(settings.browser.clone());
    let mut scraper = BestsellerScraper::new(
        fetcher,
        settings.snapshot.scroll_settings(),
        settings.snapshot.initial_wait(),
    )?;

    if let Err(e) = scraper.start().await {
        scraper.close().await;
        eprintln!("{} Failed to start browser: {}", style("✗").red(), e);
        return Err(e);
    }

    let result = run_categories(&mut scraper, &writer, &categories, settings).await;
    scraper.close().await;
    let outcomes = result?;

    let saved = outcomes
        .iter()
        .filter(|o| matches!(o, CategoryOutcome::Saved { .. }))
        .count();
    let failed = outcomes
        .iter()
        .filter(|o| matches!(o, CategoryOutcome::Failed(_)))
        .count();

    println!(
        "{} Done: {} saved, {} empty, {} failed",
        style("✓").green(),
        saved,
        outcomes.len() - saved - failed,
        failed
    );
    Ok(())
}

async fn run_categories(
    scraper: &mut BestsellerScraper,
    writer: &SnapshotWriter,
    categories: &[&'static Category],
    settings: &Settings,
) -> anyhow::Result<Vec<CategoryOutcome>> {
    let pb = ProgressBar::new(categories.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}")?
            .progress_chars("█▓░"),
    );

    let mut outcomes = Vec::with_capacity(categories.len());
    for (i, category) in categories.iter().enumerate() {
        pb.set_message(format!("Scraping {}...", category.key));

        let outcome = scrape_one(scraper, writer, category).await;
        match &outcome {
            CategoryOutcome::Saved { count, path } => pb.println(format!(
                "  {} {}: {} products -> {}",
                style("✓").green(),
                category.key,
                count,
                path.display()
            )),
            CategoryOutcome::Empty => pb.println(format!(
                "  {} {}: no products found",
                style("!").yellow(),
                category.key
            )),
            CategoryOutcome::Failed(e) => pb.println(format!(
                "  {} {}: {}",
                style("✗").red(),
                category.key,
                e
            )),
        }
        outcomes.push(outcome);
        pb.inc(1);

        if i + 1 < categories.len() {
            tokio::time::sleep(settings.snapshot.category_pause()).await;
        }
    }
    pb.finish_and_clear();

    Ok(outcomes)
}

async fn scrape_one(
    scraper: &mut BestsellerScraper,
    writer: &SnapshotWriter,
    category: &Category,
) -> CategoryOutcome {
    let products = match scraper.scrape_category(category).await {
        Ok(products) => products,
        Err(e) => {
            warn!("Category {} failed: {:#}", category.key, e);
            return CategoryOutcome::Failed(format!("{:#}", e));
        }
    };

    if products.is_empty() {
        return CategoryOutcome::Empty;
    }

    match writer.write_today(category.key, &products) {
        Ok(path) => CategoryOutcome::Saved {
            count: products.len(),
            path,
        },
        Err(e) => {
            warn!("Failed to save {} snapshot: {}", category.key, e);
            CategoryOutcome::Failed(e.to_string())
        }
    }
}
