//! Category listing command.

use console::style;

use crate::scrapers::CATEGORIES;

/// Print the bestseller category table.
pub fn cmd_categories() -> anyhow::Result<()> {
    println!("{}", style("Bestseller categories").bold());
    for category in CATEGORIES {
        println!(
            "  {:<10} {:<8} {}",
            style(category.key).cyan(),
            category.id.unwrap_or("-"),
            style(category.url()).dim()
        );
    }
    Ok(())
}
