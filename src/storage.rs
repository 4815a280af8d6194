//! Snapshot files on disk.
//!
//! One pretty-printed JSON array per category and day:
//! `{data_dir}/{YYYY-MM-DD}_{category}.json`.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use tracing::info;

use crate::models::SnapshotProduct;
use crate::scrapers::error::Result;

/// File name for a category snapshot taken on `date`.
pub fn snapshot_filename(date: NaiveDate, category: &str) -> String {
    format!("{}_{}.json", date.format("%Y-%m-%d"), category)
}

/// Writes category snapshots under a data directory.
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    data_dir: PathBuf,
}

impl SnapshotWriter {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path the snapshot for `category` on `date` is written to.
    pub fn snapshot_path(&self, date: NaiveDate, category: &str) -> PathBuf {
        self.data_dir.join(snapshot_filename(date, category))
    }

    /// Write `products` for `category`, replacing any snapshot from the same day.
    pub fn write(
        &self,
        category: &str,
        products: &[SnapshotProduct],
        date: NaiveDate,
    ) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.data_dir)?;

        let path = self.snapshot_path(date, category);
        let json = serde_json::to_string_pretty(products)?;
        std::fs::write(&path, json)?;

        info!("Saved {} products to {}", products.len(), path.display());
        Ok(path)
    }

    /// Write using today's local date.
    pub fn write_today(&self, category: &str, products: &[SnapshotProduct]) -> Result<PathBuf> {
        self.write(category, products, Local::now().date_naive())
    }
}
