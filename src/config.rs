//! Configuration for the proxy server and the snapshot scraper.
//!
//! Settings come from an optional TOML file with serde defaults for every
//! field, then a handful of environment variables take precedence. The file
//! is either given explicitly or discovered by `prefer` in its standard
//! locations.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::scrapers::{BrowserEngineConfig, ScrollSettings};

/// Name `prefer` searches for when no config path is given.
pub const CONFIG_NAME: &str = "price-tracker";

/// Default proxy bind address.
pub const DEFAULT_BIND: &str = "127.0.0.1:5000";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port, host, or `host:port`.
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Outbound request timeout in seconds.
    pub timeout_secs: u64,
    /// Literal user agent string; the shared desktop agent when unset.
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: None,
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    /// Directory receiving `<date>_<category>.json` files.
    pub data_dir: PathBuf,
    pub target_count: usize,
    pub max_attempts: u32,
    pub stagnation_threshold: u32,
    pub scroll_delay_ms: u64,
    /// Pause after navigation before the first measurement.
    pub initial_wait_secs: u64,
    /// Pause between consecutive categories.
    pub category_pause_secs: u64,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            target_count: 100,
            max_attempts: 50,
            stagnation_threshold: 5,
            scroll_delay_ms: 2000,
            initial_wait_secs: 5,
            category_pause_secs: 2,
        }
    }
}

impl SnapshotConfig {
    pub fn scroll_settings(&self) -> ScrollSettings {
        ScrollSettings {
            target_count: self.target_count,
            max_attempts: self.max_attempts,
            stagnation_threshold: self.stagnation_threshold,
            delay: Duration::from_millis(self.scroll_delay_ms),
        }
    }

    pub fn initial_wait(&self) -> Duration {
        Duration::from_secs(self.initial_wait_secs)
    }

    pub fn category_pause(&self) -> Duration {
        Duration::from_secs(self.category_pause_secs)
    }
}

/// Application settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerConfig,
    pub http: HttpConfig,
    pub snapshot: SnapshotConfig,
    pub browser: BrowserEngineConfig,
}

impl Settings {
    /// Parse settings from TOML; missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).context("Invalid configuration")
    }

    /// Read settings from a TOML file.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Apply environment overrides through `lookup`.
    ///
    /// - `PRICE_TRACKER_BIND` replaces `server.bind`
    /// - `PRICE_TRACKER_DATA_DIR` replaces `snapshot.data_dir`
    /// - `BROWSER_URL` and `BROWSER_HEADLESS` adjust the browser section
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(bind) = lookup("PRICE_TRACKER_BIND").filter(|s| !s.is_empty()) {
            tracing::debug!("Using PRICE_TRACKER_BIND from environment: {}", bind);
            self.server.bind = bind;
        }

        if let Some(dir) = lookup("PRICE_TRACKER_DATA_DIR").filter(|s| !s.is_empty()) {
            tracing::debug!("Using PRICE_TRACKER_DATA_DIR from environment: {}", dir);
            self.snapshot.data_dir = PathBuf::from(dir);
        }

        self.browser.apply_env_overrides(&lookup);
    }
}

/// Options for loading settings.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file path (overrides auto-discovery).
    pub config_path: Option<PathBuf>,
}

/// Find a config file in the standard locations.
async fn discover_config_file() -> Option<PathBuf> {
    match prefer::load(CONFIG_NAME).await {
        Ok(found) => found.source_path().map(|path| path.to_path_buf()),
        Err(e) => {
            tracing::debug!("No {} config discovered: {}", CONFIG_NAME, e);
            None
        }
    }
}

/// Load settings from the config file (if any) and the environment.
///
/// An explicit `--config` path must exist. Otherwise a discovered file is
/// used when there is one, and defaults when there is not.
pub async fn load_settings(options: &LoadOptions) -> anyhow::Result<Settings> {
    let path = match &options.config_path {
        Some(path) => Some(path.clone()),
        None => discover_config_file().await,
    };

    let mut settings = match path {
        Some(path) => {
            tracing::debug!("Loading config from {}", path.display());
            Settings::from_path(&path)?
        }
        None => Settings::default(),
    };

    settings.apply_env_overrides(|key| std::env::var(key).ok());
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_empty_config_uses_defaults() {
        let settings = Settings::from_toml_str("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.server.bind, "127.0.0.1:5000");
        assert_eq!(settings.snapshot.data_dir, PathBuf::from("data"));
        assert_eq!(settings.http.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_partial_sections() {
        let settings = Settings::from_toml_str(
            r#"
            [server]
            bind = "0.0.0.0:8080"

            [snapshot]
            target_count = 60
            scroll_delay_ms = 500

            [browser]
            headless = false
            "#,
        )
        .unwrap();

        assert_eq!(settings.server.bind, "0.0.0.0:8080");
        assert_eq!(settings.snapshot.target_count, 60);
        assert_eq!(settings.snapshot.max_attempts, 50);
        assert!(!settings.browser.headless);

        let scroll = settings.snapshot.scroll_settings();
        assert_eq!(scroll.target_count, 60);
        assert_eq!(scroll.stagnation_threshold, 5);
        assert_eq!(scroll.delay, Duration::from_millis(500));
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(Settings::from_toml_str("[snapshot]\ntarget_count = \"many\"").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("PRICE_TRACKER_BIND", "9000"),
            ("PRICE_TRACKER_DATA_DIR", "/var/lib/snapshots"),
            ("BROWSER_URL", "ws://localhost:9222"),
        ]
        .into_iter()
        .collect();

        let mut settings = Settings::default();
        settings.apply_env_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(settings.server.bind, "9000");
        assert_eq!(settings.snapshot.data_dir, PathBuf::from("/var/lib/snapshots"));
        assert_eq!(
            settings.browser.remote_url.as_deref(),
            Some("ws://localhost:9222")
        );
        assert!(settings.browser.headless);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[http]\nuser_agent = \"MyBot/1.0\"\n").unwrap();

        let settings = Settings::from_path(&path).unwrap();
        assert_eq!(settings.http.user_agent.as_deref(), Some("MyBot/1.0"));
    }

    #[tokio::test]
    async fn test_missing_explicit_config_is_an_error() {
        let options = LoadOptions {
            config_path: Some(PathBuf::from("/nonexistent/price-tracker.toml")),
        };
        assert!(load_settings(&options).await.is_err());
    }

    #[tokio::test]
    async fn test_explicit_config_skips_discovery() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("elsewhere.toml");
        std::fs::write(&path, "[snapshot]\ntarget_count = 40\n").unwrap();

        let options = LoadOptions {
            config_path: Some(path),
        };
        let settings = load_settings(&options).await.unwrap();
        assert_eq!(settings.snapshot.target_count, 40);
    }
}
