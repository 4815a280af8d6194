//! Browser engine configuration types.

use serde::{Deserialize, Serialize};

/// Browser engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowserEngineConfig {
    /// Run in headless mode (default: true).
    /// Set to false to watch the scroll loop while debugging selectors.
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Proxy server URL (e.g., "socks5://127.0.0.1:1080").
    #[serde(default)]
    pub proxy: Option<String>,

    /// Page load timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Window size passed to Chrome; lazy grids render by viewport.
    #[serde(default = "default_window_size")]
    pub window_size: (u32, u32),

    /// Additional Chrome arguments.
    #[serde(default)]
    pub chrome_args: Vec<String>,

    /// Remote Chrome DevTools URL (e.g., "ws://localhost:9222").
    /// If set, connects to existing browser instead of launching one.
    /// Can also be set via BROWSER_URL environment variable.
    #[serde(default)]
    pub remote_url: Option<String>,
}

pub fn default_headless() -> bool {
    true
}

pub fn default_timeout() -> u64 {
    30
}

pub fn default_window_size() -> (u32, u32) {
    (1920, 1080)
}

impl Default for BrowserEngineConfig {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            proxy: None,
            timeout: default_timeout(),
            window_size: default_window_size(),
            chrome_args: Vec::new(),
            remote_url: None,
        }
    }
}

impl BrowserEngineConfig {
    /// Apply BROWSER_URL and BROWSER_HEADLESS from the environment.
    pub fn with_env_overrides(mut self) -> Self {
        self.apply_env_overrides(|key| std::env::var(key).ok());
        self
    }

    /// Apply BROWSER_URL and BROWSER_HEADLESS through `lookup`.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("BROWSER_URL").filter(|v| !v.is_empty()) {
            self.remote_url = Some(val);
        }

        if let Some(val) = lookup("BROWSER_HEADLESS") {
            match val.to_lowercase().as_str() {
                "0" | "false" | "no" => self.headless = false,
                "1" | "true" | "yes" => self.headless = true,
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_toml() {
        let config: BrowserEngineConfig = toml::from_str("").unwrap();
        assert_eq!(config, BrowserEngineConfig::default());
        assert!(config.headless);
        assert_eq!(config.window_size, (1920, 1080));
    }

    #[test]
    fn test_partial_toml() {
        let config: BrowserEngineConfig = toml::from_str(
            r#"
            headless = false
            remote_url = "ws://localhost:9222"
            chrome_args = ["--lang=ko-KR"]
            "#,
        )
        .unwrap();
        assert!(!config.headless);
        assert_eq!(config.remote_url.as_deref(), Some("ws://localhost:9222"));
        assert_eq!(config.chrome_args, vec!["--lang=ko-KR".to_string()]);
        assert_eq!(config.timeout, 30);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = BrowserEngineConfig::default();
        config.apply_env_overrides(|key| match key {
            "BROWSER_URL" => Some("ws://chrome:9222".to_string()),
            "BROWSER_HEADLESS" => Some("false".to_string()),
            _ => None,
        });
        assert_eq!(config.remote_url.as_deref(), Some("ws://chrome:9222"));
        assert!(!config.headless);

        // Unrecognized values leave the setting alone.
        config.apply_env_overrides(|key| (key == "BROWSER_HEADLESS").then(|| "maybe".to_string()));
        assert!(!config.headless);
    }
}
