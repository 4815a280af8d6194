//! Automation fingerprint masking.
//!
//! Only the handful of toggles the bestseller page is known to check; this is
//! not a general evasion layer.

/// Chrome switches applied to every launched browser.
pub const LAUNCH_ARGS: &[&str] = &[
    "--no-sandbox",
    "--disable-dev-shm-usage",
    "--disable-blink-features=AutomationControlled",
    "--disable-infobars",
    "--no-first-run",
    "--no-default-browser-check",
];

/// Installed on every new document before page scripts run.
pub const WEBDRIVER_MASK_SCRIPT: &str = r#"
    Object.defineProperty(navigator, 'webdriver', {
        get: () => undefined
    });
"#;
