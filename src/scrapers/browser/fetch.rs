//! Page loading for lazily rendered listings.

#[cfg(feature = "browser")]
use std::time::Duration;

#[cfg(feature = "browser")]
use anyhow::Result;
#[cfg(feature = "browser")]
use async_trait::async_trait;
#[cfg(feature = "browser")]
use tracing::{debug, info};

#[cfg(feature = "browser")]
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
#[cfg(feature = "browser")]
use chromiumoxide::cdp::browser_protocol::page::{
    AddScriptToEvaluateOnNewDocumentParams, NavigateParams,
};
#[cfg(feature = "browser")]
use chromiumoxide::Page;

#[cfg(feature = "browser")]
use super::scroll::{load_until_stable, ScrollSettings, ScrollTarget, ScrollTechnique};
#[cfg(feature = "browser")]
use super::stealth::WEBDRIVER_MASK_SCRIPT;
#[cfg(feature = "browser")]
use super::{BrowserFetcher, LoadedPage};
#[cfg(feature = "browser")]
use crate::scrapers::USER_AGENT;

/// Live page scrolled through CDP.
#[cfg(feature = "browser")]
struct PageScrollTarget<'a> {
    page: &'a Page,
    /// Selector as a JS string literal.
    selector_literal: String,
}

#[cfg(feature = "browser")]
impl<'a> PageScrollTarget<'a> {
    fn new(page: &'a Page, item_selector: &str) -> Result<Self> {
        Ok(Self {
            page,
            selector_literal: serde_json::to_string(item_selector)?,
        })
    }
}

#[cfg(feature = "browser")]
#[async_trait]
impl ScrollTarget for PageScrollTarget<'_> {
    async fn count_items(&mut self) -> Result<usize> {
        let script = format!(
            "document.querySelectorAll({}).length",
            self.selector_literal
        );
        let count: usize = self.page.evaluate(script).await?.into_value()?;
        Ok(count)
    }

    async fn scroll(&mut self, technique: ScrollTechnique) -> Result<()> {
        match technique {
            ScrollTechnique::EndKey => {
                self.page.find_element("body").await?.press_key("End").await?;
            }
            ScrollTechnique::ScriptToBottom => {
                self.page
                    .evaluate("window.scrollTo(0, document.body.scrollHeight);".to_string())
                    .await?;
            }
            ScrollTechnique::LastItemIntoView => {
                let script = format!(
                    r#"(() => {{
                        const items = document.querySelectorAll({});
                        if (items.length > 0) {{
                            items[items.length - 1].scrollIntoView({{behavior: 'smooth', block: 'end'}});
                        }}
                    }})()"#,
                    self.selector_literal
                );
                self.page.evaluate(script).await?;
            }
        }
        Ok(())
    }
}

#[cfg(feature = "browser")]
impl BrowserFetcher {
    /// Open `url`, scroll until the `item_selector` grid stops growing, and
    /// capture the resulting HTML. The page is closed whatever the outcome.
    pub async fn load_scrolled(
        &mut self,
        url: &str,
        item_selector: &str,
        settings: &ScrollSettings,
        initial_wait: Duration,
    ) -> Result<LoadedPage> {
        self.ensure_browser().await?;

        let browser = self
            .browser
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("browser not initialized after ensure_browser"))?;
        let page = browser.new_page("about:blank").await?;

        let result = self
            .load_scrolled_inner(&page, url, item_selector, settings, initial_wait)
            .await;
        if let Err(e) = page.close().await {
            debug!("Failed to close page: {}", e);
        }
        result
    }

    async fn load_scrolled_inner(
        &self,
        page: &Page,
        url: &str,
        item_selector: &str,
        settings: &ScrollSettings,
        initial_wait: Duration,
    ) -> Result<LoadedPage> {
        page.execute(SetUserAgentOverrideParams::new(USER_AGENT.to_string()))
            .await?;
        page.execute(AddScriptToEvaluateOnNewDocumentParams::new(
            WEBDRIVER_MASK_SCRIPT.to_string(),
        ))
        .await?;

        self.navigate_to_url(page, url).await?;
        debug!("Waiting {:?} for initial render", initial_wait);
        tokio::time::sleep(initial_wait).await;

        let mut target = PageScrollTarget::new(page, item_selector)?;
        let report = load_until_stable(&mut target, settings).await?;

        let html = page.content().await?;
        Ok(LoadedPage { html, report })
    }

    /// Navigate to a URL with timeout handling.
    async fn navigate_to_url(&self, page: &Page, url: &str) -> Result<()> {
        info!("Navigating to {}", url);
        let nav_params = NavigateParams::builder()
            .url(url)
            .build()
            .map_err(|e| anyhow::anyhow!("Invalid URL: {}", e))?;

        let nav_timeout = Duration::from_secs(self.config.timeout);
        tokio::time::timeout(nav_timeout, page.execute(nav_params))
            .await
            .map_err(|_| {
                anyhow::anyhow!(
                    "Navigation timed out after {}s for {}",
                    self.config.timeout,
                    url
                )
            })?
            .map_err(|e| anyhow::anyhow!("Navigation failed for {}: {}", url, e))?;

        Ok(())
    }
}
