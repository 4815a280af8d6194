//! User agent sent to storefronts.

/// Desktop Chrome user agent used by both the HTTP client and the browser
/// session. Storefronts serve a stripped page (or a block page) to anything
/// that does not look like a browser.
pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Configured user agent, or [`USER_AGENT`] when none is set.
pub fn resolve_user_agent(config: Option<&str>) -> String {
    config.unwrap_or(USER_AGENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_user_agent_default() {
        assert_eq!(resolve_user_agent(None), USER_AGENT);
    }

    #[test]
    fn test_resolve_user_agent_custom_is_literal() {
        assert_eq!(resolve_user_agent(Some("MyBot/1.0")), "MyBot/1.0");
        assert_eq!(resolve_user_agent(Some("rotate")), "rotate");
    }
}
