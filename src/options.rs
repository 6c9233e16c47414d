use std::time::Duration;

use crate::accumulator::{ExpansionLimit, SettleStrategy};

pub const DEFAULT_BASE_URL: &str = "https://webscraper.io/test-sites/e-commerce/more/";

#[derive(Debug, Clone)]
pub struct ScraperOptions {
    /// Category paths are resolved against this URL, so it should end with `/`.
    pub base_url: String,
    /// How long to wait for the cookie banner to become clickable.
    pub cookie_timeout: Duration,
    pub settle: SettleStrategy,
    pub expansion_limit: ExpansionLimit,
    pub layout: SiteLayout,
}

impl Default for ScraperOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            cookie_timeout: Duration::from_secs(10),
            settle: SettleStrategy::default(),
            expansion_limit: ExpansionLimit::default(),
            layout: SiteLayout::default(),
        }
    }
}

/// CSS selectors describing the listing pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLayout {
    pub card: String,
    pub title: String,
    pub description: String,
    pub price: String,
    /// Repeated once per filled star.
    pub star: String,
    pub reviews: String,
    pub load_more: String,
    pub cookie_accept: String,
}

impl Default for SiteLayout {
    fn default() -> Self {
        Self {
            card: ".thumbnail".to_string(),
            title: ".title".to_string(),
            description: ".description".to_string(),
            price: ".price".to_string(),
            star: ".glyphicon-star".to_string(),
            reviews: ".ratings".to_string(),
            load_more: ".load-more".to_string(),
            cookie_accept: "#accept-cookie-notification".to_string(),
        }
    }
}
