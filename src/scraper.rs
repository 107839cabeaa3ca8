use crate::browser::Browser;
use crate::error::WatchError;
use crate::models::ItemRecord;
use crate::parser::{self, DETAIL_MARKER, LISTING_MARKER};
use crate::storefront::Storefront;
use async_trait::async_trait;
use tracing::info;

/// Turns a shop path like `/s/abc123` into a full URL on `site_root`.
pub fn item_url(site_root: &str, id: &str) -> String {
    if id.starts_with("http://") || id.starts_with("https://") {
        id.to_string()
    } else {
        format!("{}{}", site_root.trim_end_matches('/'), id)
    }
}

pub struct ShopScraper {
    browser: Browser,
    shop_url: String,
    site_root: String,
}

impl ShopScraper {
    pub fn new(browser: Browser, shop_url: impl Into<String>, site_root: impl Into<String>) -> Self {
        Self {
            browser,
            shop_url: shop_url.into(),
            site_root: site_root.into(),
        }
    }
}

#[async_trait(?Send)]
impl Storefront for ShopScraper {
    fn name(&self) -> &str {
        &self.shop_url
    }

    async fn fetch_listing(&self) -> Result<Vec<String>, WatchError> {
        info!("Checking for new items on {}", self.shop_url);
        let html = self.browser.render(&self.shop_url, LISTING_MARKER).await?;
        let ids = parser::parse_listing(&html);
        info!("{} items found in the shop", ids.len());
        Ok(ids)
    }

    async fn fetch_item(&self, id: &str) -> Result<ItemRecord, WatchError> {
        info!("Retrieving item details: {}", id);
        let html = self
            .browser
            .render(&item_url(&self.site_root, id), DETAIL_MARKER)
            .await?;
        Ok(parser::parse_item(&html))
    }
}
