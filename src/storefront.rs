use crate::error::WatchError;
use crate::models::ItemRecord;
use async_trait::async_trait;

/// A shop that can be polled for its current items.
#[async_trait(?Send)]
pub trait Storefront {
    fn name(&self) -> &str;

    /// Item identifiers currently shown in the shop, in page order.
    async fn fetch_listing(&self) -> Result<Vec<String>, WatchError>;

    async fn fetch_item(&self, id: &str) -> Result<ItemRecord, WatchError>;
}
