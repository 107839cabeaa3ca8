use crate::error::WatchError;
use crate::models::ItemRecord;
use crate::scraper::item_url;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use tracing::{error, info};

/// Outcome of a delivered notification. A rejected message is reported but
/// is not an error: notifications are sent once and never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Accepted,
    Rejected { status: u16, body: String },
}

#[async_trait(?Send)]
pub trait Notifier {
    async fn notify(&self, id: &str, item: &ItemRecord) -> Result<Delivery, WatchError>;
}

#[derive(Debug, Serialize)]
struct WebhookMessage<'a> {
    content: &'a str,
    embeds: Vec<Embed<'a>>,
}

#[derive(Debug, Serialize)]
struct Embed<'a> {
    title: &'a str,
    url: String,
    color: u32,
    image: EmbedImage<'a>,
    fields: Vec<EmbedField<'a>>,
}

#[derive(Debug, Serialize)]
struct EmbedImage<'a> {
    url: &'a str,
}

#[derive(Debug, Serialize)]
struct EmbedField<'a> {
    name: &'a str,
    value: &'a str,
    inline: bool,
}

/// Posts new items to a Discord webhook as a single embed.
pub struct DiscordNotifier {
    client: reqwest::Client,
    webhook_url: String,
    site_root: String,
    mention: String,
    embed_color: u32,
}

impl DiscordNotifier {
    pub fn new(
        webhook_url: impl Into<String>,
        site_root: impl Into<String>,
        mention: impl Into<String>,
        embed_color: u32,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            webhook_url: webhook_url.into(),
            site_root: site_root.into(),
            mention: mention.into(),
            embed_color,
        }
    }

    fn message<'a>(&'a self, id: &str, item: &'a ItemRecord) -> WebhookMessage<'a> {
        WebhookMessage {
            content: &self.mention,
            embeds: vec![Embed {
                title: &item.name,
                url: item_url(&self.site_root, id),
                color: self.embed_color,
                image: EmbedImage { url: &item.image },
                fields: vec![
                    EmbedField { name: "Tags", value: &item.tags, inline: false },
                    EmbedField { name: "Description", value: &item.description, inline: false },
                    EmbedField { name: "Price", value: &item.price, inline: false },
                ],
            }],
        }
    }
}

#[async_trait(?Send)]
impl Notifier for DiscordNotifier {
    async fn notify(&self, id: &str, item: &ItemRecord) -> Result<Delivery, WatchError> {
        info!("Sending item to Discord: {}", id);

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&self.message(id, item))
            .send()
            .await?;

        let status = response.status();
        info!("Response status: {}", status.as_u16());

        if status == StatusCode::NO_CONTENT {
            info!("Message sent for item: {}", id);
            Ok(Delivery::Accepted)
        } else {
            let body = response.text().await.unwrap_or_default();
            error!("Error sending message for item: {}", id);
            error!("Response: {}", body);
            Ok(Delivery::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }
}
