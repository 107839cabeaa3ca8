use anyhow::{Context, Result};
use clap::Parser;
use shopwatch::browser::Browser;
use shopwatch::config::{self, FailurePolicy, PollSettings, WatchOptions};
use shopwatch::notifier::DiscordNotifier;
use shopwatch::poller::Poller;
use shopwatch::scraper::ShopScraper;
use shopwatch::store::SeenItemStore;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info, Level};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Shopwatch - announces new shop items on Discord")]
struct Args {
    /// Shop page listing all items
    #[clap(long, default_value = config::DEFAULT_SHOP_URL)]
    shop_url: String,

    /// Origin that item paths are relative to
    #[clap(long, default_value = config::DEFAULT_SITE_ROOT)]
    site_root: String,

    /// Discord webhook receiving the notifications
    #[clap(short, long, default_value = config::DEFAULT_WEBHOOK_URL)]
    webhook_url: String,

    /// Embed colour as hex
    #[clap(long, default_value = config::DEFAULT_EMBED_COLOR_HEX, value_parser = config::parse_color)]
    embed_color: u32,

    /// Text sent above every embed
    #[clap(long, default_value = config::DEFAULT_MENTION)]
    mention: String,

    /// Path to the JSON file of already announced items
    #[clap(short, long, default_value = config::DEFAULT_STATE_FILE)]
    state_file: PathBuf,

    /// WebDriver endpoint (chromedriver or geckodriver)
    #[clap(long, default_value = config::DEFAULT_WEBDRIVER_URL)]
    webdriver_url: String,

    /// Show the browser window
    #[clap(long)]
    no_headless: bool,

    /// Seconds to wait for a page to finish rendering
    #[clap(long, default_value_t = config::DEFAULT_RENDER_TIMEOUT_SECS)]
    render_timeout: u64,

    /// Seconds to pause between two new items
    #[clap(long, default_value_t = config::DEFAULT_ITEM_DELAY_SECS)]
    item_delay: u64,

    /// Seconds between two checks of the shop
    #[clap(short, long, default_value_t = config::DEFAULT_POLL_INTERVAL_SECS)]
    poll_interval: u64,

    /// Keep polling after a page times out or the webhook is unreachable
    #[clap(short, long)]
    keep_going: bool,

    /// Enable debug output
    #[clap(short, long)]
    debug: bool,
}

impl Args {
    fn into_options(self) -> WatchOptions {
        WatchOptions {
            shop_url: self.shop_url,
            site_root: self.site_root,
            webhook_url: self.webhook_url,
            embed_color: self.embed_color,
            mention: self.mention,
            state_file: self.state_file,
            webdriver_url: self.webdriver_url,
            headless: !self.no_headless,
            render_timeout: Duration::from_secs(self.render_timeout),
            poll: PollSettings {
                item_delay: Duration::from_secs(self.item_delay),
                poll_interval: Duration::from_secs(self.poll_interval),
                on_failure: if self.keep_going {
                    FailurePolicy::SkipCycle
                } else {
                    FailurePolicy::Abort
                },
            },
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.debug { Level::DEBUG } else { Level::INFO })
        .init();

    let options = args.into_options();

    let browser = Browser::connect(&options.webdriver_url, options.headless, options.render_timeout)
        .await
        .context("Failed to connect to webdriver")?;

    let storefront = ShopScraper::new(browser.clone(), &options.shop_url, &options.site_root);
    let notifier = DiscordNotifier::new(
        &options.webhook_url,
        &options.site_root,
        &options.mention,
        options.embed_color,
    );
    let store = SeenItemStore::new(&options.state_file);

    let mut poller = Poller::initialize(storefront, notifier, store, options.poll.clone())
        .context("Failed to prepare state file")?;

    let outcome = tokio::select! {
        res = poller.run() => res.context("Watcher stopped"),
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, shutting down");
            Ok(())
        }
    };

    // An interrupted cycle may have announced items it did not get to save.
    if let Err(e) = poller.flush() {
        error!("Failed to save seen items: {}", e);
    }

    if let Err(e) = browser.close().await {
        error!("Failed to close browser session: {}", e);
    }

    outcome
}
