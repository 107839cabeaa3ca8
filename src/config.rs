use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SHOP_URL: &str = "https://ko-fi.com/example/shop";
pub const DEFAULT_SITE_ROOT: &str = "https://ko-fi.com";
pub const DEFAULT_WEBHOOK_URL: &str = "https://discord.com/api/webhooks/";
pub const DEFAULT_EMBED_COLOR: u32 = 0x3498db;
pub const DEFAULT_EMBED_COLOR_HEX: &str = "3498db";
pub const DEFAULT_MENTION: &str = "@everyone";
pub const DEFAULT_STATE_FILE: &str = "items.json";
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:4444";
pub const DEFAULT_RENDER_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_ITEM_DELAY_SECS: u64 = 2;
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

/// What the poll loop does when a cycle fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Any failed cycle stops the watcher.
    Abort,
    /// Transient failures (slow page, webhook unreachable) are logged and the
    /// next cycle runs as usual. State file failures still stop the watcher.
    SkipCycle,
}

/// Timing and failure handling of the poll loop.
#[derive(Debug, Clone)]
pub struct PollSettings {
    pub item_delay: Duration,
    pub poll_interval: Duration,
    pub on_failure: FailurePolicy,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            item_delay: Duration::from_secs(DEFAULT_ITEM_DELAY_SECS),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            on_failure: FailurePolicy::Abort,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WatchOptions {
    pub shop_url: String,
    pub site_root: String,
    pub webhook_url: String,
    pub embed_color: u32,
    pub mention: String,
    pub state_file: PathBuf,
    pub webdriver_url: String,
    pub headless: bool,
    pub render_timeout: Duration,
    pub poll: PollSettings,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            shop_url: DEFAULT_SHOP_URL.to_string(),
            site_root: DEFAULT_SITE_ROOT.to_string(),
            webhook_url: DEFAULT_WEBHOOK_URL.to_string(),
            embed_color: DEFAULT_EMBED_COLOR,
            mention: DEFAULT_MENTION.to_string(),
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            headless: true,
            render_timeout: Duration::from_secs(DEFAULT_RENDER_TIMEOUT_SECS),
            poll: PollSettings::default(),
        }
    }
}

/// Parses an embed colour written as hex, with or without `#`/`0x`.
pub fn parse_color(s: &str) -> Result<u32, String> {
    let digits = s
        .trim()
        .trim_start_matches('#')
        .trim_start_matches("0x")
        .trim_start_matches("0X");
    let color = u32::from_str_radix(digits, 16).map_err(|e| format!("invalid colour {s:?}: {e}"))?;
    if color > 0xFF_FF_FF {
        return Err(format!("colour {s:?} is larger than ffffff"));
    }
    Ok(color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_constants() {
        let options = WatchOptions::default();
        assert_eq!(options.embed_color, 0x3498db);
        assert_eq!(options.render_timeout, Duration::from_secs(10));
        assert_eq!(options.poll.item_delay, Duration::from_secs(2));
        assert_eq!(options.poll.poll_interval, Duration::from_secs(60));
        assert_eq!(options.poll.on_failure, FailurePolicy::Abort);
        assert_eq!(options.state_file, PathBuf::from("items.json"));
    }

    #[test]
    fn colors_parse_in_common_hex_spellings() {
        assert_eq!(parse_color("3498db"), Ok(0x3498db));
        assert_eq!(parse_color("#3498DB"), Ok(0x3498db));
        assert_eq!(parse_color("0x00ff00"), Ok(0x00ff00));
        assert!(parse_color("blue").is_err());
        assert!(parse_color("1000000").is_err());
    }

    #[test]
    fn hex_default_matches_numeric_default() {
        assert_eq!(parse_color(DEFAULT_EMBED_COLOR_HEX), Ok(DEFAULT_EMBED_COLOR));
    }
}
