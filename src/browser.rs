use crate::error::WatchError;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info};

/// A single WebDriver session used for every page load.
///
/// Shop pages fill in their content with JavaScript after the initial load,
/// so a plain HTTP fetch does not see any items. Instead each page is loaded
/// in the browser and read back once a marker element shows up.
#[derive(Clone)]
pub struct Browser {
    client: Client,
    render_timeout: Duration,
}

impl Browser {
    pub async fn connect(webdriver_url: &str, headless: bool, render_timeout: Duration) -> Result<Self, WatchError> {
        info!("Connecting to webdriver at {}", webdriver_url);

        let mut capabilities = serde_json::Map::new();
        if headless {
            capabilities.insert(
                "goog:chromeOptions".to_string(),
                json!({ "args": ["--headless", "--disable-gpu", "--no-sandbox"] }),
            );
            capabilities.insert(
                "moz:firefoxOptions".to_string(),
                json!({ "args": ["-headless"] }),
            );
        }

        let client = ClientBuilder::native()
            .capabilities(capabilities)
            .connect(webdriver_url)
            .await?;

        info!("Webdriver client connected");
        Ok(Self { client, render_timeout })
    }

    /// Loads `url` and returns the page source once `marker` is present.
    pub async fn render(&self, url: &str, marker: &str) -> Result<String, WatchError> {
        debug!("Navigating to {}", url);
        self.client
            .goto(url)
            .await
            .map_err(|source| browser_error(url, source))?;

        match self
            .client
            .wait()
            .at_most(self.render_timeout)
            .for_element(Locator::Css(marker))
            .await
        {
            Ok(_) => {}
            Err(CmdError::WaitTimeout) => {
                return Err(WatchError::RenderTimeout {
                    url: url.to_string(),
                    marker: marker.to_string(),
                    timeout: self.render_timeout,
                });
            }
            Err(source) => return Err(browser_error(url, source)),
        }

        self.client
            .source()
            .await
            .map_err(|source| browser_error(url, source))
    }

    pub async fn close(self) -> Result<(), WatchError> {
        info!("Closing webdriver session");
        self.client
            .close()
            .await
            .map_err(|source| browser_error("session", source))
    }
}

fn browser_error(url: &str, source: CmdError) -> WatchError {
    WatchError::Browser {
        url: url.to_string(),
        source,
    }
}
