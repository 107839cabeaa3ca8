use fantoccini::error::{CmdError, NewSessionError};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("failed to start browser session: {0}")]
    Session(#[from] NewSessionError),

    #[error("timed out after {timeout:?} waiting for `{marker}` on {url}")]
    RenderTimeout {
        url: String,
        marker: String,
        timeout: Duration,
    },

    #[error("browser command failed on {url}: {source}")]
    Browser {
        url: String,
        #[source]
        source: CmdError,
    },

    #[error("webhook delivery failed: {0}")]
    Delivery(#[from] reqwest::Error),

    #[error("state file error at {}: {source}", .path.display())]
    Store {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode seen items: {0}")]
    Encode(#[from] serde_json::Error),
}

impl WatchError {
    /// Errors that only affect the cycle they happened in. The next cycle
    /// starts from a fresh page load, so these may be skipped over.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            WatchError::RenderTimeout { .. } | WatchError::Browser { .. } | WatchError::Delivery(_)
        )
    }
}
