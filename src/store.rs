use crate::error::WatchError;
use crate::models::SeenItems;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// JSON file holding every item that was already announced.
#[derive(Debug, Clone)]
pub struct SeenItemStore {
    path: PathBuf,
}

impl SeenItemStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates the state file with an empty object if it is not there yet.
    pub fn ensure_exists(&self) -> Result<(), WatchError> {
        if self.path.exists() {
            return Ok(());
        }

        info!("{} does not exist, creating it", self.path.display());
        fs::write(&self.path, "{}").map_err(|source| WatchError::Store {
            path: self.path.clone(),
            source,
        })
    }

    /// Reads the seen items. A missing, empty or unreadable file is treated
    /// as "nothing seen yet" so a damaged state file never stops the watcher.
    pub fn load(&self) -> SeenItems {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("{} not found, starting with no seen items", self.path.display());
                return SeenItems::default();
            }
            Err(e) => {
                error!("Failed to read {}: {}, starting with no seen items", self.path.display(), e);
                return SeenItems::default();
            }
        };

        if content.trim().is_empty() {
            info!("{} is empty, starting with no seen items", self.path.display());
            return SeenItems::default();
        }

        match serde_json::from_str::<SeenItems>(&content) {
            Ok(items) => {
                info!("Loaded {} seen items from {}", items.len(), self.path.display());
                items
            }
            Err(e) => {
                warn!("Could not decode {}: {}, starting with no seen items", self.path.display(), e);
                SeenItems::default()
            }
        }
    }

    /// Rewrites the whole state file with `items`.
    pub fn save(&self, items: &SeenItems) -> Result<(), WatchError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        items.serialize(&mut serializer)?;

        fs::write(&self.path, buf).map_err(|source| WatchError::Store {
            path: self.path.clone(),
            source,
        })?;

        info!("Saved {} seen items to {}", items.len(), self.path.display());
        Ok(())
    }
}
