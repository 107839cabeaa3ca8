use crate::config::{FailurePolicy, PollSettings};
use crate::error::WatchError;
use crate::models::SeenItems;
use crate::notifier::{Delivery, Notifier};
use crate::store::SeenItemStore;
use crate::storefront::Storefront;
use tokio::time::sleep;
use tracing::{error, info, warn};

/// Summary of one pass over the shop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub listed: usize,
    pub new_items: Vec<String>,
    pub rejected: usize,
    pub saved: bool,
}

/// Owns everything the watcher needs between cycles: the shop, the
/// notification target, the state file and the in-memory seen set.
pub struct Poller<S, N> {
    storefront: S,
    notifier: N,
    store: SeenItemStore,
    seen: SeenItems,
    // Set when `seen` holds items the state file does not have yet.
    dirty: bool,
    settings: PollSettings,
}

impl<S: Storefront, N: Notifier> Poller<S, N> {
    /// Makes sure the state file exists and loads what was already announced.
    pub fn initialize(storefront: S, notifier: N, store: SeenItemStore, settings: PollSettings) -> Result<Self, WatchError> {
        store.ensure_exists()?;
        let seen = store.load();
        info!("Watching {} with {} items already seen", storefront.name(), seen.len());

        Ok(Self {
            storefront,
            notifier,
            store,
            seen,
            dirty: false,
            settings,
        })
    }

    pub fn seen(&self) -> &SeenItems {
        &self.seen
    }

    /// Writes the seen set if it changed since the last save. Returns whether
    /// a write happened.
    pub fn flush(&mut self) -> Result<bool, WatchError> {
        if !self.dirty {
            return Ok(false);
        }
        self.store.save(&self.seen)?;
        self.dirty = false;
        Ok(true)
    }

    /// Runs a single cycle: list, fetch and announce new items, then persist.
    ///
    /// When a cycle fails half way, the items announced before the failure are
    /// still written so they are not announced again after a restart.
    pub async fn scan(&mut self) -> Result<CycleReport, WatchError> {
        let mut report = CycleReport::default();
        let outcome = self.process_new_items(&mut report).await;

        match self.flush() {
            Ok(saved) => report.saved = saved,
            Err(save_err) => {
                if let Err(e) = &outcome {
                    error!("Cycle failed before its items were saved: {}", e);
                }
                return Err(save_err);
            }
        }

        outcome?;

        if report.new_items.is_empty() {
            info!("No new items found.");
        } else {
            info!(
                "Cycle done: {} listed, {} new, {} rejected notifications",
                report.listed,
                report.new_items.len(),
                report.rejected
            );
        }
        Ok(report)
    }

    async fn process_new_items(&mut self, report: &mut CycleReport) -> Result<(), WatchError> {
        let ids = self.storefront.fetch_listing().await?;
        report.listed = ids.len();

        for id in ids {
            if !self.seen.is_new(&id) {
                continue;
            }

            info!("New item found: {}", id);
            let record = self.storefront.fetch_item(&id).await?;
            info!(
                "Item details: name={}, img={}, tags={}, desc={}, price={}",
                record.name, record.image, record.tags, record.description, record.price
            );

            if let Delivery::Rejected { .. } = self.notifier.notify(&id, &record).await? {
                report.rejected += 1;
            }

            self.seen.mark_seen(&id, record);
            self.dirty = true;
            report.new_items.push(id);

            // Keep detail page loads from hitting the shop back to back.
            sleep(self.settings.item_delay).await;
        }

        Ok(())
    }

    /// Scans once right away, then every `poll_interval`, forever. Only
    /// returns when a cycle fails and the failure policy says to stop.
    pub async fn run(&mut self) -> Result<(), WatchError> {
        loop {
            if let Err(e) = self.scan().await {
                match self.settings.on_failure {
                    FailurePolicy::SkipCycle if e.is_transient() => {
                        warn!("Cycle failed, retrying next cycle: {}", e);
                    }
                    _ => {
                        error!("Cycle failed: {}", e);
                        return Err(e);
                    }
                }
            }

            info!("Waiting for {} seconds before the next check...", self.settings.poll_interval.as_secs());
            sleep(self.settings.poll_interval).await;
        }
    }
}
