use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{info, warn};

use deathwatch_common::DeathEvent;

use crate::dedup::SeenSet;
use crate::extractor::EventExtractor;
use crate::formatter::MessageFormatter;
use crate::traits::{AlertSink, KillPageFetcher};
use crate::watchlist::WatchListStore;

/// Announcement posted once when the poll loop becomes ready.
pub const STARTUP_NOTICE: &str = "**Deathwatch** is up. Kill log monitoring started ✅";

/// Drives the poll cycle: fetch → extract → filter → dedup → classify +
/// format + notify → sleep, forever. A single bad cycle never terminates
/// the loop; the error is logged at the iteration boundary and the next
/// tick proceeds normally.
pub struct Tracker {
    fetcher: Arc<dyn KillPageFetcher>,
    sink: Arc<dyn AlertSink>,
    watchlist: Arc<WatchListStore>,
    extractor: EventExtractor,
    formatter: MessageFormatter,
    seen: SeenSet,
    poll_interval: Duration,
}

impl Tracker {
    pub fn new(
        fetcher: Arc<dyn KillPageFetcher>,
        sink: Arc<dyn AlertSink>,
        watchlist: Arc<WatchListStore>,
        formatter: MessageFormatter,
        poll_interval: Duration,
    ) -> Self {
        Self {
            fetcher,
            sink,
            watchlist,
            extractor: EventExtractor::new(),
            formatter,
            seen: SeenSet::new(),
            poll_interval,
        }
    }

    /// Seed, announce readiness, then poll until the process dies.
    pub async fn run(&mut self) -> Result<()> {
        self.seed().await;

        if let Err(e) = self.sink.send_alert(STARTUP_NOTICE).await {
            warn!(error = %e, "Failed to send startup notice");
        }
        info!("Kill log monitor running");

        loop {
            if let Err(e) = self.cycle().await {
                warn!(error = %e, fetcher = self.fetcher.name(), "Poll cycle failed");
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Mark every event currently visible for a watched character as seen,
    /// without notifying. History predating startup is never announced.
    pub async fn seed(&mut self) {
        match self.watched_events().await {
            Ok(events) => {
                for event in &events {
                    self.seen.mark_seen(event);
                }
                info!(seeded = events.len(), "Seeded already-visible events");
            }
            Err(e) => {
                warn!(error = %e, "Seed pass failed, starting with an empty seen set");
            }
        }
    }

    /// One fetch → extract → filter pass, page order (newest first).
    async fn watched_events(&self) -> Result<Vec<DeathEvent>> {
        let html = self.fetcher.fetch().await?;
        let events = self.extractor.extract(&html)?;
        Ok(events
            .into_iter()
            .filter(|event| self.watchlist.contains(&event.victim))
            .collect())
    }

    /// One full poll cycle. Extraction yields newest first; announcements
    /// go out oldest first so the channel reads chronologically. Delivery
    /// failures still mark the event seen — a missed message is preferred
    /// over a duplicate, so there is no redelivery.
    pub async fn cycle(&mut self) -> Result<()> {
        let events = self.watched_events().await?;

        for event in events.iter().rev() {
            if !self.seen.is_new(event) {
                continue;
            }

            let alert = self.formatter.format_alert(event);
            match self.sink.send_alert(&alert).await {
                Ok(()) => {
                    info!(
                        victim = event.victim.as_str(),
                        level = event.level.as_str(),
                        killer = event.killer_raw.as_str(),
                        "Death announced"
                    );
                }
                Err(e) => {
                    warn!(error = %e, victim = event.victim.as_str(), "Alert delivery failed");
                }
            }
            self.seen.mark_seen(event);
        }

        Ok(())
    }
}
