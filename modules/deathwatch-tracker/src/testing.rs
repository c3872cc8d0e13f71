// Test mocks for the tracker's two trait boundaries.
//
// - MockFetcher (KillPageFetcher): serves a settable in-memory page
// - MockSink (AlertSink): records alerts; can be switched to reject them
//
// These keep the loop tests deterministic: no network, no Discord token.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use anyhow::Result;
use async_trait::async_trait;

use deathwatch_common::DeathwatchError;

use crate::traits::{AlertSink, KillPageFetcher};

/// Build a kill log page from `(timestamp, description)` rows, newest
/// first, the way the real page lays them out.
pub fn kill_page(rows: &[(&str, &str)]) -> String {
    let mut html = String::from("<html><body><table><tbody>");
    for (timestamp, description) in rows {
        html.push_str(&format!(
            "<tr><td>{timestamp}</td><td>{description}</td></tr>"
        ));
    }
    html.push_str("</tbody></table></body></html>");
    html
}

pub struct MockFetcher {
    html: Mutex<String>,
}

impl MockFetcher {
    pub fn serving(html: &str) -> Self {
        Self {
            html: Mutex::new(html.to_string()),
        }
    }

    /// Replace the page served on the next fetch.
    pub fn set(&self, html: &str) {
        *self.html.lock().unwrap_or_else(PoisonError::into_inner) = html.to_string();
    }
}

#[async_trait]
impl KillPageFetcher for MockFetcher {
    async fn fetch(&self) -> Result<String> {
        Ok(self
            .html
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

pub struct MockSink {
    sent: Mutex<Vec<String>>,
    failing: AtomicBool,
}

impl MockSink {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
        }
    }

    /// When failing, every delivery attempt errors like a rejected send.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for MockSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AlertSink for MockSink {
    async fn send_alert(&self, text: &str) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DeathwatchError::Delivery("channel rejected the message".to_string()).into());
        }
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(text.to_string());
        Ok(())
    }
}
