use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use deathwatch_common::DeathwatchError;

use crate::traits::KillPageFetcher;

const USER_AGENT: &str = "Mozilla/5.0 (Deathwatch; kill log tracker)";

/// Plain HTTP fetcher for the kill log page. One GET per cycle, no retries;
/// the poll loop treats any failure as an empty cycle and tries again on
/// the next tick.
pub struct HttpKillPageFetcher {
    client: reqwest::Client,
    url: String,
}

impl HttpKillPageFetcher {
    pub fn new(url: &str) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(15))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            url: url.to_string(),
        }
    }
}

#[async_trait]
impl KillPageFetcher for HttpKillPageFetcher {
    async fn fetch(&self) -> Result<String> {
        debug!(url = self.url.as_str(), "Fetching kill log page");

        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| DeathwatchError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(DeathwatchError::Transport(format!(
                "kill log page returned HTTP {status}"
            ))
            .into());
        }

        let body = resp
            .text()
            .await
            .map_err(|e| DeathwatchError::Transport(e.to_string()))?;
        Ok(body)
    }

    fn name(&self) -> &str {
        "http"
    }
}
