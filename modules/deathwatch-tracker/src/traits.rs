// Trait abstractions for the poll loop's two I/O edges.
//
// KillPageFetcher: one page fetch per cycle, whatever the transport.
// AlertSink: delivery of a formatted alert to the output channel.
//
// These enable deterministic testing with MockFetcher and MockSink:
// no network, no Discord token. `cargo test` in seconds.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use deathwatch_common::DeathwatchError;
use discord_client::DiscordClient;

#[async_trait]
pub trait KillPageFetcher: Send + Sync {
    /// Fetch the raw kill log markup. Any error means "no events this
    /// cycle" to the caller.
    async fn fetch(&self) -> Result<String>;

    fn name(&self) -> &str;
}

#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn send_alert(&self, text: &str) -> Result<()>;
}

/// Discord-backed sink bound to one output channel. Alerts are sent with
/// embeds suppressed so profile links never expand into preview cards.
pub struct ChannelSink {
    discord: Arc<DiscordClient>,
    channel_id: u64,
}

impl ChannelSink {
    pub fn new(discord: Arc<DiscordClient>, channel_id: u64) -> Self {
        Self {
            discord,
            channel_id,
        }
    }
}

#[async_trait]
impl AlertSink for ChannelSink {
    async fn send_alert(&self, text: &str) -> Result<()> {
        self.discord
            .send_message(self.channel_id, text, true)
            .await
            .map_err(|e| DeathwatchError::Delivery(e.to_string()))?;
        Ok(())
    }
}
