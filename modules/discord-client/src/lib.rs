pub mod error;
pub mod types;

pub use error::{DiscordError, Result};
pub use types::{Channel, Message, OutboundMessage, User, SUPPRESS_EMBEDS};

use std::time::Duration;

const BASE_URL: &str = "https://discord.com/api/v10";

pub struct DiscordClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl DiscordClient {
    pub fn new(token: &str) -> Self {
        Self::with_base_url(token, BASE_URL)
    }

    /// Point the client at a different API root, e.g. a proxy.
    pub fn with_base_url(token: &str, base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    fn auth_header(&self) -> String {
        format!("Bot {}", self.token)
    }

    /// Fetch a channel. Used at startup to verify the output channel exists
    /// and the token can see it.
    pub async fn get_channel(&self, channel_id: u64) -> Result<Channel> {
        let url = format!("{}/channels/{}", self.base_url, channel_id);
        let resp = self
            .client
            .get(&url)
            .header("Authorization", self.auth_header())
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(DiscordError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp.json().await?)
    }

    /// The bot user behind the token. The command listener uses this to
    /// skip the bot's own messages.
    pub async fn current_user(&self) -> Result<User> {
        let url = format!("{}/users/@me", self.base_url);
        let resp = self
            .client
            .get(&url)
            .header("Authorization", self.auth_header())
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(DiscordError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp.json().await?)
    }

    /// Post a message to a channel. With `suppress_embeds`, Discord renders
    /// no preview cards for any links in the content.
    pub async fn send_message(
        &self,
        channel_id: u64,
        content: &str,
        suppress_embeds: bool,
    ) -> Result<Message> {
        let url = format!("{}/channels/{}/messages", self.base_url, channel_id);
        let body = OutboundMessage {
            content: content.to_string(),
            flags: suppress_embeds.then_some(SUPPRESS_EMBEDS),
        };

        let resp = self
            .client
            .post(&url)
            .header("Authorization", self.auth_header())
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(DiscordError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp.json().await?)
    }

    /// Fetch recent channel messages, newest first. With `after`, only
    /// messages with a snowflake id greater than it are returned.
    pub async fn recent_messages(
        &self,
        channel_id: u64,
        after: Option<&str>,
        limit: u8,
    ) -> Result<Vec<Message>> {
        let mut url = format!(
            "{}/channels/{}/messages?limit={}",
            self.base_url, channel_id, limit
        );
        if let Some(after) = after {
            url.push_str(&format!("&after={after}"));
        }

        let resp = self
            .client
            .get(&url)
            .header("Authorization", self.auth_header())
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            tracing::debug!(channel_id, status = status.as_u16(), "Message poll rejected");
            return Err(DiscordError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp.json().await?)
    }
}
