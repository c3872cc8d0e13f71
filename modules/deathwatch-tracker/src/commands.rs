use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use discord_client::DiscordClient;

use crate::watchlist::WatchListStore;

const ADD_USAGE: &str = "Error: use the format `!add \"Character Name\"`";
const REMOVE_USAGE: &str = "Error: use the format `!remove \"Character Name\"`";

const HELP_TEXT: &str = "**Available commands:**\n\
    1. `!add \"Name\"` – add a character to the watch list\n\
    2. `!remove \"Name\"` – remove a character from the watch list\n\
    3. `!list` – show all watched characters\n\
    4. `!help` – show this command overview";

/// A chat command addressed to the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(String),
    Remove(String),
    List,
    Help,
    /// Recognized command word with a missing or empty quoted argument;
    /// carries the usage hint to send back.
    Malformed(&'static str),
}

/// Parse a channel message into a command. Names are taken from the first
/// double-quoted span, so they may contain spaces. Returns `None` for
/// ordinary chatter.
pub fn parse_command(content: &str) -> Option<Command> {
    let content = content.trim();

    if content.starts_with("!add") {
        return Some(match quoted_name(content) {
            Some(name) => Command::Add(name),
            None => Command::Malformed(ADD_USAGE),
        });
    }
    if content.starts_with("!remove") {
        return Some(match quoted_name(content) {
            Some(name) => Command::Remove(name),
            None => Command::Malformed(REMOVE_USAGE),
        });
    }
    if content.starts_with("!list") {
        return Some(Command::List);
    }
    if content.starts_with("!help") {
        return Some(Command::Help);
    }

    None
}

fn quoted_name(content: &str) -> Option<String> {
    content
        .split('"')
        .nth(1)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
}

/// Apply a command against the watch list and produce the reply text.
pub fn respond(watchlist: &WatchListStore, command: Command) -> String {
    match command {
        Command::Add(name) => {
            if watchlist.add(&name) {
                format!("✅ Added {name} to the watch list")
            } else {
                format!("{name} is already on the watch list ✅")
            }
        }
        Command::Remove(name) => {
            if watchlist.remove(&name) {
                format!("✅ Removed {name} from the watch list")
            } else {
                format!("{name} is not on the watch list ❌")
            }
        }
        Command::List => {
            let names = watchlist.snapshot();
            if names.is_empty() {
                "No watched characters ❌".to_string()
            } else {
                let listing: Vec<String> = names.iter().map(|name| format!("🟢 {name}")).collect();
                format!("**Watched characters:**\n{}", listing.join("\n"))
            }
        }
        Command::Help => HELP_TEXT.to_string(),
        Command::Malformed(usage) => usage.to_string(),
    }
}

/// Watches the output channel for commands by polling recent messages over
/// REST, so no gateway session is needed. Runs as its own task; every poll
/// error is logged and the loop keeps going.
pub struct CommandListener {
    discord: Arc<DiscordClient>,
    watchlist: Arc<WatchListStore>,
    channel_id: u64,
    poll_interval: Duration,
    bot_user_id: String,
}

impl CommandListener {
    pub fn new(
        discord: Arc<DiscordClient>,
        watchlist: Arc<WatchListStore>,
        channel_id: u64,
        poll_interval: Duration,
        bot_user_id: String,
    ) -> Self {
        Self {
            discord,
            watchlist,
            channel_id,
            poll_interval,
            bot_user_id,
        }
    }

    pub async fn run(self) {
        // Baseline: commands older than startup are never replayed.
        let mut cursor = self.latest_message_id().await;
        info!(channel_id = self.channel_id, "Command listener running");

        loop {
            tokio::time::sleep(self.poll_interval).await;

            let messages = match self
                .discord
                .recent_messages(self.channel_id, cursor.as_deref(), 50)
                .await
            {
                Ok(messages) => messages,
                Err(e) => {
                    warn!(error = %e, "Command poll failed");
                    continue;
                }
            };

            // The API returns newest first; handle in arrival order.
            for msg in messages.into_iter().rev() {
                cursor = Some(msg.id.clone());
                if msg.author.id == self.bot_user_id || msg.author.bot {
                    continue;
                }
                let Some(command) = parse_command(&msg.content) else {
                    continue;
                };

                info!(author = msg.author.id.as_str(), content = msg.content.as_str(), "Command received");
                let reply = respond(&self.watchlist, command);
                if let Err(e) = self.discord.send_message(self.channel_id, &reply, false).await {
                    warn!(error = %e, "Failed to send command reply");
                }
            }
        }
    }

    async fn latest_message_id(&self) -> Option<String> {
        match self.discord.recent_messages(self.channel_id, None, 1).await {
            Ok(messages) => messages.first().map(|msg| msg.id.clone()),
            Err(e) => {
                warn!(error = %e, "Could not read baseline message id");
                None
            }
        }
    }
}
