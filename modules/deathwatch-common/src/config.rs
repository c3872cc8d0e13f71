use std::env;

use tracing::info;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Discord
    pub discord_token: String,
    pub channel_id: u64,

    // Kill log source
    pub kill_log_url: String,
    pub profile_base_url: String,

    // Watch list persistence
    pub watchlist_path: String,

    // Loop cadence
    pub poll_interval_secs: u64,
    pub command_poll_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            discord_token: required_env("DISCORD_TOKEN"),
            channel_id: required_env("DISCORD_CHANNEL_ID")
                .parse()
                .expect("DISCORD_CHANNEL_ID must be a numeric channel id"),
            kill_log_url: env::var("KILL_LOG_URL")
                .unwrap_or_else(|_| "https://cyleria.pl/?subtopic=killstatistics".to_string()),
            profile_base_url: env::var("PROFILE_BASE_URL")
                .unwrap_or_else(|_| "https://cyleria.pl/".to_string()),
            watchlist_path: env::var("WATCHLIST_PATH")
                .unwrap_or_else(|_| "watched.json".to_string()),
            poll_interval_secs: env::var("POLL_INTERVAL_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .expect("POLL_INTERVAL_SECS must be a number"),
            command_poll_secs: env::var("COMMAND_POLL_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .expect("COMMAND_POLL_SECS must be a number"),
        }
    }

    /// Log the effective configuration with the token masked.
    pub fn log_redacted(&self) {
        info!(
            channel_id = self.channel_id,
            kill_log_url = self.kill_log_url.as_str(),
            profile_base_url = self.profile_base_url.as_str(),
            watchlist_path = self.watchlist_path.as_str(),
            poll_interval_secs = self.poll_interval_secs,
            command_poll_secs = self.command_poll_secs,
            discord_token = "***",
            "Configuration loaded"
        );
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}
