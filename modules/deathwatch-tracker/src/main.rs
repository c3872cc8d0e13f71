use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use deathwatch_common::Config;
use deathwatch_tracker::commands::CommandListener;
use deathwatch_tracker::fetcher::HttpKillPageFetcher;
use deathwatch_tracker::formatter::MessageFormatter;
use deathwatch_tracker::tracker::Tracker;
use deathwatch_tracker::traits::ChannelSink;
use deathwatch_tracker::watchlist::WatchListStore;
use discord_client::DiscordClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("deathwatch_tracker=info".parse()?),
        )
        .init();

    info!("Deathwatch starting...");

    let config = Config::from_env();
    config.log_redacted();

    let discord = Arc::new(DiscordClient::new(&config.discord_token));

    // Without a reachable output channel there is nowhere to post, so this
    // is the one failure that aborts startup instead of degrading.
    let channel = discord
        .get_channel(config.channel_id)
        .await
        .context("Output channel unreachable")?;
    info!(
        channel_id = config.channel_id,
        name = channel.name.as_deref().unwrap_or("?"),
        "Output channel verified"
    );

    let watchlist = Arc::new(WatchListStore::load(&config.watchlist_path));

    let me = discord
        .current_user()
        .await
        .context("Could not identify the bot user")?;
    let listener = CommandListener::new(
        discord.clone(),
        watchlist.clone(),
        config.channel_id,
        Duration::from_secs(config.command_poll_secs),
        me.id,
    );
    tokio::spawn(listener.run());

    let fetcher = Arc::new(HttpKillPageFetcher::new(&config.kill_log_url));
    let sink = Arc::new(ChannelSink::new(discord, config.channel_id));

    let mut tracker = Tracker::new(
        fetcher,
        sink,
        watchlist,
        MessageFormatter::new(&config.profile_base_url),
        Duration::from_secs(config.poll_interval_secs),
    );
    tracker.run().await
}
