use std::sync::Arc;

use paginator::SessionRegistry;
use teloxide::prelude::*;
use telegram::{telegram, AccessList, BotError, BotResult, Services};
use torrent::{JackettApi, TorrServerApi, TorrentApi};
use tracing_subscriber::EnvFilter;

mod settings;

use settings::Settings;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run().await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> BotResult<()> {
    let settings = Settings::from_env().map_err(|e| BotError::Message(e.to_string()))?;

    // Initialize the bot from environment variables
    let bot = Bot::from_env();

    let torrent = TorrentApi::new(
        &settings.qbit_host,
        &settings.qbit_username,
        &settings.qbit_password,
    );
    torrent.login().await?;
    tracing::info!("qBittorrent client authenticated");

    let services = Services {
        registry: Arc::new(SessionRegistry::new()),
        torrent,
        jackett: JackettApi::new(
            &settings.jackett_host,
            &settings.jackett_api_key,
            settings.jackett_indexers.clone(),
        )?,
        torrserver: TorrServerApi::new(&settings.torrserver_host)?,
        config: settings.lists.clone(),
    };
    let access = AccessList::new(settings.allowed_users.iter().copied());
    if settings.allowed_users.is_empty() {
        tracing::warn!("ALLOWED_USERS is empty, the bot answers everyone");
    }

    if let Err(e) = telegram::set_bot_commands(&bot).await {
        tracing::warn!("Failed to register bot commands: {}", e);
    }

    tracing::info!("Bot started successfully!");

    Dispatcher::builder(bot, telegram::schema())
        .dependencies(dptree::deps![services, access])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
    Ok(())
}
