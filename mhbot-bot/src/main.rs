use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use twilight_gateway::{EventTypeFlags, Intents, Shard, ShardId, StreamExt as _};
use twilight_http::Client;
use twilight_model::{
    gateway::event::Event,
    id::{Id, marker::ApplicationMarker},
};

use rustls::crypto::ring::default_provider;

use mhbot_commands::{handle_interaction, handle_message, slash_commands};
use mhbot_core::{Config, Context};
use mhbot_lookup::{MhctLookup, Nicknames};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load the .env file before anything reads the environment
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    let config = Config::from_env()?;

    let nicknames = match config.nicknames_path.as_deref() {
        Some(path) => Nicknames::load(path).await?,
        None => Nicknames::default(),
    };
    let lookup = MhctLookup::initialize(&config.mhct_base_url, &nicknames).await?;
    info!(base_url = %config.mhct_base_url, "MHCT lookup ready.");

    // Create a single shared HTTP Client
    let http = Arc::new(Client::new(config.discord_token.clone()));
    let token = config.discord_token.clone();
    let ctx = Context::new(Arc::clone(&http), Arc::new(lookup), config);

    let intents = Intents::GUILDS
        | Intents::GUILD_MESSAGES
        | Intents::DIRECT_MESSAGES
        | Intents::MESSAGE_CONTENT;

    let mut shard = Shard::new(ShardId::ONE, token, intents);

    info!("mhbot is connecting...");

    while let Some(item) = shard.next_event(EventTypeFlags::all()).await {
        let event = match item {
            Ok(event) => event,
            Err(source) => {
                error!(?source, "gateway event stream error");
                continue;
            }
        };

        match event {
            Event::Ready(ready) => {
                info!(user = %ready.user.name, "mhbot is ready.");
                if let Err(source) = register_commands(&http, ready.application.id).await {
                    warn!(?source, "failed to register slash commands");
                }
            }
            Event::MessageCreate(msg) => {
                if let Err(source) = handle_message(ctx.clone(), msg).await {
                    error!(?source, "message handler failed");
                }
            }
            Event::InteractionCreate(interaction) => {
                if let Err(source) = handle_interaction(ctx.clone(), interaction).await {
                    error!(?source, "interaction handler failed");
                }
            }
            _ => {}
        }
    }

    Ok(())
}

async fn register_commands(
    http: &Client,
    application_id: Id<ApplicationMarker>,
) -> anyhow::Result<()> {
    let commands = slash_commands()?;
    http.interaction(application_id)
        .set_global_commands(&commands)
        .await?;
    info!(count = commands.len(), "registered slash commands");
    Ok(())
}
