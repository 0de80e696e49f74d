// This is the entry point of the Discord bot.
//
// **Architecture Overview:**
// - `core/` = Business logic (platform-agnostic)
// - `infra/` = Implementations of core traits (databases, APIs)
// - `discord/` = Discord-specific adapters (commands, checks)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Set up the Discord framework
// 4. Register commands

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "discord/discord_layer.rs"]
mod discord;
#[path = "infra/infra_layer.rs"]
mod infra;

mod config;

use crate::config::BotConfig;
use crate::core::access::{AccessService, AuthorizationGuard};
use crate::core::codefix::CodeFixService;
use crate::core::text::TextCatalog;
use crate::discord::{Data, Error};
use crate::infra::access::SqliteAccessStore;
use crate::infra::ai::AnthropicClient;
use anyhow::Context as _;
use poise::serenity_prelude as serenity;
use std::sync::Arc;

/// Log command failures; everything else goes to poise's default handler.
async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        // The access guard has already answered the user
        poise::FrameworkError::CommandCheckFailed { error: None, .. } => {}
        poise::FrameworkError::Command { error, ctx, .. } => {
            tracing::error!(
                command = %ctx.command().name,
                user_id = ctx.author().id.get(),
                "Command failed: {:?}",
                error
            );
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                tracing::error!("Error while handling error: {}", e);
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt::init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    let config = BotConfig::from_env().context("Invalid bot configuration")?;

    // Keep runtime databases in a dedicated folder so the repo root stays tidy.
    std::fs::create_dir_all(&config.data_dir)
        .context("Failed to create data directory for SQLite files")?;
    let access_db_path = config.data_dir.join("access.db");

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // Create our services with their dependencies.
    // This is the "composition root" where we wire everything together.

    let texts = match &config.texts_path {
        Some(path) => TextCatalog::with_overrides(path)
            .with_context(|| format!("Failed to load text catalog from {}", path.display()))?,
        None => TextCatalog::bundled().context("Bundled text catalog is invalid")?,
    };
    let texts = Arc::new(texts);

    let access_pool = sqlx::sqlite::SqlitePoolOptions::new()
        .connect(&format!("sqlite://{}?mode=rwc", access_db_path.display()))
        .await
        .context("Failed to connect to access DB")?;
    let access_store = SqliteAccessStore::new(access_pool);
    access_store
        .migrate()
        .await
        .context("Failed to migrate access DB")?;
    let access_service = Arc::new(AccessService::new(access_store));

    if config.fixpy.is_none() {
        tracing::warn!("FIXPY_MODEL is not configured; /fixpy will report no available model");
    }
    let ai_client = AnthropicClient::new(config.anthropic_api_key.clone().unwrap_or_default());
    let codefix_service = Arc::new(CodeFixService::new(
        ai_client,
        config.fixpy_system_prompt.clone(),
        config.fixpy.clone(),
    ));

    // Create the data structure that will be shared across all commands
    let data = Data {
        access: Arc::clone(&access_service),
        guard: Arc::new(AuthorizationGuard::admin_commands()),
        codefix: Arc::clone(&codefix_service),
        texts: Arc::clone(&texts),
        admin_user_ids: Arc::new(config.admin_user_ids.clone()),
    };

    // ========================================================================
    // DISCORD FRAMEWORK SETUP
    // ========================================================================

    let mut commands = vec![
        discord::commands::access::grant(),
        discord::commands::access::check_access(),
        discord::commands::access::revoke(),
        discord::commands::fixpy::fixpy(),
    ];
    // Descriptions shown in the Discord client come from the text catalog
    for command in &mut commands {
        let key = format!("commands.{}.description", command.name);
        command.description = Some(texts.get(&key));
    }

    let dev_guild_id = config.dev_guild_id;
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands,
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                tracing::info!("Bot is starting up...");

                // Guild registration is instant; global registration can take a while to propagate
                match dev_guild_id {
                    Some(guild_id) => {
                        poise::builtins::register_in_guild(
                            ctx,
                            &framework.options().commands,
                            serenity::GuildId::new(guild_id),
                        )
                        .await?;
                    }
                    None => {
                        poise::builtins::register_globally(ctx, &framework.options().commands)
                            .await?;
                    }
                }

                tracing::info!("Commands registered, bot is ready");
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    let mut client = serenity::ClientBuilder::new(&config.discord_token, intents)
        .framework(framework)
        .await
        .context("Error creating client")?;

    client.start().await.context("Error running bot")?;
    Ok(())
}
