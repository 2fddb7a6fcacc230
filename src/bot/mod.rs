//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for the LoungeBuddy application,
//! including all slash commands, autocomplete handlers, and bot context management.

/// Discord command implementations (menu, order, staff tools, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::{
    cache::{CatalogCache, refresh_catalog},
    config::{business::AppConfig, staff::StaffDirectory},
    core::{
        access::{Role, require_role},
        debounce::Debouncer,
        order::{MessageStyle, OrderSession},
        render::{DISCORD_MESSAGE_LIMIT, split_message},
    },
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::sync::Mutex;
use tracing::{error, info, instrument};

/// Quiet period before a catalog refresh triggered by staff edits runs.
pub const REFRESH_DEBOUNCE: Duration = Duration::from_millis(500);

/// How long menu commands wait for the first catalog load.
pub const READY_TIMEOUT: Duration = Duration::from_secs(3);

/// Shared data available to all bot commands.
/// This structure holds the database connection, the menu snapshot, every guest's
/// basket and the static configuration.
pub struct BotData {
    /// Database connection for all database operations
    pub database: Arc<DatabaseConnection>,
    /// Current public menu
    pub catalog: Arc<CatalogCache>,
    /// Order baskets keyed by Discord user ID
    pub sessions: Mutex<HashMap<u64, OrderSession>>,
    /// Business configuration from config.toml
    pub config: Arc<AppConfig>,
    /// Staff roles from the environment
    pub staff: StaffDirectory,
    refresh: Debouncer,
}

impl BotData {
    /// Creates a new `BotData` instance. Catalog refreshes requested through
    /// [`BotData::schedule_refresh`] reload `catalog` from `database`.
    #[must_use]
    pub fn new(
        database: DatabaseConnection,
        catalog: Arc<CatalogCache>,
        config: Arc<AppConfig>,
        staff: StaffDirectory,
    ) -> Self {
        let database = Arc::new(database);
        let refresh = {
            let db = Arc::clone(&database);
            let cache = Arc::clone(&catalog);
            let placeholder = config.business.placeholder_image.clone();
            Debouncer::new(REFRESH_DEBOUNCE, move || {
                let db = Arc::clone(&db);
                let cache = Arc::clone(&cache);
                let placeholder = placeholder.clone();
                async move {
                    // Failures are logged by refresh_catalog; the old snapshot stays
                    let _ = refresh_catalog(&db, &cache, &placeholder).await;
                }
            })
        };

        Self {
            database,
            catalog,
            sessions: Mutex::new(HashMap::new()),
            config,
            staff,
            refresh,
        }
    }

    /// Staff role of a Discord user, `None` for guests.
    #[must_use]
    pub fn role_of(&self, user_id: serenity::UserId) -> Option<Role> {
        self.staff.role_of(user_id.get())
    }

    /// Reloads the public menu once the current burst of edits has settled.
    pub fn schedule_refresh(&self) {
        self.refresh.call();
    }

    /// Business name and currency used in order messages.
    #[must_use]
    pub fn message_style(&self) -> MessageStyle {
        MessageStyle {
            business_name: self.config.business.name.clone(),
            currency: self.config.business.currency.clone(),
        }
    }

    #[must_use]
    pub fn currency(&self) -> &str {
        &self.config.business.currency
    }
}

/// Checks the caller's staff role, telling them when it is insufficient.
/// Returns the role when the command may proceed.
pub async fn require_staff(
    ctx: poise::Context<'_, BotData, Error>,
    required: Role,
    action: &str,
) -> Result<Option<Role>> {
    let role = ctx.data().role_of(ctx.author().id);
    match require_role(role, required, action) {
        Ok(role) => Ok(Some(role)),
        Err(e) => {
            ctx.send(
                poise::CreateReply::default()
                    .content(format!("❌ {e}"))
                    .ephemeral(true),
            )
            .await?;
            Ok(None)
        }
    }
}

/// Sends `text`, split into as many messages as Discord's length limit needs.
pub async fn say_long(
    ctx: poise::Context<'_, BotData, Error>,
    text: &str,
    ephemeral: bool,
) -> Result<()> {
    for chunk in split_message(text, DISCORD_MESSAGE_LIMIT) {
        ctx.send(
            poise::CreateReply::default()
                .content(chunk)
                .ephemeral(ephemeral),
        )
        .await?;
    }
    Ok(())
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {:?}", error);
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = ctx.say(format!("❌ An error occurred: {error}")).await {
                error!("Failed to send error message: {}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// All slash commands exposed by the bot.
#[must_use]
pub fn all_commands() -> Vec<poise::Command<BotData, Error>> {
    vec![
        commands::ping(),
        commands::help(),
        commands::delivery(),
        commands::menu(),
        commands::specials(),
        commands::featured(),
        commands::order(),
        commands::item(),
        commands::category(),
        commands::subcategory(),
        commands::customer(),
        commands::sms(),
    ]
}

/// Connects to Discord and serves commands until the client stops.
///
/// # Errors
/// Returns an error if the client cannot be built or the connection fails.
#[instrument(skip(token, data))]
pub async fn run_bot(token: String, data: BotData) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: all_commands(),
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::Client::builder(&token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {:?}", e))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {:?}", e))?;
    Ok(())
}

pub use commands::*;
pub use handlers::*;

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{config::business::parse_config, test_utils::*};
    use serde_json::json;

    fn test_config() -> Arc<AppConfig> {
        let config = parse_config(
            "[business]\nname = \"Icon Lounge\"\nwhatsapp_contact = \"233240452792\"\n",
        )
        .unwrap();
        Arc::new(config)
    }

    fn assert_descriptions_fit(command: &poise::Command<BotData, Error>) {
        let description = command.description.as_deref().unwrap_or_default();
        assert!(
            !description.is_empty() && description.chars().count() <= 100,
            "/{} description has {} characters",
            command.qualified_name,
            description.chars().count()
        );
        for parameter in &command.parameters {
            let text = parameter.description.as_deref().unwrap_or_default();
            assert!(text.chars().count() <= 100, "{} parameter too long", parameter.name);
        }
        command.subcommands.iter().for_each(assert_descriptions_fit);
    }

    #[test]
    fn test_every_command_description_fits_discord_limit() {
        let commands = all_commands();
        assert_eq!(commands.len(), 12);
        commands.iter().for_each(assert_descriptions_fit);
    }

    #[tokio::test]
    async fn test_scheduled_refresh_reloads_catalog_from_shared_connection() -> Result<()> {
        let (db, sub) = setup_with_sub_category().await?;
        let catalog = Arc::new(CatalogCache::new());
        let data = BotData::new(
            db,
            Arc::clone(&catalog),
            test_config(),
            StaffDirectory::parse("", ""),
        );

        // Writes through the bot's handle are seen by the debounced refresh
        create_test_item(&data.database, sub.id, "Icon Sunset", json!({"medium": 45})).await?;

        let mut ready = catalog.subscribe();
        data.schedule_refresh();
        data.schedule_refresh();

        let generation = tokio::time::timeout(Duration::from_secs(5), ready.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(generation, 1);

        let snapshot = catalog.current().await.unwrap();
        assert_eq!(snapshot.item_count(), 1);
        assert!(snapshot.find_item_by_name("icon sunset").is_some());
        Ok(())
    }
}
