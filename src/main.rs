#![allow(clippy::result_large_err)]

use dotenvy::dotenv;
use lounge_buddy::{
    bot::{BotData, run_bot},
    cache::{CatalogCache, refresh_catalog},
    config::{
        business::load_default_config,
        database::{create_connection, create_tables},
        staff::StaffDirectory,
    },
    core::{menu_admin::seed_menu, sms::seed_sms_settings},
    errors::{Error, Result},
};
use std::{env, sync::Arc};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the business configuration
    let app_config = load_default_config()
        .inspect_err(|e| error!("Critical error loading configuration: {}", e))?;
    info!("Loaded configuration for {}", app_config.business.name);

    // 4. Initialize database
    let db = create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    create_tables(&db)
        .await
        .inspect(|()| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Seed the menu structure and SMS settings on first run
    let seeded = seed_menu(&db, &app_config.categories)
        .await
        .inspect_err(|e| error!("Failed to seed menu: {}", e))?;
    if seeded > 0 {
        info!("Seeded {} categories from config.toml", seeded);
    }
    seed_sms_settings(&db, &app_config.sms)
        .await
        .inspect_err(|e| error!("Failed to seed SMS settings: {}", e))?;

    // 6. First catalog load. A failure leaves the menu loading until staff edit it.
    let catalog = Arc::new(CatalogCache::new());
    if refresh_catalog(&db, &catalog, &app_config.business.placeholder_image)
        .await
        .is_err()
    {
        warn!("Starting without a menu snapshot");
    }

    let staff = StaffDirectory::from_env();
    if staff.is_empty() {
        warn!("No staff configured, set SUPERADMIN_USER_IDS / ADMIN_USER_IDS");
    } else {
        info!("{} staff member(s) configured", staff.len());
    }

    // 7. Run the bot
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {}", e))
        .map_err(Error::EnvVar)?;

    let data = BotData::new(db, catalog, Arc::new(app_config), staff);
    run_bot(token, data).await
}
