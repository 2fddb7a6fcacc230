//! Shared test utilities for `LoungeBuddy`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{customer, menu_admin},
    entities,
    errors::Result,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde_json::Value;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test category named `name` with no promo text.
pub async fn create_test_category(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::category::Model> {
    menu_admin::create_category(db, name, None).await
}

/// Inserts an available item row directly, without the validation of
/// [`menu_admin::create_item`], so tests can store prices the admin tools would reject.
///
/// # Defaults
/// * not featured, no offer, no description or image
pub async fn create_test_item(
    db: &DatabaseConnection,
    sub_category_id: i64,
    name: &str,
    prices: Value,
) -> Result<entities::item::Model> {
    let item = entities::item::ActiveModel {
        sub_category_id: Set(sub_category_id),
        name: Set(name.to_string()),
        description: Set(None),
        image_url: Set(None),
        prices: Set(prices),
        featured: Set(false),
        is_special: Set(false),
        special_text: Set(None),
        discount_percent: Set(None),
        special_start: Set(None),
        special_end: Set(None),
        special_days: Set(Value::Array(Vec::new())),
        is_available: Set(true),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    item.insert(db).await.map_err(Into::into)
}

/// Creates a test customer with a first name and no surname.
pub async fn create_test_customer(
    db: &DatabaseConnection,
    phone: &str,
    first_name: &str,
) -> Result<entities::customer::Model> {
    customer::create_customer(db, phone, Some(first_name.to_string()), None).await
}

/// Sets up a complete test environment with a "Drinks" category holding a
/// "Signature Cocktails" sub-category.
/// Returns (db, sub-category) for item-related tests.
pub async fn setup_with_sub_category() -> Result<(DatabaseConnection, entities::sub_category::Model)>
{
    let db = setup_test_db().await?;
    let category = create_test_category(&db, "Drinks").await?;
    let sub_category =
        menu_admin::create_sub_category(&db, category.id, "Signature Cocktails").await?;
    Ok((db, sub_category))
}
