//! Menu administration - staff-side edits of categories, sub-categories and items.
//!
//! These functions validate their input before touching the database and return the
//! written rows. They never refresh the public catalog themselves; the bot schedules
//! a debounced refresh after each successful change.

use crate::{
    config::business::CategorySeed,
    core::{offer::parse_weekday, variant::PriceKey},
    entities::{Category, Item, SubCategory, category, item, sub_category},
    errors::{Error, Result},
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc, Weekday};
use sea_orm::{PaginatorTrait, QueryOrder, Set, prelude::*};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// A new item as entered by staff.
#[derive(Debug, Clone, Default)]
pub struct ItemDraft {
    pub sub_category_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub prices: BTreeMap<PriceKey, f64>,
    pub featured: bool,
    pub special: Option<SpecialDraft>,
}

/// Offer settings for an item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpecialDraft {
    pub text: Option<String>,
    pub discount_percent: Option<f64>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub weekdays: Vec<Weekday>,
}

fn require_name(name: &str, what: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation {
            message: format!("{what} name cannot be empty"),
        });
    }
    Ok(name.to_string())
}

fn clean_text(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

fn validate_prices(prices: &BTreeMap<PriceKey, f64>) -> Result<()> {
    if prices.is_empty() {
        return Err(Error::Validation {
            message: "An item needs at least one price".to_string(),
        });
    }
    if let Some(&price) = prices.values().find(|p| !p.is_finite() || **p <= 0.0) {
        return Err(Error::InvalidPrice { price });
    }
    Ok(())
}

fn validate_special(special: &SpecialDraft) -> Result<()> {
    if let Some(percent) = special.discount_percent {
        if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
            return Err(Error::InvalidDiscount { percent });
        }
    }
    if let (Some(start), Some(end)) = (special.starts_at, special.ends_at) {
        if start > end {
            return Err(Error::Validation {
                message: "Offer start must not be after its end".to_string(),
            });
        }
    }
    Ok(())
}

fn prices_json(prices: &BTreeMap<PriceKey, f64>) -> Value {
    let map: Map<String, Value> = prices
        .iter()
        .map(|(key, &price)| (key.key().to_string(), Value::from(price)))
        .collect();
    Value::Object(map)
}

const fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

fn weekdays_json(days: &[Weekday]) -> Value {
    Value::Array(
        days.iter()
            .map(|day| Value::from(weekday_name(*day)))
            .collect(),
    )
}

/// Parses a comma-separated weekday list (`"Fri, Sat"`).
///
/// # Errors
/// Returns `Error::Validation` naming the first entry that is not a weekday.
pub fn parse_weekday_list(list: &str) -> Result<Vec<Weekday>> {
    let mut days = Vec::new();
    for entry in list.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let day = parse_weekday(entry).ok_or_else(|| Error::Validation {
            message: format!("'{entry}' is not a weekday"),
        })?;
        if !days.contains(&day) {
            days.push(day);
        }
    }
    Ok(days)
}

/// Parses an offer bound entered as `YYYY-MM-DD` or `YYYY-MM-DD HH:MM` in `tz`.
///
/// A date without a time means the start of that day, or its last second when
/// `end_of_day` is set.
///
/// # Errors
/// Returns `Error::Validation` if the input matches neither format or names a local
/// time that does not exist.
pub fn parse_offer_date<Tz: TimeZone>(
    input: &str,
    end_of_day: bool,
    tz: &Tz,
) -> Result<DateTime<Utc>> {
    let input = input.trim();
    let invalid = || Error::Validation {
        message: format!("'{input}' is not a date (use YYYY-MM-DD or YYYY-MM-DD HH:MM)"),
    };

    let naive = match NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M") {
        Ok(datetime) => datetime,
        Err(_) => {
            let date = NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| invalid())?;
            let time = if end_of_day {
                NaiveTime::from_hms_opt(23, 59, 59)
            } else {
                Some(NaiveTime::MIN)
            }
            .ok_or_else(invalid)?;
            date.and_time(time)
        }
    };

    tz.from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(invalid)
}

async fn find_item_model(db: &DatabaseConnection, item_id: i64) -> Result<item::Model> {
    Item::find_by_id(item_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::ItemNotFound {
            name: item_id.to_string(),
        })
}

// --- Categories ---

/// Every category ordered by id.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn list_categories(db: &DatabaseConnection) -> Result<Vec<category::Model>> {
    Category::find()
        .order_by_asc(category::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a category by name, ignoring case.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn find_category_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<category::Model>> {
    let name = name.trim().to_lowercase();
    Ok(list_categories(db)
        .await?
        .into_iter()
        .find(|c| c.name.to_lowercase() == name))
}

/// Creates a category. The promo banner starts hidden.
///
/// # Errors
/// Returns an error if the name is empty or taken, or the insert fails.
pub async fn create_category(
    db: &DatabaseConnection,
    name: &str,
    promo_text: Option<String>,
) -> Result<category::Model> {
    let name = require_name(name, "Category")?;
    if find_category_by_name(db, &name).await?.is_some() {
        return Err(Error::Validation {
            message: format!("Category '{name}' already exists"),
        });
    }

    let category = category::ActiveModel {
        name: Set(name),
        special_offer: Set(clean_text(promo_text)),
        show_offer: Set(false),
        ..Default::default()
    };
    category.insert(db).await.map_err(Into::into)
}

/// Sets a category's promo text and whether it is shown on Fridays.
///
/// # Errors
/// Returns an error if the category does not exist or the update fails.
pub async fn set_category_promo(
    db: &DatabaseConnection,
    category_id: i64,
    promo_text: Option<String>,
    show: bool,
) -> Result<category::Model> {
    let mut category: category::ActiveModel = Category::find_by_id(category_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::CategoryNotFound {
            name: category_id.to_string(),
        })?
        .into();

    category.special_offer = Set(clean_text(promo_text));
    category.show_offer = Set(show);
    category.update(db).await.map_err(Into::into)
}

/// Creates the configured categories and sub-categories when the menu has none.
/// Returns the number of categories created.
///
/// # Errors
/// Returns an error if a database operation fails.
pub async fn seed_menu(db: &DatabaseConnection, seeds: &[CategorySeed]) -> Result<usize> {
    if Category::find().count(db).await? > 0 {
        return Ok(0);
    }

    for seed in seeds {
        let category = create_category(db, &seed.name, seed.special_offer.clone()).await?;
        if seed.show_offer {
            set_category_promo(db, category.id, seed.special_offer.clone(), true).await?;
        }
        for sub_name in &seed.sub_categories {
            match create_sub_category(db, category.id, sub_name).await {
                Ok(_) => {}
                Err(Error::Validation { message }) => warn!("Skipping seed sub-category: {}", message),
                Err(e) => return Err(e),
            }
        }
    }

    info!("Seeded {} menu categories", seeds.len());
    Ok(seeds.len())
}

// --- Sub-categories ---

/// Every sub-category ordered by id.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn list_sub_categories(db: &DatabaseConnection) -> Result<Vec<sub_category::Model>> {
    SubCategory::find()
        .order_by_asc(sub_category::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a sub-category by name, ignoring case.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn find_sub_category_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<sub_category::Model>> {
    let name = name.trim().to_lowercase();
    Ok(list_sub_categories(db)
        .await?
        .into_iter()
        .find(|s| s.name.to_lowercase() == name))
}

/// Creates a sub-category inside an existing category.
///
/// # Errors
/// Returns an error if the name is empty or already used by another sub-category,
/// the category does not exist or the insert fails.
pub async fn create_sub_category(
    db: &DatabaseConnection,
    category_id: i64,
    name: &str,
) -> Result<sub_category::Model> {
    let name = require_name(name, "Sub-category")?;
    if find_sub_category_by_name(db, &name).await?.is_some() {
        return Err(Error::Validation {
            message: format!("Sub-category '{name}' already exists"),
        });
    }

    if Category::find_by_id(category_id).one(db).await?.is_none() {
        return Err(Error::CategoryNotFound {
            name: category_id.to_string(),
        });
    }

    let sub_category = sub_category::ActiveModel {
        category_id: Set(category_id),
        name: Set(name),
        special_offer: Set(None),
        ..Default::default()
    };
    sub_category.insert(db).await.map_err(Into::into)
}

/// Deletes an empty sub-category.
///
/// # Errors
/// Returns an error if the sub-category does not exist, still holds items, or the
/// delete fails.
pub async fn delete_sub_category(
    db: &DatabaseConnection,
    sub_category_id: i64,
) -> Result<sub_category::Model> {
    let sub_category = SubCategory::find_by_id(sub_category_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::CategoryNotFound {
            name: sub_category_id.to_string(),
        })?;

    let items = Item::find()
        .filter(item::Column::SubCategoryId.eq(sub_category_id))
        .count(db)
        .await?;
    if items > 0 {
        return Err(Error::Validation {
            message: format!(
                "Sub-category '{}' still has {items} item(s)",
                sub_category.name
            ),
        });
    }

    SubCategory::delete_by_id(sub_category_id).exec(db).await?;
    Ok(sub_category)
}

// --- Items ---

/// Creates an available item.
///
/// # Errors
/// Returns an error if:
/// - The name is empty or another item already has it (ignoring case)
/// - There is no price, or a price is not a positive finite number
/// - The offer discount is outside 0-100 or its window is inverted
/// - The sub-category does not exist
/// - The database insert operation fails
pub async fn create_item(db: &DatabaseConnection, draft: ItemDraft) -> Result<item::Model> {
    let name = require_name(&draft.name, "Item")?;
    validate_prices(&draft.prices)?;
    if let Some(special) = &draft.special {
        validate_special(special)?;
    }

    if find_item_by_name(db, &name).await?.is_some() {
        return Err(Error::Validation {
            message: format!("An item named '{name}' already exists"),
        });
    }

    if SubCategory::find_by_id(draft.sub_category_id)
        .one(db)
        .await?
        .is_none()
    {
        return Err(Error::CategoryNotFound {
            name: draft.sub_category_id.to_string(),
        });
    }

    let is_special = draft.special.is_some();
    let special = draft.special.unwrap_or_default();
    let item = item::ActiveModel {
        sub_category_id: Set(draft.sub_category_id),
        name: Set(name),
        description: Set(clean_text(draft.description)),
        image_url: Set(clean_text(draft.image_url)),
        prices: Set(prices_json(&draft.prices)),
        featured: Set(draft.featured),
        is_special: Set(is_special),
        special_text: Set(clean_text(special.text)),
        discount_percent: Set(special.discount_percent),
        special_start: Set(special.starts_at),
        special_end: Set(special.ends_at),
        special_days: Set(weekdays_json(&special.weekdays)),
        is_available: Set(true),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    item.insert(db).await.map_err(Into::into)
}

/// Retrieves an item by id.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_item(db: &DatabaseConnection, item_id: i64) -> Result<Option<item::Model>> {
    Item::find_by_id(item_id).one(db).await.map_err(Into::into)
}

/// Every item, newest first, including unavailable ones.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn list_items(db: &DatabaseConnection) -> Result<Vec<item::Model>> {
    Item::find()
        .order_by_desc(item::Column::CreatedAt)
        .order_by_desc(item::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds an item by name, ignoring case, including unavailable ones.
/// Should older rows share a name, the first one added wins.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn find_item_by_name(db: &DatabaseConnection, name: &str) -> Result<Option<item::Model>> {
    let name = name.trim().to_lowercase();
    Ok(Item::find()
        .order_by_asc(item::Column::Id)
        .all(db)
        .await?
        .into_iter()
        .find(|i| i.name.to_lowercase() == name))
}

/// Replaces an item's whole price mapping.
///
/// # Errors
/// Returns an error if the prices are invalid, the item does not exist or the update
/// fails.
pub async fn update_item_prices(
    db: &DatabaseConnection,
    item_id: i64,
    prices: &BTreeMap<PriceKey, f64>,
) -> Result<item::Model> {
    validate_prices(prices)?;
    let mut item: item::ActiveModel = find_item_model(db, item_id).await?.into();
    item.prices = Set(prices_json(prices));
    item.update(db).await.map_err(Into::into)
}

/// Sets (`Some`) or removes (`None`) the price of one variant.
///
/// # Errors
/// Returns an error if the price is invalid, the change would leave the item without
/// prices, the item does not exist or the update fails.
pub async fn set_item_price(
    db: &DatabaseConnection,
    item_id: i64,
    key: PriceKey,
    price: Option<f64>,
) -> Result<item::Model> {
    let model = find_item_model(db, item_id).await?;
    let mut prices = crate::core::catalog::parse_prices(&model.prices);
    match price {
        Some(price) => prices.insert(key, price),
        None => prices.remove(&key),
    };
    update_item_prices(db, item_id, &prices).await
}

/// Shows or hides an item on the public menu.
///
/// # Errors
/// Returns an error if the item does not exist or the update fails.
pub async fn set_item_availability(
    db: &DatabaseConnection,
    item_id: i64,
    available: bool,
) -> Result<item::Model> {
    let mut item: item::ActiveModel = find_item_model(db, item_id).await?.into();
    item.is_available = Set(available);
    item.update(db).await.map_err(Into::into)
}

/// Adds an item to or removes it from the featured widget.
///
/// # Errors
/// Returns an error if the item does not exist or the update fails.
pub async fn set_item_featured(
    db: &DatabaseConnection,
    item_id: i64,
    featured: bool,
) -> Result<item::Model> {
    let mut item: item::ActiveModel = find_item_model(db, item_id).await?.into();
    item.featured = Set(featured);
    item.update(db).await.map_err(Into::into)
}

/// Replaces an item's offer; `None` clears it.
///
/// # Errors
/// Returns an error if the offer is invalid, the item does not exist or the update
/// fails.
pub async fn set_item_special(
    db: &DatabaseConnection,
    item_id: i64,
    special: Option<SpecialDraft>,
) -> Result<item::Model> {
    if let Some(special) = &special {
        validate_special(special)?;
    }

    let mut item: item::ActiveModel = find_item_model(db, item_id).await?.into();
    item.is_special = Set(special.is_some());

    let special = special.unwrap_or_default();
    item.special_text = Set(clean_text(special.text));
    item.discount_percent = Set(special.discount_percent);
    item.special_start = Set(special.starts_at);
    item.special_end = Set(special.ends_at);
    item.special_days = Set(weekdays_json(&special.weekdays));

    item.update(db).await.map_err(Into::into)
}

/// Permanently deletes an item.
///
/// # Errors
/// Returns an error if the item does not exist or the delete fails.
pub async fn delete_item(db: &DatabaseConnection, item_id: i64) -> Result<item::Model> {
    let item = find_item_model(db, item_id).await?;
    Item::delete_by_id(item_id).exec(db).await?;
    Ok(item)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::{catalog::parse_prices, variant::Variant};
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn prices(entries: &[(Variant, f64)]) -> BTreeMap<PriceKey, f64> {
        entries
            .iter()
            .map(|(variant, price)| (PriceKey::Known(*variant), *price))
            .collect()
    }

    fn draft(sub_category_id: i64, name: &str) -> ItemDraft {
        ItemDraft {
            sub_category_id,
            name: name.to_string(),
            prices: prices(&[(Variant::Medium, 45.0)]),
            ..ItemDraft::default()
        }
    }

    #[tokio::test]
    async fn test_create_item_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = create_item(&db, draft(1, "   ")).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        let mut no_prices = draft(1, "Wings");
        no_prices.prices.clear();
        let result = create_item(&db, no_prices).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        let mut negative = draft(1, "Wings");
        negative.prices = prices(&[(Variant::Small, -5.0)]);
        let result = create_item(&db, negative).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidPrice { price: -5.0 }));

        let mut nan = draft(1, "Wings");
        nan.prices = prices(&[(Variant::Small, f64::NAN)]);
        let result = create_item(&db, nan).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidPrice { .. }));

        let mut discount = draft(1, "Wings");
        discount.special = Some(SpecialDraft {
            discount_percent: Some(120.0),
            ..SpecialDraft::default()
        });
        let result = create_item(&db, discount).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidDiscount { percent: 120.0 }));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_item_integration() -> Result<()> {
        let (db, sub) = setup_with_sub_category().await?;

        let mut new_item = draft(sub.id, "  Icon Sunset ");
        new_item.special = Some(SpecialDraft {
            text: Some("Happy Hour".to_string()),
            discount_percent: Some(20.0),
            weekdays: vec![Weekday::Fri, Weekday::Sat],
            ..SpecialDraft::default()
        });
        let item = create_item(&db, new_item).await?;

        assert_eq!(item.name, "Icon Sunset");
        assert!(item.is_available);
        assert!(item.is_special);
        assert!(item.image_url.is_none());
        assert_eq!(item.special_days, serde_json::json!(["Friday", "Saturday"]));
        assert_eq!(
            parse_prices(&item.prices)[&PriceKey::Known(Variant::Medium)],
            45.0
        );

        let result = create_item(&db, draft(999, "Orphan")).await;
        assert!(matches!(result.unwrap_err(), Error::CategoryNotFound { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_item_updates_integration() -> Result<()> {
        let (db, sub) = setup_with_sub_category().await?;
        let item = create_item(&db, draft(sub.id, "Wings")).await?;

        let updated = set_item_price(&db, item.id, PriceKey::Known(Variant::Large), Some(70.0)).await?;
        assert_eq!(parse_prices(&updated.prices).len(), 2);

        let updated = set_item_price(&db, item.id, PriceKey::Known(Variant::Medium), None).await?;
        assert_eq!(parse_prices(&updated.prices).len(), 1);

        let result = set_item_price(&db, item.id, PriceKey::Known(Variant::Large), None).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        assert!(set_item_featured(&db, item.id, true).await?.featured);
        assert!(!set_item_availability(&db, item.id, false).await?.is_available);

        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let special = set_item_special(
            &db,
            item.id,
            Some(SpecialDraft {
                starts_at: Some(start),
                ..SpecialDraft::default()
            }),
        )
        .await?;
        assert!(special.is_special);
        assert_eq!(special.special_start, Some(start));

        let cleared = set_item_special(&db, item.id, None).await?;
        assert!(!cleared.is_special);
        assert!(cleared.special_start.is_none());

        let inverted = SpecialDraft {
            starts_at: Some(start),
            ends_at: Some(start - chrono::Duration::days(1)),
            ..SpecialDraft::default()
        };
        let result = set_item_special(&db, item.id, Some(inverted)).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_item_and_lookup() -> Result<()> {
        let (db, sub) = setup_with_sub_category().await?;
        let item = create_item(&db, draft(sub.id, "Wings")).await?;

        assert_eq!(find_item_by_name(&db, "WINGS").await?.unwrap().id, item.id);
        assert_eq!(list_items(&db).await?.len(), 1);

        delete_item(&db, item.id).await?;
        assert!(get_item(&db, item.id).await?.is_none());

        let result = delete_item(&db, item.id).await;
        assert!(matches!(result.unwrap_err(), Error::ItemNotFound { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_categories_and_sub_categories() -> Result<()> {
        let db = setup_test_db().await?;

        let food = create_category(&db, "Food", Some("Platters 10% off".to_string())).await?;
        assert!(!food.show_offer);

        let result = create_category(&db, "food", None).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        let shown = set_category_promo(&db, food.id, food.special_offer.clone(), true).await?;
        assert!(shown.show_offer);

        let grill = create_sub_category(&db, food.id, "From the Grill").await?;
        assert_eq!(
            find_sub_category_by_name(&db, "from the grill").await?.unwrap().id,
            grill.id
        );

        let result = create_sub_category(&db, 999, "Nowhere").await;
        assert!(matches!(result.unwrap_err(), Error::CategoryNotFound { .. }));

        create_item(&db, draft(grill.id, "Wings")).await?;
        let result = delete_sub_category(&db, grill.id).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        let empty = create_sub_category(&db, food.id, "Platters").await?;
        delete_sub_category(&db, empty.id).await?;
        assert_eq!(list_sub_categories(&db).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_item_and_sub_category_names_are_unique() -> Result<()> {
        let (db, cocktails) = setup_with_sub_category().await?;
        let food = create_category(&db, "Food", None).await?;
        let grill = create_sub_category(&db, food.id, "From the Grill").await?;

        let burger = create_item(&db, draft(grill.id, "Burger")).await?;

        // Same name in another sub-category, differing only in case
        let result = create_item(&db, draft(cocktails.id, " burger ")).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        // Hidden items still hold their name
        set_item_availability(&db, burger.id, false).await?;
        let result = create_item(&db, draft(grill.id, "BURGER")).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));
        assert_eq!(list_items(&db).await?.len(), 1);

        let result = create_sub_category(&db, food.id, "signature cocktails").await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));
        assert_eq!(list_sub_categories(&db).await?.len(), 2);

        // Staff and guest lookups resolve the name to the same item
        set_item_availability(&db, burger.id, true).await?;
        let catalog = crate::core::catalog::load_catalog(&db, "p.png").await?;
        let guest = catalog.find_item_by_name("Burger").unwrap().id;
        let staff = find_item_by_name(&db, "Burger").await?.unwrap().id;
        assert_eq!(guest, staff);

        Ok(())
    }

    #[tokio::test]
    async fn test_seed_menu_only_once() -> Result<()> {
        let db = setup_test_db().await?;
        let seeds = vec![CategorySeed {
            name: "Food".to_string(),
            special_offer: Some("Platters 10% off".to_string()),
            show_offer: true,
            sub_categories: vec!["From the Grill".to_string(), "Platters".to_string()],
        }];

        assert_eq!(seed_menu(&db, &seeds).await?, 1);
        assert_eq!(seed_menu(&db, &seeds).await?, 0);

        let categories = list_categories(&db).await?;
        assert_eq!(categories.len(), 1);
        assert!(categories[0].show_offer);
        assert_eq!(list_sub_categories(&db).await?.len(), 2);

        Ok(())
    }

    #[test]
    fn test_parse_offer_date() {
        assert_eq!(
            parse_offer_date("2024-03-15", false, &Utc).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap()
        );
        assert_eq!(
            parse_offer_date("2024-03-15", true, &Utc).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 15, 23, 59, 59).unwrap()
        );
        assert_eq!(
            parse_offer_date(" 2024-03-15 18:30 ", true, &Utc).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 15, 18, 30, 0).unwrap()
        );
        assert!(parse_offer_date("15/03/2024", false, &Utc).is_err());
    }

    #[test]
    fn test_parse_weekday_list() {
        assert_eq!(
            parse_weekday_list("Fri, sat,friday").unwrap(),
            vec![Weekday::Fri, Weekday::Sat]
        );
        assert!(parse_weekday_list("").unwrap().is_empty());
        assert!(parse_weekday_list("Fri, Caturday").is_err());
    }
}
