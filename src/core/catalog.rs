//! Menu catalog - the category → sub-category → item tree and its queries.
//!
//! The catalog is loaded wholesale from the database and never mutated afterwards;
//! a refresh builds a new catalog and swaps it in (see [`crate::cache`]).
//! Filtering is split from painting: [`MenuCatalog::filter`] yields plain view models
//! ([`MenuGroup`]) that [`crate::core::render`] turns into message text.

use crate::{
    core::{
        offer::{Offer, parse_weekday},
        variant::PriceKey,
    },
    entities::{Category, Item, SubCategory, item},
    errors::Result,
};
use chrono::{DateTime, Datelike, TimeZone, Weekday};
use sea_orm::{QueryOrder, prelude::*};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

/// Number of items shown by the featured widget.
pub const FEATURED_LIMIT: usize = 4;

/// Top-level menu section.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuCategory {
    pub id: i64,
    pub name: String,
    /// Banner text, shown on Fridays only when `show_promo` is set
    pub promo_text: Option<String>,
    pub show_promo: bool,
    pub sub_categories: Vec<MenuSubCategory>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuSubCategory {
    pub id: i64,
    pub name: String,
    pub items: Vec<MenuItem>,
}

/// A sellable item. `prices` is never empty for an item inside a catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub prices: BTreeMap<PriceKey, f64>,
    pub featured: bool,
    pub offer: Option<Offer>,
}

impl MenuItem {
    /// Whether this item's offer is active at `now`.
    pub fn is_offer_active<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        self.offer.as_ref().is_some_and(|offer| offer.is_active(now))
    }

    /// Price the menu currently charges for `key`: the discounted price while an
    /// offer with a discount is active, the list price otherwise.
    pub fn effective_price<Tz: TimeZone>(&self, key: &PriceKey, now: &DateTime<Tz>) -> Option<f64> {
        let price = *self.prices.get(key)?;
        let discounted = self
            .offer
            .as_ref()
            .filter(|offer| offer.is_active(now))
            .and_then(|offer| offer.discounted(price));
        Some(discounted.unwrap_or(price))
    }

    fn matches_search(&self, needle: &str) -> bool {
        needle.is_empty() || self.name.to_lowercase().contains(needle)
    }
}

/// Which part of the menu to show.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MenuFilter {
    #[default]
    All,
    /// Only items whose offer is currently active
    Specials,
    /// A single category, matched by name ignoring case
    Category(String),
}

impl MenuFilter {
    /// Parses a filter key: `"all"`, `"specials"`, or a category name.
    #[must_use]
    pub fn parse(key: &str) -> Self {
        let key = key.trim();
        if key.is_empty() || key.eq_ignore_ascii_case("all") {
            Self::All
        } else if key.eq_ignore_ascii_case("specials") {
            Self::Specials
        } else {
            Self::Category(key.to_string())
        }
    }

    fn admits(&self, category: &MenuCategory) -> bool {
        match self {
            Self::All | Self::Specials => true,
            Self::Category(name) => category.name.to_lowercase() == name.to_lowercase(),
        }
    }
}

/// Filter key plus free-text search on item names.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MenuQuery {
    pub filter: MenuFilter,
    pub search: String,
}

impl MenuQuery {
    #[must_use]
    pub fn new(filter_key: &str, search: &str) -> Self {
        Self {
            filter: MenuFilter::parse(filter_key),
            search: search.trim().to_string(),
        }
    }
}

/// Rendered view of one category after filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuGroup {
    pub category: String,
    pub banner: Option<String>,
    pub sections: Vec<MenuSection>,
}

/// Rendered view of one sub-category after filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuSection {
    pub name: String,
    pub items: Vec<ItemView>,
}

/// Everything needed to paint one item card.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemView {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Item image, or the catalog placeholder
    pub image: String,
    /// Offer tag, present only while the offer is active
    pub special_tag: Option<String>,
    pub prices: Vec<PriceView>,
}

/// One variant price line. `discounted` is set only while a discount offer is active.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceView {
    pub key: PriceKey,
    pub price: f64,
    pub discounted: Option<f64>,
}

impl PriceView {
    /// Label of the variant (`"Medium"`, or the raw key for unknown variants).
    #[must_use]
    pub fn label(&self) -> &str {
        self.key.label()
    }
}

/// Immutable snapshot of the public menu.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuCatalog {
    categories: Vec<MenuCategory>,
    placeholder_image: String,
}

impl MenuCatalog {
    /// Builds a catalog, dropping items without any price and sub-categories and
    /// categories left empty by that.
    #[must_use]
    pub fn new(categories: Vec<MenuCategory>, placeholder_image: impl Into<String>) -> Self {
        let categories = categories
            .into_iter()
            .map(|mut category| {
                for sub in &mut category.sub_categories {
                    sub.items.retain(|item| {
                        let sellable = !item.prices.is_empty();
                        if !sellable {
                            debug!("Dropping item {} ({}): no prices", item.id, item.name);
                        }
                        sellable
                    });
                }
                category
            })
            .collect();

        Self {
            categories,
            placeholder_image: placeholder_image.into(),
        }
    }

    #[must_use]
    pub fn categories(&self) -> &[MenuCategory] {
        &self.categories
    }

    #[must_use]
    pub fn placeholder_image(&self) -> &str {
        &self.placeholder_image
    }

    /// Iterates over every item in tree order.
    pub fn items(&self) -> impl Iterator<Item = &MenuItem> {
        self.categories
            .iter()
            .flat_map(|category| &category.sub_categories)
            .flat_map(|sub| &sub.items)
    }

    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items().count()
    }

    #[must_use]
    pub fn find_item(&self, item_id: i64) -> Option<&MenuItem> {
        self.items().find(|item| item.id == item_id)
    }

    /// Finds an item by name, ignoring case.
    #[must_use]
    pub fn find_item_by_name(&self, name: &str) -> Option<&MenuItem> {
        let name = name.trim().to_lowercase();
        self.items().find(|item| item.name.to_lowercase() == name)
    }

    /// The first `limit` featured items in tree order.
    pub fn featured(&self, limit: usize) -> impl Iterator<Item = &MenuItem> {
        self.items().filter(|item| item.featured).take(limit)
    }

    /// Lazily yields the groups visible for `query` at `now`.
    ///
    /// Offer activity and the Friday banner are evaluated against `now` on every call.
    pub fn filter<'a, Tz: TimeZone + 'a>(
        &'a self,
        query: &'a MenuQuery,
        now: DateTime<Tz>,
    ) -> impl Iterator<Item = MenuGroup> + 'a {
        let needle = query.search.to_lowercase();
        self.categories
            .iter()
            .filter(move |category| query.filter.admits(category))
            .filter_map(move |category| self.build_group(category, &query.filter, &needle, &now))
    }

    fn build_group<Tz: TimeZone>(
        &self,
        category: &MenuCategory,
        filter: &MenuFilter,
        needle: &str,
        now: &DateTime<Tz>,
    ) -> Option<MenuGroup> {
        let sections: Vec<MenuSection> = category
            .sub_categories
            .iter()
            .filter_map(|sub| {
                let items: Vec<ItemView> = sub
                    .items
                    .iter()
                    .filter(|item| item.matches_search(needle))
                    .filter(|item| *filter != MenuFilter::Specials || item.is_offer_active(now))
                    .map(|item| self.item_view(item, now))
                    .collect();
                (!items.is_empty()).then(|| MenuSection {
                    name: sub.name.clone(),
                    items,
                })
            })
            .collect();

        if sections.is_empty() {
            return None;
        }

        let banner = category
            .promo_text
            .as_ref()
            .filter(|text| !text.trim().is_empty())
            .filter(|_| category.show_promo && now.weekday() == Weekday::Fri)
            .cloned();

        Some(MenuGroup {
            category: category.name.clone(),
            banner,
            sections,
        })
    }

    /// Builds the view model of a single item at `now`.
    pub fn item_view<Tz: TimeZone>(&self, item: &MenuItem, now: &DateTime<Tz>) -> ItemView {
        let active_offer = item.offer.as_ref().filter(|offer| offer.is_active(now));

        let prices = item
            .prices
            .iter()
            .map(|(key, &price)| PriceView {
                key: key.clone(),
                price,
                discounted: active_offer.and_then(|offer| offer.discounted(price)),
            })
            .collect();

        ItemView {
            id: item.id,
            name: item.name.clone(),
            description: item.description.clone(),
            image: item
                .image
                .clone()
                .filter(|image| !image.trim().is_empty())
                .unwrap_or_else(|| self.placeholder_image.clone()),
            special_tag: active_offer.map(|offer| offer.tag().to_string()),
            prices,
        }
    }
}

/// Reads the price mapping of an item row. Entries that are not positive finite
/// numbers mean "not sold" and are skipped.
///
/// Keys naming the same variant (`"Medium"` and `"medium"`) collapse into one. The
/// storage key (`"medium"`) wins over its aliases, otherwise the first entry is kept.
#[must_use]
pub fn parse_prices(raw: &Value) -> BTreeMap<PriceKey, f64> {
    let Some(map) = raw.as_object() else {
        return BTreeMap::new();
    };

    let mut prices = BTreeMap::new();
    for (key, value) in map {
        let Some(price) = value
            .as_f64()
            .or_else(|| value.as_str().and_then(|s| s.trim().parse::<f64>().ok()))
            .filter(|price| price.is_finite() && *price > 0.0)
        else {
            continue;
        };

        let parsed = PriceKey::parse(key);
        let canonical = key.as_str() == parsed.key();
        match prices.get(&parsed) {
            Some(&kept) if canonical => {
                warn!("Price key {:?} overrides an alias of {} ({})", key, parsed, kept);
                prices.insert(parsed, price);
            }
            Some(&kept) => {
                warn!("Ignoring price key {:?}, {} is already priced at {}", key, parsed, kept);
            }
            None => {
                prices.insert(parsed, price);
            }
        }
    }
    prices
}

/// Reads the recurring weekdays of an item row, skipping unknown names.
#[must_use]
pub fn parse_weekdays(raw: &Value) -> Vec<Weekday> {
    let Some(days) = raw.as_array() else {
        return Vec::new();
    };

    let mut weekdays = Vec::new();
    for day in days.iter().filter_map(Value::as_str) {
        match parse_weekday(day) {
            Some(weekday) if !weekdays.contains(&weekday) => weekdays.push(weekday),
            Some(_) => {}
            None => warn!("Ignoring unknown special day {:?}", day),
        }
    }
    weekdays
}

impl From<item::Model> for MenuItem {
    fn from(model: item::Model) -> Self {
        let has_offer = model.is_special
            || model.discount_percent.is_some()
            || model.special_text.is_some();

        let offer = has_offer.then(|| Offer {
            is_special: model.is_special,
            text: model.special_text.clone(),
            discount_percent: model.discount_percent,
            starts_at: model.special_start,
            ends_at: model.special_end,
            weekdays: parse_weekdays(&model.special_days),
        });

        Self {
            id: model.id,
            prices: parse_prices(&model.prices),
            name: model.name,
            description: model.description.unwrap_or_default(),
            image: model.image_url,
            featured: model.featured,
            offer,
        }
    }
}

/// Loads the public menu: every category and sub-category ordered by id, with only
/// the available items.
///
/// # Errors
/// Returns an error if any of the underlying queries fail.
pub async fn load_catalog(
    db: &DatabaseConnection,
    placeholder_image: &str,
) -> Result<MenuCatalog> {
    let categories = Category::find()
        .order_by_asc(crate::entities::category::Column::Id)
        .all(db)
        .await?;
    let sub_categories = SubCategory::find()
        .order_by_asc(crate::entities::sub_category::Column::Id)
        .all(db)
        .await?;
    let items = Item::find()
        .filter(item::Column::IsAvailable.eq(true))
        .order_by_asc(item::Column::Id)
        .all(db)
        .await?;

    let mut items_by_sub: HashMap<i64, Vec<MenuItem>> = HashMap::new();
    for model in items {
        items_by_sub
            .entry(model.sub_category_id)
            .or_default()
            .push(model.into());
    }

    let mut subs_by_category: HashMap<i64, Vec<MenuSubCategory>> = HashMap::new();
    for sub in sub_categories {
        subs_by_category
            .entry(sub.category_id)
            .or_default()
            .push(MenuSubCategory {
                id: sub.id,
                items: items_by_sub.remove(&sub.id).unwrap_or_default(),
                name: sub.name,
            });
    }

    let tree = categories
        .into_iter()
        .map(|category| MenuCategory {
            id: category.id,
            sub_categories: subs_by_category.remove(&category.id).unwrap_or_default(),
            name: category.name,
            promo_text: category.special_offer,
            show_promo: category.show_offer,
        })
        .collect();

    Ok(MenuCatalog::new(tree, placeholder_image))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::variant::Variant;
    use crate::test_utils::*;
    use chrono::{Duration, Utc};
    use serde_json::json;

    // 2024-03-15 was a Friday
    fn friday() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 18, 0, 0).unwrap()
    }

    fn saturday() -> DateTime<Utc> {
        friday() + Duration::days(1)
    }

    fn item(id: i64, name: &str, prices: &[(&str, f64)]) -> MenuItem {
        MenuItem {
            id,
            name: name.to_string(),
            description: String::new(),
            image: None,
            prices: prices
                .iter()
                .map(|(key, price)| (PriceKey::parse(key), *price))
                .collect(),
            featured: false,
            offer: None,
        }
    }

    fn special(mut item: MenuItem, discount: Option<f64>) -> MenuItem {
        item.offer = Some(Offer {
            is_special: true,
            discount_percent: discount,
            ..Offer::default()
        });
        item
    }

    fn sample_catalog() -> MenuCatalog {
        let tilapia = special(
            item(1, "Grilled Tilapia", &[("small", 60.0), ("medium", 85.0), ("large", 120.0)]),
            Some(10.0),
        );
        let wings = item(2, "Spicy Wings", &[("standard", 40.0)]);
        let ghost = item(3, "Ghost Platter", &[]);
        let sunset = MenuItem {
            featured: true,
            ..item(101, "Icon Sunset", &[("medium", 45.0)])
        };

        MenuCatalog::new(
            vec![
                MenuCategory {
                    id: 1,
                    name: "Food".to_string(),
                    promo_text: Some("10% off all platters on Fridays".to_string()),
                    show_promo: true,
                    sub_categories: vec![
                        MenuSubCategory {
                            id: 10,
                            name: "From the Grill".to_string(),
                            items: vec![tilapia, wings],
                        },
                        MenuSubCategory {
                            id: 11,
                            name: "Platters".to_string(),
                            items: vec![ghost],
                        },
                    ],
                },
                MenuCategory {
                    id: 2,
                    name: "Drinks".to_string(),
                    promo_text: None,
                    show_promo: false,
                    sub_categories: vec![MenuSubCategory {
                        id: 20,
                        name: "Signature Cocktails".to_string(),
                        items: vec![sunset],
                    }],
                },
            ],
            "images/placeholder.png",
        )
    }

    fn run(catalog: &MenuCatalog, filter: &str, search: &str, now: DateTime<Utc>) -> Vec<MenuGroup> {
        let query = MenuQuery::new(filter, search);
        catalog.filter(&query, now).collect()
    }

    #[test]
    fn test_all_filter_returns_every_non_empty_group() {
        let catalog = sample_catalog();
        let groups = run(&catalog, "all", "", saturday());

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].category, "Food");
        // "Platters" only held an item without prices and is omitted
        assert_eq!(groups[0].sections.len(), 1);
        assert_eq!(groups[0].sections[0].name, "From the Grill");
        assert_eq!(groups[1].category, "Drinks");
    }

    #[test]
    fn test_items_without_prices_are_never_rendered() {
        let catalog = sample_catalog();
        assert!(catalog.find_item(3).is_none());
        let groups = run(&catalog, "all", "ghost", friday());
        assert!(groups.is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let catalog = sample_catalog();
        let groups = run(&catalog, "all", "TILA", saturday());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].sections[0].items.len(), 1);
        assert_eq!(groups[0].sections[0].items[0].name, "Grilled Tilapia");
    }

    #[test]
    fn test_category_filter_matches_name_ignoring_case() {
        let catalog = sample_catalog();
        let groups = run(&catalog, "DRINKS", "", saturday());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].category, "Drinks");

        assert!(run(&catalog, "Desserts", "", saturday()).is_empty());
    }

    #[test]
    fn test_specials_filter_only_keeps_active_offers() {
        let catalog = sample_catalog();
        let groups = run(&catalog, "specials", "", saturday());
        assert_eq!(groups.len(), 1);
        let items = &groups[0].sections[0].items;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, 1);
    }

    #[test]
    fn test_specials_with_unmatched_search_is_empty() {
        let catalog = sample_catalog();
        assert!(run(&catalog, "specials", "zz", friday()).is_empty());
        assert!(run(&catalog, "specials", "zz", saturday()).is_empty());
    }

    #[test]
    fn test_banner_only_on_fridays_when_enabled() {
        let catalog = sample_catalog();

        let friday_groups = run(&catalog, "food", "", friday());
        assert_eq!(
            friday_groups[0].banner.as_deref(),
            Some("10% off all platters on Fridays")
        );

        let saturday_groups = run(&catalog, "food", "", saturday());
        assert!(saturday_groups[0].banner.is_none());

        let mut hidden = sample_catalog();
        hidden.categories[0].show_promo = false;
        assert!(run(&hidden, "food", "", friday())[0].banner.is_none());
    }

    #[test]
    fn test_prices_render_in_fixed_order_with_discount() {
        let catalog = sample_catalog();
        let groups = run(&catalog, "all", "tilapia", saturday());
        let view = &groups[0].sections[0].items[0];

        let labels: Vec<&str> = view.prices.iter().map(PriceView::label).collect();
        assert_eq!(labels, vec!["Small", "Medium", "Large"]);
        assert_eq!(view.prices[0].price, 60.0);
        assert_eq!(view.prices[0].discounted, Some(54.0));
        assert_eq!(view.prices[1].discounted, Some(76.5));
        assert_eq!(view.prices[2].discounted, Some(108.0));
        assert_eq!(view.special_tag.as_deref(), Some("Special Offer"));
        assert_eq!(view.image, "images/placeholder.png");
    }

    #[test]
    fn test_inactive_special_never_shows_discount() {
        let mut wings = item(2, "Spicy Wings", &[("standard", 40.0)]);
        wings.offer = Some(Offer {
            is_special: false,
            discount_percent: Some(50.0),
            ..Offer::default()
        });
        let catalog = MenuCatalog::new(
            vec![MenuCategory {
                id: 1,
                name: "Food".to_string(),
                promo_text: None,
                show_promo: false,
                sub_categories: vec![MenuSubCategory {
                    id: 1,
                    name: "Grill".to_string(),
                    items: vec![wings],
                }],
            }],
            "p.png",
        );

        let view = &run(&catalog, "all", "", friday())[0].sections[0].items[0];
        assert!(view.special_tag.is_none());
        assert!(view.prices.iter().all(|price| price.discounted.is_none()));
        assert!(run(&catalog, "specials", "", friday()).is_empty());
    }

    #[test]
    fn test_unknown_variants_follow_fixed_ones() {
        let odd = item(5, "Jollof", &[("family", 150.0), ("large", 60.0), ("half", 20.0)]);
        let catalog = MenuCatalog::new(
            vec![MenuCategory {
                id: 1,
                name: "Food".to_string(),
                promo_text: None,
                show_promo: false,
                sub_categories: vec![MenuSubCategory {
                    id: 1,
                    name: "Local".to_string(),
                    items: vec![odd],
                }],
            }],
            "p.png",
        );
        let view = &run(&catalog, "all", "", friday())[0].sections[0].items[0];
        let labels: Vec<&str> = view.prices.iter().map(PriceView::label).collect();
        assert_eq!(labels, vec!["Large", "family", "half"]);
    }

    #[test]
    fn test_featured_and_lookups() {
        let catalog = sample_catalog();
        let featured: Vec<i64> = catalog.featured(FEATURED_LIMIT).map(|item| item.id).collect();
        assert_eq!(featured, vec![101]);
        assert_eq!(catalog.find_item_by_name("icon sunset").unwrap().id, 101);
        assert_eq!(catalog.item_count(), 3);
    }

    #[test]
    fn test_effective_price_uses_active_discount() {
        let catalog = sample_catalog();
        let tilapia = catalog.find_item(1).unwrap();
        let medium = PriceKey::Known(Variant::Medium);
        assert_eq!(tilapia.effective_price(&medium, &friday()), Some(76.5));
        assert_eq!(tilapia.effective_price(&PriceKey::Known(Variant::Xl), &friday()), None);

        let wings = catalog.find_item(2).unwrap();
        assert_eq!(
            wings.effective_price(&PriceKey::Known(Variant::Standard), &friday()),
            Some(40.0)
        );
    }

    #[test]
    fn test_parse_prices_skips_unsold_entries() {
        let prices = parse_prices(&json!({"small": 60, "medium": 0, "large": null, "xl": "95.5", "bad": "n/a"}));
        assert_eq!(prices.len(), 2);
        assert_eq!(prices[&PriceKey::Known(Variant::Small)], 60.0);
        assert_eq!(prices[&PriceKey::Known(Variant::Xl)], 95.5);

        assert!(parse_prices(&Value::Null).is_empty());
    }

    #[test]
    fn test_parse_prices_keeps_one_price_per_variant() {
        let prices = parse_prices(&json!({"Medium": 55, "medium": 50, " MEDIUM ": 0, "large": 70}));
        assert_eq!(prices.len(), 2);
        assert_eq!(prices[&PriceKey::Known(Variant::Medium)], 50.0);
        assert_eq!(prices[&PriceKey::Known(Variant::Large)], 70.0);
    }

    #[test]
    fn test_parse_weekdays_tolerates_garbage() {
        let days = parse_weekdays(&json!(["Friday", "friday", "Someday", 3]));
        assert_eq!(days, vec![Weekday::Fri]);
        assert!(parse_weekdays(&Value::Null).is_empty());
    }

    #[tokio::test]
    async fn test_load_catalog_integration() -> Result<()> {
        let (db, sub) = setup_with_sub_category().await?;
        let drinks = create_test_item(&db, sub.id, "Icon Sunset", json!({"medium": 45})).await?;
        let hidden = create_test_item(&db, sub.id, "Old Punch", json!({"medium": 30})).await?;
        crate::core::menu_admin::set_item_availability(&db, hidden.id, false).await?;
        create_test_item(&db, sub.id, "Free Water", json!({})).await?;

        let catalog = load_catalog(&db, "p.png").await?;
        assert_eq!(catalog.categories().len(), 1);
        assert_eq!(catalog.item_count(), 1);
        assert_eq!(catalog.find_item(drinks.id).unwrap().name, "Icon Sunset");
        assert!(catalog.find_item(hidden.id).is_none());

        Ok(())
    }
}
