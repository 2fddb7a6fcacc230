//! Autocomplete handlers for Discord slash command parameters.
//!
//! Guest-facing suggestions come from the in-memory catalog snapshot, so they only
//! offer what is currently on the menu. Staff-facing suggestions read the database
//! and include hidden items.

use crate::{
    bot::BotData,
    core::{menu_admin, sms::SETTING_KEYS, variant::Variant},
    errors::Error,
};

/// Discord autocomplete limit
const MAX_SUGGESTIONS: usize = 25;

fn matching<I>(names: I, partial: &str) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let partial_lower = partial.to_lowercase();
    let mut matching: Vec<String> = names
        .into_iter()
        .filter(|name| name.to_lowercase().contains(&partial_lower))
        .take(MAX_SUGGESTIONS)
        .collect();
    matching.sort();
    matching.dedup();
    matching
}

/// Suggests `all`, `specials` and the category names of the current menu.
pub async fn autocomplete_menu_filter(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let mut names = vec!["all".to_string(), "specials".to_string()];
    if let Some(catalog) = ctx.data().catalog.current().await {
        names.extend(catalog.categories().iter().map(|c| c.name.clone()));
    }
    matching(names, partial)
}

/// Suggests names of items currently on the menu.
pub async fn autocomplete_menu_item(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let Some(catalog) = ctx.data().catalog.current().await else {
        return Vec::new();
    };
    matching(catalog.items().map(|item| item.name.clone()), partial)
}

/// Suggests the fixed variant labels.
pub async fn autocomplete_variant(
    _ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let partial_lower = partial.to_lowercase();
    Variant::ORDERED
        .iter()
        .map(|variant| variant.label())
        .filter(|label| label.to_lowercase().contains(&partial_lower))
        .map(str::to_string)
        .collect()
}

/// Suggests every item name, including hidden items.
pub async fn autocomplete_any_item(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let Ok(items) = menu_admin::list_items(&ctx.data().database).await else {
        return Vec::new();
    };
    matching(items.into_iter().map(|item| item.name), partial)
}

/// Suggests category names.
pub async fn autocomplete_category(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let Ok(categories) = menu_admin::list_categories(&ctx.data().database).await else {
        return Vec::new();
    };
    matching(categories.into_iter().map(|c| c.name), partial)
}

/// Suggests sub-category names.
pub async fn autocomplete_sub_category(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let Ok(sub_categories) = menu_admin::list_sub_categories(&ctx.data().database).await else {
        return Vec::new();
    };
    matching(sub_categories.into_iter().map(|s| s.name), partial)
}

/// Suggests the SMS setting keys.
pub async fn autocomplete_sms_setting(
    _ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    matching(SETTING_KEYS.iter().map(|key| (*key).to_string()), partial)
}
