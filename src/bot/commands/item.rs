//! Menu item management commands - `/item add|price|availability|featured|special|clear_special|delete|list`.
//!
//! All subcommands require a staff role. Every successful change schedules a
//! catalog refresh so the public menu catches up once a burst of edits settles.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete, require_staff, say_long},
        core::{
            access::Role,
            catalog::parse_prices,
            menu_admin::{self, ItemDraft, SpecialDraft},
            render::{escape_markdown, format_money},
            variant::{PriceKey, Variant},
        },
        entities::item,
        errors::{Error, Result},
    };
    use std::collections::BTreeMap;
    use std::fmt::Write;
    use tracing::info;

    async fn reply(ctx: poise::Context<'_, BotData, Error>, text: String) -> Result<()> {
        ctx.send(poise::CreateReply::default().content(text).ephemeral(true))
            .await?;
        Ok(())
    }

    /// Looks an item up by name, telling the caller when there is none.
    async fn resolve_item(
        ctx: poise::Context<'_, BotData, Error>,
        name: &str,
    ) -> Result<Option<item::Model>> {
        let found = menu_admin::find_item_by_name(&ctx.data().database, name).await?;
        if found.is_none() {
            reply(
                ctx,
                format!("❌ No item named '{}'.", escape_markdown(name)),
            )
            .await?;
        }
        Ok(found)
    }

    /// Reports the outcome of a write. Validation failures are shown to the caller,
    /// anything else is propagated to the framework error handler.
    async fn finish(
        ctx: poise::Context<'_, BotData, Error>,
        result: Result<item::Model>,
        success: impl FnOnce(&item::Model) -> String,
    ) -> Result<()> {
        match result {
            Ok(model) => {
                info!("Item {} ({}) changed by {}", model.id, model.name, ctx.author().id);
                ctx.data().schedule_refresh();
                reply(ctx, success(&model)).await
            }
            Err(e @ Error::Database(_)) => Err(e),
            Err(e) => reply(ctx, format!("❌ {e}")).await,
        }
    }

    /// Parent command for managing menu items.
    #[poise::command(
        slash_command,
        subcommands(
            "item_add",
            "item_price",
            "item_availability",
            "item_featured",
            "item_special",
            "item_clear_special",
            "item_delete",
            "item_list"
        )
    )]
    pub async fn item(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Item management command. Available subcommands:\n\
            `/item add` - Add a new item\n\
            `/item price` - Set or remove the price of one size\n\
            `/item availability` - Show or hide an item\n\
            `/item featured` - Feature an item\n\
            `/item special` - Put an item on offer\n\
            `/item clear_special` - End an item's offer\n\
            `/item delete` - Delete an item\n\
            `/item list` - List all items";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Adds a new item. At least one size needs a price.
    #[allow(clippy::too_many_arguments)]
    #[poise::command(slash_command, rename = "add")]
    pub async fn item_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Item name"] name: String,
        #[description = "Sub-category the item is listed under"]
        #[autocomplete = "autocomplete::autocomplete_sub_category"]
        sub_category: String,
        #[description = "Price for the standard size"] standard: Option<f64>,
        #[description = "Price for small"] small: Option<f64>,
        #[description = "Price for medium"] medium: Option<f64>,
        #[description = "Price for large"] large: Option<f64>,
        #[description = "Price for XL"] xl: Option<f64>,
        #[description = "Short description"] description: Option<String>,
        #[description = "Image URL"] image_url: Option<String>,
        #[description = "Show in the featured widget"] featured: Option<bool>,
    ) -> Result<()> {
        if require_staff(ctx, Role::Admin, "adding items").await?.is_none() {
            return Ok(());
        }

        let db = &ctx.data().database;
        let Some(sub) = menu_admin::find_sub_category_by_name(db, &sub_category).await? else {
            return reply(
                ctx,
                format!("❌ No sub-category named '{}'.", escape_markdown(&sub_category)),
            )
            .await;
        };

        let prices: BTreeMap<PriceKey, f64> = [
            (Variant::Standard, standard),
            (Variant::Small, small),
            (Variant::Medium, medium),
            (Variant::Large, large),
            (Variant::Xl, xl),
        ]
        .into_iter()
        .filter_map(|(variant, price)| price.map(|p| (PriceKey::Known(variant), p)))
        .collect();

        let draft = ItemDraft {
            sub_category_id: sub.id,
            name,
            description,
            image_url,
            prices,
            featured: featured.unwrap_or(false),
            special: None,
        };

        let result = menu_admin::create_item(db, draft).await;
        finish(ctx, result, |model| {
            format!(
                "✅ Added **{}** to {}.",
                escape_markdown(&model.name),
                escape_markdown(&sub.name)
            )
        })
        .await
    }

    /// Sets the price of one size. Leave the price empty to stop selling that size.
    #[poise::command(slash_command, rename = "price")]
    pub async fn item_price(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Item"]
        #[autocomplete = "autocomplete::autocomplete_any_item"]
        item: String,
        #[description = "Size"]
        #[autocomplete = "autocomplete::autocomplete_variant"]
        size: String,
        #[description = "New price, empty to remove the size"] price: Option<f64>,
    ) -> Result<()> {
        if require_staff(ctx, Role::Admin, "changing prices").await?.is_none() {
            return Ok(());
        }
        let Some(model) = resolve_item(ctx, &item).await? else {
            return Ok(());
        };

        let key = PriceKey::parse(&size);
        let result = menu_admin::set_item_price(&ctx.data().database, model.id, key, price).await;
        let currency = ctx.data().currency().to_string();
        finish(ctx, result, |model| {
            let prices: Vec<String> = parse_prices(&model.prices)
                .iter()
                .map(|(key, price)| format!("{}: {}", key.label(), format_money(&currency, *price)))
                .collect();
            format!(
                "✅ **{}** now costs {}.",
                escape_markdown(&model.name),
                prices.join(" · ")
            )
        })
        .await
    }

    /// Shows or hides an item on the public menu.
    #[poise::command(slash_command, rename = "availability")]
    pub async fn item_availability(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Item"]
        #[autocomplete = "autocomplete::autocomplete_any_item"]
        item: String,
        #[description = "Whether guests can order it"] available: bool,
    ) -> Result<()> {
        if require_staff(ctx, Role::Admin, "changing availability").await?.is_none() {
            return Ok(());
        }
        let Some(model) = resolve_item(ctx, &item).await? else {
            return Ok(());
        };

        let result =
            menu_admin::set_item_availability(&ctx.data().database, model.id, available).await;
        finish(ctx, result, |model| {
            let state = if model.is_available { "back on" } else { "hidden from" };
            format!("✅ **{}** is {state} the menu.", escape_markdown(&model.name))
        })
        .await
    }

    /// Adds an item to or removes it from the featured widget.
    #[poise::command(slash_command, rename = "featured")]
    pub async fn item_featured(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Item"]
        #[autocomplete = "autocomplete::autocomplete_any_item"]
        item: String,
        #[description = "Whether the item is featured"] featured: bool,
    ) -> Result<()> {
        if require_staff(ctx, Role::Admin, "featuring items").await?.is_none() {
            return Ok(());
        }
        let Some(model) = resolve_item(ctx, &item).await? else {
            return Ok(());
        };

        let result = menu_admin::set_item_featured(&ctx.data().database, model.id, featured).await;
        finish(ctx, result, |model| {
            let state = if model.featured { "now" } else { "no longer" };
            format!("✅ **{}** is {state} featured.", escape_markdown(&model.name))
        })
        .await
    }

    /// Puts an item on offer.
    ///
    /// Dates are `YYYY-MM-DD` or `YYYY-MM-DD HH:MM` in the lounge's local time; days are
    /// a comma-separated list such as `Fri, Sat`.
    #[poise::command(slash_command, rename = "special")]
    pub async fn item_special(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Item"]
        #[autocomplete = "autocomplete::autocomplete_any_item"]
        item: String,
        #[description = "Tag shown on the item (e.g., Happy Hour)"] text: Option<String>,
        #[description = "Discount in percent (0-100)"] discount: Option<f64>,
        #[description = "First day of the offer"] starts: Option<String>,
        #[description = "Last day of the offer"] ends: Option<String>,
        #[description = "Weekdays the offer runs on (e.g., Fri, Sat)"] days: Option<String>,
    ) -> Result<()> {
        if require_staff(ctx, Role::Admin, "editing offers").await?.is_none() {
            return Ok(());
        }
        let Some(model) = resolve_item(ctx, &item).await? else {
            return Ok(());
        };

        let special = match build_special(text, discount, starts, ends, days) {
            Ok(special) => special,
            Err(e) => return reply(ctx, format!("❌ {e}")).await,
        };

        let result =
            menu_admin::set_item_special(&ctx.data().database, model.id, Some(special)).await;
        finish(ctx, result, |model| {
            format!("🔥 **{}** is now on offer.", escape_markdown(&model.name))
        })
        .await
    }

    fn build_special(
        text: Option<String>,
        discount: Option<f64>,
        starts: Option<String>,
        ends: Option<String>,
        days: Option<String>,
    ) -> Result<SpecialDraft> {
        let local = chrono::Local;
        Ok(SpecialDraft {
            text,
            discount_percent: discount,
            starts_at: starts
                .map(|s| menu_admin::parse_offer_date(&s, false, &local))
                .transpose()?,
            ends_at: ends
                .map(|s| menu_admin::parse_offer_date(&s, true, &local))
                .transpose()?,
            weekdays: days
                .map(|d| menu_admin::parse_weekday_list(&d))
                .transpose()?
                .unwrap_or_default(),
        })
    }

    /// Ends an item's offer.
    #[poise::command(slash_command, rename = "clear_special")]
    pub async fn item_clear_special(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Item"]
        #[autocomplete = "autocomplete::autocomplete_any_item"]
        item: String,
    ) -> Result<()> {
        if require_staff(ctx, Role::Admin, "editing offers").await?.is_none() {
            return Ok(());
        }
        let Some(model) = resolve_item(ctx, &item).await? else {
            return Ok(());
        };

        let result = menu_admin::set_item_special(&ctx.data().database, model.id, None).await;
        finish(ctx, result, |model| {
            format!("✅ **{}** is no longer on offer.", escape_markdown(&model.name))
        })
        .await
    }

    /// Permanently deletes an item.
    #[poise::command(slash_command, rename = "delete")]
    pub async fn item_delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Item"]
        #[autocomplete = "autocomplete::autocomplete_any_item"]
        item: String,
    ) -> Result<()> {
        if require_staff(ctx, Role::Admin, "deleting items").await?.is_none() {
            return Ok(());
        }
        let Some(model) = resolve_item(ctx, &item).await? else {
            return Ok(());
        };

        let result = menu_admin::delete_item(&ctx.data().database, model.id).await;
        finish(ctx, result, |model| {
            format!("🗑️ **{}** deleted.", escape_markdown(&model.name))
        })
        .await
    }

    /// Lists every item, newest first, including hidden ones.
    #[poise::command(slash_command, rename = "list")]
    pub async fn item_list(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        if require_staff(ctx, Role::Admin, "listing items").await?.is_none() {
            return Ok(());
        }

        let db = &ctx.data().database;
        let items = menu_admin::list_items(db).await?;
        if items.is_empty() {
            return reply(ctx, "📋 No items yet. Add one with `/item add`.".to_string()).await;
        }

        let sub_names: std::collections::HashMap<i64, String> =
            menu_admin::list_sub_categories(db)
                .await?
                .into_iter()
                .map(|s| (s.id, s.name))
                .collect();

        let mut text = format!("📋 **Menu items ({})**\n", items.len());
        for model in &items {
            let prices: Vec<String> = parse_prices(&model.prices)
                .iter()
                .map(|(key, price)| format!("{} {price}", key.label()))
                .collect();
            let _ = writeln!(
                text,
                "• **{}** ({}) - {}{}{}{}",
                escape_markdown(&model.name),
                escape_markdown(sub_names.get(&model.sub_category_id).map_or("N/A", String::as_str)),
                prices.join(", "),
                if model.featured { " ⭐" } else { "" },
                if model.is_special { " 🔥" } else { "" },
                if model.is_available { "" } else { " (hidden)" },
            );
        }
        say_long(ctx, &text, true).await
    }
}

// Re-export all commands
pub use inner::*;
