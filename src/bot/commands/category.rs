//! Menu structure commands - `/category add|promo` and `/subcategory add|delete`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete, require_staff},
        core::{access::Role, menu_admin, render::escape_markdown},
        errors::{Error, Result},
    };
    use tracing::info;

    async fn reply(ctx: poise::Context<'_, BotData, Error>, text: String) -> Result<()> {
        ctx.send(poise::CreateReply::default().content(text).ephemeral(true))
            .await?;
        Ok(())
    }

    /// Shows validation failures to the caller, passes database failures on.
    async fn report_failure(ctx: poise::Context<'_, BotData, Error>, error: Error) -> Result<()> {
        match error {
            Error::Database(_) => Err(error),
            other => reply(ctx, format!("❌ {other}")).await,
        }
    }

    /// Parent command for menu categories.
    #[poise::command(slash_command, subcommands("category_add", "category_promo"))]
    pub async fn category(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Category commands:\n\
            `/category add` - Add a top-level menu category\n\
            `/category promo` - Set the category's Friday banner";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Adds a category. Its promo banner starts hidden.
    #[poise::command(slash_command, rename = "add")]
    pub async fn category_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Category name (e.g., Food)"] name: String,
        #[description = "Promo banner text"] promo: Option<String>,
    ) -> Result<()> {
        if require_staff(ctx, Role::Admin, "adding categories").await?.is_none() {
            return Ok(());
        }

        match menu_admin::create_category(&ctx.data().database, &name, promo).await {
            Ok(category) => {
                info!("Category {} created by {}", category.name, ctx.author().id);
                ctx.data().schedule_refresh();
                reply(
                    ctx,
                    format!("✅ Category **{}** added.", escape_markdown(&category.name)),
                )
                .await
            }
            Err(e) => report_failure(ctx, e).await,
        }
    }

    /// Sets the banner shown above a category on Fridays.
    #[poise::command(slash_command, rename = "promo")]
    pub async fn category_promo(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Category"]
        #[autocomplete = "autocomplete::autocomplete_category"]
        category: String,
        #[description = "Whether the banner is shown"] show: bool,
        #[description = "Banner text, empty keeps the current text"] text: Option<String>,
    ) -> Result<()> {
        if require_staff(ctx, Role::Admin, "editing promos").await?.is_none() {
            return Ok(());
        }

        let db = &ctx.data().database;
        let Some(existing) = menu_admin::find_category_by_name(db, &category).await? else {
            return reply(
                ctx,
                format!("❌ No category named '{}'.", escape_markdown(&category)),
            )
            .await;
        };

        let text = text.or(existing.special_offer);
        match menu_admin::set_category_promo(db, existing.id, text, show).await {
            Ok(updated) => {
                ctx.data().schedule_refresh();
                let state = match (&updated.special_offer, updated.show_offer) {
                    (Some(promo), true) => format!("shows \"{}\" on Fridays", escape_markdown(promo)),
                    (None, true) => "has no banner text yet".to_string(),
                    (_, false) => "banner is hidden".to_string(),
                };
                reply(
                    ctx,
                    format!("✅ **{}** {state}.", escape_markdown(&updated.name)),
                )
                .await
            }
            Err(e) => report_failure(ctx, e).await,
        }
    }

    /// Parent command for sub-categories.
    #[poise::command(slash_command, subcommands("subcategory_add", "subcategory_delete"))]
    pub async fn subcategory(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Sub-category commands:\n\
            `/subcategory add` - Add a section under a category\n\
            `/subcategory delete` - Delete an empty section";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Adds a sub-category under a category.
    #[poise::command(slash_command, rename = "add")]
    pub async fn subcategory_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Parent category"]
        #[autocomplete = "autocomplete::autocomplete_category"]
        category: String,
        #[description = "Sub-category name (e.g., Platters)"] name: String,
    ) -> Result<()> {
        if require_staff(ctx, Role::Admin, "adding sub-categories").await?.is_none() {
            return Ok(());
        }

        let db = &ctx.data().database;
        let Some(parent) = menu_admin::find_category_by_name(db, &category).await? else {
            return reply(
                ctx,
                format!("❌ No category named '{}'.", escape_markdown(&category)),
            )
            .await;
        };

        match menu_admin::create_sub_category(db, parent.id, &name).await {
            Ok(sub) => {
                ctx.data().schedule_refresh();
                reply(
                    ctx,
                    format!(
                        "✅ **{}** added under {}.",
                        escape_markdown(&sub.name),
                        escape_markdown(&parent.name)
                    ),
                )
                .await
            }
            Err(e) => report_failure(ctx, e).await,
        }
    }

    /// Deletes a sub-category that no longer holds items.
    #[poise::command(slash_command, rename = "delete")]
    pub async fn subcategory_delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Sub-category"]
        #[autocomplete = "autocomplete::autocomplete_sub_category"]
        name: String,
    ) -> Result<()> {
        if require_staff(ctx, Role::Admin, "deleting sub-categories").await?.is_none() {
            return Ok(());
        }

        let db = &ctx.data().database;
        let Some(sub) = menu_admin::find_sub_category_by_name(db, &name).await? else {
            return reply(
                ctx,
                format!("❌ No sub-category named '{}'.", escape_markdown(&name)),
            )
            .await;
        };

        match menu_admin::delete_sub_category(db, sub.id).await {
            Ok(deleted) => {
                info!("Sub-category {} deleted by {}", deleted.name, ctx.author().id);
                ctx.data().schedule_refresh();
                reply(ctx, format!("🗑️ **{}** deleted.", escape_markdown(&deleted.name))).await
            }
            Err(e) => report_failure(ctx, e).await,
        }
    }
}

// Re-export all commands
pub use inner::*;
