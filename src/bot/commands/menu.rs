//! Public menu commands - `menu`, `specials` and `featured`.
//!
//! These commands only read the cached catalog snapshot. Offers and the Friday banner
//! are evaluated against the bot's local clock at the moment of the command.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, READY_TIMEOUT, handlers::autocomplete, say_long},
        core::{
            catalog::{FEATURED_LIMIT, MenuQuery},
            render::{LOADING_NOTICE, render_featured, render_menu},
        },
        errors::{Error, Result},
    };
    use tracing::debug;

    async fn show_menu(
        ctx: poise::Context<'_, BotData, Error>,
        filter: &str,
        search: &str,
    ) -> Result<()> {
        let Some(catalog) = ctx.data().catalog.wait_ready(READY_TIMEOUT).await else {
            ctx.say(LOADING_NOTICE).await?;
            return Ok(());
        };

        let query = MenuQuery::new(filter, search);
        debug!("Menu query {:?}", query);
        let text = render_menu(
            catalog.filter(&query, chrono::Local::now()),
            ctx.data().currency(),
        );
        say_long(ctx, &text, false).await
    }

    /// Browses the menu.
    ///
    /// Without arguments the whole menu is shown. `filter` narrows it to one category
    /// or to `specials`; `search` keeps items whose name contains the text.
    #[poise::command(slash_command, prefix_command)]
    pub async fn menu(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Category name, 'specials' or 'all'"]
        #[autocomplete = "autocomplete::autocomplete_menu_filter"]
        filter: Option<String>,
        #[description = "Only items whose name contains this text"] search: Option<String>,
    ) -> Result<()> {
        show_menu(
            ctx,
            filter.as_deref().unwrap_or("all"),
            search.as_deref().unwrap_or_default(),
        )
        .await
    }

    /// Shows the items on offer right now.
    #[poise::command(slash_command, prefix_command)]
    pub async fn specials(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Only items whose name contains this text"] search: Option<String>,
    ) -> Result<()> {
        show_menu(ctx, "specials", search.as_deref().unwrap_or_default()).await
    }

    /// Shows the featured items.
    #[poise::command(slash_command, prefix_command)]
    pub async fn featured(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let Some(catalog) = ctx.data().catalog.wait_ready(READY_TIMEOUT).await else {
            ctx.say(LOADING_NOTICE).await?;
            return Ok(());
        };

        let now = chrono::Local::now();
        let items: Vec<_> = catalog
            .featured(FEATURED_LIMIT)
            .map(|item| catalog.item_view(item, &now))
            .collect();

        say_long(ctx, &render_featured(&items, ctx.data().currency()), false).await
    }
}

// Re-export all commands
pub use inner::*;
