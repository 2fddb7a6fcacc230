//! Order basket commands - `order add`, `order remove`, `order basket`, `order checkout`.
//!
//! Every guest has one basket, kept in memory until the bot restarts. Checkout hands
//! the basket to the lounge's WhatsApp number as a pre-filled message; nothing is
//! stored.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::{
            order::{LineDetails, OrderHandoff, OrderSession, OrderTotals},
            render::{LOADING_NOTICE, escape_markdown, render_basket, render_totals},
            variant::PriceKey,
        },
        errors::{Error, Result},
    };
    use std::collections::HashMap;
    use tracing::info;

    async fn reply(ctx: poise::Context<'_, BotData, Error>, text: String) -> Result<()> {
        ctx.send(poise::CreateReply::default().content(text).ephemeral(true))
            .await?;
        Ok(())
    }

    /// Takes `quantity` units of the named line out of a guest's basket.
    ///
    /// Returns the line's name, its remaining quantity and the new totals, or `None`
    /// when the guest has no such line. A basket left empty is dropped from the map.
    pub(crate) fn take_from_basket(
        sessions: &mut HashMap<u64, OrderSession>,
        user_id: u64,
        item: &str,
        key: &PriceKey,
        quantity: u32,
    ) -> Option<(String, u32, OrderTotals)> {
        let name = item.trim().to_lowercase();
        let delta = -i32::try_from(quantity).unwrap_or(1);

        let session = sessions.get_mut(&user_id)?;
        let line = session
            .lines()
            .iter()
            .find(|line| line.variant == *key && line.name.to_lowercase() == name)
            .cloned()?;

        let remaining = session.set_quantity(
            line.item_id,
            key,
            delta,
            LineDetails {
                name: line.name.clone(),
                variant_label: line.variant_label.clone(),
                unit_price: line.unit_price,
            },
        );
        let totals = session.totals();
        if session.is_empty() {
            sessions.remove(&user_id);
        }
        Some((line.name, remaining, totals))
    }

    /// Checkout reply: the WhatsApp link followed by a preview of the message.
    pub(crate) fn checkout_reply(handoff: &OrderHandoff) -> String {
        format!(
            "📲 **Tap to send your order on WhatsApp:**\n{}\n\n{}",
            handoff.url,
            escape_markdown(&handoff.text)
        )
    }

    /// Parent command for the order basket.
    #[poise::command(
        slash_command,
        subcommands("order_add", "order_remove", "order_basket", "order_checkout")
    )]
    pub async fn order(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Order commands:\n\
            `/order add` - Add an item to your basket\n\
            `/order remove` - Remove an item from your basket\n\
            `/order basket` - Show your basket\n\
            `/order checkout` - Send your order on WhatsApp";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Adds an item to your basket at the price currently on the menu.
    #[poise::command(slash_command, rename = "add")]
    pub async fn order_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Menu item"]
        #[autocomplete = "autocomplete::autocomplete_menu_item"]
        item: String,
        #[description = "Size (e.g., Medium)"]
        #[autocomplete = "autocomplete::autocomplete_variant"]
        size: String,
        #[description = "How many (defaults to 1)"]
        #[min = 1]
        #[max = 50]
        quantity: Option<u32>,
    ) -> Result<()> {
        let data = ctx.data();
        let Some(catalog) = data.catalog.current().await else {
            return reply(ctx, LOADING_NOTICE.to_string()).await;
        };

        let Some(menu_item) = catalog.find_item_by_name(&item) else {
            return reply(
                ctx,
                format!("❌ '{}' is not on the menu.", escape_markdown(&item)),
            )
            .await;
        };

        let key = PriceKey::parse(&size);
        let now = chrono::Local::now();
        let Some(unit_price) = menu_item.effective_price(&key, &now) else {
            let sizes: Vec<&str> = menu_item.prices.keys().map(PriceKey::label).collect();
            return reply(
                ctx,
                format!(
                    "❌ {} is not sold in size '{}'. Available: {}",
                    escape_markdown(&menu_item.name),
                    escape_markdown(&size),
                    sizes.join(", ")
                ),
            )
            .await;
        };

        let delta = i32::try_from(quantity.unwrap_or(1)).unwrap_or(1);
        let (new_quantity, totals) = {
            let mut sessions = data.sessions.lock().await;
            let session = sessions.entry(ctx.author().id.get()).or_default();
            let new_quantity = session.set_quantity(
                menu_item.id,
                &key,
                delta,
                LineDetails {
                    name: menu_item.name.clone(),
                    variant_label: key.label().to_string(),
                    unit_price,
                },
            );
            (new_quantity, session.totals())
        };

        reply(
            ctx,
            format!(
                "✅ {}x {} ({}) in your basket.\n{}",
                new_quantity,
                escape_markdown(&menu_item.name),
                key.label(),
                render_totals(totals, data.currency())
            ),
        )
        .await
    }

    /// Takes items out of your basket.
    #[poise::command(slash_command, rename = "remove")]
    pub async fn order_remove(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Item in your basket"]
        #[autocomplete = "autocomplete::autocomplete_menu_item"]
        item: String,
        #[description = "Size (e.g., Medium)"]
        #[autocomplete = "autocomplete::autocomplete_variant"]
        size: String,
        #[description = "How many (defaults to 1)"]
        #[min = 1]
        #[max = 50]
        quantity: Option<u32>,
    ) -> Result<()> {
        let data = ctx.data();
        let key = PriceKey::parse(&size);

        let outcome = {
            let mut sessions = data.sessions.lock().await;
            take_from_basket(&mut sessions, ctx.author().id.get(), &item, &key, quantity.unwrap_or(1))
        };

        let Some((name, new_quantity, totals)) = outcome else {
            return reply(
                ctx,
                format!(
                    "❌ There is no {} ({}) in your basket.",
                    escape_markdown(&item),
                    key.label()
                ),
            )
            .await;
        };

        let status = if new_quantity == 0 {
            format!("🗑️ {} ({}) removed from your basket.", escape_markdown(&name), key.label())
        } else {
            format!("✅ {}x {} ({}) in your basket.", new_quantity, escape_markdown(&name), key.label())
        };
        reply(
            ctx,
            format!("{status}\n{}", render_totals(totals, data.currency())),
        )
        .await
    }

    /// Shows your basket.
    #[poise::command(slash_command, rename = "basket")]
    pub async fn order_basket(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let text = {
            let sessions = data.sessions.lock().await;
            let session = sessions.get(&ctx.author().id.get()).cloned().unwrap_or_default();
            render_basket(&session, data.currency())
        };
        reply(ctx, text).await
    }

    /// Sends your order to the lounge on WhatsApp.
    #[poise::command(slash_command, rename = "checkout")]
    pub async fn order_checkout(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let handoff = {
            let sessions = data.sessions.lock().await;
            match sessions.get(&ctx.author().id.get()) {
                Some(session) => session.to_order_message(
                    &data.config.business.whatsapp_contact,
                    &data.message_style(),
                )?,
                None => None,
            }
        };

        let Some(handoff) = handoff else {
            return reply(
                ctx,
                "🛒 Your basket is empty. Add items with `/order add` first.".to_string(),
            )
            .await;
        };

        info!("Order handoff prepared for user {}", ctx.author().id);
        reply(ctx, checkout_reply(&handoff)).await
    }
}

// Re-export all commands
pub use inner::*;
