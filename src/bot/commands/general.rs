//! General Discord commands - ping, help and delivery partners.
//! This module contains simple commands that don't require database operations
//! and provide basic bot functionality and user assistance.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::render::escape_markdown,
        errors::{Error, Result},
    };
    use std::fmt::Write;

    /// Responds with "Pong!" to test bot connectivity.
    ///
    /// This is a simple health check command that doesn't require any database operations.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    ///
    /// Staff members additionally see the back-office commands their role allows.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let business = &ctx.data().config.business;
        let mut help_text = format!(
            "**{} Help**\n",
            escape_markdown(&business.name)
        );
        if !business.region.is_empty() {
            let _ = writeln!(help_text, "📍 {}", escape_markdown(&business.region));
        }
        help_text.push_str(
            "\n**Menu**\n\
            • `/menu [filter] [search]` - Browse the menu by category, or `specials`.\n\
            • `/specials [search]` - Items on offer right now.\n\
            • `/featured` - Our favourites.\n\
            • `/delivery` - Order through a delivery partner.\n\n\
            **Ordering**\n\
            • `/order add <item> <size> [quantity]` - Add to your basket.\n\
            • `/order remove <item> <size> [quantity]` - Take items out again.\n\
            • `/order basket` - Show your basket.\n\
            • `/order checkout` - Send your order to us on WhatsApp.\n\n\
            **Utility**\n\
            • `/ping` - Checks if the bot is responsive.\n\
            • `/help` - Shows this help message.",
        );

        if let Some(role) = ctx.data().role_of(ctx.author().id) {
            help_text.push_str(
                "\n\n**Staff**\n\
                • `/item <add|price|availability|featured|special|clear_special|delete|list>`\n\
                • `/category <add|promo>` and `/subcategory <add|delete>`\n\
                • `/customer <add|find|edit|delete>`\n\
                • `/sms served` - Thank a guest after their visit.",
            );
            if role.is_superadmin() {
                help_text.push_str("\n• `/sms <audience|blast|settings>` - Promotional SMS.");
            }
        }

        ctx.send(
            poise::CreateReply::default()
                .content(help_text)
                .ephemeral(true),
        )
        .await?;
        Ok(())
    }

    /// Lists the delivery services the lounge can be ordered from.
    #[poise::command(slash_command, prefix_command)]
    pub async fn delivery(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let partners = &ctx.data().config.delivery_partners;
        if partners.is_empty() {
            ctx.say("🚚 No delivery partners yet - order with `/order checkout` instead!")
                .await?;
            return Ok(());
        }

        let mut text = String::from("🚚 **Order for delivery**\n");
        for partner in partners {
            let _ = writeln!(text, "• **{}**: <{}>", escape_markdown(&partner.name), partner.link);
        }
        ctx.say(text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
