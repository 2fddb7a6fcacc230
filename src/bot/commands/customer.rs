//! Customer directory commands - `/customer add|find|edit|delete`.
//!
//! Any staff member can add and look up customers. Phone numbers are masked for
//! admins; editing and deleting need a superadmin.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, require_staff, say_long},
        core::{
            access::Role,
            customer::{self, display_phone, full_name},
            render::escape_markdown,
        },
        errors::{Error, Result},
    };
    use std::fmt::Write;
    use tracing::info;

    /// Most customers listed by one `/customer find`.
    const SEARCH_LIMIT: usize = 25;

    async fn reply(ctx: poise::Context<'_, BotData, Error>, text: String) -> Result<()> {
        ctx.send(poise::CreateReply::default().content(text).ephemeral(true))
            .await?;
        Ok(())
    }

    fn describe(model: &crate::entities::CustomerModel, role: Option<Role>) -> String {
        let name = full_name(model);
        let name = if name.is_empty() {
            "(no name)".to_string()
        } else {
            escape_markdown(&name)
        };
        format!(
            "#{} **{}** - {} (added {})",
            model.id,
            name,
            display_phone(&model.phone, role),
            model.created_at.format("%Y-%m-%d")
        )
    }

    /// Parent command for the customer directory.
    #[poise::command(
        slash_command,
        subcommands("customer_add", "customer_find", "customer_edit", "customer_delete")
    )]
    pub async fn customer(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Customer commands:\n\
            `/customer add` - Add a customer\n\
            `/customer find` - Search by name or phone\n\
            `/customer edit` - Edit a customer (superadmin)\n\
            `/customer delete` - Delete a customer (superadmin)";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Adds a customer. The phone number is stored in international format.
    #[poise::command(slash_command, rename = "add")]
    pub async fn customer_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Phone number (e.g., 024 123 4567)"] phone: String,
        #[description = "First name"] first_name: Option<String>,
        #[description = "Surname"] surname: Option<String>,
    ) -> Result<()> {
        let Some(role) = require_staff(ctx, Role::Admin, "adding customers").await? else {
            return Ok(());
        };

        match customer::create_customer(&ctx.data().database, &phone, first_name, surname).await {
            Ok(model) => {
                info!("Customer {} added by {}", model.id, ctx.author().id);
                reply(ctx, format!("✅ Added {}", describe(&model, Some(role)))).await
            }
            Err(e @ Error::Database(_)) => Err(e),
            Err(e) => reply(ctx, format!("❌ {e}")).await,
        }
    }

    /// Searches customers by first name, surname or phone, newest first.
    #[poise::command(slash_command, rename = "find")]
    pub async fn customer_find(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Name or part of a phone number, empty lists everyone"] term: Option<
            String,
        >,
    ) -> Result<()> {
        let Some(role) = require_staff(ctx, Role::Admin, "looking up customers").await? else {
            return Ok(());
        };

        let term = term.unwrap_or_default();
        let found = customer::search_customers(&ctx.data().database, &term).await?;
        if found.is_empty() {
            return reply(ctx, "No matching customers.".to_string()).await;
        }

        let mut text = format!("👥 **Customers ({})**\n", found.len());
        for model in found.iter().take(SEARCH_LIMIT) {
            let _ = writeln!(text, "• {}", describe(model, Some(role)));
        }
        if found.len() > SEARCH_LIMIT {
            let _ = writeln!(
                text,
                "…and {} more. Narrow the search to see them.",
                found.len() - SEARCH_LIMIT
            );
        }
        say_long(ctx, &text, true).await
    }

    /// Edits a customer. Fields left empty keep their current value.
    #[poise::command(slash_command, rename = "edit")]
    pub async fn customer_edit(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Customer number from /customer find"] id: i64,
        #[description = "New phone number"] phone: Option<String>,
        #[description = "New first name"] first_name: Option<String>,
        #[description = "New surname"] surname: Option<String>,
    ) -> Result<()> {
        let Some(role) = require_staff(ctx, Role::SuperAdmin, "editing customers").await? else {
            return Ok(());
        };

        let db = &ctx.data().database;
        let Some(existing) = customer::get_customer_by_id(db, id).await? else {
            return reply(ctx, format!("❌ No customer #{id}.")).await;
        };

        let phone = phone.unwrap_or(existing.phone);
        let first_name = first_name.or(existing.first_name);
        let surname = surname.or(existing.surname);

        match customer::update_customer(db, Some(role), id, &phone, first_name, surname).await {
            Ok(model) => {
                info!("Customer {} edited by {}", model.id, ctx.author().id);
                reply(ctx, format!("✅ Updated {}", describe(&model, Some(role)))).await
            }
            Err(e @ Error::Database(_)) => Err(e),
            Err(e) => reply(ctx, format!("❌ {e}")).await,
        }
    }

    /// Deletes a customer from the directory.
    #[poise::command(slash_command, rename = "delete")]
    pub async fn customer_delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Customer number from /customer find"] id: i64,
    ) -> Result<()> {
        let Some(role) = require_staff(ctx, Role::SuperAdmin, "deleting customers").await? else {
            return Ok(());
        };

        match customer::delete_customer(&ctx.data().database, Some(role), id).await {
            Ok(model) => {
                info!("Customer {} deleted by {}", model.id, ctx.author().id);
                reply(ctx, format!("🗑️ Deleted {}", describe(&model, Some(role)))).await
            }
            Err(e @ Error::Database(_)) => Err(e),
            Err(e) => reply(ctx, format!("❌ {e}")).await,
        }
    }
}

// Re-export all commands
pub use inner::*;
