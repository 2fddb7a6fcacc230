//! SMS commands - `/sms served|audience|blast|settings`.
//!
//! Messages are only queued here; delivery happens outside the bot. Staff can send
//! the thank-you message to a guest they just served, superadmins run promotional
//! blasts and edit the settings.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete, require_staff, say_long},
        core::{
            access::Role,
            customer::{self, display_phone},
            phone::standardize_phone,
            sms::{self, LinkOptions, SmsKind, SmsSettings},
        },
        errors::{Error, Result},
    };
    use std::fmt::Write;
    use tracing::info;

    /// Recipients listed in an audience preview.
    const PREVIEW_LIMIT: usize = 20;

    async fn reply(ctx: poise::Context<'_, BotData, Error>, text: String) -> Result<()> {
        ctx.send(poise::CreateReply::default().content(text).ephemeral(true))
            .await?;
        Ok(())
    }

    async fn settings(ctx: poise::Context<'_, BotData, Error>) -> Result<SmsSettings> {
        let data = ctx.data();
        sms::load_sms_settings(&data.database, &data.config.sms).await
    }

    /// Directory numbers (everyone, or only customers added in `month`) merged with
    /// the manual numbers.
    async fn resolve_audience(
        ctx: poise::Context<'_, BotData, Error>,
        month: Option<&str>,
        numbers: Option<&str>,
    ) -> Result<Vec<String>> {
        let db = &ctx.data().database;
        let customers = match month {
            Some(month) => {
                let (year, month) = customer::parse_month(month)?;
                customer::customers_created_in_month(db, year, month).await?
            }
            None => customer::all_customers(db).await?,
        };
        Ok(sms::build_audience(
            customers.into_iter().map(|c| c.phone),
            numbers.unwrap_or_default(),
        ))
    }

    /// Parent command for SMS messaging.
    #[poise::command(
        slash_command,
        subcommands("sms_served", "sms_audience", "sms_blast", "sms_settings")
    )]
    pub async fn sms(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "SMS commands:\n\
            `/sms served` - Thank a guest you just served\n\
            `/sms audience` - Preview a promotional audience (superadmin)\n\
            `/sms blast` - Send a promotional message (superadmin)\n\
            `/sms settings` - Show or change SMS settings (superadmin)";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Queues the thank-you message, or a custom one, for a guest you just served.
    #[allow(clippy::too_many_arguments)]
    #[poise::command(slash_command, rename = "served")]
    pub async fn sms_served(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Guest's phone number"] phone: String,
        #[description = "Guest's first name"] first_name: Option<String>,
        #[description = "Add the guest to the customer directory"] save_customer: Option<bool>,
        #[description = "Custom message instead of the thank-you template"] message: Option<
            String,
        >,
        #[description = "Append the website link to a custom message"] include_website: Option<
            bool,
        >,
        #[description = "Append the review link to a custom message"] include_review: Option<
            bool,
        >,
    ) -> Result<()> {
        let Some(role) = require_staff(ctx, Role::Admin, "sending SMS").await? else {
            return Ok(());
        };

        let db = &ctx.data().database;
        let settings = settings(ctx).await?;
        let phone = standardize_phone(&phone);

        let mut notes = Vec::new();
        if save_customer.unwrap_or(false) {
            match customer::create_customer(db, &phone, first_name.clone(), None).await {
                Ok(model) => notes.push(format!("Customer #{} saved.", model.id)),
                Err(Error::DuplicatePhone { .. }) => {
                    notes.push("Already in the customer directory.".to_string());
                }
                Err(e @ Error::Database(_)) => return Err(e),
                Err(e) => return reply(ctx, format!("❌ {e}")).await,
            }
        }

        let (text, kind) = match message {
            Some(template) => (
                sms::render_template(
                    &template,
                    first_name.as_deref(),
                    LinkOptions {
                        include_website: include_website.unwrap_or(false),
                        include_review: include_review.unwrap_or(false),
                    },
                    &settings,
                ),
                SmsKind::Custom,
            ),
            None => (
                sms::thank_you_message(first_name.as_deref(), &settings),
                SmsKind::Served,
            ),
        };

        let sender = ctx.author().id.to_string();
        match sms::enqueue_sms(db, &phone, &text, kind, &sender).await {
            Ok(log) => {
                info!("SMS {} ({}) queued by {}", log.id, kind, sender);
                let stats = sms::message_stats(&text);
                let mut response = format!(
                    "📨 Queued for {} ({} characters, {} SMS):\n>>> {}",
                    display_phone(&log.phone, Some(role)),
                    stats.characters,
                    stats.segments,
                    text
                );
                for note in notes {
                    let _ = write!(response, "\n{note}");
                }
                reply(ctx, response).await
            }
            Err(e @ Error::Database(_)) => Err(e),
            Err(e) => reply(ctx, format!("❌ {e}")).await,
        }
    }

    /// Previews who a promotional message would reach.
    #[poise::command(slash_command, rename = "audience")]
    pub async fn sms_audience(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Only customers added in this month (YYYY-MM)"] month: Option<String>,
        #[description = "Extra numbers, comma-separated"] numbers: Option<String>,
    ) -> Result<()> {
        let Some(role) = require_staff(ctx, Role::SuperAdmin, "building SMS audiences").await?
        else {
            return Ok(());
        };

        let audience = match resolve_audience(ctx, month.as_deref(), numbers.as_deref()).await {
            Ok(audience) => audience,
            Err(e @ Error::Database(_)) => return Err(e),
            Err(e) => return reply(ctx, format!("❌ {e}")).await,
        };

        if audience.is_empty() {
            return reply(ctx, "No recipients match.".to_string()).await;
        }

        let mut text = format!("👥 **Audience: {} recipient(s)**\n", audience.len());
        for phone in audience.iter().take(PREVIEW_LIMIT) {
            let _ = writeln!(text, "• {}", display_phone(phone, Some(role)));
        }
        if audience.len() > PREVIEW_LIMIT {
            let _ = writeln!(text, "…and {} more.", audience.len() - PREVIEW_LIMIT);
        }
        say_long(ctx, &text, true).await
    }

    /// Sends a promotional message to customers and any extra numbers.
    ///
    /// Everyone in the directory is included unless `month` narrows it to the customers
    /// added that month. `{{first_name}}` is replaced per recipient.
    #[allow(clippy::too_many_arguments)]
    #[poise::command(slash_command, rename = "blast")]
    pub async fn sms_blast(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Message, {{first_name}} is personalized"] message: String,
        #[description = "Only customers added in this month (YYYY-MM)"] month: Option<String>,
        #[description = "Extra numbers, comma-separated"] numbers: Option<String>,
        #[description = "Append the website link"] include_website: Option<bool>,
        #[description = "Append the review link"] include_review: Option<bool>,
    ) -> Result<()> {
        let Some(role) = require_staff(ctx, Role::SuperAdmin, "sending bulk SMS").await? else {
            return Ok(());
        };

        let db = &ctx.data().database;
        let settings = settings(ctx).await?;
        let links = LinkOptions {
            include_website: include_website.unwrap_or(false),
            include_review: include_review.unwrap_or(false),
        };

        let sender = ctx.author().id.to_string();
        let result = match resolve_audience(ctx, month.as_deref(), numbers.as_deref()).await {
            Ok(audience) => {
                sms::send_bulk(db, Some(role), &audience, &message, links, &settings, &sender)
                    .await
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(report) => {
                let sample = sms::render_template(&message, None, links, &settings);
                let stats = sms::message_stats(&sample);
                let mut text = format!(
                    "📣 Queued {} message(s), about {} SMS each.",
                    report.queued, stats.segments
                );
                if !report.failed.is_empty() {
                    let _ = write!(text, "\n⚠️ {} failed:", report.failed.len());
                    for (phone, reason) in report.failed.iter().take(PREVIEW_LIMIT) {
                        let _ = write!(text, "\n• {}: {reason}", display_phone(phone, Some(role)));
                    }
                }
                say_long(ctx, &text, true).await
            }
            Err(e @ Error::Database(_)) => Err(e),
            Err(e) => reply(ctx, format!("❌ {e}")).await,
        }
    }

    /// Shows the SMS settings, or changes one when a key and value are given.
    #[poise::command(slash_command, rename = "settings")]
    pub async fn sms_settings(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Setting to change"]
        #[autocomplete = "autocomplete::autocomplete_sms_setting"]
        key: Option<String>,
        #[description = "New value"] value: Option<String>,
    ) -> Result<()> {
        let Some(role) = require_staff(ctx, Role::SuperAdmin, "changing SMS settings").await?
        else {
            return Ok(());
        };

        match (key, value) {
            (Some(key), Some(value)) => {
                match sms::save_sms_setting(&ctx.data().database, Some(role), &key, &value).await {
                    Ok(()) => reply(ctx, format!("✅ `{key}` updated.")).await,
                    Err(e @ Error::Database(_)) => Err(e),
                    Err(e) => reply(ctx, format!("❌ {e}")).await,
                }
            }
            (Some(_), None) | (None, Some(_)) => {
                reply(ctx, "❌ Give both a setting and its new value.".to_string()).await
            }
            (None, None) => {
                let current = settings(ctx).await?;
                let text = format!(
                    "⚙️ **SMS settings**\n\
                     `fallback_name`: {}\n\
                     `review_link`: {}\n\
                     `website_link`: {}\n\
                     `thank_you_template`: {}",
                    current.fallback_name,
                    current.review_link,
                    current.website_link,
                    current.thank_you_template
                );
                reply(ctx, text).await
            }
        }
    }
}

// Re-export all commands
pub use inner::*;
