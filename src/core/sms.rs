//! SMS queue business logic - templates, audiences and the outgoing queue.
//!
//! The bot never talks to an SMS gateway. Messages are written to `sms_logs` with
//! status `pending` and an external webhook consuming that table delivers them.
//! Each message is queued exactly once; nothing here retries.

use crate::{
    config::business::SmsDefaults,
    core::{
        access::{Role, require_role},
        phone::standardize_phone,
    },
    entities::{Customer, SmsLog, SmsSetting, customer, sms_log, sms_setting},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, prelude::*};
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::{info, warn};

/// Placeholder replaced by the recipient's first name.
pub const FIRST_NAME_PLACEHOLDER: &str = "{{first_name}}";

/// Characters per SMS segment.
pub const SEGMENT_LENGTH: usize = 160;

/// Manual audience entries shorter than this (after standardization) are dropped.
const MIN_AUDIENCE_DIGITS: usize = 10;

/// Status written with every queued message.
const PENDING: &str = "pending";

pub const KEY_FALLBACK_NAME: &str = "fallback_name";
pub const KEY_REVIEW_LINK: &str = "review_link";
pub const KEY_WEBSITE_LINK: &str = "website_link";
pub const KEY_THANK_YOU_TEMPLATE: &str = "thank_you_template";

/// Every key the settings table may hold.
pub const SETTING_KEYS: [&str; 4] = [
    KEY_FALLBACK_NAME,
    KEY_REVIEW_LINK,
    KEY_WEBSITE_LINK,
    KEY_THANK_YOU_TEMPLATE,
];

/// Kind of queued message, stored in `sms_logs.kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmsKind {
    Served,
    Promotional,
    Custom,
}

impl SmsKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Served => "served",
            Self::Promotional => "promotional",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for SmsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current SMS settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsSettings {
    pub fallback_name: String,
    pub review_link: String,
    pub website_link: String,
    pub thank_you_template: String,
}

impl SmsSettings {
    fn from_defaults(defaults: &SmsDefaults) -> Self {
        Self {
            fallback_name: defaults.fallback_name.clone(),
            review_link: defaults.review_link.clone(),
            website_link: defaults.website_link.clone(),
            thank_you_template: defaults.thank_you_template.clone(),
        }
    }

    fn set(&mut self, key: &str, value: String) {
        match key {
            KEY_FALLBACK_NAME => self.fallback_name = value,
            KEY_REVIEW_LINK => self.review_link = value,
            KEY_WEBSITE_LINK => self.website_link = value,
            KEY_THANK_YOU_TEMPLATE => self.thank_you_template = value,
            other => warn!("Ignoring unknown SMS setting {:?}", other),
        }
    }

    fn pairs(&self) -> [(&'static str, &str); 4] {
        [
            (KEY_FALLBACK_NAME, &self.fallback_name),
            (KEY_REVIEW_LINK, &self.review_link),
            (KEY_WEBSITE_LINK, &self.website_link),
            (KEY_THANK_YOU_TEMPLATE, &self.thank_you_template),
        ]
    }
}

/// Which links to append to a message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkOptions {
    pub include_website: bool,
    pub include_review: bool,
}

/// Length and segment count of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageStats {
    pub characters: usize,
    pub segments: usize,
}

/// Outcome of a bulk send.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkReport {
    pub queued: usize,
    /// Recipient and the reason their message could not be queued
    pub failed: Vec<(String, String)>,
}

/// Writes the default value of every setting missing from the table.
///
/// # Errors
/// Returns an error if a database operation fails.
pub async fn seed_sms_settings(db: &DatabaseConnection, defaults: &SmsDefaults) -> Result<()> {
    let settings = SmsSettings::from_defaults(defaults);
    for (key, value) in settings.pairs() {
        let exists = SmsSetting::find()
            .filter(sms_setting::Column::Key.eq(key))
            .one(db)
            .await?
            .is_some();
        if !exists {
            insert_setting(db, key, value).await?;
        }
    }
    Ok(())
}

async fn insert_setting(db: &DatabaseConnection, key: &str, value: &str) -> Result<()> {
    let setting = sms_setting::ActiveModel {
        key: Set(key.to_string()),
        value: Set(value.to_string()),
        updated_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    };
    setting.insert(db).await?;
    Ok(())
}

/// Loads the SMS settings, falling back to `defaults` for keys not in the table.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn load_sms_settings(
    db: &DatabaseConnection,
    defaults: &SmsDefaults,
) -> Result<SmsSettings> {
    let mut settings = SmsSettings::from_defaults(defaults);
    for row in SmsSetting::find().all(db).await? {
        settings.set(&row.key, row.value);
    }
    Ok(settings)
}

/// Creates or replaces one setting. Superadmin only.
///
/// # Errors
/// Returns an error if the caller is not a superadmin, the key is unknown or the
/// database operation fails.
pub async fn save_sms_setting(
    db: &DatabaseConnection,
    role: Option<Role>,
    key: &str,
    value: &str,
) -> Result<()> {
    require_role(role, Role::SuperAdmin, "changing SMS settings")?;

    if !SETTING_KEYS.contains(&key) {
        return Err(Error::Validation {
            message: format!("Unknown SMS setting '{key}'"),
        });
    }

    let existing = SmsSetting::find()
        .filter(sms_setting::Column::Key.eq(key))
        .one(db)
        .await?;

    match existing {
        Some(row) => {
            let mut setting: sms_setting::ActiveModel = row.into();
            setting.value = Set(value.trim().to_string());
            setting.updated_at = Set(Utc::now().naive_utc());
            setting.update(db).await?;
        }
        None => insert_setting(db, key, value.trim()).await?,
    }

    info!("SMS setting {} updated", key);
    Ok(())
}

/// Personalizes `template` and appends the requested links.
///
/// Only the first `{{first_name}}` is replaced; a missing or blank first name uses
/// the fallback name.
#[must_use]
pub fn render_template(
    template: &str,
    first_name: Option<&str>,
    links: LinkOptions,
    settings: &SmsSettings,
) -> String {
    let name = first_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(&settings.fallback_name);

    let mut message = template.replacen(FIRST_NAME_PLACEHOLDER, name, 1);
    if links.include_website {
        message.push_str(&format!("\nVisit: {}", settings.website_link));
    }
    if links.include_review {
        message.push_str(&format!("\nReview: {}", settings.review_link));
    }
    message
}

/// The message sent to a guest after their visit: the thank-you template with the
/// review link appended.
#[must_use]
pub fn thank_you_message(first_name: Option<&str>, settings: &SmsSettings) -> String {
    render_template(
        &settings.thank_you_template,
        first_name,
        LinkOptions {
            include_website: false,
            include_review: !settings.review_link.trim().is_empty(),
        },
        settings,
    )
}

#[must_use]
pub fn message_stats(text: &str) -> MessageStats {
    let characters = text.chars().count();
    MessageStats {
        characters,
        segments: characters.div_ceil(SEGMENT_LENGTH),
    }
}

/// Merges directory numbers with comma-separated manual input.
///
/// Manual numbers are standardized and dropped when shorter than 10 digits. The
/// result is de-duplicated, keeping first-seen order.
#[must_use]
pub fn build_audience<I>(db_numbers: I, manual_input: &str) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let manual = manual_input
        .split(',')
        .map(standardize_phone)
        .filter(|phone| phone.len() >= MIN_AUDIENCE_DIGITS);

    let mut seen = HashSet::new();
    db_numbers
        .into_iter()
        .chain(manual)
        .filter(|phone| seen.insert(phone.clone()))
        .collect()
}

/// Queues one message for delivery.
///
/// # Errors
/// Returns an error if the phone or message is empty, or the insert fails.
pub async fn enqueue_sms(
    db: &DatabaseConnection,
    phone: &str,
    message: &str,
    kind: SmsKind,
    sender_id: &str,
) -> Result<sms_log::Model> {
    let standardized = standardize_phone(phone);
    if standardized.is_empty() {
        return Err(Error::InvalidPhone {
            phone: phone.to_string(),
        });
    }
    if message.trim().is_empty() {
        return Err(Error::Validation {
            message: "Message cannot be empty".to_string(),
        });
    }

    let log = sms_log::ActiveModel {
        phone: Set(standardized),
        message: Set(message.to_string()),
        kind: Set(kind.as_str().to_string()),
        sender_id: Set(sender_id.to_string()),
        status: Set(PENDING.to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    log.insert(db).await.map_err(Into::into)
}

/// Queues a personalized promotional message for every recipient. Superadmin only.
///
/// Recipients found in the customer directory get their first name, everyone else
/// the fallback name. A failed insert is recorded in the report and the blast
/// carries on with the next recipient.
///
/// # Errors
/// Returns an error if the caller is not a superadmin, the audience or template is
/// empty, or the customer lookup fails.
pub async fn send_bulk(
    db: &DatabaseConnection,
    role: Option<Role>,
    recipients: &[String],
    template: &str,
    links: LinkOptions,
    settings: &SmsSettings,
    sender_id: &str,
) -> Result<BulkReport> {
    require_role(role, Role::SuperAdmin, "sending bulk SMS")?;

    if recipients.is_empty() {
        return Err(Error::EmptyAudience);
    }
    if template.trim().is_empty() {
        return Err(Error::Validation {
            message: "Message cannot be empty".to_string(),
        });
    }

    let names: HashMap<String, String> = Customer::find()
        .filter(customer::Column::Phone.is_in(recipients.iter().cloned()))
        .all(db)
        .await?
        .into_iter()
        .filter_map(|c| c.first_name.map(|name| (c.phone, name)))
        .collect();

    let mut report = BulkReport::default();
    for phone in recipients {
        let message = render_template(
            template,
            names.get(phone).map(String::as_str),
            links,
            settings,
        );
        match enqueue_sms(db, phone, &message, SmsKind::Promotional, sender_id).await {
            Ok(_) => report.queued += 1,
            Err(e) => {
                warn!("Failed to queue SMS for {}: {}", phone, e);
                report.failed.push((phone.clone(), e.to_string()));
            }
        }
    }

    info!(
        "Bulk SMS: {} queued, {} failed",
        report.queued,
        report.failed.len()
    );
    Ok(report)
}

/// Messages queued so far, oldest first.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn queued_messages(db: &DatabaseConnection) -> Result<Vec<sms_log::Model>> {
    SmsLog::find()
        .order_by_asc(sms_log::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}
