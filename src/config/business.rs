//! Business configuration loading from config.toml
//!
//! This module loads the static business information (display name, WhatsApp contact,
//! currency, placeholder image), the delivery partner list, the categories used to seed
//! an empty menu and the default SMS settings.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Business display information and contact channel
    pub business: BusinessConfig,
    /// Third-party delivery services listed by `/delivery`
    #[serde(default)]
    pub delivery_partners: Vec<DeliveryPartner>,
    /// Categories and sub-categories created when the menu is empty
    #[serde(default)]
    pub categories: Vec<CategorySeed>,
    /// Defaults for the SMS settings table
    #[serde(default)]
    pub sms: SmsDefaults,
}

/// Business display information
#[derive(Debug, Deserialize, Clone)]
pub struct BusinessConfig {
    /// Name used in greetings (e.g., "Icon Lounge")
    pub name: String,
    /// WhatsApp number in international format without `+`, the order handoff target
    pub whatsapp_contact: String,
    /// Free-text location shown by `/help`
    #[serde(default)]
    pub region: String,
    /// Currency code prefixed to every price
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Image shown for items without their own image
    #[serde(default = "default_placeholder_image")]
    pub placeholder_image: String,
}

/// A delivery service the lounge is listed on
#[derive(Debug, Deserialize, Clone)]
pub struct DeliveryPartner {
    pub name: String,
    pub link: String,
    #[serde(default)]
    pub logo: Option<String>,
}

/// Seed entry for one category
#[derive(Debug, Deserialize, Clone)]
pub struct CategorySeed {
    /// Category name, also the `/menu` filter key
    pub name: String,
    /// Optional Friday banner text
    #[serde(default)]
    pub special_offer: Option<String>,
    /// Whether the banner is shown
    #[serde(default)]
    pub show_offer: bool,
    /// Names of the sub-categories to create under this category
    #[serde(default)]
    pub sub_categories: Vec<String>,
}

/// Default values written to the SMS settings table on first run
#[derive(Debug, Deserialize, Clone)]
pub struct SmsDefaults {
    #[serde(default = "default_fallback_name")]
    pub fallback_name: String,
    #[serde(default)]
    pub review_link: String,
    #[serde(default)]
    pub website_link: String,
    #[serde(default = "default_thank_you_template")]
    pub thank_you_template: String,
}

impl Default for SmsDefaults {
    fn default() -> Self {
        Self {
            fallback_name: default_fallback_name(),
            review_link: String::new(),
            website_link: String::new(),
            thank_you_template: default_thank_you_template(),
        }
    }
}

fn default_currency() -> String {
    "GHS".to_string()
}

fn default_placeholder_image() -> String {
    "images/logo-placeholder.png".to_string()
}

fn default_fallback_name() -> String {
    "Valued Customer".to_string()
}

fn default_thank_you_template() -> String {
    "Hello {{first_name}}, thank you for visiting us! We hope you enjoyed your service."
        .to_string()
}

/// Parses configuration from a TOML string.
///
/// # Errors
/// Returns `Error::Config` if the TOML syntax is invalid or required fields are missing.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads the application configuration from a TOML file
///
/// # Errors
/// Returns an error if the file cannot be read or its contents cannot be parsed.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {path_ref:?}: {e}"),
    })?;

    parse_config(&contents)
}

/// Loads configuration from `CONFIG_PATH`, or `./config.toml` when unset
pub fn load_default_config() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_config(path)
}
