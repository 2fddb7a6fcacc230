//! Unified error type for the lounge bot and its core logic.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Invalid input: {message}")]
    Validation { message: String },

    #[error("Invalid price: {price} (must be a positive number)")]
    InvalidPrice { price: f64 },

    #[error("Invalid discount: {percent}% (must be between 0 and 100)")]
    InvalidDiscount { percent: f64 },

    #[error("Menu item not found: {name}")]
    ItemNotFound { name: String },

    #[error("Category not found: {name}")]
    CategoryNotFound { name: String },

    #[error("Customer not found: {id}")]
    CustomerNotFound { id: i64 },

    #[error("Phone number {phone} is already registered")]
    DuplicatePhone { phone: String },

    #[error("Invalid phone number: {phone:?}")]
    InvalidPhone { phone: String },

    #[error("Permission denied: {action} requires {required} access")]
    PermissionDenied { action: String, required: String },

    #[error("No recipients selected")]
    EmptyAudience,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Serenity/Poise framework error: {0}")]
    #[allow(clippy::enum_variant_names)]
    FrameworkError(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Error::FrameworkError(Box::new(value))
    }
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
