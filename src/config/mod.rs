/// Database configuration and connection management
pub mod database;

/// Business, menu seed and SMS defaults loading from config.toml
pub mod business;

/// Staff role configuration from environment variables
pub mod staff;
