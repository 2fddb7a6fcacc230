//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Menu category and sub-category management commands
pub mod category;

/// Customer directory commands
pub mod customer;

/// General utility commands
pub mod general;

/// Menu item management commands
pub mod item;

/// Public menu commands
pub mod menu;

/// Order basket commands
pub mod order;

/// SMS queue commands
pub mod sms;

// Export commands
pub use category::*;
pub use customer::*;
pub use general::*;
pub use item::*;
pub use menu::*;
pub use order::*;
pub use sms::*;
