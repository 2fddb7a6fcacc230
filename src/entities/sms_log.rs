//! SMS log entity - The outgoing SMS queue.
//!
//! Rows are inserted with status `pending`; delivery is handled by an external
//! webhook consuming this table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// SMS log database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sms_logs")]
pub struct Model {
    /// Unique identifier for the queued message
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Standardized recipient phone number
    pub phone: String,
    /// Full message body
    pub message: String,
    /// Kind of message: `"served"`, `"promotional"` or `"custom"`
    pub kind: String,
    /// Discord user ID of the staff member who queued it
    pub sender_id: String,
    /// Delivery status, always `"pending"` when written by the bot
    pub status: String,
    /// When the message was queued
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
