//! Customer entity - Directory of guests reachable by SMS.
//!
//! Phone numbers are stored in standardized international form (`233XXXXXXXXX`)
//! and are unique across the directory.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Customer database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    /// Unique identifier for the customer
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Standardized phone number
    #[sea_orm(unique)]
    pub phone: String,
    /// Optional first name, used to personalize messages
    pub first_name: Option<String>,
    /// Optional surname
    pub surname: Option<String>,
    /// When the customer was added
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
