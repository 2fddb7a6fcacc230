//! Category entity - Top level of the menu tree (e.g., "Food", "Drinks").
//!
//! A category owns its sub-categories and may carry a promotional banner that is
//! surfaced on Fridays when `show_offer` is enabled.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Category database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    /// Unique identifier for the category
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name, also used as the menu filter key
    #[sea_orm(unique)]
    pub name: String,
    /// Optional promotional text (e.g., "10% off all platters on Fridays")
    pub special_offer: Option<String>,
    /// Whether the promotional text is surfaced at all
    pub show_offer: bool,
}

/// Defines relationships between Category and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One category has many sub-categories
    #[sea_orm(has_many = "super::sub_category::Entity")]
    SubCategories,
}

impl Related<super::sub_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubCategories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
