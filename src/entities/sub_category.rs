//! Sub-category entity - Groups items inside a category (e.g., "From the Grill").

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sub-category database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sub_categories")]
pub struct Model {
    /// Unique identifier for the sub-category
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the owning category
    pub category_id: i64,
    /// Display name of the sub-category
    pub name: String,
    /// Optional promotional text, kept for the back office only
    pub special_offer: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each sub-category belongs to one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    /// One sub-category has many items
    #[sea_orm(has_many = "super::item::Entity")]
    Items,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
