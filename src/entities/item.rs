//! Item entity - A sellable menu item with per-variant prices and an optional special offer.
//!
//! Prices are stored as a JSON object keyed by variant (`{"small": 60, "large": 120}`)
//! and the recurring offer days as a JSON array of weekday names (`["Friday"]`).
//! Only rows with `is_available = true` are loaded into the public catalog.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "items")]
pub struct Model {
    /// Unique identifier for the item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the owning sub-category
    pub sub_category_id: i64,
    /// Display name of the item
    pub name: String,
    /// Optional free-text description
    pub description: Option<String>,
    /// Optional image reference, the placeholder image is used when absent
    pub image_url: Option<String>,
    /// Variant -> price mapping as a JSON object
    pub prices: Json,
    /// Whether the item is shown in the featured widget
    pub featured: bool,
    /// Whether the item carries a special offer
    pub is_special: bool,
    /// Offer tag text (e.g., "Happy Hour")
    pub special_text: Option<String>,
    /// Offer discount in percent (0-100)
    pub discount_percent: Option<f64>,
    /// Offer start instant (inclusive)
    pub special_start: Option<DateTimeUtc>,
    /// Offer end instant (inclusive)
    pub special_end: Option<DateTimeUtc>,
    /// Weekdays the offer recurs on as a JSON array, empty means every day
    pub special_days: Json,
    /// Unavailable items are hidden from the public menu
    pub is_available: bool,
    /// When the item was created
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each item belongs to one sub-category
    #[sea_orm(
        belongs_to = "super::sub_category::Entity",
        from = "Column::SubCategoryId",
        to = "super::sub_category::Column::Id"
    )]
    SubCategory,
}

impl Related<super::sub_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubCategory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
