//! Entity module - Contains all SeaORM entity definitions for the database.
//! The menu tree (categories, sub-categories, items) is the catalog data provider;
//! customers and the SMS tables back the staff tools.

pub mod category;
pub mod customer;
pub mod item;
pub mod sms_log;
pub mod sms_setting;
pub mod sub_category;

// Re-export specific types to avoid conflicts
pub use category::{Column as CategoryColumn, Entity as Category, Model as CategoryModel};
pub use customer::{Column as CustomerColumn, Entity as Customer, Model as CustomerModel};
pub use item::{Column as ItemColumn, Entity as Item, Model as ItemModel};
pub use sms_log::{Column as SmsLogColumn, Entity as SmsLog, Model as SmsLogModel};
pub use sms_setting::{
    Column as SmsSettingColumn, Entity as SmsSetting, Model as SmsSettingModel,
};
pub use sub_category::{
    Column as SubCategoryColumn, Entity as SubCategory, Model as SubCategoryModel,
};
