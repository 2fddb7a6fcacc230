//! Customer directory business logic.
//!
//! Phone numbers are standardized before they are stored or compared, so the same
//! guest entered as `024 123 4567` and `+233241234567` is one customer. Any staff
//! member may add and look up customers; editing and deleting is reserved to
//! superadmins, and only superadmins see full phone numbers.

use crate::{
    core::{
        access::{Role, require_role},
        phone::{mask_phone, standardize_phone},
    },
    entities::{Customer, customer},
    errors::{Error, Result},
};
use chrono::{NaiveDate, TimeZone, Utc};
use sea_orm::{Condition, QueryOrder, Set, prelude::*};

/// Shortest standardized number accepted for a customer.
const MIN_PHONE_DIGITS: usize = 9;

fn clean_name(name: Option<String>) -> Option<String> {
    name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}

fn valid_phone(raw: &str) -> Result<String> {
    let phone = standardize_phone(raw);
    if phone.len() < MIN_PHONE_DIGITS {
        return Err(Error::InvalidPhone {
            phone: raw.to_string(),
        });
    }
    Ok(phone)
}

/// Finds another customer already registered with `phone`.
///
/// Returns the id of that customer, ignoring `exclude_id` (the customer being edited).
/// Numbers shorter than 9 digits after standardization are never checked.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn find_duplicate_phone(
    db: &DatabaseConnection,
    phone: &str,
    exclude_id: Option<i64>,
) -> Result<Option<i64>> {
    let phone = standardize_phone(phone);
    if phone.len() < MIN_PHONE_DIGITS {
        return Ok(None);
    }

    let existing = Customer::find()
        .filter(customer::Column::Phone.eq(phone))
        .one(db)
        .await?;

    Ok(existing
        .map(|c| c.id)
        .filter(|id| Some(*id) != exclude_id))
}

/// Retrieves a customer by id.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_customer_by_id(
    db: &DatabaseConnection,
    customer_id: i64,
) -> Result<Option<customer::Model>> {
    Customer::find_by_id(customer_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Adds a customer to the directory.
///
/// # Errors
/// Returns an error if:
/// - The phone number has fewer than 9 digits after standardization
/// - Another customer already has the same number
/// - The database insert operation fails
pub async fn create_customer(
    db: &DatabaseConnection,
    phone: &str,
    first_name: Option<String>,
    surname: Option<String>,
) -> Result<customer::Model> {
    let phone = valid_phone(phone)?;

    if find_duplicate_phone(db, &phone, None).await?.is_some() {
        return Err(Error::DuplicatePhone { phone });
    }

    let customer = customer::ActiveModel {
        phone: Set(phone),
        first_name: Set(clean_name(first_name)),
        surname: Set(clean_name(surname)),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    customer.insert(db).await.map_err(Into::into)
}

/// Replaces a customer's phone and names. Superadmin only.
///
/// # Errors
/// Returns an error if:
/// - The caller is not a superadmin
/// - The phone number is too short or belongs to another customer
/// - The customer does not exist
/// - The database update operation fails
pub async fn update_customer(
    db: &DatabaseConnection,
    role: Option<Role>,
    customer_id: i64,
    phone: &str,
    first_name: Option<String>,
    surname: Option<String>,
) -> Result<customer::Model> {
    require_role(role, Role::SuperAdmin, "editing customers")?;
    let phone = valid_phone(phone)?;

    if find_duplicate_phone(db, &phone, Some(customer_id))
        .await?
        .is_some()
    {
        return Err(Error::DuplicatePhone { phone });
    }

    let mut customer: customer::ActiveModel = Customer::find_by_id(customer_id)
        .one(db)
        .await?
        .ok_or(Error::CustomerNotFound { id: customer_id })?
        .into();

    customer.phone = Set(phone);
    customer.first_name = Set(clean_name(first_name));
    customer.surname = Set(clean_name(surname));

    customer.update(db).await.map_err(Into::into)
}

/// Removes a customer from the directory. Superadmin only.
///
/// # Errors
/// Returns an error if the caller is not a superadmin, the customer does not exist
/// or the database operation fails.
pub async fn delete_customer(
    db: &DatabaseConnection,
    role: Option<Role>,
    customer_id: i64,
) -> Result<customer::Model> {
    require_role(role, Role::SuperAdmin, "deleting customers")?;

    let customer = Customer::find_by_id(customer_id)
        .one(db)
        .await?
        .ok_or(Error::CustomerNotFound { id: customer_id })?;

    Customer::delete_by_id(customer_id).exec(db).await?;
    Ok(customer)
}

/// Customers whose first name, surname or phone contains `term`, newest first.
/// An empty term lists everyone.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn search_customers(db: &DatabaseConnection, term: &str) -> Result<Vec<customer::Model>> {
    let term = term.trim();
    let mut query = Customer::find();

    if !term.is_empty() {
        query = query.filter(
            Condition::any()
                .add(customer::Column::FirstName.contains(term))
                .add(customer::Column::Surname.contains(term))
                .add(customer::Column::Phone.contains(term)),
        );
    }

    query
        .order_by_desc(customer::Column::CreatedAt)
        .order_by_desc(customer::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Every customer, oldest first.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn all_customers(db: &DatabaseConnection) -> Result<Vec<customer::Model>> {
    Customer::find()
        .order_by_asc(customer::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Customers added during the given calendar month (UTC).
///
/// # Errors
/// Returns `Error::Validation` for an invalid month, or an error if the query fails.
pub async fn customers_created_in_month(
    db: &DatabaseConnection,
    year: i32,
    month: u32,
) -> Result<Vec<customer::Model>> {
    let invalid = || Error::Validation {
        message: format!("Invalid month: {year}-{month:02}"),
    };

    let first_day = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(invalid)?;

    let start = Utc.from_utc_datetime(&first_day.and_time(chrono::NaiveTime::MIN));
    let end = Utc.from_utc_datetime(&next_month.and_time(chrono::NaiveTime::MIN));

    Customer::find()
        .filter(customer::Column::CreatedAt.gte(start))
        .filter(customer::Column::CreatedAt.lt(end))
        .order_by_asc(customer::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Parses a `YYYY-MM` month filter.
///
/// # Errors
/// Returns `Error::Validation` if the input is not a valid month.
pub fn parse_month(input: &str) -> Result<(i32, u32)> {
    let input = input.trim();
    let parsed = input
        .split_once('-')
        .and_then(|(year, month)| Some((year.parse::<i32>().ok()?, month.parse::<u32>().ok()?)))
        .filter(|(_, month)| (1..=12).contains(month));

    parsed.ok_or_else(|| Error::Validation {
        message: format!("'{input}' is not a month (use YYYY-MM)"),
    })
}

/// Phone number as shown to a staff member: complete for superadmins, masked for
/// everyone else.
#[must_use]
pub fn display_phone(phone: &str, role: Option<Role>) -> String {
    if role.is_some_and(Role::is_superadmin) {
        phone.to_string()
    } else {
        mask_phone(phone)
    }
}

/// `"Ama Mensah"`, or an empty string when no name is known.
#[must_use]
pub fn full_name(customer: &customer::Model) -> String {
    [customer.first_name.as_deref(), customer.surname.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
}
