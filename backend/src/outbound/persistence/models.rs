//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::schema::{accounts, trucks, wash_images, wash_records};

/// Row struct for reading from the accounts table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AccountRow {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub password_hash: Option<String>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new account records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = accounts)]
pub(crate) struct NewAccountRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub full_name: &'a str,
    pub role: &'a str,
    pub password_hash: Option<&'a str>,
}

/// Changeset struct for manager account edits; `None` leaves a column alone.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = accounts)]
pub(crate) struct AccountChangesRow {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the trucks table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = trucks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TruckRow {
    pub id: Uuid,
    pub license_plate: String,
    pub driver_id: Uuid,
}

/// Insertable struct for creating new truck records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = trucks)]
pub(crate) struct NewTruckRow<'a> {
    pub id: Uuid,
    pub license_plate: &'a str,
    pub driver_id: Uuid,
}

/// Row struct for reading from the wash_records table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = wash_records)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct WashRecordRow {
    pub id: Uuid,
    pub truck_id: Uuid,
    pub washer_id: Uuid,
    pub wash_type: String,
    pub price: Decimal,
    pub notes: Option<String>,
    pub wash_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new wash records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = wash_records)]
pub(crate) struct NewWashRecordRow<'a> {
    pub id: Uuid,
    pub truck_id: Uuid,
    pub washer_id: Uuid,
    pub wash_type: &'a str,
    pub price: Decimal,
    pub notes: Option<&'a str>,
}

/// Changeset struct for the scalar fields of a wash update.
///
/// Updates replace every scalar field, so absent notes clear the column
/// rather than being skipped.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = wash_records)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct WashRecordChangesRow<'a> {
    pub truck_id: Uuid,
    pub wash_type: &'a str,
    pub price: Decimal,
    pub notes: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the wash_images table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = wash_images)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct WashImageRow {
    pub id: Uuid,
    pub wash_record_id: Uuid,
    pub image_type: String,
    pub image_key: String,
}

/// Insertable struct for creating new image attachment rows.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = wash_images)]
pub(crate) struct NewWashImageRow<'a> {
    pub id: Uuid,
    pub wash_record_id: Uuid,
    pub image_type: &'a str,
    pub image_key: &'a str,
}
