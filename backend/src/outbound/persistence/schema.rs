//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// Application accounts: managers, washers, and drivers.
    ///
    /// Rows are never removed; `deleted_at` marks an account as gone while
    /// wash records keep valid foreign keys into this table.
    accounts (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique login email, stored lowercased.
        email -> Varchar,
        /// Human-readable display name.
        full_name -> Varchar,
        /// Role string: `manager`, `washer`, or `driver`.
        role -> Varchar,
        /// Argon2id PHC string; NULL for federated accounts.
        password_hash -> Nullable<Varchar>,
        /// Soft-deletion marker.
        deleted_at -> Nullable<Timestamptz>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Truck registry: one row per license plate.
    trucks (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique license plate.
        license_plate -> Varchar,
        /// Owning driver account.
        driver_id -> Uuid,
    }
}

diesel::table! {
    /// One row per completed truck-wash event.
    wash_records (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Washed truck.
        truck_id -> Uuid,
        /// Washer who logged and owns the record.
        washer_id -> Uuid,
        /// Service tier string: `basic`, `premium`, or `deluxe`.
        wash_type -> Varchar,
        /// Charged amount.
        price -> Numeric,
        /// Free-text notes.
        notes -> Nullable<Text>,
        /// When the wash happened.
        wash_date -> Timestamptz,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Photo attachments: at most one row per record and image slot.
    wash_images (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning wash record; rows cascade on record deletion.
        wash_record_id -> Uuid,
        /// Slot string: `before` or `after`.
        image_type -> Varchar,
        /// Opaque object-storage key.
        image_key -> Varchar,
    }
}

diesel::joinable!(trucks -> accounts (driver_id));
diesel::joinable!(wash_records -> trucks (truck_id));
diesel::joinable!(wash_images -> wash_records (wash_record_id));

diesel::allow_tables_to_appear_in_same_query!(accounts, trucks, wash_records, wash_images);
