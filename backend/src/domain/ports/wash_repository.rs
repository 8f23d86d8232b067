//! Driven port for wash-record persistence.
//!
//! The repository owns the transactional boundaries: creation persists the
//! record and both image rows atomically, and an update applies the whole
//! reconciliation plan inside one transaction so partial row changes are
//! never observable.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::account::AccountId;
use crate::domain::reconciliation::{ImagePlan, TruckChange};
use crate::domain::truck::LicensePlate;
use crate::domain::wash::{Price, StorageKey, WashDetail, WashType};

/// Persistence errors raised by [`WashRepository`] adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WashPersistenceError {
    /// Repository connection could not be established.
    #[error("wash repository connection failed: {message}")]
    Connection {
        /// Underlying failure description.
        message: String,
    },
    /// Query or transaction failed during execution.
    #[error("wash repository query failed: {message}")]
    Query {
        /// Underlying failure description.
        message: String,
    },
}

impl WashPersistenceError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Field bundle for creating a wash record with both photos.
#[derive(Debug, Clone)]
pub struct NewWashRecord {
    /// Washer logging the event.
    pub washer_id: AccountId,
    /// Plate of the washed truck; resolved or created by the adapter.
    pub license_plate: LicensePlate,
    /// Driver owning the truck.
    pub driver_id: AccountId,
    /// Service tier.
    pub wash_type: WashType,
    /// Charged amount.
    pub price: Price,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Before-wash photo key.
    pub before_key: StorageKey,
    /// After-wash photo key.
    pub after_key: StorageKey,
}

/// Stored state an update compares the submitted payload against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredWash {
    /// Record identifier.
    pub id: Uuid,
    /// Current truck row.
    pub truck_id: Uuid,
    /// Current truck plate.
    pub truck_plate: LicensePlate,
    /// Current truck driver.
    pub truck_driver_id: AccountId,
    /// Current before-slot key, if the row exists.
    pub before_key: Option<StorageKey>,
    /// Current after-slot key, if the row exists.
    pub after_key: Option<StorageKey>,
}

/// Row-level changes an update applies in one transaction.
#[derive(Debug, Clone)]
pub struct WashRowChanges {
    /// Record being updated.
    pub wash_id: Uuid,
    /// Truck currently referenced by the record.
    pub current_truck_id: Uuid,
    /// Planned truck association change.
    pub truck_change: TruckChange,
    /// Replacement service tier.
    pub wash_type: WashType,
    /// Replacement price.
    pub price: Price,
    /// Replacement notes.
    pub notes: Option<String>,
    /// Planned image row changes.
    pub images: ImagePlan,
}

/// Persistence port for wash records and their image attachments.
#[async_trait]
pub trait WashRepository: Send + Sync {
    /// Create a record plus both image rows atomically, resolving or creating
    /// the truck for the plate. Returns the record fully expanded.
    async fn create(&self, record: NewWashRecord) -> Result<WashDetail, WashPersistenceError>;

    /// Fetch the stored state of a record owned by the given washer.
    ///
    /// `None` covers both a missing record and one owned by someone else so
    /// callers cannot distinguish existence.
    async fn find_owned(
        &self,
        wash_id: Uuid,
        washer_id: &AccountId,
    ) -> Result<Option<StoredWash>, WashPersistenceError>;

    /// Apply a reconciliation plan in one transaction and return the updated
    /// record fully expanded.
    async fn apply_update(
        &self,
        changes: WashRowChanges,
    ) -> Result<WashDetail, WashPersistenceError>;

    /// Delete a record owned by the given washer, cascading its image rows.
    ///
    /// Returns the storage keys of the removed attachments for post-commit
    /// object deletion, or `None` when the record is missing or not owned.
    async fn delete_owned(
        &self,
        wash_id: Uuid,
        washer_id: &AccountId,
    ) -> Result<Option<Vec<StorageKey>>, WashPersistenceError>;

    /// List the washer's records, newest wash first, fully expanded.
    async fn list_for_washer(
        &self,
        washer_id: &AccountId,
    ) -> Result<Vec<WashDetail>, WashPersistenceError>;

    /// All storage keys currently referenced by any image row.
    async fn list_image_keys(&self) -> Result<Vec<StorageKey>, WashPersistenceError>;
}
