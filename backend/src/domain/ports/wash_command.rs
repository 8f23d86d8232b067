//! Driving port for wash-record mutations.
//!
//! Requests carry validated domain newtypes; handlers parse raw payloads at
//! the boundary so services and fixtures never see unchecked strings.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::account::{AccountId, Role};
use crate::domain::ports::user_directory::{fixture_account_payload, AccountPayload};
use crate::domain::truck::LicensePlate;
use crate::domain::wash::{ImageSlot, Price, StorageKey, WashDetail, WashType};
use crate::domain::Error;

/// Serializable truck payload for driving ports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TruckPayload {
    /// Stable identifier.
    pub id: Uuid,
    /// Unique plate.
    pub license_plate: LicensePlate,
    /// Owning driver account.
    pub driver_id: AccountId,
}

/// Serializable image attachment payload for driving ports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WashImagePayload {
    /// Slot the photo fills.
    pub image_type: ImageSlot,
    /// Object storage key.
    pub image_key: StorageKey,
}

/// Serializable expanded wash record for driving ports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WashDetailPayload {
    /// Record identifier.
    pub id: Uuid,
    /// Service tier.
    pub wash_type: WashType,
    /// Charged amount.
    pub price: Price,
    /// Free-text notes.
    pub notes: Option<String>,
    /// When the wash happened.
    pub wash_date: DateTime<Utc>,
    /// Row creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
    /// Washed truck.
    pub truck: TruckPayload,
    /// Driver owning the truck.
    pub driver: AccountPayload,
    /// Washer who logged the record.
    pub washer: AccountPayload,
    /// Before-wash photo.
    pub before_image: WashImagePayload,
    /// After-wash photo.
    pub after_image: WashImagePayload,
}

impl From<WashDetail> for WashDetailPayload {
    fn from(value: WashDetail) -> Self {
        Self {
            id: value.record.id,
            wash_type: value.record.wash_type,
            price: value.record.price,
            notes: value.record.notes,
            wash_date: value.record.wash_date,
            created_at: value.record.created_at,
            updated_at: value.record.updated_at,
            truck: TruckPayload {
                id: value.truck.id,
                license_plate: value.truck.license_plate,
                driver_id: value.truck.driver_id,
            },
            driver: AccountPayload::from(value.driver),
            washer: AccountPayload::from(value.washer),
            before_image: WashImagePayload {
                image_type: value.before.slot,
                image_key: value.before.key,
            },
            after_image: WashImagePayload {
                image_type: value.after.slot,
                image_key: value.after.key,
            },
        }
    }
}

/// Validated field set shared by create and update.
#[derive(Debug, Clone, PartialEq)]
pub struct WashSubmission {
    /// Plate of the washed truck.
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
    pub before_image: StorageKey,
    /// After-wash photo key.
    pub after_image: StorageKey,
}

/// Request to create a wash record.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateWashRequest {
    /// Authenticated washer logging the event.
    pub washer_id: AccountId,
    /// Validated fields.
    pub submission: WashSubmission,
}

/// Request to update a wash record.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateWashRequest {
    /// Authenticated washer; must own the record.
    pub washer_id: AccountId,
    /// Record being updated.
    pub wash_id: Uuid,
    /// Validated replacement fields.
    pub submission: WashSubmission,
}

/// Request to delete a wash record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteWashRequest {
    /// Authenticated washer; must own the record.
    pub washer_id: AccountId,
    /// Record being deleted.
    pub wash_id: Uuid,
}

/// Driving port for wash write operations.
#[async_trait]
pub trait WashCommand: Send + Sync {
    /// Create a record with both photos; may create a truck as a side effect.
    async fn create_wash(&self, request: CreateWashRequest)
        -> Result<WashDetailPayload, Error>;

    /// Reconcile and update an owned record.
    async fn update_wash(&self, request: UpdateWashRequest)
        -> Result<WashDetailPayload, Error>;

    /// Delete an owned record and best-effort remove its photos.
    async fn delete_wash(&self, request: DeleteWashRequest) -> Result<(), Error>;
}

const FIXTURE_WASH_ID: &str = "00000000-0000-0000-0000-000000000901";
const FIXTURE_TRUCK_ID: &str = "00000000-0000-0000-0000-000000000201";

fn fixture_timestamp() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-06-12T09:00:00Z")
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .unwrap_or_else(|err| panic!("fixture timestamp must parse: {err}"))
}

fn fixture_uuid(raw: &str) -> Result<Uuid, Error> {
    Uuid::parse_str(raw).map_err(|err| Error::internal(format!("invalid fixture uuid: {err}")))
}

fn fixture_detail(
    wash_id: Uuid,
    washer_id: AccountId,
    submission: WashSubmission,
) -> Result<WashDetailPayload, Error> {
    Ok(WashDetailPayload {
        id: wash_id,
        wash_type: submission.wash_type,
        price: submission.price,
        notes: submission.notes,
        wash_date: fixture_timestamp(),
        created_at: fixture_timestamp(),
        updated_at: fixture_timestamp(),
        truck: TruckPayload {
            id: fixture_uuid(FIXTURE_TRUCK_ID)?,
            license_plate: submission.license_plate,
            driver_id: submission.driver_id,
        },
        driver: fixture_account_payload(submission.driver_id, Role::Driver),
        washer: fixture_account_payload(washer_id, Role::Washer),
        before_image: WashImagePayload {
            image_type: ImageSlot::Before,
            image_key: submission.before_image,
        },
        after_image: WashImagePayload {
            image_type: ImageSlot::After,
            image_key: submission.after_image,
        },
    })
}

/// Fixture command implementation echoing submissions back as details.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureWashCommand;

#[async_trait]
impl WashCommand for FixtureWashCommand {
    async fn create_wash(
        &self,
        request: CreateWashRequest,
    ) -> Result<WashDetailPayload, Error> {
        let wash_id = fixture_uuid(FIXTURE_WASH_ID)?;
        fixture_detail(wash_id, request.washer_id, request.submission)
    }

    async fn update_wash(
        &self,
        request: UpdateWashRequest,
    ) -> Result<WashDetailPayload, Error> {
        fixture_detail(request.wash_id, request.washer_id, request.submission)
    }

    async fn delete_wash(&self, _request: DeleteWashRequest) -> Result<(), Error> {
        Ok(())
    }
}
