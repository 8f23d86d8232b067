//! PostgreSQL-backed `WashRepository` implementation using Diesel ORM.
//!
//! This adapter owns the transactional boundaries of the wash workflows:
//! creation persists the record and both image rows atomically, and an update
//! applies the whole reconciliation plan inside one transaction so partial
//! row changes are never observable. Storage objects are someone else's
//! problem; only keys pass through here.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::account::{Account, AccountId};
use crate::domain::ports::{
    NewWashRecord, StoredWash, WashPersistenceError, WashRepository, WashRowChanges,
};
use crate::domain::reconciliation::{SlotChange, TruckChange};
use crate::domain::truck::{LicensePlate, Truck};
use crate::domain::wash::{
    ImageSlot, Price, StorageKey, WashDetail, WashImage, WashRecord, WashType,
};

use super::diesel_account_repository::row_to_account;
use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{
    AccountRow, NewTruckRow, NewWashImageRow, NewWashRecordRow, TruckRow,
    WashImageRow, WashRecordChangesRow, WashRecordRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{accounts, trucks, wash_images, wash_records};

/// Diesel-backed implementation of the wash repository port.
#[derive(Clone)]
pub struct DieselWashRepository {
    pool: DbPool,
}

impl DieselWashRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> WashPersistenceError {
    map_pool_error(error, WashPersistenceError::connection)
}

fn map_diesel(error: diesel::result::Error) -> WashPersistenceError {
    map_diesel_error(
        error,
        WashPersistenceError::query,
        WashPersistenceError::connection,
    )
}

/// Transaction-internal error that satisfies diesel-async's `From` bound
/// while carrying already-mapped domain failures through rollback.
#[derive(Debug)]
enum TxError {
    Diesel(diesel::result::Error),
    Domain(WashPersistenceError),
}

impl From<diesel::result::Error> for TxError {
    fn from(value: diesel::result::Error) -> Self {
        Self::Diesel(value)
    }
}

fn map_tx_error(error: TxError) -> WashPersistenceError {
    match error {
        TxError::Diesel(inner) => map_diesel(inner),
        TxError::Domain(inner) => inner,
    }
}

fn decode_error(field: &str, err: impl std::fmt::Display) -> TxError {
    TxError::Domain(WashPersistenceError::query(format!(
        "decode {field}: {err}"
    )))
}

/// Convert a trucks row into the domain truck.
fn row_to_truck(row: TruckRow) -> Result<Truck, TxError> {
    Ok(Truck {
        id: row.id,
        license_plate: LicensePlate::new(row.license_plate)
            .map_err(|err| decode_error("license plate", err))?,
        driver_id: AccountId::from_uuid(row.driver_id),
    })
}

/// Convert a wash_records row into the domain scalar record.
fn row_to_record(row: WashRecordRow) -> Result<WashRecord, TxError> {
    Ok(WashRecord {
        id: row.id,
        truck_id: row.truck_id,
        washer_id: AccountId::from_uuid(row.washer_id),
        wash_type: row
            .wash_type
            .parse::<WashType>()
            .map_err(|err| decode_error("wash type", err))?,
        price: Price::new(row.price).map_err(|err| decode_error("price", err))?,
        notes: row.notes,
        wash_date: row.wash_date,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

/// Convert a wash_images row into the domain attachment.
fn row_to_image(row: WashImageRow) -> Result<WashImage, TxError> {
    Ok(WashImage {
        slot: row
            .image_type
            .parse::<ImageSlot>()
            .map_err(|err| decode_error("image type", err))?,
        key: StorageKey::new(row.image_key).map_err(|err| decode_error("image key", err))?,
    })
}

async fn load_account(conn: &mut AsyncPgConnection, id: Uuid) -> Result<Account, TxError> {
    let row = accounts::table
        .find(id)
        .select(AccountRow::as_select())
        .first::<AccountRow>(conn)
        .await?;
    row_to_account(row).map_err(|err| decode_error("account", err))
}

/// Load both image attachments of a record, failing if either slot is empty.
async fn load_images(
    conn: &mut AsyncPgConnection,
    wash_record_id: Uuid,
) -> Result<(WashImage, WashImage), TxError> {
    let rows: Vec<WashImageRow> = wash_images::table
        .filter(wash_images::wash_record_id.eq(wash_record_id))
        .select(WashImageRow::as_select())
        .load(conn)
        .await?;

    let mut before = None;
    let mut after = None;
    for row in rows {
        let image = row_to_image(row)?;
        match image.slot {
            ImageSlot::Before => before = Some(image),
            ImageSlot::After => after = Some(image),
        }
    }

    let slot_missing = |slot: ImageSlot| {
        TxError::Domain(WashPersistenceError::query(format!(
            "wash record {wash_record_id} is missing its {slot} image"
        )))
    };
    Ok((
        before.ok_or_else(|| slot_missing(ImageSlot::Before))?,
        after.ok_or_else(|| slot_missing(ImageSlot::After))?,
    ))
}

/// Expand a record row with its truck, driver, washer, and both photos.
async fn load_detail(
    conn: &mut AsyncPgConnection,
    row: WashRecordRow,
) -> Result<WashDetail, TxError> {
    let truck_row: TruckRow = trucks::table
        .find(row.truck_id)
        .select(TruckRow::as_select())
        .first(conn)
        .await?;

    let washer = load_account(conn, row.washer_id).await?;
    let driver = load_account(conn, truck_row.driver_id).await?;
    let (before, after) = load_images(conn, row.id).await?;

    Ok(WashDetail {
        record: row_to_record(row)?,
        truck: row_to_truck(truck_row)?,
        driver,
        washer,
        before,
        after,
    })
}

/// Resolve the truck row for a plate, creating it when unseen.
///
/// With `repoint_driver` set, an existing truck whose driver differs from the
/// submitted one is updated in place; reconciliation's `Reassign` reuses the
/// existing row untouched instead.
async fn resolve_truck(
    conn: &mut AsyncPgConnection,
    plate: &LicensePlate,
    driver_id: &AccountId,
    repoint_driver: bool,
) -> Result<TruckRow, TxError> {
    let existing: Option<TruckRow> = trucks::table
        .filter(trucks::license_plate.eq(plate.as_ref()))
        .select(TruckRow::as_select())
        .first(conn)
        .await
        .optional()?;

    match existing {
        Some(truck) if repoint_driver && truck.driver_id != *driver_id.as_uuid() => {
            let updated: TruckRow = diesel::update(trucks::table.find(truck.id))
                .set(trucks::driver_id.eq(driver_id.as_uuid()))
                .returning(TruckRow::as_returning())
                .get_result(conn)
                .await?;
            Ok(updated)
        }
        Some(truck) => Ok(truck),
        None => {
            let row = NewTruckRow {
                id: Uuid::new_v4(),
                license_plate: plate.as_ref(),
                driver_id: *driver_id.as_uuid(),
            };
            let inserted: TruckRow = diesel::insert_into(trucks::table)
                .values(&row)
                .returning(TruckRow::as_returning())
                .get_result(conn)
                .await?;
            Ok(inserted)
        }
    }
}

async fn insert_image(
    conn: &mut AsyncPgConnection,
    wash_record_id: Uuid,
    image: &WashImage,
) -> Result<(), TxError> {
    let row = NewWashImageRow {
        id: Uuid::new_v4(),
        wash_record_id,
        image_type: image.slot.as_str(),
        image_key: image.key.as_str(),
    };
    diesel::insert_into(wash_images::table)
        .values(&row)
        .execute(conn)
        .await?;
    Ok(())
}

async fn find_owned_row(
    conn: &mut AsyncPgConnection,
    wash_id: Uuid,
    washer_id: &AccountId,
) -> Result<Option<WashRecordRow>, TxError> {
    let row = wash_records::table
        .filter(wash_records::id.eq(wash_id))
        .filter(wash_records::washer_id.eq(washer_id.as_uuid()))
        .select(WashRecordRow::as_select())
        .first::<WashRecordRow>(conn)
        .await
        .optional()?;
    Ok(row)
}

#[async_trait]
impl WashRepository for DieselWashRepository {
    async fn create(&self, record: NewWashRecord) -> Result<WashDetail, WashPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let record = &record;
        conn.transaction::<_, TxError, _>(|conn| {
            async move {
                let truck =
                    resolve_truck(conn, &record.license_plate, &record.driver_id, true).await?;

                let row = NewWashRecordRow {
                    id: Uuid::new_v4(),
                    truck_id: truck.id,
                    washer_id: *record.washer_id.as_uuid(),
                    wash_type: record.wash_type.as_str(),
                    price: record.price.as_decimal(),
                    notes: record.notes.as_deref(),
                };
                let inserted: WashRecordRow = diesel::insert_into(wash_records::table)
                    .values(&row)
                    .returning(WashRecordRow::as_returning())
                    .get_result(conn)
                    .await?;

                insert_image(
                    conn,
                    inserted.id,
                    &WashImage {
                        slot: ImageSlot::Before,
                        key: record.before_key.clone(),
                    },
                )
                .await?;
                insert_image(
                    conn,
                    inserted.id,
                    &WashImage {
                        slot: ImageSlot::After,
                        key: record.after_key.clone(),
                    },
                )
                .await?;

                load_detail(conn, inserted).await
            }
            .scope_boxed()
        })
        .await
        .map_err(map_tx_error)
    }

    async fn find_owned(
        &self,
        wash_id: Uuid,
        washer_id: &AccountId,
    ) -> Result<Option<StoredWash>, WashPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        // One transaction so the record, truck, and images are a consistent
        // snapshot for planning.
        conn.transaction::<_, TxError, _>(|conn| {
            async move {
                let Some(row) = find_owned_row(conn, wash_id, washer_id).await? else {
                    return Ok(None);
                };

                let truck: TruckRow = trucks::table
                    .find(row.truck_id)
                    .select(TruckRow::as_select())
                    .first(conn)
                    .await?;

                let images: Vec<WashImageRow> = wash_images::table
                    .filter(wash_images::wash_record_id.eq(row.id))
                    .select(WashImageRow::as_select())
                    .load(conn)
                    .await?;

                let mut before_key = None;
                let mut after_key = None;
                for image_row in images {
                    let image = row_to_image(image_row)?;
                    match image.slot {
                        ImageSlot::Before => before_key = Some(image.key),
                        ImageSlot::After => after_key = Some(image.key),
                    }
                }

                Ok(Some(StoredWash {
                    id: row.id,
                    truck_id: truck.id,
                    truck_plate: LicensePlate::new(truck.license_plate)
                        .map_err(|err| decode_error("license plate", err))?,
                    truck_driver_id: AccountId::from_uuid(truck.driver_id),
                    before_key,
                    after_key,
                }))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_tx_error)
    }

    async fn apply_update(
        &self,
        changes: WashRowChanges,
    ) -> Result<WashDetail, WashPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let changes = &changes;
        conn.transaction::<_, TxError, _>(|conn| {
            async move {
                let truck_id = match &changes.truck_change {
                    TruckChange::Keep => changes.current_truck_id,
                    TruckChange::RepointDriver { driver_id } => {
                        diesel::update(trucks::table.find(changes.current_truck_id))
                            .set(trucks::driver_id.eq(driver_id.as_uuid()))
                            .execute(conn)
                            .await?;
                        changes.current_truck_id
                    }
                    TruckChange::Reassign { plate, driver_id } => {
                        resolve_truck(conn, plate, driver_id, false).await?.id
                    }
                };

                for (slot, change) in [
                    (ImageSlot::Before, &changes.images.before),
                    (ImageSlot::After, &changes.images.after),
                ] {
                    if matches!(change, SlotChange::Replace { .. }) {
                        diesel::delete(
                            wash_images::table
                                .filter(wash_images::wash_record_id.eq(changes.wash_id))
                                .filter(wash_images::image_type.eq(slot.as_str())),
                        )
                        .execute(conn)
                        .await?;
                    }
                }

                let changeset = WashRecordChangesRow {
                    truck_id,
                    wash_type: changes.wash_type.as_str(),
                    price: changes.price.as_decimal(),
                    notes: changes.notes.as_deref(),
                    updated_at: Utc::now(),
                };
                let updated: WashRecordRow =
                    diesel::update(wash_records::table.find(changes.wash_id))
                        .set(&changeset)
                        .returning(WashRecordRow::as_returning())
                        .get_result(conn)
                        .await?;

                for image in changes.images.rows_to_insert() {
                    insert_image(conn, changes.wash_id, &image).await?;
                }

                load_detail(conn, updated).await
            }
            .scope_boxed()
        })
        .await
        .map_err(map_tx_error)
    }

    async fn delete_owned(
        &self,
        wash_id: Uuid,
        washer_id: &AccountId,
    ) -> Result<Option<Vec<StorageKey>>, WashPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        conn.transaction::<_, TxError, _>(|conn| {
            async move {
                let Some(row) = find_owned_row(conn, wash_id, washer_id).await? else {
                    return Ok(None);
                };

                // Capture keys before the delete cascades the image rows.
                let raw_keys: Vec<String> = wash_images::table
                    .filter(wash_images::wash_record_id.eq(row.id))
                    .select(wash_images::image_key)
                    .load(conn)
                    .await?;

                diesel::delete(wash_records::table.find(row.id))
                    .execute(conn)
                    .await?;

                let keys = raw_keys
                    .into_iter()
                    .map(|raw| {
                        StorageKey::new(raw).map_err(|err| decode_error("image key", err))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Some(keys))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_tx_error)
    }

    async fn list_for_washer(
        &self,
        washer_id: &AccountId,
    ) -> Result<Vec<WashDetail>, WashPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        conn.transaction::<_, TxError, _>(|conn| {
            async move {
                let rows: Vec<WashRecordRow> = wash_records::table
                    .filter(wash_records::washer_id.eq(washer_id.as_uuid()))
                    .order((wash_records::wash_date.desc(), wash_records::id.desc()))
                    .select(WashRecordRow::as_select())
                    .load(conn)
                    .await?;

                let mut details = Vec::with_capacity(rows.len());
                for row in rows {
                    details.push(load_detail(conn, row).await?);
                }
                Ok(details)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_tx_error)
    }

    async fn list_image_keys(&self) -> Result<Vec<StorageKey>, WashPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let raw_keys: Vec<String> = wash_images::table
            .select(wash_images::image_key)
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        raw_keys
            .into_iter()
            .map(|raw| {
                StorageKey::new(raw)
                    .map_err(|err| WashPersistenceError::query(format!("decode image key: {err}")))
            })
            .collect()
    }
}
