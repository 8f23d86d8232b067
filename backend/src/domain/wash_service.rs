//! Wash record domain services.
//!
//! The command service owns the reconciliation workflow: plan against stored
//! state, apply row changes through the repository's transaction, then
//! best-effort remove superseded storage objects. A storage failure after
//! commit is logged and swallowed; the database never keeps a reference to a
//! key it considers deleted, though the object itself may survive until the
//! cleanup sweep.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::warn;

use crate::domain::account::{AccountId, Role};
use crate::domain::ports::{
    AccountPersistenceError, AccountRepository, CreateWashRequest, DeleteWashRequest,
    ListWashesRequest, ListWashesResponse, NewWashRecord, ObjectStore, UpdateWashRequest,
    WashCommand, WashDetailPayload, WashPersistenceError, WashQuery, WashRepository,
    WashRowChanges,
};
use crate::domain::reconciliation::{plan_images, plan_truck_change};
use crate::domain::wash::StorageKey;
use crate::domain::Error;

fn map_wash_repository_error(error: WashPersistenceError) -> Error {
    match error {
        WashPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("wash repository unavailable: {message}"))
        }
        WashPersistenceError::Query { message } => {
            Error::internal(format!("wash repository error: {message}"))
        }
    }
}

fn map_account_repository_error(error: AccountPersistenceError) -> Error {
    match error {
        AccountPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("account repository unavailable: {message}"))
        }
        AccountPersistenceError::Query { message }
        | AccountPersistenceError::DuplicateEmail { email: message } => {
            Error::internal(format!("account repository error: {message}"))
        }
    }
}

fn invalid_driver() -> Error {
    Error::invalid_request("invalid driver selected").with_details(json!({
        "field": "driverId",
        "code": "invalid_driver",
    }))
}

fn wash_not_found() -> Error {
    // Missing and not-owned records answer identically so callers cannot
    // probe for existence.
    Error::not_found("wash record not found")
}

/// Wash service implementing the command driving port.
#[derive(Clone)]
pub struct WashCommandService<R, A, S> {
    washes: Arc<R>,
    accounts: Arc<A>,
    store: Arc<S>,
}

impl<R, A, S> WashCommandService<R, A, S> {
    /// Create a new command service over the wash repository, account
    /// repository, and object store.
    pub fn new(washes: Arc<R>, accounts: Arc<A>, store: Arc<S>) -> Self {
        Self {
            washes,
            accounts,
            store,
        }
    }
}

impl<R, A, S> WashCommandService<R, A, S>
where
    R: WashRepository,
    A: AccountRepository,
    S: ObjectStore,
{
    async fn ensure_driver(&self, driver_id: &AccountId) -> Result<(), Error> {
        let account = self
            .accounts
            .find_active_by_id(driver_id)
            .await
            .map_err(map_account_repository_error)?;
        match account {
            Some(account) if account.role() == Role::Driver => Ok(()),
            _ => Err(invalid_driver()),
        }
    }

    async fn remove_storage_objects(&self, keys: &[StorageKey]) {
        for key in keys {
            if let Err(error) = self.store.delete_object(key).await {
                warn!(key = %key, error = %error, "failed to delete photo object from storage");
            }
        }
    }
}

#[async_trait]
impl<R, A, S> WashCommand for WashCommandService<R, A, S>
where
    R: WashRepository,
    A: AccountRepository,
    S: ObjectStore,
{
    async fn create_wash(
        &self,
        request: CreateWashRequest,
    ) -> Result<WashDetailPayload, Error> {
        let CreateWashRequest {
            washer_id,
            submission,
        } = request;
        self.ensure_driver(&submission.driver_id).await?;

        let detail = self
            .washes
            .create(NewWashRecord {
                washer_id,
                license_plate: submission.license_plate,
                driver_id: submission.driver_id,
                wash_type: submission.wash_type,
                price: submission.price,
                notes: submission.notes,
                before_key: submission.before_image,
                after_key: submission.after_image,
            })
            .await
            .map_err(map_wash_repository_error)?;

        Ok(WashDetailPayload::from(detail))
    }

    async fn update_wash(
        &self,
        request: UpdateWashRequest,
    ) -> Result<WashDetailPayload, Error> {
        let UpdateWashRequest {
            washer_id,
            wash_id,
            submission,
        } = request;

        let stored = self
            .washes
            .find_owned(wash_id, &washer_id)
            .await
            .map_err(map_wash_repository_error)?
            .ok_or_else(wash_not_found)?;

        self.ensure_driver(&submission.driver_id).await?;

        let truck_change = plan_truck_change(
            &stored.truck_plate,
            &stored.truck_driver_id,
            &submission.license_plate,
            &submission.driver_id,
        );
        let images = plan_images(
            stored.before_key.as_ref(),
            stored.after_key.as_ref(),
            &submission.before_image,
            &submission.after_image,
        );
        let superseded = images.superseded_keys();

        let detail = self
            .washes
            .apply_update(WashRowChanges {
                wash_id,
                current_truck_id: stored.truck_id,
                truck_change,
                wash_type: submission.wash_type,
                price: submission.price,
                notes: submission.notes,
                images,
            })
            .await
            .map_err(map_wash_repository_error)?;

        // The transaction has committed; object removal must not fail the
        // request from here on.
        self.remove_storage_objects(&superseded).await;

        Ok(WashDetailPayload::from(detail))
    }

    async fn delete_wash(&self, request: DeleteWashRequest) -> Result<(), Error> {
        let keys = self
            .washes
            .delete_owned(request.wash_id, &request.washer_id)
            .await
            .map_err(map_wash_repository_error)?
            .ok_or_else(wash_not_found)?;

        self.remove_storage_objects(&keys).await;
        Ok(())
    }
}

/// Wash service implementing the query driving port.
#[derive(Clone)]
pub struct WashQueryService<R> {
    washes: Arc<R>,
}

impl<R> WashQueryService<R> {
    /// Create a new query service over the wash repository.
    pub fn new(washes: Arc<R>) -> Self {
        Self { washes }
    }
}

#[async_trait]
impl<R> WashQuery for WashQueryService<R>
where
    R: WashRepository,
{
    async fn list_washes(
        &self,
        request: ListWashesRequest,
    ) -> Result<ListWashesResponse, Error> {
        let washes = self
            .washes
            .list_for_washer(&request.washer_id)
            .await
            .map_err(map_wash_repository_error)?;

        Ok(ListWashesResponse {
            washes: washes.into_iter().map(WashDetailPayload::from).collect(),
        })
    }
}

#[cfg(test)]
#[path = "wash_service_tests.rs"]
mod tests;
