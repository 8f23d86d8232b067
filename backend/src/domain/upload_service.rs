//! Upload broker service.
//!
//! Validates the declared content type and size, generates a namespaced
//! storage key, and mints a presigned PUT/GET pair. The key embeds the
//! acting user, a date partition, and the image slot so per-user objects
//! stay groupable and never collide.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rand::RngCore;

use crate::domain::account::AccountId;
use crate::domain::ports::{
    validate_upload, IssueUploadRequest, ObjectStore, ObjectStoreError, UploadBroker,
    UploadGrant,
};
use crate::domain::wash::{ImageSlot, StorageKey};
use crate::domain::Error;

/// Key prefix shared with the cleanup sweep.
pub const STORAGE_KEY_PREFIX: &str = "washes";

/// Expiry of the presigned PUT URL.
pub const UPLOAD_URL_EXPIRY: Duration = Duration::from_secs(60 * 60);

/// Expiry of the presigned GET URL used for previewing.
pub const VIEW_URL_EXPIRY: Duration = Duration::from_secs(24 * 60 * 60);

fn map_object_store_error(error: ObjectStoreError) -> Error {
    match error {
        ObjectStoreError::Signing { message } | ObjectStoreError::Decode { message } => {
            Error::internal(format!("object store error: {message}"))
        }
        ObjectStoreError::Transport { message } => {
            Error::service_unavailable(format!("object store unreachable: {message}"))
        }
        ObjectStoreError::Upstream { status, message } => Error::service_unavailable(format!(
            "object store returned status {status}: {message}"
        )),
    }
}

/// Build the namespaced key for one uploaded photo.
pub(crate) fn generate_storage_key(
    user_id: &AccountId,
    slot: ImageSlot,
    date: NaiveDate,
    file_name: &str,
) -> Result<StorageKey, Error> {
    StorageKey::new(format!(
        "{STORAGE_KEY_PREFIX}/{user_id}/{date}/{}/{file_name}",
        slot.as_str()
    ))
    .map_err(|err| Error::internal(format!("generated storage key invalid: {err}")))
}

fn random_file_name(file_type: &str) -> String {
    let extension = file_type.split_once('/').map_or("bin", |(_, subtype)| subtype);
    let mut bytes = [0_u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!("{}.{extension}", hex::encode(bytes))
}

/// Broker service implementing the upload driving port.
#[derive(Clone)]
pub struct UploadBrokerService<S> {
    store: Arc<S>,
}

impl<S> UploadBrokerService<S> {
    /// Create a new broker over the object store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S> UploadBroker for UploadBrokerService<S>
where
    S: ObjectStore,
{
    async fn issue_upload(&self, request: IssueUploadRequest) -> Result<UploadGrant, Error> {
        validate_upload(&request.file_type, request.file_size)?;

        let file_name = random_file_name(&request.file_type);
        let key = generate_storage_key(
            &request.user_id,
            request.image_type,
            Utc::now().date_naive(),
            &file_name,
        )?;

        let upload_url = self
            .store
            .presign_put(&key, &request.file_type, UPLOAD_URL_EXPIRY)
            .map_err(map_object_store_error)?;
        let view_url = self
            .store
            .presign_get(&key, VIEW_URL_EXPIRY)
            .map_err(map_object_store_error)?;

        Ok(UploadGrant {
            upload_url,
            key,
            view_url,
        })
    }
}
