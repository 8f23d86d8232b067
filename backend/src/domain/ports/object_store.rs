//! Driven port for the external object store.
//!
//! Photos never pass through this service; clients upload and view them via
//! time-limited presigned URLs. The port therefore covers URL minting plus
//! the maintenance operations (delete, list) used by reconciliation and the
//! cleanup sweep.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::wash::StorageKey;

/// Errors surfaced by the object-store adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObjectStoreError {
    /// Request could not be signed or assembled.
    #[error("object store request signing failed: {message}")]
    Signing {
        /// Underlying failure description.
        message: String,
    },
    /// Transport-level failure talking to the store.
    #[error("object store transport failure: {message}")]
    Transport {
        /// Underlying failure description.
        message: String,
    },
    /// The store answered with a non-success status.
    #[error("object store returned status {status}: {message}")]
    Upstream {
        /// HTTP status code.
        status: u16,
        /// Body preview or reason.
        message: String,
    },
    /// A response body could not be decoded.
    #[error("object store response decoding failed: {message}")]
    Decode {
        /// Underlying failure description.
        message: String,
    },
}

impl ObjectStoreError {
    /// Helper for signing failures.
    pub fn signing(message: impl Into<String>) -> Self {
        Self::Signing {
            message: message.into(),
        }
    }

    /// Helper for transport failures.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Helper for non-success statuses.
    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    /// Helper for decode failures.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

/// Listing entry returned by [`ObjectStore::list_objects`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Object key.
    pub key: StorageKey,
    /// Last-modified timestamp reported by the store.
    pub last_modified: DateTime<Utc>,
}

/// Port for the S3-compatible object store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Mint a presigned PUT URL for uploading one photo.
    fn presign_put(
        &self,
        key: &StorageKey,
        content_type: &str,
        expires_in: Duration,
    ) -> Result<String, ObjectStoreError>;

    /// Mint a presigned GET URL for viewing one photo.
    fn presign_get(
        &self,
        key: &StorageKey,
        expires_in: Duration,
    ) -> Result<String, ObjectStoreError>;

    /// Delete a single object. Deleting an absent key succeeds.
    async fn delete_object(&self, key: &StorageKey) -> Result<(), ObjectStoreError>;

    /// Delete a batch of objects, failing on the first error.
    async fn delete_objects(&self, keys: &[StorageKey]) -> Result<(), ObjectStoreError>;

    /// List every object under the given key prefix.
    async fn list_objects(&self, prefix: &str) -> Result<Vec<StoredObject>, ObjectStoreError>;
}
