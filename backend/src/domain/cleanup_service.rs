//! Manager-triggered storage cleanup sweep.
//!
//! Deletes photo objects strictly older than the requested horizon that no
//! wash image row references any more. Objects left behind by best-effort
//! post-commit deletes are the usual candidates.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::domain::ports::{
    validate_days_old, CleanupRequest, CleanupSweep, ObjectStore, ObjectStoreError,
    StoredObject, SweepOutcome, WashPersistenceError, WashRepository,
};
use crate::domain::upload_service::STORAGE_KEY_PREFIX;
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

/// Pick deletion candidates: strictly older than the cutoff and not
/// referenced by any wash image row. An object exactly at the cutoff
/// survives.
pub(crate) fn select_expired(
    objects: &[StoredObject],
    in_use: &HashSet<StorageKey>,
    cutoff: DateTime<Utc>,
) -> Vec<StorageKey> {
    objects
        .iter()
        .filter(|object| object.last_modified < cutoff && !in_use.contains(&object.key))
        .map(|object| object.key.clone())
        .collect()
}

/// Sweep service implementing the cleanup driving port.
#[derive(Clone)]
pub struct CleanupService<R, S> {
    washes: Arc<R>,
    store: Arc<S>,
}

impl<R, S> CleanupService<R, S> {
    /// Create a new sweep service over the wash repository and object store.
    pub fn new(washes: Arc<R>, store: Arc<S>) -> Self {
        Self { washes, store }
    }
}

#[async_trait]
impl<R, S> CleanupSweep for CleanupService<R, S>
where
    R: WashRepository,
    S: ObjectStore,
{
    async fn sweep(&self, request: CleanupRequest) -> Result<SweepOutcome, Error> {
        validate_days_old(request.days_old)?;

        let in_use: HashSet<StorageKey> = self
            .washes
            .list_image_keys()
            .await
            .map_err(map_wash_repository_error)?
            .into_iter()
            .collect();

        let listing_prefix = format!("{STORAGE_KEY_PREFIX}/");
        let objects = self
            .store
            .list_objects(&listing_prefix)
            .await
            .map_err(map_object_store_error)?;

        let cutoff = Utc::now() - Duration::days(request.days_old);
        let candidates = select_expired(&objects, &in_use, cutoff);
        if candidates.is_empty() {
            return Ok(SweepOutcome { deleted: 0 });
        }

        self.store
            .delete_objects(&candidates)
            .await
            .map_err(map_object_store_error)?;

        Ok(SweepOutcome {
            deleted: candidates.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the cleanup sweep.
    use std::sync::Mutex;
    use std::time::Duration as StdDuration;

    use rstest::rstest;
    use uuid::Uuid;

    use super::*;
    use crate::domain::account::AccountId;
    use crate::domain::ports::{NewWashRecord, StoredWash, WashRowChanges};
    use crate::domain::wash::WashDetail;
    use crate::domain::ErrorCode;

    fn key(raw: &str) -> StorageKey {
        StorageKey::new(raw).expect("valid test key")
    }

    fn object(raw: &str, age_days: i64) -> StoredObject {
        StoredObject {
            key: key(raw),
            last_modified: Utc::now() - Duration::days(age_days),
        }
    }

    struct StubWashRepository {
        in_use: Vec<StorageKey>,
    }

    #[async_trait]
    impl WashRepository for StubWashRepository {
        async fn create(
            &self,
            _record: NewWashRecord,
        ) -> Result<WashDetail, WashPersistenceError> {
            Err(WashPersistenceError::query("not supported in stub"))
        }

        async fn find_owned(
            &self,
            _wash_id: Uuid,
            _washer_id: &AccountId,
        ) -> Result<Option<StoredWash>, WashPersistenceError> {
            Ok(None)
        }

        async fn apply_update(
            &self,
            _changes: WashRowChanges,
        ) -> Result<WashDetail, WashPersistenceError> {
            Err(WashPersistenceError::query("not supported in stub"))
        }

        async fn delete_owned(
            &self,
            _wash_id: Uuid,
            _washer_id: &AccountId,
        ) -> Result<Option<Vec<StorageKey>>, WashPersistenceError> {
            Ok(None)
        }

        async fn list_for_washer(
            &self,
            _washer_id: &AccountId,
        ) -> Result<Vec<WashDetail>, WashPersistenceError> {
            Ok(Vec::new())
        }

        async fn list_image_keys(&self) -> Result<Vec<StorageKey>, WashPersistenceError> {
            Ok(self.in_use.clone())
        }
    }

    #[derive(Default)]
    struct StubObjectStore {
        objects: Vec<StoredObject>,
        deleted: Mutex<Vec<StorageKey>>,
        fail_delete: bool,
    }

    impl StubObjectStore {
        fn deleted(&self) -> Vec<StorageKey> {
            self.deleted.lock().expect("deleted lock").clone()
        }
    }

    #[async_trait]
    impl ObjectStore for StubObjectStore {
        fn presign_put(
            &self,
            key: &StorageKey,
            _content_type: &str,
            _expires_in: StdDuration,
        ) -> Result<String, ObjectStoreError> {
            Ok(format!("https://storage.invalid/put/{key}"))
        }

        fn presign_get(
            &self,
            key: &StorageKey,
            _expires_in: StdDuration,
        ) -> Result<String, ObjectStoreError> {
            Ok(format!("https://storage.invalid/get/{key}"))
        }

        async fn delete_object(&self, key: &StorageKey) -> Result<(), ObjectStoreError> {
            self.deleted.lock().expect("deleted lock").push(key.clone());
            Ok(())
        }

        async fn delete_objects(
            &self,
            keys: &[StorageKey],
        ) -> Result<(), ObjectStoreError> {
            if self.fail_delete {
                return Err(ObjectStoreError::upstream(500, "bulk delete failed"));
            }
            self.deleted
                .lock()
                .expect("deleted lock")
                .extend(keys.iter().cloned());
            Ok(())
        }

        async fn list_objects(
            &self,
            _prefix: &str,
        ) -> Result<Vec<StoredObject>, ObjectStoreError> {
            Ok(self.objects.clone())
        }
    }

    #[rstest]
    fn exactly_aged_objects_survive_the_boundary() {
        let cutoff = Utc::now();
        let objects = vec![
            StoredObject {
                key: key("washes/old"),
                last_modified: cutoff - Duration::seconds(1),
            },
            StoredObject {
                key: key("washes/boundary"),
                last_modified: cutoff,
            },
            StoredObject {
                key: key("washes/fresh"),
                last_modified: cutoff + Duration::seconds(1),
            },
        ];

        let expired = select_expired(&objects, &HashSet::new(), cutoff);
        assert_eq!(expired, vec![key("washes/old")]);
    }

    #[rstest]
    fn in_use_keys_survive_regardless_of_age() {
        let cutoff = Utc::now();
        let objects = vec![
            StoredObject {
                key: key("washes/referenced"),
                last_modified: cutoff - Duration::days(400),
            },
            StoredObject {
                key: key("washes/orphaned"),
                last_modified: cutoff - Duration::days(400),
            },
        ];
        let in_use: HashSet<StorageKey> = [key("washes/referenced")].into_iter().collect();

        let expired = select_expired(&objects, &in_use, cutoff);
        assert_eq!(expired, vec![key("washes/orphaned")]);
    }

    #[rstest]
    #[tokio::test]
    async fn sweep_deletes_only_aged_unreferenced_objects() {
        let washes = Arc::new(StubWashRepository {
            in_use: vec![key("washes/referenced")],
        });
        let store = Arc::new(StubObjectStore {
            objects: vec![
                object("washes/referenced", 90),
                object("washes/orphaned", 90),
                object("washes/recent", 5),
            ],
            ..StubObjectStore::default()
        });
        let service = CleanupService::new(washes, store.clone());

        let outcome = service
            .sweep(CleanupRequest { days_old: 30 })
            .await
            .expect("sweep succeeds");

        assert_eq!(outcome.deleted, 1);
        assert_eq!(store.deleted(), vec![key("washes/orphaned")]);
    }

    #[rstest]
    #[tokio::test]
    async fn sweep_with_no_candidates_skips_the_delete_call() {
        let washes = Arc::new(StubWashRepository { in_use: Vec::new() });
        let store = Arc::new(StubObjectStore {
            objects: vec![object("washes/recent", 1)],
            fail_delete: true,
            ..StubObjectStore::default()
        });
        let service = CleanupService::new(washes, store);

        let outcome = service
            .sweep(CleanupRequest { days_old: 30 })
            .await
            .expect("sweep succeeds without deleting");

        assert_eq!(outcome.deleted, 0);
    }

    #[rstest]
    #[tokio::test]
    async fn invalid_horizon_fails_before_any_storage_call() {
        let washes = Arc::new(StubWashRepository { in_use: Vec::new() });
        let store = Arc::new(StubObjectStore::default());
        let service = CleanupService::new(washes, store);

        let err = service
            .sweep(CleanupRequest { days_old: 0 })
            .await
            .expect_err("invalid horizon must fail");

        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[tokio::test]
    async fn storage_failure_surfaces_as_sweep_failure() {
        let washes = Arc::new(StubWashRepository { in_use: Vec::new() });
        let store = Arc::new(StubObjectStore {
            objects: vec![object("washes/orphaned", 90)],
            fail_delete: true,
            ..StubObjectStore::default()
        });
        let service = CleanupService::new(washes, store);

        let err = service
            .sweep(CleanupRequest { days_old: 30 })
            .await
            .expect_err("storage failure must surface");

        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
