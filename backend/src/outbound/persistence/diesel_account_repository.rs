//! PostgreSQL-backed `AccountRepository` implementation using Diesel ORM.
//!
//! Lookups exclude soft-deleted rows; the rows themselves are never removed
//! because wash records keep foreign keys into the accounts table. Federated
//! provisioning runs its count-and-insert inside one serializable transaction
//! so two concurrent first logins cannot both become manager.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::account::{Account, AccountDraft, AccountId, EmailAddress, FullName, Role};
use crate::domain::auth::FederatedProfile;
use crate::domain::password::PasswordHash;
use crate::domain::ports::{
    AccountChanges, AccountPersistenceError, AccountRepository, NewAccount,
};

use super::diesel_error_mapping::{is_unique_violation, map_diesel_error, map_pool_error};
use super::models::{AccountChangesRow, AccountRow, NewAccountRow};
use super::pool::{DbPool, PoolError};
use super::schema::accounts;

/// Diesel-backed implementation of the account repository port.
#[derive(Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
}

impl DieselAccountRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> AccountPersistenceError {
    map_pool_error(error, AccountPersistenceError::connection)
}

fn map_diesel(error: diesel::result::Error) -> AccountPersistenceError {
    map_diesel_error(
        error,
        AccountPersistenceError::query,
        AccountPersistenceError::connection,
    )
}

/// Map an insert failure, turning unique-email violations into conflicts.
fn map_insert_error(error: diesel::result::Error, email: &EmailAddress) -> AccountPersistenceError {
    if is_unique_violation(&error) {
        AccountPersistenceError::duplicate_email(email.as_ref())
    } else {
        map_diesel(error)
    }
}

/// Transaction-internal error that satisfies diesel-async's `From` bound
/// while carrying already-mapped domain failures through rollback.
enum TxError {
    Diesel(diesel::result::Error),
    Domain(AccountPersistenceError),
}

impl From<diesel::result::Error> for TxError {
    fn from(value: diesel::result::Error) -> Self {
        Self::Diesel(value)
    }
}

fn map_tx_error(error: TxError, email: &EmailAddress) -> AccountPersistenceError {
    match error {
        TxError::Diesel(inner) => map_insert_error(inner, email),
        TxError::Domain(inner) => inner,
    }
}

/// Convert a database row into a validated domain account.
///
/// Shared with the wash repository, which expands drivers and washers.
pub(crate) fn row_to_account(row: AccountRow) -> Result<Account, AccountPersistenceError> {
    let AccountRow {
        id,
        email,
        full_name,
        role,
        password_hash,
        deleted_at,
        created_at,
        updated_at,
    } = row;

    let email = EmailAddress::new(email)
        .map_err(|err| AccountPersistenceError::query(format!("decode email: {err}")))?;
    let full_name = FullName::new(full_name)
        .map_err(|err| AccountPersistenceError::query(format!("decode full name: {err}")))?;
    let role = role
        .parse::<Role>()
        .map_err(|err| AccountPersistenceError::query(format!("decode role: {err}")))?;
    let password_hash = password_hash
        .map(PasswordHash::parse)
        .transpose()
        .map_err(|err| AccountPersistenceError::query(format!("decode password hash: {err}")))?;

    Ok(Account::new(AccountDraft {
        id: AccountId::from_uuid(id),
        email,
        full_name,
        role,
        password_hash,
        deleted_at,
        created_at,
        updated_at,
    }))
}

#[async_trait]
impl AccountRepository for DieselAccountRepository {
    async fn find_active_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Account>, AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = accounts::table
            .filter(accounts::email.eq(email.as_ref()))
            .filter(accounts::deleted_at.is_null())
            .select(AccountRow::as_select())
            .first::<AccountRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        row.map(row_to_account).transpose()
    }

    async fn find_active_by_id(
        &self,
        id: &AccountId,
    ) -> Result<Option<Account>, AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = accounts::table
            .filter(accounts::id.eq(id.as_uuid()))
            .filter(accounts::deleted_at.is_null())
            .select(AccountRow::as_select())
            .first::<AccountRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        row.map(row_to_account).transpose()
    }

    async fn list_active(&self) -> Result<Vec<Account>, AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows: Vec<AccountRow> = accounts::table
            .filter(accounts::deleted_at.is_null())
            .order(accounts::created_at.asc())
            .select(AccountRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        rows.into_iter().map(row_to_account).collect()
    }

    async fn insert(&self, account: NewAccount) -> Result<Account, AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = NewAccountRow {
            id: Uuid::new_v4(),
            email: account.email.as_ref(),
            full_name: account.full_name.as_ref(),
            role: account.role.as_str(),
            password_hash: account.password_hash.as_ref().map(PasswordHash::as_str),
        };

        let inserted: AccountRow = diesel::insert_into(accounts::table)
            .values(&row)
            .returning(AccountRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_insert_error(err, &account.email))?;

        row_to_account(inserted)
    }

    async fn provision_federated(
        &self,
        profile: &FederatedProfile,
    ) -> Result<Account, AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let inserted = conn
            .build_transaction()
            .serializable()
            .run(|conn| {
                async move {
                    // Count every row ever provisioned, soft-deleted included;
                    // the founder slot is spent exactly once.
                    let existing: i64 = accounts::table.count().get_result(conn).await?;
                    let role = if existing == 0 {
                        Role::Manager
                    } else {
                        Role::Driver
                    };

                    let row = NewAccountRow {
                        id: Uuid::new_v4(),
                        email: profile.email.as_ref(),
                        full_name: profile.full_name.as_ref(),
                        role: role.as_str(),
                        password_hash: None,
                    };

                    let inserted: AccountRow = diesel::insert_into(accounts::table)
                        .values(&row)
                        .returning(AccountRow::as_returning())
                        .get_result(conn)
                        .await?;

                    row_to_account(inserted).map_err(TxError::Domain)
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_tx_error(err, &profile.email))?;

        Ok(inserted)
    }

    async fn update(
        &self,
        id: &AccountId,
        changes: AccountChanges,
    ) -> Result<Option<Account>, AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let conflict_email = changes.email.clone();
        let changeset = AccountChangesRow {
            email: changes.email.map(String::from),
            full_name: changes.full_name.map(String::from),
            role: changes.role.map(|role| role.as_str().to_owned()),
            updated_at: Utc::now(),
        };

        let row = diesel::update(
            accounts::table
                .filter(accounts::id.eq(id.as_uuid()))
                .filter(accounts::deleted_at.is_null()),
        )
        .set(&changeset)
        .returning(AccountRow::as_returning())
        .get_result::<AccountRow>(&mut conn)
        .await
        .optional()
        .map_err(|err| match conflict_email {
            Some(email) => map_insert_error(err, &email),
            None => map_diesel(err),
        })?;

        row.map(row_to_account).transpose()
    }

    async fn soft_delete(
        &self,
        id: &AccountId,
    ) -> Result<Option<Account>, AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let now = Utc::now();

        let row = diesel::update(
            accounts::table
                .filter(accounts::id.eq(id.as_uuid()))
                .filter(accounts::deleted_at.is_null()),
        )
        .set((
            accounts::deleted_at.eq(Some(now)),
            accounts::updated_at.eq(now),
        ))
        .returning(AccountRow::as_returning())
        .get_result::<AccountRow>(&mut conn)
        .await
        .optional()
        .map_err(map_diesel)?;

        row.map(row_to_account).transpose()
    }
}
