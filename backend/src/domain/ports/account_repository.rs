//! Driven port for account persistence.
//!
//! Adapters map their infrastructure failures into the strongly typed error
//! variants here instead of returning `anyhow::Result`, so domain services
//! can translate them into stable API errors.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::account::{Account, AccountId, EmailAddress, FullName, Role};
use crate::domain::auth::FederatedProfile;
use crate::domain::password::PasswordHash;

/// Persistence errors raised by [`AccountRepository`] adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountPersistenceError {
    /// Repository connection could not be established.
    #[error("account repository connection failed: {message}")]
    Connection {
        /// Underlying failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("account repository query failed: {message}")]
    Query {
        /// Underlying failure description.
        message: String,
    },
    /// The unique email constraint rejected an insert or update.
    #[error("email {email} is already registered")]
    DuplicateEmail {
        /// Conflicting email address.
        email: String,
    },
}

impl AccountPersistenceError {
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

    /// Helper for unique-email violations.
    pub fn duplicate_email(email: impl Into<String>) -> Self {
        Self::DuplicateEmail {
            email: email.into(),
        }
    }
}

/// Field bundle for inserting a credential account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Unique login email.
    pub email: EmailAddress,
    /// Display name.
    pub full_name: FullName,
    /// Assigned role.
    pub role: Role,
    /// Credential hash; `None` for federated accounts.
    pub password_hash: Option<PasswordHash>,
}

/// Field updates applied by a manager edit. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct AccountChanges {
    /// Replacement email.
    pub email: Option<EmailAddress>,
    /// Replacement display name.
    pub full_name: Option<FullName>,
    /// Replacement role.
    pub role: Option<Role>,
}

impl AccountChanges {
    /// Whether the update carries any field at all.
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.full_name.is_none() && self.role.is_none()
    }
}

/// Persistence port for account aggregates.
///
/// "Active" lookups exclude soft-deleted rows; the rows themselves are never
/// removed because wash records keep foreign keys into this table.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Fetch an active account by its unique email.
    async fn find_active_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Account>, AccountPersistenceError>;

    /// Fetch an active account by identifier.
    async fn find_active_by_id(
        &self,
        id: &AccountId,
    ) -> Result<Option<Account>, AccountPersistenceError>;

    /// List all active accounts.
    async fn list_active(&self) -> Result<Vec<Account>, AccountPersistenceError>;

    /// Insert a manager-created credential account.
    async fn insert(&self, account: NewAccount) -> Result<Account, AccountPersistenceError>;

    /// Provision an account for a first-time federated identity.
    ///
    /// The bootstrap rule runs atomically: the adapter counts existing
    /// accounts and inserts inside one serializable transaction, assigning
    /// `manager` when the count is zero and `driver` otherwise.
    async fn provision_federated(
        &self,
        profile: &FederatedProfile,
    ) -> Result<Account, AccountPersistenceError>;

    /// Apply field changes to an active account. `None` means no such row.
    async fn update(
        &self,
        id: &AccountId,
        changes: AccountChanges,
    ) -> Result<Option<Account>, AccountPersistenceError>;

    /// Soft-delete an active account. `None` means no such row, including
    /// rows already soft-deleted.
    async fn soft_delete(
        &self,
        id: &AccountId,
    ) -> Result<Option<Account>, AccountPersistenceError>;
}
