//! Driving ports for the manager-facing user directory.
//!
//! Inbound adapters call these to administer accounts without knowing the
//! backing infrastructure, which keeps handler tests deterministic.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::domain::account::{Account, AccountId, EmailAddress, FullName, Role};
use crate::domain::ports::account_repository::AccountChanges;
use crate::domain::Error;

/// Serializable account payload for driving ports.
///
/// Deliberately excludes the password hash; it never crosses a driving port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountPayload {
    /// Stable identifier.
    pub id: AccountId,
    /// Unique login email.
    pub email: EmailAddress,
    /// Display name.
    pub full_name: FullName,
    /// Assigned role.
    pub role: Role,
    /// Row creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<Account> for AccountPayload {
    fn from(value: Account) -> Self {
        Self {
            id: *value.id(),
            email: value.email().clone(),
            full_name: value.full_name().clone(),
            role: value.role(),
            created_at: value.created_at(),
            updated_at: value.updated_at(),
        }
    }
}

/// Request to create a credential account.
#[derive(Debug, Clone)]
pub struct CreateAccountRequest {
    /// Unique login email.
    pub email: EmailAddress,
    /// Display name.
    pub full_name: FullName,
    /// Assigned role.
    pub role: Role,
    /// Plaintext password, hashed by the service before persistence.
    pub password: Zeroizing<String>,
}

/// Request to update an account's profile fields.
#[derive(Debug, Clone)]
pub struct UpdateAccountRequest {
    /// Account being edited.
    pub id: AccountId,
    /// Field changes; `None` leaves a field untouched.
    pub changes: AccountChanges,
}

/// Driving port for account mutations.
#[async_trait]
pub trait UserDirectoryCommand: Send + Sync {
    /// Create a credential account, hash its password, and send the welcome
    /// mail best-effort.
    async fn create_account(
        &self,
        request: CreateAccountRequest,
    ) -> Result<AccountPayload, Error>;

    /// Apply profile changes to an active account.
    async fn update_account(
        &self,
        request: UpdateAccountRequest,
    ) -> Result<AccountPayload, Error>;

    /// Soft-delete an active account.
    async fn delete_account(&self, id: AccountId) -> Result<(), Error>;
}

/// Driving port for account queries.
#[async_trait]
pub trait UserDirectoryQuery: Send + Sync {
    /// List active accounts.
    async fn list_accounts(&self) -> Result<Vec<AccountPayload>, Error>;
}

fn fixture_timestamp() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-06-12T09:00:00Z")
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .unwrap_or_else(|err| panic!("fixture timestamp must parse: {err}"))
}

/// Fixture payload used by command and query fixtures alike.
pub(crate) fn fixture_account_payload(id: AccountId, role: Role) -> AccountPayload {
    let email = EmailAddress::new(format!("{}@example.com", role.as_str()))
        .unwrap_or_else(|err| panic!("fixture email must validate: {err}"));
    let full_name = FullName::new("Ada Lovelace")
        .unwrap_or_else(|err| panic!("fixture name must validate: {err}"));
    AccountPayload {
        id,
        email,
        full_name,
        role,
        created_at: fixture_timestamp(),
        updated_at: fixture_timestamp(),
    }
}

/// Fixture command implementation for handler tests without persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserDirectoryCommand;

#[async_trait]
impl UserDirectoryCommand for FixtureUserDirectoryCommand {
    async fn create_account(
        &self,
        request: CreateAccountRequest,
    ) -> Result<AccountPayload, Error> {
        let mut payload = fixture_account_payload(AccountId::random(), request.role);
        payload.email = request.email;
        payload.full_name = request.full_name;
        Ok(payload)
    }

    async fn update_account(
        &self,
        request: UpdateAccountRequest,
    ) -> Result<AccountPayload, Error> {
        let mut payload = fixture_account_payload(request.id, Role::Washer);
        if let Some(email) = request.changes.email {
            payload.email = email;
        }
        if let Some(full_name) = request.changes.full_name {
            payload.full_name = full_name;
        }
        if let Some(role) = request.changes.role {
            payload.role = role;
        }
        Ok(payload)
    }

    async fn delete_account(&self, _id: AccountId) -> Result<(), Error> {
        Ok(())
    }
}

/// Fixture query implementation returning one deterministic account.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserDirectoryQuery;

#[async_trait]
impl UserDirectoryQuery for FixtureUserDirectoryQuery {
    async fn list_accounts(&self) -> Result<Vec<AccountPayload>, Error> {
        let id = AccountId::new("00000000-0000-0000-0000-000000000103")
            .map_err(|err| Error::internal(format!("invalid fixture account id: {err}")))?;
        Ok(vec![fixture_account_payload(id, Role::Driver)])
    }
}
