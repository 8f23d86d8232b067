//! Credential login and federated provisioning services.
//!
//! Both services sit on the account repository. Login verifies argon2
//! hashes; provisioning resolves a verified federated identity to an
//! account, creating one under the bootstrap rule on first contact.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::auth::{FederatedProfile, LoginCredentials, SessionUser};
use crate::domain::ports::{
    AccountPersistenceError, AccountRepository, LoginService, ProvisioningService,
};
use crate::domain::Error;

fn map_account_repository_error(error: AccountPersistenceError) -> Error {
    match error {
        AccountPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("account repository unavailable: {message}"))
        }
        AccountPersistenceError::Query { message } => {
            Error::internal(format!("account repository error: {message}"))
        }
        AccountPersistenceError::DuplicateEmail { email } => {
            Error::conflict(format!("email {email} is already registered"))
        }
    }
}

fn invalid_credentials() -> Error {
    // Unknown email, wrong password, soft-deleted account, and OAuth-only
    // account all answer identically.
    Error::unauthorized("invalid credentials")
}

/// Credential authenticator over the account repository.
#[derive(Clone)]
pub struct PasswordLoginService<A> {
    accounts: Arc<A>,
}

impl<A> PasswordLoginService<A> {
    /// Create a new login service over the account repository.
    pub fn new(accounts: Arc<A>) -> Self {
        Self { accounts }
    }
}

#[async_trait]
impl<A> LoginService for PasswordLoginService<A>
where
    A: AccountRepository,
{
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<SessionUser, Error> {
        let account = self
            .accounts
            .find_active_by_email(credentials.email())
            .await
            .map_err(map_account_repository_error)?
            .ok_or_else(invalid_credentials)?;

        let hash = account.password_hash().ok_or_else(invalid_credentials)?;
        if !hash.verify(credentials.password()) {
            return Err(invalid_credentials());
        }

        Ok(SessionUser {
            id: *account.id(),
            role: account.role(),
        })
    }
}

/// Federated identity resolver applying the bootstrap rule.
#[derive(Clone)]
pub struct FederatedProvisioningService<A> {
    accounts: Arc<A>,
}

impl<A> FederatedProvisioningService<A> {
    /// Create a new provisioning service over the account repository.
    pub fn new(accounts: Arc<A>) -> Self {
        Self { accounts }
    }
}

#[async_trait]
impl<A> ProvisioningService for FederatedProvisioningService<A>
where
    A: AccountRepository,
{
    async fn provision(&self, profile: FederatedProfile) -> Result<SessionUser, Error> {
        if let Some(existing) = self
            .accounts
            .find_active_by_email(&profile.email)
            .await
            .map_err(map_account_repository_error)?
        {
            return Ok(SessionUser {
                id: *existing.id(),
                role: existing.role(),
            });
        }

        let provisioned = match self.accounts.provision_federated(&profile).await {
            Ok(account) => account,
            // A concurrent first login won the insert; the unique email now
            // resolves, so use the winner's row.
            Err(AccountPersistenceError::DuplicateEmail { .. }) => self
                .accounts
                .find_active_by_email(&profile.email)
                .await
                .map_err(map_account_repository_error)?
                .ok_or_else(|| {
                    Error::internal("provisioned account vanished after duplicate email")
                })?,
            Err(error) => return Err(map_account_repository_error(error)),
        };

        Ok(SessionUser {
            id: *provisioned.id(),
            role: provisioned.role(),
        })
    }
}
