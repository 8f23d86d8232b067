//! Manager-facing user directory service.
//!
//! Creation hashes the password, inserts, and sends the welcome mail
//! best-effort; a mail failure is logged and never fails the creation.
//! Deletion is uniformly soft so wash records keep valid references.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::account::AccountId;
use crate::domain::password::PasswordHash;
use crate::domain::ports::{
    AccountPayload, AccountPersistenceError, AccountRepository, CreateAccountRequest,
    NewAccount, UpdateAccountRequest, UserDirectoryCommand, UserDirectoryQuery, WelcomeMailer,
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

fn account_not_found() -> Error {
    Error::not_found("user not found")
}

/// Directory service implementing the command and query driving ports.
#[derive(Clone)]
pub struct AccountDirectoryService<A, M> {
    accounts: Arc<A>,
    mailer: Arc<M>,
}

impl<A, M> AccountDirectoryService<A, M> {
    /// Create a new directory service over the account repository and mailer.
    pub fn new(accounts: Arc<A>, mailer: Arc<M>) -> Self {
        Self { accounts, mailer }
    }
}

#[async_trait]
impl<A, M> UserDirectoryCommand for AccountDirectoryService<A, M>
where
    A: AccountRepository,
    M: WelcomeMailer,
{
    async fn create_account(
        &self,
        request: CreateAccountRequest,
    ) -> Result<AccountPayload, Error> {
        let CreateAccountRequest {
            email,
            full_name,
            role,
            password,
        } = request;

        let password_hash = PasswordHash::from_plaintext(password.as_str())
            .map_err(|err| Error::invalid_request(err.to_string()))?;

        let created = self
            .accounts
            .insert(NewAccount {
                email,
                full_name,
                role,
                password_hash: Some(password_hash),
            })
            .await
            .map_err(map_account_repository_error)?;

        if let Err(error) = self
            .mailer
            .send_welcome(created.email(), created.full_name())
            .await
        {
            warn!(email = %created.email(), error = %error, "welcome mail failed");
        }

        Ok(AccountPayload::from(created))
    }

    async fn update_account(
        &self,
        request: UpdateAccountRequest,
    ) -> Result<AccountPayload, Error> {
        let updated = self
            .accounts
            .update(&request.id, request.changes)
            .await
            .map_err(map_account_repository_error)?
            .ok_or_else(account_not_found)?;

        Ok(AccountPayload::from(updated))
    }

    async fn delete_account(&self, id: AccountId) -> Result<(), Error> {
        self.accounts
            .soft_delete(&id)
            .await
            .map_err(map_account_repository_error)?
            .ok_or_else(account_not_found)?;
        Ok(())
    }
}

#[async_trait]
impl<A, M> UserDirectoryQuery for AccountDirectoryService<A, M>
where
    A: AccountRepository,
    M: WelcomeMailer,
{
    async fn list_accounts(&self) -> Result<Vec<AccountPayload>, Error> {
        let accounts = self
            .accounts
            .list_active()
            .await
            .map_err(map_account_repository_error)?;
        Ok(accounts.into_iter().map(AccountPayload::from).collect())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the directory service.
    use std::sync::Mutex;

    use chrono::{DateTime, Utc};
    use rstest::rstest;
    use zeroize::Zeroizing;

    use super::*;
    use crate::domain::account::{
        Account, AccountDraft, EmailAddress, FullName, Role,
    };
    use crate::domain::auth::FederatedProfile;
    use crate::domain::ports::mailer::MockWelcomeMailer;
    use crate::domain::ports::{AccountChanges, MailerError};
    use crate::domain::ErrorCode;

    fn timestamp() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-06-12T09:00:00Z")
            .expect("fixture timestamp")
            .with_timezone(&Utc)
    }

    #[derive(Default)]
    struct StubState {
        inserted: Vec<NewAccount>,
        duplicate_email: bool,
        update_result: Option<Account>,
        delete_result: Option<Account>,
    }

    #[derive(Default)]
    struct StubAccountRepository {
        state: Mutex<StubState>,
    }

    fn sample_account(role: Role) -> Account {
        Account::new(AccountDraft {
            id: AccountId::random(),
            email: EmailAddress::new("person@example.com").expect("valid test email"),
            full_name: FullName::new("Test Person").expect("valid test name"),
            role,
            password_hash: None,
            deleted_at: None,
            created_at: timestamp(),
            updated_at: timestamp(),
        })
    }

    #[async_trait]
    impl AccountRepository for StubAccountRepository {
        async fn find_active_by_email(
            &self,
            _email: &EmailAddress,
        ) -> Result<Option<Account>, AccountPersistenceError> {
            Ok(None)
        }

        async fn find_active_by_id(
            &self,
            _id: &AccountId,
        ) -> Result<Option<Account>, AccountPersistenceError> {
            Ok(None)
        }

        async fn list_active(&self) -> Result<Vec<Account>, AccountPersistenceError> {
            Ok(vec![sample_account(Role::Driver)])
        }

        async fn insert(
            &self,
            account: NewAccount,
        ) -> Result<Account, AccountPersistenceError> {
            let mut state = self.state.lock().expect("state lock");
            if state.duplicate_email {
                return Err(AccountPersistenceError::duplicate_email(
                    account.email.as_ref(),
                ));
            }
            let created = Account::new(AccountDraft {
                id: AccountId::random(),
                email: account.email.clone(),
                full_name: account.full_name.clone(),
                role: account.role,
                password_hash: account.password_hash.clone(),
                deleted_at: None,
                created_at: timestamp(),
                updated_at: timestamp(),
            });
            state.inserted.push(account);
            Ok(created)
        }

        async fn provision_federated(
            &self,
            _profile: &FederatedProfile,
        ) -> Result<Account, AccountPersistenceError> {
            Err(AccountPersistenceError::query("not supported in stub"))
        }

        async fn update(
            &self,
            _id: &AccountId,
            _changes: AccountChanges,
        ) -> Result<Option<Account>, AccountPersistenceError> {
            Ok(self.state.lock().expect("state lock").update_result.clone())
        }

        async fn soft_delete(
            &self,
            _id: &AccountId,
        ) -> Result<Option<Account>, AccountPersistenceError> {
            Ok(self.state.lock().expect("state lock").delete_result.clone())
        }
    }

    fn create_request() -> CreateAccountRequest {
        CreateAccountRequest {
            email: EmailAddress::new("new@example.com").expect("valid test email"),
            full_name: FullName::new("New User").expect("valid test name"),
            role: Role::Washer,
            password: Zeroizing::new("password123".to_owned()),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn create_hashes_password_and_sends_welcome_mail() {
        let repository = Arc::new(StubAccountRepository::default());
        let mut mailer = MockWelcomeMailer::new();
        mailer
            .expect_send_welcome()
            .times(1)
            .returning(|_, _| Ok(()));
        let service = AccountDirectoryService::new(repository.clone(), Arc::new(mailer));

        let payload = service
            .create_account(create_request())
            .await
            .expect("creation succeeds");

        assert_eq!(payload.email.as_ref(), "new@example.com");
        let state = repository.state.lock().expect("state lock");
        let hash = state.inserted[0]
            .password_hash
            .as_ref()
            .expect("hash stored");
        assert!(hash.verify("password123"));
        assert!(!hash.verify("wrong"));
    }

    #[rstest]
    #[tokio::test]
    async fn mail_failure_does_not_fail_creation() {
        let repository = Arc::new(StubAccountRepository::default());
        let mut mailer = MockWelcomeMailer::new();
        mailer
            .expect_send_welcome()
            .times(1)
            .returning(|_, _| Err(MailerError::delivery("relay offline")));
        let service = AccountDirectoryService::new(repository, Arc::new(mailer));

        service
            .create_account(create_request())
            .await
            .expect("creation still succeeds");
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_email_maps_to_conflict() {
        let repository = Arc::new(StubAccountRepository {
            state: Mutex::new(StubState {
                duplicate_email: true,
                ..StubState::default()
            }),
        });
        let mut mailer = MockWelcomeMailer::new();
        mailer.expect_send_welcome().never();
        let service = AccountDirectoryService::new(repository, Arc::new(mailer));

        let err = service
            .create_account(create_request())
            .await
            .expect_err("duplicate email must fail");

        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[tokio::test]
    async fn update_and_delete_of_missing_accounts_are_not_found() {
        let repository = Arc::new(StubAccountRepository::default());
        let service =
            AccountDirectoryService::new(repository, Arc::new(MockWelcomeMailer::new()));

        let err = service
            .update_account(UpdateAccountRequest {
                id: AccountId::random(),
                changes: AccountChanges::default(),
            })
            .await
            .expect_err("missing account must fail");
        assert_eq!(err.code(), ErrorCode::NotFound);

        let err = service
            .delete_account(AccountId::random())
            .await
            .expect_err("missing account must fail");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
