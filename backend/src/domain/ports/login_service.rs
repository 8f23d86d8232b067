//! Driving port for credential login.
//!
//! In hexagonal terms this is a *driving* port: inbound adapters call it to
//! authenticate credentials without knowing (or importing) the backing
//! infrastructure. This makes HTTP handler tests deterministic because they
//! can substitute a test double instead of wiring persistence.

use async_trait::async_trait;

use crate::domain::account::{AccountId, Role};
use crate::domain::auth::{LoginCredentials, SessionUser};
use crate::domain::Error;

/// Domain use-case port for credential authentication.
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated session identity.
    async fn authenticate(&self, credentials: &LoginCredentials)
        -> Result<SessionUser, Error>;
}

/// Fixture manager account id accepted by [`FixtureLoginService`].
pub const FIXTURE_MANAGER_ID: &str = "00000000-0000-0000-0000-000000000101";
/// Fixture washer account id accepted by [`FixtureLoginService`].
pub const FIXTURE_WASHER_ID: &str = "00000000-0000-0000-0000-000000000102";
/// Fixture driver account id accepted by [`FixtureLoginService`].
pub const FIXTURE_DRIVER_ID: &str = "00000000-0000-0000-0000-000000000103";
/// Password accepted for every fixture account.
pub const FIXTURE_PASSWORD: &str = "password";

/// In-memory authenticator with one fixture account per role.
///
/// `manager@example.com`, `washer@example.com`, and `driver@example.com` all
/// authenticate with [`FIXTURE_PASSWORD`] and map to fixed identifiers so
/// handler tests can exercise every role gate.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<SessionUser, Error> {
        if credentials.password() != FIXTURE_PASSWORD {
            return Err(Error::unauthorized("invalid credentials"));
        }
        let (raw_id, role) = match credentials.email().as_ref() {
            "manager@example.com" => (FIXTURE_MANAGER_ID, Role::Manager),
            "washer@example.com" => (FIXTURE_WASHER_ID, Role::Washer),
            "driver@example.com" => (FIXTURE_DRIVER_ID, Role::Driver),
            _ => return Err(Error::unauthorized("invalid credentials")),
        };
        let id = AccountId::new(raw_id)
            .map_err(|err| Error::internal(format!("invalid fixture account id: {err}")))?;
        Ok(SessionUser { id, role })
    }
}
