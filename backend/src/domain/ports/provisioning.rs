//! Driving port for federated identity provisioning.
//!
//! The identity provider's wire flow is out of scope; by the time this port
//! is called the provider has verified the profile. The port owns the
//! bootstrap rule: the first account ever provisioned becomes the manager,
//! every later one a driver.

use async_trait::async_trait;

use crate::domain::account::{AccountId, Role};
use crate::domain::auth::{FederatedProfile, SessionUser};
use crate::domain::Error;

/// Domain use-case port for federated login.
#[async_trait]
pub trait ProvisioningService: Send + Sync {
    /// Resolve or provision the account for a verified federated identity
    /// and return the session identity to establish.
    async fn provision(&self, profile: FederatedProfile) -> Result<SessionUser, Error>;
}

/// Email that the fixture treats as the very first login.
pub const FIXTURE_FOUNDER_EMAIL: &str = "founder@example.com";
const FIXTURE_FOUNDER_ID: &str = "00000000-0000-0000-0000-000000000100";
const FIXTURE_PROVISIONED_ID: &str = "00000000-0000-0000-0000-000000000110";

/// Fixture provisioning for handler tests without persistence.
///
/// [`FIXTURE_FOUNDER_EMAIL`] provisions as manager; any other email as
/// driver, mirroring the bootstrap rule deterministically.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureProvisioningService;

#[async_trait]
impl ProvisioningService for FixtureProvisioningService {
    async fn provision(&self, profile: FederatedProfile) -> Result<SessionUser, Error> {
        let (raw_id, role) = if profile.email.as_ref() == FIXTURE_FOUNDER_EMAIL {
            (FIXTURE_FOUNDER_ID, Role::Manager)
        } else {
            (FIXTURE_PROVISIONED_ID, Role::Driver)
        };
        let id = AccountId::new(raw_id)
            .map_err(|err| Error::internal(format!("invalid fixture account id: {err}")))?;
        Ok(SessionUser { id, role })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;
    use crate::domain::account::FullName;
    use crate::domain::account::EmailAddress;

    fn profile(email: &str) -> FederatedProfile {
        FederatedProfile {
            email: EmailAddress::new(email).expect("valid email"),
            full_name: FullName::new("Grace Hopper").expect("valid name"),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn founder_becomes_manager_and_others_drivers() {
        let founder = FixtureProvisioningService
            .provision(profile(FIXTURE_FOUNDER_EMAIL))
            .await
            .expect("fixture provisioning succeeds");
        assert_eq!(founder.role, Role::Manager);

        let later = FixtureProvisioningService
            .provision(profile("second@example.com"))
            .await
            .expect("fixture provisioning succeeds");
        assert_eq!(later.role, Role::Driver);
    }
}
