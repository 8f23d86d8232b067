//! Account data model.
//!
//! Accounts cover every person the system knows about: managers who
//! administer the operation, washers who log wash events, and drivers who own
//! trucks. Soft deletion keeps rows referenced by wash records intact.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::password::PasswordHash;

/// Validation errors returned by account constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountValidationError {
    /// Identifier was empty or not a UUID.
    #[error("account id must be a valid UUID")]
    InvalidId,
    /// Email was blank once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Email lacked a user or domain part.
    #[error("email must contain a user and a domain separated by '@'")]
    MalformedEmail,
    /// Email exceeded the storage limit.
    #[error("email must be at most {max} characters")]
    EmailTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// Full name was blank once trimmed.
    #[error("full name must not be empty")]
    EmptyFullName,
    /// Full name exceeded the storage limit.
    #[error("full name must be at most {max} characters")]
    FullNameTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// Role string was not one of the closed set.
    #[error("role must be manager, washer, or driver")]
    UnknownRole,
}

/// Stable account identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Validate and construct an [`AccountId`] from string input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, AccountValidationError> {
        Uuid::parse_str(id.as_ref())
            .map(Self)
            .map_err(|_| AccountValidationError::InvalidId)
    }

    /// Wrap an already-parsed UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random [`AccountId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Closed role set gating every endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Administers accounts and triggers storage cleanup.
    Manager,
    /// Logs wash events and owns the records they create.
    Washer,
    /// Passive record attached to trucks.
    Driver,
}

impl Role {
    /// Stable wire and storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Manager => "manager",
            Self::Washer => "washer",
            Self::Driver => "driver",
        }
    }
}

impl FromStr for Role {
    type Err = AccountValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "manager" => Ok(Self::Manager),
            "washer" => Ok(Self::Washer),
            "driver" => Ok(Self::Driver),
            _ => Err(AccountValidationError::UnknownRole),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maximum accepted email length, matching the column width.
pub const EMAIL_MAX: usize = 254;

/// Normalised email address used as the unique account key.
///
/// ## Invariants
/// - Trimmed, lowercased, and at most [`EMAIL_MAX`] characters.
/// - Contains exactly one `@` with non-empty user and domain parts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`].
    pub fn new(email: impl Into<String>) -> Result<Self, AccountValidationError> {
        let normalised = email.into().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(AccountValidationError::EmptyEmail);
        }
        if normalised.chars().count() > EMAIL_MAX {
            return Err(AccountValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        match normalised.split_once('@') {
            Some((user, domain)) if !user.is_empty() && !domain.is_empty() => {
                Ok(Self(normalised))
            }
            _ => Err(AccountValidationError::MalformedEmail),
        }
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Maximum accepted full-name length, matching the column width.
pub const FULL_NAME_MAX: usize = 120;

/// Human readable name shown on listings and wash records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FullName(String);

impl FullName {
    /// Validate and construct a [`FullName`].
    pub fn new(name: impl Into<String>) -> Result<Self, AccountValidationError> {
        let trimmed = name.into().trim().to_owned();
        if trimmed.is_empty() {
            return Err(AccountValidationError::EmptyFullName);
        }
        if trimmed.chars().count() > FULL_NAME_MAX {
            return Err(AccountValidationError::FullNameTooLong { max: FULL_NAME_MAX });
        }
        Ok(Self(trimmed))
    }
}

impl AsRef<str> for FullName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for FullName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<FullName> for String {
    fn from(value: FullName) -> Self {
        value.0
    }
}

impl TryFrom<String> for FullName {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Application account.
///
/// ## Invariants
/// - `password_hash` is `None` for accounts provisioned through federated
///   login; such accounts cannot authenticate with credentials.
/// - `deleted_at` is set instead of removing the row, so wash records keep a
///   valid washer/driver reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    id: AccountId,
    email: EmailAddress,
    full_name: FullName,
    role: Role,
    password_hash: Option<PasswordHash>,
    deleted_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Owned field bundle for building an [`Account`].
#[derive(Debug, Clone)]
pub struct AccountDraft {
    /// Stable identifier.
    pub id: AccountId,
    /// Unique login email.
    pub email: EmailAddress,
    /// Display name.
    pub full_name: FullName,
    /// Assigned role.
    pub role: Role,
    /// Credential hash; absent for federated accounts.
    pub password_hash: Option<PasswordHash>,
    /// Soft-deletion marker.
    pub deleted_at: Option<DateTime<Utc>>,
    /// Row creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Build an [`Account`] from validated components.
    pub fn new(draft: AccountDraft) -> Self {
        let AccountDraft {
            id,
            email,
            full_name,
            role,
            password_hash,
            deleted_at,
            created_at,
            updated_at,
        } = draft;
        Self {
            id,
            email,
            full_name,
            role,
            password_hash,
            deleted_at,
            created_at,
            updated_at,
        }
    }

    /// Stable account identifier.
    pub fn id(&self) -> &AccountId {
        &self.id
    }

    /// Unique login email.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Display name.
    pub fn full_name(&self) -> &FullName {
        &self.full_name
    }

    /// Assigned role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Credential hash; absent for federated accounts.
    pub fn password_hash(&self) -> Option<&PasswordHash> {
        self.password_hash.as_ref()
    }

    /// Soft-deletion marker.
    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    /// Row creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last modification timestamp.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Whether the account is still visible to listings and lookups.
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("", AccountValidationError::EmptyEmail)]
    #[case("   ", AccountValidationError::EmptyEmail)]
    #[case("no-at-sign", AccountValidationError::MalformedEmail)]
    #[case("@missing-user", AccountValidationError::MalformedEmail)]
    #[case("missing-domain@", AccountValidationError::MalformedEmail)]
    fn email_rejects_invalid_input(
        #[case] email: &str,
        #[case] expected: AccountValidationError,
    ) {
        let err = EmailAddress::new(email).expect_err("invalid email must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn email_normalises_case_and_whitespace() {
        let email = EmailAddress::new("  Washer@Example.COM ").expect("valid email");
        assert_eq!(email.as_ref(), "washer@example.com");
    }

    #[rstest]
    #[case("manager", Role::Manager)]
    #[case("washer", Role::Washer)]
    #[case("driver", Role::Driver)]
    fn role_round_trips(#[case] raw: &str, #[case] expected: Role) {
        let role: Role = raw.parse().expect("known role");
        assert_eq!(role, expected);
        assert_eq!(role.as_str(), raw);
    }

    #[rstest]
    #[case("admin")]
    #[case("Manager")]
    #[case("")]
    fn role_rejects_unknown_values(#[case] raw: &str) {
        let err = raw.parse::<Role>().expect_err("unknown role must fail");
        assert_eq!(err, AccountValidationError::UnknownRole);
    }

    #[rstest]
    fn full_name_trims_and_bounds_input() {
        let name = FullName::new("  Ada Lovelace  ").expect("valid name");
        assert_eq!(name.as_ref(), "Ada Lovelace");

        let oversized = "x".repeat(FULL_NAME_MAX + 1);
        let err = FullName::new(oversized).expect_err("oversized name must fail");
        assert_eq!(
            err,
            AccountValidationError::FullNameTooLong { max: FULL_NAME_MAX }
        );
    }
}
