//! Password hashing for credential accounts.
//!
//! Wraps argon2id PHC-format strings in a newtype so the rest of the domain
//! never handles raw hash material. Federated accounts carry no hash at all.

use std::fmt;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash as PhcHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};

/// Errors raised while hashing or parsing password material.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordHashError {
    /// The plaintext password was empty.
    #[error("password must not be empty")]
    EmptyPassword,
    /// Hashing failed inside the argon2 implementation.
    #[error("password hashing failed: {message}")]
    Hashing {
        /// Underlying failure description.
        message: String,
    },
    /// A stored value was not a valid PHC string.
    #[error("stored password hash is not a valid PHC string")]
    MalformedStoredHash,
}

/// Argon2id hash of an account password in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash a plaintext password with a fresh random salt.
    pub fn from_plaintext(plaintext: &str) -> Result<Self, PasswordHashError> {
        if plaintext.is_empty() {
            return Err(PasswordHashError::EmptyPassword);
        }
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|err| PasswordHashError::Hashing {
                message: err.to_string(),
            })?;
        Ok(Self(hash.to_string()))
    }

    /// Re-validate a hash loaded from storage.
    pub fn parse(stored: impl Into<String>) -> Result<Self, PasswordHashError> {
        let stored = stored.into();
        PhcHash::new(&stored).map_err(|_| PasswordHashError::MalformedStoredHash)?;
        Ok(Self(stored))
    }

    /// Constant-time check of a candidate password against this hash.
    pub fn verify(&self, candidate: &str) -> bool {
        PhcHash::new(&self.0)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(candidate.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }

    /// PHC string for persistence.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Hash strings stay out of logs and debug output.
        f.write_str("PasswordHash(..)")
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn hash_verifies_original_and_rejects_others() {
        let hash = PasswordHash::from_plaintext("correct horse battery staple")
            .expect("hashing succeeds");
        assert!(hash.verify("correct horse battery staple"));
        assert!(!hash.verify("wrong password"));
        assert!(hash.as_str().starts_with("$argon2"));
    }

    #[rstest]
    fn empty_password_is_rejected() {
        let err = PasswordHash::from_plaintext("").expect_err("empty must fail");
        assert_eq!(err, PasswordHashError::EmptyPassword);
    }

    #[rstest]
    fn stored_hash_round_trips_through_parse() {
        let hash = PasswordHash::from_plaintext("password123").expect("hashing succeeds");
        let restored = PasswordHash::parse(hash.as_str().to_owned()).expect("valid PHC string");
        assert!(restored.verify("password123"));
    }

    #[rstest]
    #[case("plaintext")]
    #[case("$argon2id$corrupt")]
    fn malformed_stored_hashes_are_rejected(#[case] stored: &str) {
        let err = PasswordHash::parse(stored).expect_err("malformed hash must fail");
        assert_eq!(err, PasswordHashError::MalformedStoredHash);
    }

    #[rstest]
    fn debug_output_hides_hash_material() {
        let hash = PasswordHash::from_plaintext("secret").expect("hashing succeeds");
        assert_eq!(format!("{hash:?}"), "PasswordHash(..)");
    }
}
