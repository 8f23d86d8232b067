//! Truck registry model.
//!
//! A truck is identified by its license plate and owned by exactly one driver
//! account at a time. Rows appear implicitly the first time a wash references
//! an unseen plate.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::account::AccountId;

/// Validation errors returned by [`LicensePlate::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TruckValidationError {
    /// Plate was blank once trimmed.
    #[error("license plate must not be empty")]
    EmptyPlate,
    /// Plate exceeded the storage limit.
    #[error("license plate must be at most {max} characters")]
    PlateTooLong {
        /// Maximum accepted length.
        max: usize,
    },
}

/// Maximum accepted plate length, matching the column width.
pub const LICENSE_PLATE_MAX: usize = 16;

/// License plate identifying a truck.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LicensePlate(String);

impl LicensePlate {
    /// Validate and construct a [`LicensePlate`].
    pub fn new(plate: impl Into<String>) -> Result<Self, TruckValidationError> {
        let trimmed = plate.into().trim().to_owned();
        if trimmed.is_empty() {
            return Err(TruckValidationError::EmptyPlate);
        }
        if trimmed.chars().count() > LICENSE_PLATE_MAX {
            return Err(TruckValidationError::PlateTooLong {
                max: LICENSE_PLATE_MAX,
            });
        }
        Ok(Self(trimmed))
    }
}

impl AsRef<str> for LicensePlate {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for LicensePlate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<LicensePlate> for String {
    fn from(value: LicensePlate) -> Self {
        value.0
    }
}

impl TryFrom<String> for LicensePlate {
    type Error = TruckValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A license-plate-identified vehicle owned by one driver account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Truck {
    /// Stable identifier.
    pub id: Uuid,
    /// Unique plate.
    pub license_plate: LicensePlate,
    /// Owning driver account.
    pub driver_id: AccountId,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_plates_fail(#[case] plate: &str) {
        let err = LicensePlate::new(plate).expect_err("blank plate must fail");
        assert_eq!(err, TruckValidationError::EmptyPlate);
    }

    #[rstest]
    fn oversized_plates_fail() {
        let err = LicensePlate::new("X".repeat(LICENSE_PLATE_MAX + 1))
            .expect_err("oversized plate must fail");
        assert_eq!(
            err,
            TruckValidationError::PlateTooLong {
                max: LICENSE_PLATE_MAX
            }
        );
    }

    #[rstest]
    fn plates_are_trimmed_but_case_preserved() {
        let plate = LicensePlate::new("  Ab-1234 ").expect("valid plate");
        assert_eq!(plate.as_ref(), "Ab-1234");
    }
}
