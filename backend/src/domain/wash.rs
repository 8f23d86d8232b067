//! Wash record data model.
//!
//! One row per completed truck-wash event, owned by the washer who logged it.
//! Every record carries exactly two photo attachments, one per image slot.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::account::{Account, AccountId};
use super::truck::Truck;

/// Validation errors returned by wash constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WashValidationError {
    /// Wash type string was not one of the closed set.
    #[error("wash type must be basic, premium, or deluxe")]
    UnknownWashType,
    /// Price was zero or negative.
    #[error("price must be greater than zero")]
    NonPositivePrice,
    /// Image slot string was not `before` or `after`.
    #[error("image type must be before or after")]
    UnknownImageSlot,
    /// Storage key was blank or padded with whitespace.
    #[error("storage key must be non-empty without surrounding whitespace")]
    InvalidStorageKey,
}

/// Service tier of a wash event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WashType {
    /// Exterior rinse.
    Basic,
    /// Exterior plus detailing.
    Premium,
    /// Full interior and exterior service.
    Deluxe,
}

impl WashType {
    /// Stable wire and storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Premium => "premium",
            Self::Deluxe => "deluxe",
        }
    }
}

impl FromStr for WashType {
    type Err = WashValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "basic" => Ok(Self::Basic),
            "premium" => Ok(Self::Premium),
            "deluxe" => Ok(Self::Deluxe),
            _ => Err(WashValidationError::UnknownWashType),
        }
    }
}

impl fmt::Display for WashType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Positive fixed-point price of a wash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Validate and construct a [`Price`].
    pub fn new(amount: Decimal) -> Result<Self, WashValidationError> {
        if amount <= Decimal::ZERO {
            return Err(WashValidationError::NonPositivePrice);
        }
        Ok(Self(amount))
    }

    /// Underlying decimal amount.
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Price> for Decimal {
    fn from(value: Price) -> Self {
        value.0
    }
}

impl TryFrom<Decimal> for Price {
    type Error = WashValidationError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Fixed attachment role a wash photo fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSlot {
    /// Photograph taken before the wash.
    Before,
    /// Photograph taken after the wash.
    After,
}

impl ImageSlot {
    /// Stable wire and storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::After => "after",
        }
    }
}

impl FromStr for ImageSlot {
    type Err = WashValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "before" => Ok(Self::Before),
            "after" => Ok(Self::After),
            _ => Err(WashValidationError::UnknownImageSlot),
        }
    }
}

impl fmt::Display for ImageSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque key of a photo object in external storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StorageKey(String);

impl StorageKey {
    /// Validate and construct a [`StorageKey`].
    pub fn new(key: impl Into<String>) -> Result<Self, WashValidationError> {
        let raw = key.into();
        if raw.is_empty() || raw.trim() != raw {
            return Err(WashValidationError::InvalidStorageKey);
        }
        Ok(Self(raw))
    }

    /// Borrow the key as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<StorageKey> for String {
    fn from(value: StorageKey) -> Self {
        value.0
    }
}

impl TryFrom<String> for StorageKey {
    type Error = WashValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Photo attachment filling one image slot of a wash record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WashImage {
    /// Slot the photo fills.
    pub slot: ImageSlot,
    /// Object storage key.
    pub key: StorageKey,
}

/// Scalar fields of a wash record row.
#[derive(Debug, Clone, PartialEq)]
pub struct WashRecord {
    /// Stable identifier.
    pub id: Uuid,
    /// Washed truck.
    pub truck_id: Uuid,
    /// Washer who logged and owns the record.
    pub washer_id: AccountId,
    /// Service tier.
    pub wash_type: WashType,
    /// Charged amount.
    pub price: Price,
    /// Free-text notes.
    pub notes: Option<String>,
    /// When the wash happened.
    pub wash_date: DateTime<Utc>,
    /// Row creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A wash record expanded with its truck, driver, washer, and both photos.
///
/// ## Invariants
/// - `before` and `after` are always present; creation persists both slots
///   atomically and update never leaves a slot empty.
#[derive(Debug, Clone, PartialEq)]
pub struct WashDetail {
    /// Scalar record fields.
    pub record: WashRecord,
    /// Washed truck.
    pub truck: Truck,
    /// Driver owning the truck.
    pub driver: Account,
    /// Washer who logged the record.
    pub washer: Account,
    /// Before-wash photo.
    pub before: WashImage,
    /// After-wash photo.
    pub after: WashImage,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;
    use rust_decimal::Decimal;

    use super::*;

    #[rstest]
    #[case("basic", WashType::Basic)]
    #[case("premium", WashType::Premium)]
    #[case("deluxe", WashType::Deluxe)]
    fn wash_type_round_trips(#[case] raw: &str, #[case] expected: WashType) {
        let parsed: WashType = raw.parse().expect("known wash type");
        assert_eq!(parsed, expected);
        assert_eq!(parsed.as_str(), raw);
    }

    #[rstest]
    #[case("standard")]
    #[case("BASIC")]
    #[case("")]
    fn wash_type_rejects_unknown_values(#[case] raw: &str) {
        let err = raw.parse::<WashType>().expect_err("unknown type must fail");
        assert_eq!(err, WashValidationError::UnknownWashType);
    }

    #[rstest]
    #[case(Decimal::ZERO)]
    #[case(Decimal::new(-1250, 2))]
    fn non_positive_prices_fail(#[case] amount: Decimal) {
        let err = Price::new(amount).expect_err("non-positive price must fail");
        assert_eq!(err, WashValidationError::NonPositivePrice);
    }

    #[rstest]
    fn positive_price_preserves_scale() {
        let price = Price::new(Decimal::new(4999, 2)).expect("valid price");
        assert_eq!(price.to_string(), "49.99");
    }

    #[rstest]
    #[case("")]
    #[case(" padded")]
    #[case("trailing ")]
    fn invalid_storage_keys_fail(#[case] raw: &str) {
        let err = StorageKey::new(raw).expect_err("invalid key must fail");
        assert_eq!(err, WashValidationError::InvalidStorageKey);
    }

    #[rstest]
    fn storage_key_accepts_namespaced_paths() {
        let key = StorageKey::new("washes/42/2026-06-12/before/abc.jpeg").expect("valid key");
        assert_eq!(key.as_str(), "washes/42/2026-06-12/before/abc.jpeg");
    }
}
