//! Shared validation helpers for inbound HTTP adapters.
//!
//! Each helper converts one raw request field into its domain newtype,
//! tagging failures with the field name and a stable machine-readable code.

use rust_decimal::Decimal;
use serde_json::json;
use uuid::Uuid;

use crate::domain::{
    AccountId, EmailAddress, Error, FullName, ImageSlot, LicensePlate, Price, Role,
    StorageKey, WashType,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidUuid,
    InvalidEmail,
    InvalidFullName,
    InvalidRole,
    InvalidWashType,
    InvalidImageType,
    InvalidLicensePlate,
    InvalidPrice,
    InvalidStorageKey,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidEmail => "invalid_email",
            ErrorCode::InvalidFullName => "invalid_full_name",
            ErrorCode::InvalidRole => "invalid_role",
            ErrorCode::InvalidWashType => "invalid_wash_type",
            ErrorCode::InvalidImageType => "invalid_image_type",
            ErrorCode::InvalidLicensePlate => "invalid_license_plate",
            ErrorCode::InvalidPrice => "invalid_price",
            ErrorCode::InvalidStorageKey => "invalid_storage_key",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

fn field_error(
    field: FieldName,
    code: ErrorCode,
    message: impl Into<String>,
    value: impl Into<String>,
) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value.into(),
        "code": code.as_str(),
    }))
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value).map_err(|_| {
        field_error(
            field,
            ErrorCode::InvalidUuid,
            format!("{} must be a valid UUID", field.as_str()),
            value,
        )
    })
}

pub(crate) fn parse_account_id(value: &str, field: FieldName) -> Result<AccountId, Error> {
    AccountId::new(value).map_err(|_| {
        field_error(
            field,
            ErrorCode::InvalidUuid,
            format!("{} must be a valid UUID", field.as_str()),
            value,
        )
    })
}

pub(crate) fn parse_email(value: &str, field: FieldName) -> Result<EmailAddress, Error> {
    EmailAddress::new(value)
        .map_err(|err| field_error(field, ErrorCode::InvalidEmail, err.to_string(), value))
}

pub(crate) fn parse_full_name(value: &str, field: FieldName) -> Result<FullName, Error> {
    FullName::new(value)
        .map_err(|err| field_error(field, ErrorCode::InvalidFullName, err.to_string(), value))
}

pub(crate) fn parse_role(value: &str, field: FieldName) -> Result<Role, Error> {
    value
        .parse::<Role>()
        .map_err(|err| field_error(field, ErrorCode::InvalidRole, err.to_string(), value))
}

pub(crate) fn parse_wash_type(value: &str, field: FieldName) -> Result<WashType, Error> {
    value
        .parse::<WashType>()
        .map_err(|err| field_error(field, ErrorCode::InvalidWashType, err.to_string(), value))
}

pub(crate) fn parse_image_slot(value: &str, field: FieldName) -> Result<ImageSlot, Error> {
    value
        .parse::<ImageSlot>()
        .map_err(|err| field_error(field, ErrorCode::InvalidImageType, err.to_string(), value))
}

pub(crate) fn parse_license_plate(
    value: &str,
    field: FieldName,
) -> Result<LicensePlate, Error> {
    LicensePlate::new(value).map_err(|err| {
        field_error(field, ErrorCode::InvalidLicensePlate, err.to_string(), value)
    })
}

pub(crate) fn parse_price(value: Decimal, field: FieldName) -> Result<Price, Error> {
    Price::new(value).map_err(|err| {
        field_error(field, ErrorCode::InvalidPrice, err.to_string(), value.to_string())
    })
}

pub(crate) fn parse_storage_key(value: &str, field: FieldName) -> Result<StorageKey, Error> {
    StorageKey::new(value).map_err(|err| {
        field_error(field, ErrorCode::InvalidStorageKey, err.to_string(), value)
    })
}
