//! Driving port for wash-record queries.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::account::AccountId;
use crate::domain::ports::wash_command::{
    CreateWashRequest, FixtureWashCommand, WashCommand, WashDetailPayload, WashSubmission,
};
use crate::domain::truck::LicensePlate;
use crate::domain::wash::{Price, StorageKey, WashType};
use crate::domain::Error;

/// Request for a washer's own records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListWashesRequest {
    /// Authenticated washer.
    pub washer_id: AccountId,
}

/// Response listing the washer's records, newest wash first.
#[derive(Debug, Clone, PartialEq)]
pub struct ListWashesResponse {
    /// Expanded records.
    pub washes: Vec<WashDetailPayload>,
}

/// Driving port for wash read operations.
#[async_trait]
pub trait WashQuery: Send + Sync {
    /// List the caller's own records.
    async fn list_washes(&self, request: ListWashesRequest)
        -> Result<ListWashesResponse, Error>;
}

/// Fixture query implementation returning one deterministic record.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureWashQuery;

#[async_trait]
impl WashQuery for FixtureWashQuery {
    async fn list_washes(
        &self,
        request: ListWashesRequest,
    ) -> Result<ListWashesResponse, Error> {
        let submission = WashSubmission {
            license_plate: LicensePlate::new("AB-123")
                .map_err(|err| Error::internal(format!("invalid fixture plate: {err}")))?,
            driver_id: AccountId::new("00000000-0000-0000-0000-000000000103")
                .map_err(|err| Error::internal(format!("invalid fixture driver id: {err}")))?,
            wash_type: WashType::Basic,
            price: Price::new(Decimal::new(2500, 2))
                .map_err(|err| Error::internal(format!("invalid fixture price: {err}")))?,
            notes: None,
            before_image: StorageKey::new("washes/fixture/before.jpeg")
                .map_err(|err| Error::internal(format!("invalid fixture key: {err}")))?,
            after_image: StorageKey::new("washes/fixture/after.jpeg")
                .map_err(|err| Error::internal(format!("invalid fixture key: {err}")))?,
        };
        let detail = FixtureWashCommand
            .create_wash(CreateWashRequest {
                washer_id: request.washer_id,
                submission,
            })
            .await?;
        Ok(ListWashesResponse {
            washes: vec![detail],
        })
    }
}
