//! Domain primitives, aggregates, and services.
//!
//! Purpose: define strongly typed entities used by the API and persistence
//! layers, the pure reconciliation planning for wash updates, and the domain
//! services implementing the driving ports. Keep types immutable and document
//! invariants and serialisation contracts (serde) in each type's Rustdoc.

pub mod account;
pub mod auth;
pub mod auth_service;
pub mod cleanup_service;
pub mod directory_service;
pub mod error;
pub mod password;
pub mod ports;
pub mod reconciliation;
pub mod truck;
pub mod upload_service;
pub mod wash;
pub mod wash_service;

pub use self::account::{
    Account, AccountDraft, AccountId, AccountValidationError, EmailAddress, FullName, Role,
};
pub use self::auth::{FederatedProfile, LoginCredentials, LoginValidationError, SessionUser};
pub use self::auth_service::{FederatedProvisioningService, PasswordLoginService};
pub use self::cleanup_service::CleanupService;
pub use self::directory_service::AccountDirectoryService;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::password::{PasswordHash, PasswordHashError};
pub use self::reconciliation::{
    plan_images, plan_truck_change, ImagePlan, SlotChange, TruckChange,
};
pub use self::truck::{LicensePlate, Truck, TruckValidationError};
pub use self::upload_service::UploadBrokerService;
pub use self::wash::{
    ImageSlot, Price, StorageKey, WashDetail, WashImage, WashRecord, WashType,
    WashValidationError,
};
pub use self::wash_service::{WashCommandService, WashQueryService};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
