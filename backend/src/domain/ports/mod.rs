//! Domain ports defining the edges of the hexagon.
//!
//! Driving ports are called by inbound adapters (HTTP handlers); driven
//! ports describe how the domain expects to interact with infrastructure
//! (database, object store, mail relay). Each trait exposes strongly typed
//! errors so adapters map their failures into predictable variants.

pub mod account_repository;
pub mod cleanup;
pub mod login_service;
pub mod mailer;
pub mod object_store;
pub mod provisioning;
pub mod upload_broker;
pub mod user_directory;
pub mod wash_command;
pub mod wash_query;
pub mod wash_repository;

pub use self::account_repository::{
    AccountChanges, AccountPersistenceError, AccountRepository, NewAccount,
};
pub use self::cleanup::{
    validate_days_old, CleanupRequest, CleanupSweep, FixtureCleanupSweep, SweepOutcome,
};
pub use self::login_service::{FixtureLoginService, LoginService};
pub use self::mailer::{MailerError, WelcomeMailer};
pub use self::object_store::{ObjectStore, ObjectStoreError, StoredObject};
pub use self::provisioning::{FixtureProvisioningService, ProvisioningService};
pub use self::upload_broker::{
    validate_upload, FixtureUploadBroker, IssueUploadRequest, UploadBroker, UploadGrant,
    ALLOWED_CONTENT_TYPES, MAX_UPLOAD_BYTES,
};
pub use self::user_directory::{
    AccountPayload, CreateAccountRequest, FixtureUserDirectoryCommand,
    FixtureUserDirectoryQuery, UpdateAccountRequest, UserDirectoryCommand, UserDirectoryQuery,
};
pub use self::wash_command::{
    CreateWashRequest, DeleteWashRequest, FixtureWashCommand, TruckPayload, UpdateWashRequest,
    WashCommand, WashDetailPayload, WashImagePayload, WashSubmission,
};
pub use self::wash_query::{
    FixtureWashQuery, ListWashesRequest, ListWashesResponse, WashQuery,
};
pub use self::wash_repository::{
    NewWashRecord, StoredWash, WashPersistenceError, WashRepository, WashRowChanges,
};
