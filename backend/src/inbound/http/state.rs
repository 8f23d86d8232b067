//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    CleanupSweep, LoginService, ProvisioningService, UploadBroker, UserDirectoryCommand,
    UserDirectoryQuery, WashCommand, WashQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    /// Credential authentication.
    pub login: Arc<dyn LoginService>,
    /// Federated identity provisioning.
    pub provisioning: Arc<dyn ProvisioningService>,
    /// Wash mutations.
    pub washes: Arc<dyn WashCommand>,
    /// Wash queries.
    pub washes_query: Arc<dyn WashQuery>,
    /// User directory mutations.
    pub directory: Arc<dyn UserDirectoryCommand>,
    /// User directory queries.
    pub directory_query: Arc<dyn UserDirectoryQuery>,
    /// Upload grant minting.
    pub uploads: Arc<dyn UploadBroker>,
    /// Storage cleanup sweep.
    pub cleanup: Arc<dyn CleanupSweep>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Credential authentication.
    pub login: Arc<dyn LoginService>,
    /// Federated identity provisioning.
    pub provisioning: Arc<dyn ProvisioningService>,
    /// Wash mutations.
    pub washes: Arc<dyn WashCommand>,
    /// Wash queries.
    pub washes_query: Arc<dyn WashQuery>,
    /// User directory mutations.
    pub directory: Arc<dyn UserDirectoryCommand>,
    /// User directory queries.
    pub directory_query: Arc<dyn UserDirectoryQuery>,
    /// Upload grant minting.
    pub uploads: Arc<dyn UploadBroker>,
    /// Storage cleanup sweep.
    pub cleanup: Arc<dyn CleanupSweep>,
}

impl HttpState {
    /// Construct state from a ports bundle.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            login,
            provisioning,
            washes,
            washes_query,
            directory,
            directory_query,
            uploads,
            cleanup,
        } = ports;
        Self {
            login,
            provisioning,
            washes,
            washes_query,
            directory,
            directory_query,
            uploads,
            cleanup,
        }
    }
}
