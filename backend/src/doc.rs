//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: every HTTP endpoint from the inbound layer (auth, washes,
//!   users, uploads, cleanup, health)
//! - **Schemas**: request and response bodies plus the domain error wrappers
//!   ([`ErrorSchema`], [`ErrorCodeSchema`]) that provide OpenAPI definitions
//!   without coupling domain types to the utoipa framework
//! - **Security**: session cookie authentication scheme
//!
//! The generated specification is served by Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::auth::{CallbackRequestBody, LoginRequestBody, SessionUserBody};
use crate::inbound::http::cleanup::{CleanupRequestBody, CleanupResponseBody};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::uploads::{UploadRequestBody, UploadResponseBody};
use crate::inbound::http::users::{
    AccountResponseBody, CreateUserRequestBody, UpdateUserRequestBody,
};
use crate::inbound::http::washes::{
    TruckResponseBody, WashImageResponseBody, WashRequestBody, WashResponseBody,
};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login or the federated callback.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Truck-wash operations API",
        description = "HTTP interface for logging truck washes with photo \
                       attachments, managing accounts, and sweeping aged \
                       storage objects.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::callback,
        crate::inbound::http::washes::create_wash,
        crate::inbound::http::washes::list_washes,
        crate::inbound::http::washes::update_wash,
        crate::inbound::http::washes::delete_wash,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::uploads::issue_upload,
        crate::inbound::http::cleanup::cleanup_storage,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        LoginRequestBody,
        CallbackRequestBody,
        SessionUserBody,
        WashRequestBody,
        WashResponseBody,
        TruckResponseBody,
        WashImageResponseBody,
        AccountResponseBody,
        CreateUserRequestBody,
        UpdateUserRequestBody,
        UploadRequestBody,
        UploadResponseBody,
        CleanupRequestBody,
        CleanupResponseBody,
        ErrorSchema,
        ErrorCodeSchema,
    )),
    tags(
        (name = "auth", description = "Login, logout, and federated provisioning"),
        (name = "washes", description = "Wash records with before/after photos"),
        (name = "users", description = "Manager-only account administration"),
        (name = "uploads", description = "Presigned photo upload grants"),
        (name = "cleanup", description = "Manager-only storage sweeps"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
