//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::test;

use crate::domain::ports::{
    FixtureCleanupSweep, FixtureLoginService, FixtureProvisioningService,
    FixtureUploadBroker, FixtureUserDirectoryCommand, FixtureUserDirectoryQuery,
    FixtureWashCommand, FixtureWashQuery,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Build an [`HttpState`] wired entirely with fixture ports.
pub fn fixture_state() -> HttpState {
    HttpState::new(HttpStatePorts {
        login: Arc::new(FixtureLoginService),
        provisioning: Arc::new(FixtureProvisioningService),
        washes: Arc::new(FixtureWashCommand),
        washes_query: Arc::new(FixtureWashQuery),
        directory: Arc::new(FixtureUserDirectoryCommand),
        directory_query: Arc::new(FixtureUserDirectoryQuery),
        uploads: Arc::new(FixtureUploadBroker),
        cleanup: Arc::new(FixtureCleanupSweep),
    })
}

/// Log in through the fixture login service and return the session cookie.
///
/// The app under test must mount [`crate::inbound::http::auth::login`] under
/// `/api/v1`. `manager@example.com`, `washer@example.com`, and
/// `driver@example.com` each authenticate with the fixture password and carry
/// their namesake role.
pub async fn login_cookie<S, B>(app: &S, email: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let response = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(serde_json::json!({ "email": email, "password": "password" }))
            .to_request(),
    )
    .await;
    assert!(
        response.status().is_success(),
        "fixture login must succeed for {email}"
    );
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}
