//! Authentication HTTP handlers.
//!
//! ```text
//! POST /api/v1/login {"email":"washer@example.com","password":"password"}
//! POST /api/v1/logout
//! POST /api/v1/auth/callback {"email":"new@example.com","fullName":"New Driver"}
//! ```
//!
//! The callback receives an identity the external provider has already
//! verified; the OAuth wire flow never touches this service.

use actix_web::{post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::auth::FederatedProfile;
use crate::domain::{Error, LoginCredentials, LoginValidationError};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_email, parse_full_name, FieldName};
use crate::inbound::http::ApiResult;

/// Login request body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequestBody {
    /// Login email.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Federated callback body for `POST /api/v1/auth/callback`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CallbackRequestBody {
    /// Email verified by the identity provider.
    pub email: String,
    /// Display name reported by the provider.
    pub full_name: String,
}

/// Identity established by a successful login or callback.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionUserBody {
    /// Account identifier.
    #[schema(format = "uuid")]
    pub id: Uuid,
    /// Role the session asserts on every request.
    pub role: String,
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::InvalidEmail(inner) => Error::invalid_request(inner.to_string())
            .with_details(json!({ "field": "email", "code": "invalid_email" })),
        LoginValidationError::EmptyPassword => {
            Error::invalid_request("password must not be empty")
                .with_details(json!({ "field": "password", "code": "empty_password" }))
        }
    }
}

/// Authenticate credentials and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequestBody,
    responses(
        (status = 200, description = "Login success", body = SessionUserBody,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequestBody>,
) -> ApiResult<web::Json<SessionUserBody>> {
    let body = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&body.email, &body.password)
        .map_err(map_login_validation_error)?;
    let user = state.login.authenticate(&credentials).await?;
    session.persist_user(&user)?;
    Ok(web::Json(SessionUserBody {
        id: *user.id.as_uuid(),
        role: user.role.as_str().to_owned(),
    }))
}

/// Drop the current session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses(
        (status = 200, description = "Session cleared"),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> ApiResult<HttpResponse> {
    session.purge();
    Ok(HttpResponse::Ok().finish())
}

/// Resolve or provision the account for a verified federated identity.
///
/// The very first account ever provisioned becomes the manager; every later
/// one a driver.
#[utoipa::path(
    post,
    path = "/api/v1/auth/callback",
    request_body = CallbackRequestBody,
    responses(
        (status = 200, description = "Session established", body = SessionUserBody,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "federatedCallback",
    security([])
)]
#[post("/auth/callback")]
pub async fn callback(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CallbackRequestBody>,
) -> ApiResult<web::Json<SessionUserBody>> {
    let body = payload.into_inner();
    let profile = FederatedProfile {
        email: parse_email(&body.email, FieldName::new("email"))?,
        full_name: parse_full_name(&body.full_name, FieldName::new("fullName"))?,
    };
    let user = state.provisioning.provision(profile).await?;
    session.persist_user(&user)?;
    Ok(web::Json(SessionUserBody {
        id: *user.id.as_uuid(),
        role: user.role.as_str().to_owned(),
    }))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{test as actix_test, web, App};
    use rstest::rstest;
    use serde_json::Value;

    use super::*;
    use crate::domain::ports::provisioning::FIXTURE_FOUNDER_EMAIL;
    use crate::inbound::http::test_utils::{fixture_state, test_session_middleware};

    fn test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(fixture_state()))
            .wrap(test_session_middleware())
            .service(
                web::scope("/api/v1")
                    .service(login)
                    .service(logout)
                    .service(callback),
            )
    }

    #[actix_web::test]
    async fn login_establishes_a_session_for_fixture_credentials() {
        let app = actix_test::init_service(test_app()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(&LoginRequestBody {
                    email: "washer@example.com".into(),
                    password: "password".into(),
                })
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .response()
            .cookies()
            .any(|cookie| cookie.name() == "session"));
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body.get("role").and_then(Value::as_str), Some("washer"));
    }

    #[rstest]
    #[case("not-an-email", "password", "email", "invalid_email")]
    #[case("washer@example.com", "", "password", "empty_password")]
    #[actix_web::test]
    async fn login_rejects_malformed_payloads(
        #[case] email: &str,
        #[case] password: &str,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let app = actix_test::init_service(test_app()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(&LoginRequestBody {
                    email: email.into(),
                    password: password.into(),
                })
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        let details = body.get("details").expect("details present");
        assert_eq!(details.get("field").and_then(Value::as_str), Some(field));
        assert_eq!(details.get("code").and_then(Value::as_str), Some(code));
    }

    #[actix_web::test]
    async fn login_rejects_wrong_credentials_with_unauthorised_status() {
        let app = actix_test::init_service(test_app()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(&LoginRequestBody {
                    email: "washer@example.com".into(),
                    password: "wrong-password".into(),
                })
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body.get("code").and_then(Value::as_str),
            Some("unauthorized")
        );
    }

    #[actix_web::test]
    async fn logout_always_succeeds() {
        let app = actix_test::init_service(test_app()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/logout")
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn first_callback_identity_becomes_manager_later_ones_drivers() {
        let app = actix_test::init_service(test_app()).await;

        let founder = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/auth/callback")
                .set_json(&CallbackRequestBody {
                    email: FIXTURE_FOUNDER_EMAIL.into(),
                    full_name: "Grace Hopper".into(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(founder.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(founder).await;
        assert_eq!(body.get("role").and_then(Value::as_str), Some("manager"));

        let later = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/auth/callback")
                .set_json(&CallbackRequestBody {
                    email: "second@example.com".into(),
                    full_name: "Second Driver".into(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(later.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(later).await;
        assert_eq!(body.get("role").and_then(Value::as_str), Some("driver"));
    }

    #[actix_web::test]
    async fn callback_rejects_malformed_emails() {
        let app = actix_test::init_service(test_app()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/auth/callback")
                .set_json(&CallbackRequestBody {
                    email: "no-at-sign".into(),
                    full_name: "Broken".into(),
                })
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
