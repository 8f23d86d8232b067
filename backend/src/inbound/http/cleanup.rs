//! Storage cleanup HTTP handler, manager only.
//!
//! ```text
//! POST /api/v1/cleanup {"daysOld":30}
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::CleanupRequest;
use crate::domain::Role;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Request body for triggering a cleanup sweep.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CleanupRequestBody {
    /// Objects strictly older than this many days become candidates.
    #[schema(minimum = 1, example = 30)]
    pub days_old: i64,
}

/// Outcome of a completed sweep.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CleanupResponseBody {
    /// Human-readable summary.
    pub message: String,
    /// Number of objects deleted.
    pub deleted: usize,
}

/// Delete aged, unreferenced photo objects from storage.
#[utoipa::path(
    post,
    path = "/api/v1/cleanup",
    request_body = CleanupRequestBody,
    responses(
        (status = 200, description = "Sweep completed", body = CleanupResponseBody),
        (status = 400, description = "Invalid horizon", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["cleanup"],
    operation_id = "cleanupStorage",
    security(("SessionCookie" = []))
)]
#[post("/cleanup")]
pub async fn cleanup_storage(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CleanupRequestBody>,
) -> ApiResult<web::Json<CleanupResponseBody>> {
    session.require_role(Role::Manager)?;
    let outcome = state
        .cleanup
        .sweep(CleanupRequest {
            days_old: payload.days_old,
        })
        .await?;
    Ok(web::Json(CleanupResponseBody {
        message: format!("deleted {} aged photo objects", outcome.deleted),
        deleted: outcome.deleted,
    }))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{test as actix_test, web, App};
    use rstest::rstest;
    use serde_json::Value;

    use super::*;
    use crate::inbound::http::auth::login;
    use crate::inbound::http::test_utils::{
        fixture_state, login_cookie, test_session_middleware,
    };

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
            .service(web::scope("/api/v1").service(login).service(cleanup_storage))
    }

    #[actix_web::test]
    async fn manager_triggers_a_sweep() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = login_cookie(&app, "manager@example.com").await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/cleanup")
                .cookie(cookie)
                .set_json(&CleanupRequestBody { days_old: 30 })
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body.get("deleted").and_then(Value::as_u64), Some(0));
        assert!(body.get("message").and_then(Value::as_str).is_some());
    }

    #[rstest]
    #[case(0)]
    #[case(-3)]
    #[actix_web::test]
    async fn horizons_below_one_day_fail(#[case] days_old: i64) {
        let app = actix_test::init_service(test_app()).await;
        let cookie = login_cookie(&app, "manager@example.com").await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/cleanup")
                .cookie(cookie)
                .set_json(&CleanupRequestBody { days_old })
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[rstest]
    #[case("washer@example.com")]
    #[case("driver@example.com")]
    #[actix_web::test]
    async fn non_manager_roles_cannot_sweep(#[case] email: &str) {
        let app = actix_test::init_service(test_app()).await;
        let cookie = login_cookie(&app, email).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/cleanup")
                .cookie(cookie)
                .set_json(&CleanupRequestBody { days_old: 30 })
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn sweeping_without_a_session_is_unauthorised() {
        let app = actix_test::init_service(test_app()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/cleanup")
                .set_json(&CleanupRequestBody { days_old: 30 })
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
