//! Photo upload broker HTTP handler, washer only.
//!
//! ```text
//! POST /api/v1/uploads {"fileType":"image/jpeg","imageType":"before","fileSize":524288}
//! ```
//!
//! Photos never pass through this service; the broker validates the declared
//! type and size, then mints presigned upload and view URLs for a freshly
//! generated, namespaced key.

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{IssueUploadRequest, UploadGrant};
use crate::domain::Role;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_image_slot, FieldName};
use crate::inbound::http::ApiResult;

/// Request body for minting an upload grant.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequestBody {
    /// Declared MIME type of the photo.
    #[schema(example = "image/jpeg")]
    pub file_type: String,
    /// Slot the photo will fill: `before` or `after`.
    #[schema(example = "before")]
    pub image_type: String,
    /// Declared size in bytes after client-side compression.
    pub file_size: u64,
}

/// Presigned URL pair plus the key to store on the wash record.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponseBody {
    /// Short-lived PUT URL for the upload itself.
    pub upload_url: String,
    /// Generated storage key.
    pub key: String,
    /// Longer-lived GET URL for immediate preview.
    pub view_url: String,
}

impl From<UploadGrant> for UploadResponseBody {
    fn from(value: UploadGrant) -> Self {
        Self {
            upload_url: value.upload_url,
            key: value.key.to_string(),
            view_url: value.view_url,
        }
    }
}

/// Validate an upload request and mint presigned URLs.
#[utoipa::path(
    post,
    path = "/api/v1/uploads",
    request_body = UploadRequestBody,
    responses(
        (status = 200, description = "Upload grant issued", body = UploadResponseBody),
        (status = 400, description = "Invalid file type or size", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["uploads"],
    operation_id = "issueUpload",
    security(("SessionCookie" = []))
)]
#[post("/uploads")]
pub async fn issue_upload(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UploadRequestBody>,
) -> ApiResult<web::Json<UploadResponseBody>> {
    let user = session.require_role(Role::Washer)?;
    let body = payload.into_inner();
    let grant = state
        .uploads
        .issue_upload(IssueUploadRequest {
            user_id: user.id,
            file_type: body.file_type,
            image_type: parse_image_slot(&body.image_type, FieldName::new("imageType"))?,
            file_size: body.file_size,
        })
        .await?;
    Ok(web::Json(UploadResponseBody::from(grant)))
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
            .service(web::scope("/api/v1").service(login).service(issue_upload))
    }

    fn upload_body() -> UploadRequestBody {
        UploadRequestBody {
            file_type: "image/jpeg".into(),
            image_type: "before".into(),
            file_size: 512 * 1024,
        }
    }

    #[actix_web::test]
    async fn grants_carry_key_and_both_urls() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = login_cookie(&app, "washer@example.com").await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/uploads")
                .cookie(cookie)
                .set_json(&upload_body())
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        let key = body.get("key").and_then(Value::as_str).expect("key");
        assert!(key.starts_with("washes/"));
        assert!(body.get("uploadUrl").and_then(Value::as_str).is_some());
        assert!(body.get("viewUrl").and_then(Value::as_str).is_some());
    }

    #[actix_web::test]
    async fn plain_text_uploads_fail_before_any_storage_call() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = login_cookie(&app, "washer@example.com").await;

        let mut body = upload_body();
        body.file_type = "text/plain".into();

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/uploads")
                .cookie(cookie)
                .set_json(&body)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let payload: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            payload
                .get("details")
                .and_then(|details| details.get("code"))
                .and_then(Value::as_str),
            Some("invalid_file_type")
        );
    }

    #[actix_web::test]
    async fn oversized_uploads_fail() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = login_cookie(&app, "washer@example.com").await;

        let mut body = upload_body();
        body.file_size = 2 * 1024 * 1024;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/uploads")
                .cookie(cookie)
                .set_json(&body)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let payload: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            payload
                .get("details")
                .and_then(|details| details.get("code"))
                .and_then(Value::as_str),
            Some("file_too_large")
        );
    }

    #[actix_web::test]
    async fn unknown_image_slots_fail() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = login_cookie(&app, "washer@example.com").await;

        let mut body = upload_body();
        body.image_type = "sideways".into();

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/uploads")
                .cookie(cookie)
                .set_json(&body)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[rstest]
    #[case("manager@example.com")]
    #[case("driver@example.com")]
    #[actix_web::test]
    async fn non_washer_roles_cannot_request_uploads(#[case] email: &str) {
        let app = actix_test::init_service(test_app()).await;
        let cookie = login_cookie(&app, email).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/uploads")
                .cookie(cookie)
                .set_json(&upload_body())
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
