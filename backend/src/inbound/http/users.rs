//! User directory HTTP handlers, manager only.
//!
//! ```text
//! GET    /api/v1/users
//! POST   /api/v1/users {"email":..., "fullName":..., "role":..., "password":...}
//! PUT    /api/v1/users/{id}
//! DELETE /api/v1/users/{id}
//! ```

use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::domain::account::AccountId;
use crate::domain::ports::{
    AccountChanges, AccountPayload, CreateAccountRequest, UpdateAccountRequest,
};
use crate::domain::{Error, Role};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_email, parse_full_name, parse_role, FieldName};
use crate::inbound::http::ApiResult;

/// Account payload returned by the directory endpoints.
///
/// The password hash never appears here, or anywhere else on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponseBody {
    /// Account identifier.
    #[schema(format = "uuid")]
    pub id: Uuid,
    /// Unique login email.
    pub email: String,
    /// Display name.
    pub full_name: String,
    /// Assigned role.
    #[schema(example = "washer")]
    pub role: String,
    /// Row creation timestamp.
    #[schema(format = "date-time")]
    pub created_at: String,
    /// Last modification timestamp.
    #[schema(format = "date-time")]
    pub updated_at: String,
}

impl From<AccountPayload> for AccountResponseBody {
    fn from(value: AccountPayload) -> Self {
        Self {
            id: *value.id.as_uuid(),
            email: value.email.to_string(),
            full_name: value.full_name.to_string(),
            role: value.role.as_str().to_owned(),
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

/// Request body for creating a credential account.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequestBody {
    /// Unique login email.
    pub email: String,
    /// Display name.
    pub full_name: String,
    /// Assigned role.
    #[schema(example = "washer")]
    pub role: String,
    /// Initial password, hashed before persistence.
    pub password: String,
}

/// Request body for editing an account; absent fields are left untouched.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequestBody {
    /// Replacement email.
    pub email: Option<String>,
    /// Replacement display name.
    pub full_name: Option<String>,
    /// Replacement role.
    pub role: Option<String>,
}

fn parse_changes(body: UpdateUserRequestBody) -> Result<AccountChanges, Error> {
    Ok(AccountChanges {
        email: body
            .email
            .map(|raw| parse_email(&raw, FieldName::new("email")))
            .transpose()?,
        full_name: body
            .full_name
            .map(|raw| parse_full_name(&raw, FieldName::new("fullName")))
            .transpose()?,
        role: body
            .role
            .map(|raw| parse_role(&raw, FieldName::new("role")))
            .transpose()?,
    })
}

/// List active accounts.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Active accounts", body = [AccountResponseBody]),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers",
    security(("SessionCookie" = []))
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<AccountResponseBody>>> {
    session.require_role(Role::Manager)?;
    let accounts = state.directory_query.list_accounts().await?;
    Ok(web::Json(
        accounts.into_iter().map(AccountResponseBody::from).collect(),
    ))
}

/// Create a credential account and send the welcome mail best-effort.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserRequestBody,
    responses(
        (status = 201, description = "Account created", body = AccountResponseBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser",
    security(("SessionCookie" = []))
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateUserRequestBody>,
) -> ApiResult<HttpResponse> {
    session.require_role(Role::Manager)?;
    let body = payload.into_inner();
    if body.password.is_empty() {
        return Err(
            Error::invalid_request("password must not be empty").with_details(json!({
                "field": "password",
                "code": "empty_password",
            })),
        );
    }
    let request = CreateAccountRequest {
        email: parse_email(&body.email, FieldName::new("email"))?,
        full_name: parse_full_name(&body.full_name, FieldName::new("fullName"))?,
        role: parse_role(&body.role, FieldName::new("role"))?,
        password: Zeroizing::new(body.password),
    };
    let created = state.directory.create_account(request).await?;
    Ok(HttpResponse::Created().json(AccountResponseBody::from(created)))
}

/// Edit an active account's profile fields.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    request_body = UpdateUserRequestBody,
    params(("id" = Uuid, Path, description = "Account identifier")),
    responses(
        (status = 200, description = "Account updated", body = AccountResponseBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 404, description = "No such account", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser",
    security(("SessionCookie" = []))
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<UpdateUserRequestBody>,
) -> ApiResult<web::Json<AccountResponseBody>> {
    session.require_role(Role::Manager)?;
    let request = UpdateAccountRequest {
        id: AccountId::from_uuid(path.into_inner()),
        changes: parse_changes(payload.into_inner())?,
    };
    let updated = state.directory.update_account(request).await?;
    Ok(web::Json(AccountResponseBody::from(updated)))
}

/// Soft-delete an active account.
///
/// The row survives with a deletion timestamp so wash records keep valid
/// washer and driver references.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = Uuid, Path, description = "Account identifier")),
    responses(
        (status = 200, description = "Account soft-deleted"),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 404, description = "No such account", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser",
    security(("SessionCookie" = []))
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    session.require_role(Role::Manager)?;
    state
        .directory
        .delete_account(AccountId::from_uuid(path.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().finish())
}
