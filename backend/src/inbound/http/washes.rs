//! Wash record HTTP handlers, washer only.
//!
//! ```text
//! POST   /api/v1/washes
//! GET    /api/v1/washes
//! PUT    /api/v1/washes/{id}
//! DELETE /api/v1/washes/{id}
//! ```
//!
//! Update and delete apply only to records the caller created; a record
//! owned by another washer answers exactly like a missing one.

use actix_web::{delete, get, post, put, web, HttpResponse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::{
    CreateWashRequest, DeleteWashRequest, ListWashesRequest, UpdateWashRequest,
    WashDetailPayload, WashSubmission,
};
use crate::domain::{Error, Role};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::AccountResponseBody;
use crate::inbound::http::validation::{
    parse_account_id, parse_license_plate, parse_price, parse_storage_key, parse_wash_type,
    FieldName,
};
use crate::inbound::http::ApiResult;

/// Request body shared by wash creation and update.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WashRequestBody {
    /// Plate of the washed truck.
    pub license_plate: String,
    /// Driver owning the truck.
    #[schema(format = "uuid")]
    pub driver_id: String,
    /// Service tier: `basic`, `premium`, or `deluxe`.
    #[schema(example = "premium")]
    pub wash_type: String,
    /// Charged amount; accepts a JSON number or a decimal string.
    #[schema(value_type = String, example = "49.99")]
    pub price: Decimal,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Storage key of the before-wash photo.
    pub before_image: String,
    /// Storage key of the after-wash photo.
    pub after_image: String,
}

/// Truck payload nested in a wash response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TruckResponseBody {
    /// Truck identifier.
    #[schema(format = "uuid")]
    pub id: Uuid,
    /// Unique plate.
    pub license_plate: String,
    /// Owning driver account.
    #[schema(format = "uuid")]
    pub driver_id: Uuid,
}

/// Photo attachment payload nested in a wash response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WashImageResponseBody {
    /// Slot the photo fills: `before` or `after`.
    #[schema(example = "before")]
    pub image_type: String,
    /// Object storage key.
    pub image_key: String,
}

/// Expanded wash record returned by every wash endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WashResponseBody {
    /// Record identifier.
    #[schema(format = "uuid")]
    pub id: Uuid,
    /// Service tier.
    pub wash_type: String,
    /// Charged amount as a decimal string.
    #[schema(example = "49.99")]
    pub price: String,
    /// Free-text notes.
    pub notes: Option<String>,
    /// When the wash happened.
    #[schema(format = "date-time")]
    pub wash_date: String,
    /// Row creation timestamp.
    #[schema(format = "date-time")]
    pub created_at: String,
    /// Last modification timestamp.
    #[schema(format = "date-time")]
    pub updated_at: String,
    /// Washed truck.
    pub truck: TruckResponseBody,
    /// Driver owning the truck.
    pub driver: AccountResponseBody,
    /// Washer who logged the record.
    pub washer: AccountResponseBody,
    /// Before-wash photo.
    pub before_image: WashImageResponseBody,
    /// After-wash photo.
    pub after_image: WashImageResponseBody,
}

impl From<WashDetailPayload> for WashResponseBody {
    fn from(value: WashDetailPayload) -> Self {
        Self {
            id: value.id,
            wash_type: value.wash_type.as_str().to_owned(),
            price: value.price.to_string(),
            notes: value.notes,
            wash_date: value.wash_date.to_rfc3339(),
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
            truck: TruckResponseBody {
                id: value.truck.id,
                license_plate: value.truck.license_plate.to_string(),
                driver_id: *value.truck.driver_id.as_uuid(),
            },
            driver: AccountResponseBody::from(value.driver),
            washer: AccountResponseBody::from(value.washer),
            before_image: WashImageResponseBody {
                image_type: value.before_image.image_type.as_str().to_owned(),
                image_key: value.before_image.image_key.to_string(),
            },
            after_image: WashImageResponseBody {
                image_type: value.after_image.image_type.as_str().to_owned(),
                image_key: value.after_image.image_key.to_string(),
            },
        }
    }
}

fn parse_submission(body: WashRequestBody) -> Result<WashSubmission, Error> {
    Ok(WashSubmission {
        license_plate: parse_license_plate(&body.license_plate, FieldName::new("licensePlate"))?,
        driver_id: parse_account_id(&body.driver_id, FieldName::new("driverId"))?,
        wash_type: parse_wash_type(&body.wash_type, FieldName::new("washType"))?,
        price: parse_price(body.price, FieldName::new("price"))?,
        notes: body.notes,
        before_image: parse_storage_key(&body.before_image, FieldName::new("beforeImage"))?,
        after_image: parse_storage_key(&body.after_image, FieldName::new("afterImage"))?,
    })
}

/// Log a wash event with both photos.
#[utoipa::path(
    post,
    path = "/api/v1/washes",
    request_body = WashRequestBody,
    responses(
        (status = 201, description = "Wash record created", body = WashResponseBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["washes"],
    operation_id = "createWash",
    security(("SessionCookie" = []))
)]
#[post("/washes")]
pub async fn create_wash(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<WashRequestBody>,
) -> ApiResult<HttpResponse> {
    let user = session.require_role(Role::Washer)?;
    let detail = state
        .washes
        .create_wash(CreateWashRequest {
            washer_id: user.id,
            submission: parse_submission(payload.into_inner())?,
        })
        .await?;
    Ok(HttpResponse::Created().json(WashResponseBody::from(detail)))
}

/// List the caller's own wash records, newest wash first.
#[utoipa::path(
    get,
    path = "/api/v1/washes",
    responses(
        (status = 200, description = "The caller's records", body = [WashResponseBody]),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["washes"],
    operation_id = "listWashes",
    security(("SessionCookie" = []))
)]
#[get("/washes")]
pub async fn list_washes(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<WashResponseBody>>> {
    let user = session.require_role(Role::Washer)?;
    let response = state
        .washes_query
        .list_washes(ListWashesRequest { washer_id: user.id })
        .await?;
    Ok(web::Json(
        response
            .washes
            .into_iter()
            .map(WashResponseBody::from)
            .collect(),
    ))
}

/// Update an owned wash record, reconciling truck and photo changes.
#[utoipa::path(
    put,
    path = "/api/v1/washes/{id}",
    request_body = WashRequestBody,
    params(("id" = Uuid, Path, description = "Wash record identifier")),
    responses(
        (status = 200, description = "Wash record updated", body = WashResponseBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 404, description = "Missing or not owned", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["washes"],
    operation_id = "updateWash",
    security(("SessionCookie" = []))
)]
#[put("/washes/{id}")]
pub async fn update_wash(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<WashRequestBody>,
) -> ApiResult<web::Json<WashResponseBody>> {
    let user = session.require_role(Role::Washer)?;
    let detail = state
        .washes
        .update_wash(UpdateWashRequest {
            washer_id: user.id,
            wash_id: path.into_inner(),
            submission: parse_submission(payload.into_inner())?,
        })
        .await?;
    Ok(web::Json(WashResponseBody::from(detail)))
}

/// Delete an owned wash record and best-effort remove its photos.
#[utoipa::path(
    delete,
    path = "/api/v1/washes/{id}",
    params(("id" = Uuid, Path, description = "Wash record identifier")),
    responses(
        (status = 200, description = "Wash record deleted"),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 404, description = "Missing or not owned", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["washes"],
    operation_id = "deleteWash",
    security(("SessionCookie" = []))
)]
#[delete("/washes/{id}")]
pub async fn delete_wash(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let user = session.require_role(Role::Washer)?;
    state
        .washes
        .delete_wash(DeleteWashRequest {
            washer_id: user.id,
            wash_id: path.into_inner(),
        })
        .await?;
    Ok(HttpResponse::Ok().finish())
}
