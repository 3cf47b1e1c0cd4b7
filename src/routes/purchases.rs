use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    access::AccessContext,
    dto::purchases::{CreatePurchaseRequest, PurchaseList, UpdatePurchaseRequest},
    error::AppResult,
    models::Purchase,
    response::ApiResponse,
    routes::params::PurchaseListQuery,
    services::purchase_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_purchases).post(create_purchase))
        .route(
            "/{id}",
            get(get_purchase)
                .patch(update_purchase)
                .delete(delete_purchase),
        )
}

#[utoipa::path(
    get,
    path = "/api/purchases",
    params(PurchaseListQuery),
    responses(
        (status = 200, description = "List purchases with their line items", body = ApiResponse<PurchaseList>),
        (status = 403, description = "Access denied"),
    ),
    security(("bearer_auth" = [])),
    tag = "Purchases"
)]
pub async fn list_purchases(
    State(state): State<AppState>,
    ctx: AccessContext,
    Query(query): Query<PurchaseListQuery>,
) -> AppResult<Json<ApiResponse<PurchaseList>>> {
    let resp = purchase_service::list_purchases(&state, &ctx, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/purchases/{id}",
    params(
        ("id" = Uuid, Path, description = "Purchase ID")
    ),
    responses(
        (status = 200, description = "Get purchase", body = ApiResponse<Purchase>),
        (status = 403, description = "Access denied"),
        (status = 404, description = "Purchase not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Purchases"
)]
pub async fn get_purchase(
    State(state): State<AppState>,
    ctx: AccessContext,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Purchase>>> {
    let resp = purchase_service::get_purchase(&state, &ctx, id).await?;
    Ok(Json(resp))
}

/// Public submission endpoint used by the storefront.
#[utoipa::path(
    post,
    path = "/api/purchases",
    request_body = CreatePurchaseRequest,
    responses(
        (status = 201, description = "Purchase submitted; data is omitted for callers who cannot query purchases", body = ApiResponse<Purchase>),
        (status = 400, description = "Validation failed"),
    ),
    tag = "Purchases"
)]
pub async fn create_purchase(
    State(state): State<AppState>,
    ctx: AccessContext,
    Json(payload): Json<CreatePurchaseRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Purchase>>)> {
    let resp = purchase_service::create_purchase(&state, &ctx, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    patch,
    path = "/api/purchases/{id}",
    params(
        ("id" = Uuid, Path, description = "Purchase ID")
    ),
    request_body = UpdatePurchaseRequest,
    responses(
        (status = 200, description = "Updated purchase", body = ApiResponse<Purchase>),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "Access denied"),
        (status = 404, description = "Purchase not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Purchases"
)]
pub async fn update_purchase(
    State(state): State<AppState>,
    ctx: AccessContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePurchaseRequest>,
) -> AppResult<Json<ApiResponse<Purchase>>> {
    let resp = purchase_service::update_purchase(&state, &ctx, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/purchases/{id}",
    params(
        ("id" = Uuid, Path, description = "Purchase ID")
    ),
    responses(
        (status = 200, description = "Deleted purchase and its line items"),
        (status = 403, description = "Access denied"),
        (status = 404, description = "Purchase not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Purchases"
)]
pub async fn delete_purchase(
    State(state): State<AppState>,
    ctx: AccessContext,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = purchase_service::delete_purchase(&state, &ctx, id).await?;
    Ok(Json(resp))
}
