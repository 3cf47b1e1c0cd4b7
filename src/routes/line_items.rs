use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    access::AccessContext,
    dto::line_items::{CreateLineItemRequest, LineItemList, UpdateLineItemRequest},
    error::AppResult,
    models::LineItem,
    response::ApiResponse,
    routes::params::ListQuery,
    services::line_item_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_line_items).post(create_line_item))
        .route(
            "/{id}",
            get(get_line_item)
                .patch(update_line_item)
                .delete(delete_line_item),
        )
}

#[utoipa::path(
    get,
    path = "/api/line-items",
    params(ListQuery),
    responses(
        (status = 200, description = "List line items", body = ApiResponse<LineItemList>),
        (status = 403, description = "Access denied"),
    ),
    security(("bearer_auth" = [])),
    tag = "Line items"
)]
pub async fn list_line_items(
    State(state): State<AppState>,
    ctx: AccessContext,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<LineItemList>>> {
    let resp = line_item_service::list_line_items(&state, &ctx, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/line-items/{id}",
    params(
        ("id" = Uuid, Path, description = "Line item ID")
    ),
    responses(
        (status = 200, description = "Get line item", body = ApiResponse<LineItem>),
        (status = 403, description = "Access denied"),
        (status = 404, description = "Line item not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Line items"
)]
pub async fn get_line_item(
    State(state): State<AppState>,
    ctx: AccessContext,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<LineItem>>> {
    let resp = line_item_service::get_line_item(&state, &ctx, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/line-items",
    request_body = CreateLineItemRequest,
    responses(
        (status = 201, description = "Create line item; data is omitted for callers who cannot query line items", body = ApiResponse<LineItem>),
        (status = 400, description = "Validation failed"),
    ),
    tag = "Line items"
)]
pub async fn create_line_item(
    State(state): State<AppState>,
    ctx: AccessContext,
    Json(payload): Json<CreateLineItemRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<LineItem>>)> {
    let resp = line_item_service::create_line_item(&state, &ctx, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    patch,
    path = "/api/line-items/{id}",
    params(
        ("id" = Uuid, Path, description = "Line item ID")
    ),
    request_body = UpdateLineItemRequest,
    responses(
        (status = 200, description = "Updated line item", body = ApiResponse<LineItem>),
        (status = 403, description = "Access denied"),
        (status = 404, description = "Line item not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Line items"
)]
pub async fn update_line_item(
    State(state): State<AppState>,
    ctx: AccessContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLineItemRequest>,
) -> AppResult<Json<ApiResponse<LineItem>>> {
    let resp = line_item_service::update_line_item(&state, &ctx, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/line-items/{id}",
    params(
        ("id" = Uuid, Path, description = "Line item ID")
    ),
    responses(
        (status = 200, description = "Deleted line item"),
        (status = 403, description = "Access denied"),
        (status = 404, description = "Line item not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Line items"
)]
pub async fn delete_line_item(
    State(state): State<AppState>,
    ctx: AccessContext,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = line_item_service::delete_line_item(&state, &ctx, id).await?;
    Ok(Json(resp))
}
