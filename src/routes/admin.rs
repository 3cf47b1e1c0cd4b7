use axum::{Json, Router, extract::State, routing::get};

use crate::{
    access::AccessContext, error::AppResult, response::ApiResponse, schema::ListSchema,
    services::admin_service, state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/meta", get(list_meta))
}

#[utoipa::path(
    get,
    path = "/api/admin/meta",
    responses(
        (status = 200, description = "Lists with their fields and access policies (admin only)"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_meta(
    State(state): State<AppState>,
    ctx: AccessContext,
) -> AppResult<Json<ApiResponse<Vec<ListSchema>>>> {
    let resp = admin_service::schema_meta(&state, &ctx)?;
    Ok(Json(resp))
}
