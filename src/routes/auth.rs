use axum::{Json, Router, extract::State, http::StatusCode, routing::post};

use crate::{
    dto::auth::{InitFirstUserRequest, LoginRequest, LoginResponse},
    error::AppResult,
    response::ApiResponse,
    services::auth_service::{init_first_user, login_user},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/init", post(init))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login user", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    let resp = login_user(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/auth/init",
    request_body = InitFirstUserRequest,
    responses(
        (status = 201, description = "First admin created", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "Users already exist")
    ),
    tag = "Auth"
)]
pub async fn init(
    State(state): State<AppState>,
    Json(payload): Json<InitFirstUserRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<LoginResponse>>)> {
    let resp = init_first_user(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}
