use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderValue, Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::{
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Credentialed CORS for the configured origins only.
pub fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|o| HeaderValue::from_str(o))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]))
}

/// Rejects any request whose `Origin` is not on the allow-list before it
/// reaches a handler. Requests without an `Origin` header pass through.
pub async fn reject_foreign_origin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(origin) = request.headers().get(header::ORIGIN) {
        let allowed = state
            .config
            .cors_origins
            .iter()
            .any(|o| o.as_bytes() == origin.as_bytes());
        if !allowed {
            tracing::warn!(origin = ?origin, "rejected request from foreign origin");
            let body: ApiResponse<()> = ApiResponse {
                message: "Origin not allowed".into(),
                data: None,
                meta: Some(Meta::empty()),
            };
            return (StatusCode::FORBIDDEN, Json(body)).into_response();
        }
    }
    next.run(request).await
}
