use crate::{
    access::{self, AccessContext},
    error::{AppError, AppResult},
    response::{ApiResponse, Meta},
    schema::ListSchema,
    state::AppState,
};

/// The list registry, for admin tooling.
pub fn schema_meta(state: &AppState, ctx: &AccessContext) -> AppResult<ApiResponse<Vec<ListSchema>>> {
    if !access::is_admin(ctx) {
        return Err(AppError::Forbidden);
    }
    let lists = state.registry.lists().into_iter().cloned().collect();
    Ok(ApiResponse::success("Lists", lists, Some(Meta::empty())))
}
