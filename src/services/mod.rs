pub mod admin_service;
pub mod auth_service;
pub mod line_item_service;
pub mod product_service;
pub mod purchase_service;
pub mod user_service;

use serde::Serialize;

use crate::{
    access::{AccessContext, Operation},
    response::{ApiResponse, Meta},
    schema::ListSchema,
};

/// Wrap the result of a write. The item is only echoed back when the caller
/// may also query the list; otherwise the write is acknowledged without data.
pub(crate) fn written<T: Serialize>(
    list: &ListSchema,
    ctx: &AccessContext,
    message: &str,
    item: T,
) -> ApiResponse<T> {
    if list.can(ctx, Operation::Query) {
        ApiResponse::success(message, item, Some(Meta::empty()))
    } else {
        ApiResponse::acknowledged(message)
    }
}
