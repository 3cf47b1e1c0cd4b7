use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    access::{AccessContext, ListKey, Operation},
    dto::line_items::{CreateLineItemRequest, LineItemList, UpdateLineItemRequest},
    entity::{
        Products, Purchases,
        purchases::PurchaseStatus,
        line_items::{ActiveModel as LineItemActive, Column as LineItemCol, Entity as LineItems},
    },
    error::{AppError, AppResult},
    models::LineItem,
    response::{ApiResponse, Meta},
    routes::params::ListQuery,
    services::written,
    state::AppState,
};

pub async fn list_line_items(
    state: &AppState,
    ctx: &AccessContext,
    query: ListQuery,
) -> AppResult<ApiResponse<LineItemList>> {
    state
        .registry
        .list(ListKey::LineItem)
        .authorize(ctx, Operation::Query)?;
    let page = query.page();

    let finder = LineItems::find()
        .order_by_asc(LineItemCol::PurchaseId)
        .order_by_asc(LineItemCol::Position);
    let total = finder.clone().count(&state.orm).await?;

    let items = finder
        .limit(page.per_page as u64)
        .offset(page.offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(LineItem::from)
        .collect();

    Ok(ApiResponse::success(
        "Line items",
        LineItemList { items },
        Some(Meta::for_page(&page, total)),
    ))
}

pub async fn get_line_item(
    state: &AppState,
    ctx: &AccessContext,
    id: Uuid,
) -> AppResult<ApiResponse<LineItem>> {
    state
        .registry
        .list(ListKey::LineItem)
        .authorize(ctx, Operation::Query)?;
    let item = LineItems::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Line item", LineItem::from(item), None))
}

/// Add a line item to an existing purchase.
pub async fn create_line_item(
    state: &AppState,
    ctx: &AccessContext,
    payload: CreateLineItemRequest,
) -> AppResult<ApiResponse<LineItem>> {
    let line_items = state.registry.list(ListKey::LineItem);
    line_items.authorize(ctx, Operation::Create)?;
    line_items.validate(Operation::Create, &payload)?;

    let Some(product_id) = payload.product_id else {
        return Err(AppError::validation(ListKey::LineItem, "product", "is required"));
    };
    let Some(purchase_id) = payload.purchase_id else {
        return Err(AppError::validation(ListKey::LineItem, "purchase", "is required"));
    };

    let can_see_purchases = state
        .registry
        .list(ListKey::Purchase)
        .can(ctx, Operation::Query);

    let txn = state.orm.begin().await?;
    ensure_product_exists(&txn, product_id).await?;
    if can_see_purchases {
        ensure_purchase_exists(&txn, purchase_id).await?;
    } else {
        ensure_purchase_open(&txn, purchase_id).await?;
    }

    let position = next_position(&txn, purchase_id).await?;
    let item = LineItemActive {
        id: Set(Uuid::new_v4()),
        product_id: Set(product_id),
        quantity: Set(payload.quantity.unwrap_or_default()),
        purchase_id: Set(purchase_id),
        position: Set(position),
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    tracing::info!(
        line_item_id = %item.id,
        purchase_id = %purchase_id,
        actor = ?ctx.user_id(),
        "line item created"
    );
    Ok(written(line_items, ctx, "Line item created", LineItem::from(item)))
}

pub async fn update_line_item(
    state: &AppState,
    ctx: &AccessContext,
    id: Uuid,
    payload: UpdateLineItemRequest,
) -> AppResult<ApiResponse<LineItem>> {
    let line_items = state.registry.list(ListKey::LineItem);
    line_items.authorize(ctx, Operation::Update)?;
    line_items.validate(Operation::Update, &payload)?;

    let txn = state.orm.begin().await?;
    let existing = LineItems::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: LineItemActive = existing.clone().into();
    if let Some(product_id) = payload.product_id {
        ensure_product_exists(&txn, product_id).await?;
        active.product_id = Set(product_id);
    }
    if let Some(quantity) = payload.quantity {
        active.quantity = Set(quantity);
    }
    if let Some(purchase_id) = payload.purchase_id {
        if purchase_id != existing.purchase_id {
            ensure_purchase_exists(&txn, purchase_id).await?;
            active.purchase_id = Set(purchase_id);
            active.position = Set(next_position(&txn, purchase_id).await?);
        }
    }

    let item = active.update(&txn).await?;
    txn.commit().await?;

    tracing::info!(line_item_id = %item.id, actor = ?ctx.user_id(), "line item updated");
    Ok(written(line_items, ctx, "Updated", LineItem::from(item)))
}

pub async fn delete_line_item(
    state: &AppState,
    ctx: &AccessContext,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state
        .registry
        .list(ListKey::LineItem)
        .authorize(ctx, Operation::Delete)?;
    let result = LineItems::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    tracing::info!(line_item_id = %id, actor = ?ctx.user_id(), "line item deleted");
    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    ))
}

pub(crate) async fn ensure_product_exists<C: ConnectionTrait>(
    conn: &C,
    product_id: Uuid,
) -> AppResult<()> {
    if Products::find_by_id(product_id).one(conn).await?.is_none() {
        return Err(AppError::validation(
            ListKey::LineItem,
            "product",
            "references a Product that does not exist",
        ));
    }
    Ok(())
}

async fn ensure_purchase_exists<C: ConnectionTrait>(conn: &C, purchase_id: Uuid) -> AppResult<()> {
    if Purchases::find_by_id(purchase_id).one(conn).await?.is_none() {
        return Err(AppError::validation(
            ListKey::LineItem,
            "purchase",
            "references a Purchase that does not exist",
        ));
    }
    Ok(())
}

/// For callers who cannot query purchases: only a pending purchase accepts
/// new items, and a missing purchase fails with the same error so the
/// response does not reveal which ids exist.
async fn ensure_purchase_open<C: ConnectionTrait>(conn: &C, purchase_id: Uuid) -> AppResult<()> {
    match Purchases::find_by_id(purchase_id).one(conn).await? {
        Some(purchase) if purchase.status == PurchaseStatus::Pending => Ok(()),
        _ => Err(AppError::validation(
            ListKey::LineItem,
            "purchase",
            "cannot add items to this Purchase",
        )),
    }
}

async fn next_position<C: ConnectionTrait>(conn: &C, purchase_id: Uuid) -> AppResult<i32> {
    let count = LineItems::find()
        .filter(LineItemCol::PurchaseId.eq(purchase_id))
        .count(conn)
        .await?;
    to_position(count)
}

pub(crate) fn to_position<N>(n: N) -> AppResult<i32>
where
    i32: TryFrom<N>,
    N: Copy + std::fmt::Display,
{
    i32::try_from(n).map_err(|_| {
        AppError::Internal(anyhow::anyhow!("line item position {n} does not fit in i32"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_that_overflow_i32_are_errors() {
        assert_eq!(to_position(7_u64).unwrap(), 7);
        assert_eq!(to_position(i32::MAX as usize).unwrap(), i32::MAX);
        assert!(matches!(
            to_position(i32::MAX as u64 + 1),
            Err(AppError::Internal(_))
        ));
    }
}
