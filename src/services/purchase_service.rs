use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    access::{AccessContext, ListKey, Operation},
    dto::purchases::{CreatePurchaseRequest, PurchaseList, UpdatePurchaseRequest},
    entity::{
        line_items::{
            ActiveModel as LineItemActive, Column as LineItemCol, Entity as LineItems,
            Model as LineItemModel,
        },
        purchases::{
            ActiveModel as PurchaseActive, Column as PurchaseCol, Entity as Purchases,
            PurchaseStatus,
        },
    },
    error::{AppError, AppResult},
    image::{CloudinaryImage, ImageInput},
    models::Purchase,
    response::{ApiResponse, Meta},
    routes::params::{PurchaseListQuery, SortOrder},
    services::{
        line_item_service::{ensure_product_exists, to_position},
        written,
    },
    state::AppState,
};

pub async fn list_purchases(
    state: &AppState,
    ctx: &AccessContext,
    query: PurchaseListQuery,
) -> AppResult<ApiResponse<PurchaseList>> {
    state
        .registry
        .list(ListKey::Purchase)
        .authorize(ctx, Operation::Query)?;
    let page = query.page();

    let mut condition = Condition::all();
    if let Some(status) = query.status.as_deref().filter(|s| !s.is_empty()) {
        condition = condition.add(PurchaseCol::Status.eq(parse_status(status)?));
    }

    let mut finder = Purchases::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(PurchaseCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(PurchaseCol::CreatedAt),
    };
    finder = finder.order_by_asc(PurchaseCol::Id);

    let total = finder.clone().count(&state.orm).await?;

    let purchases = finder
        .limit(page.per_page as u64)
        .offset(page.offset as u64)
        .all(&state.orm)
        .await?;

    let ids: Vec<Uuid> = purchases.iter().map(|p| p.id).collect();
    let mut items_by_purchase: HashMap<Uuid, Vec<LineItemModel>> = HashMap::new();
    if !ids.is_empty() {
        let items = LineItems::find()
            .filter(LineItemCol::PurchaseId.is_in(ids))
            .order_by_asc(LineItemCol::Position)
            .all(&state.orm)
            .await?;
        for item in items {
            items_by_purchase.entry(item.purchase_id).or_default().push(item);
        }
    }

    let items = purchases
        .into_iter()
        .map(|p| {
            let line_items = items_by_purchase.remove(&p.id).unwrap_or_default();
            Purchase::from_parts(p, line_items)
        })
        .collect();

    Ok(ApiResponse::success(
        "Purchases",
        PurchaseList { items },
        Some(Meta::for_page(&page, total)),
    ))
}

pub async fn get_purchase(
    state: &AppState,
    ctx: &AccessContext,
    id: Uuid,
) -> AppResult<ApiResponse<Purchase>> {
    state
        .registry
        .list(ListKey::Purchase)
        .authorize(ctx, Operation::Query)?;
    let purchase = load_purchase(&state.orm, id).await?;
    Ok(ApiResponse::success("Purchase", purchase, Some(Meta::empty())))
}

/// Submit a purchase together with its line items. Either everything is
/// written or nothing is.
pub async fn create_purchase(
    state: &AppState,
    ctx: &AccessContext,
    payload: CreatePurchaseRequest,
) -> AppResult<ApiResponse<Purchase>> {
    let purchases = state.registry.list(ListKey::Purchase);
    let line_items = state.registry.list(ListKey::LineItem);

    purchases.authorize(ctx, Operation::Create)?;
    if !payload.line_items.is_empty() {
        line_items.authorize(ctx, Operation::Create)?;
    }
    purchases.validate(Operation::Create, &payload)?;
    for item in &payload.line_items {
        line_items.validate(Operation::Create, item)?;
    }

    let status = match payload.status.as_deref() {
        Some(status) => parse_status(status)?,
        None => PurchaseStatus::default(),
    };
    let receipt_image = match payload.receipt_image {
        Some(input) => Some(receipt_json(state, input)?),
        None => None,
    };

    let now = Utc::now();
    let txn = state.orm.begin().await?;
    let purchase = PurchaseActive {
        id: Set(Uuid::new_v4()),
        student: Set(payload.student.unwrap_or_default()),
        phone_number: Set(payload.phone_number.unwrap_or_default()),
        receipt_image: Set(receipt_image),
        status: Set(status),
        notes: Set(payload.notes.unwrap_or_default()),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&txn)
    .await?;

    let mut created_items = Vec::with_capacity(payload.line_items.len());
    for (position, item) in payload.line_items.into_iter().enumerate() {
        let Some(product_id) = item.product_id else {
            return Err(AppError::validation(ListKey::LineItem, "product", "is required"));
        };
        ensure_product_exists(&txn, product_id).await?;

        let created = LineItemActive {
            id: Set(Uuid::new_v4()),
            product_id: Set(product_id),
            quantity: Set(item.quantity.unwrap_or_default()),
            purchase_id: Set(purchase.id),
            position: Set(to_position(position)?),
        }
        .insert(&txn)
        .await?;
        created_items.push(created);
    }
    txn.commit().await?;

    tracing::info!(
        purchase_id = %purchase.id,
        line_items = created_items.len(),
        actor = ?ctx.user_id(),
        "purchase submitted"
    );
    Ok(written(
        purchases,
        ctx,
        "Purchase created",
        Purchase::from_parts(purchase, created_items),
    ))
}

pub async fn update_purchase(
    state: &AppState,
    ctx: &AccessContext,
    id: Uuid,
    payload: UpdatePurchaseRequest,
) -> AppResult<ApiResponse<Purchase>> {
    let purchases = state.registry.list(ListKey::Purchase);
    purchases.authorize(ctx, Operation::Update)?;
    purchases.validate(Operation::Update, &payload)?;

    let existing = Purchases::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: PurchaseActive = existing.into();
    if let Some(student) = payload.student {
        active.student = Set(student);
    }
    if let Some(phone_number) = payload.phone_number {
        active.phone_number = Set(phone_number);
    }
    if let Some(input) = payload.receipt_image {
        active.receipt_image = Set(Some(receipt_json(state, input)?));
    }
    if let Some(status) = payload.status.as_deref() {
        active.status = Set(parse_status(status)?);
    }
    if let Some(notes) = payload.notes {
        active.notes = Set(notes);
    }
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&state.orm).await?;

    tracing::info!(
        purchase_id = %updated.id,
        status = updated.status.as_str(),
        actor = ?ctx.user_id(),
        "purchase updated"
    );
    let purchase = load_purchase(&state.orm, updated.id).await?;
    Ok(written(purchases, ctx, "Purchase updated", purchase))
}

pub async fn delete_purchase(
    state: &AppState,
    ctx: &AccessContext,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state
        .registry
        .list(ListKey::Purchase)
        .authorize(ctx, Operation::Delete)?;

    let txn = state.orm.begin().await?;
    let removed_items = LineItems::delete_many()
        .filter(LineItemCol::PurchaseId.eq(id))
        .exec(&txn)
        .await?;
    let result = Purchases::delete_by_id(id).exec(&txn).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    txn.commit().await?;

    tracing::info!(
        purchase_id = %id,
        line_items = removed_items.rows_affected,
        actor = ?ctx.user_id(),
        "purchase deleted"
    );
    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    ))
}

async fn load_purchase<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<Purchase> {
    let purchase = Purchases::find_by_id(id)
        .one(conn)
        .await?
        .ok_or(AppError::NotFound)?;
    let items = LineItems::find()
        .filter(LineItemCol::PurchaseId.eq(id))
        .order_by_asc(LineItemCol::Position)
        .all(conn)
        .await?;
    Ok(Purchase::from_parts(purchase, items))
}

fn parse_status(value: &str) -> AppResult<PurchaseStatus> {
    PurchaseStatus::parse(value).ok_or_else(|| {
        AppError::validation(
            ListKey::Purchase,
            "status",
            "must be one of: pending, confirmed, rejected",
        )
    })
}

fn receipt_json(state: &AppState, input: ImageInput) -> AppResult<serde_json::Value> {
    let purchases = state.registry.list(ListKey::Purchase);
    let folder = purchases.image_folder("receiptImage")?;
    CloudinaryImage::from_input(
        input,
        &state.config.cloudinary,
        folder,
        ListKey::Purchase,
        "receiptImage",
    )?
    .to_json()
}
