use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    access::{AccessContext, ListKey, Operation},
    dto::products::{CreateProductRequest, ProductList, UpdateProductRequest},
    entity::{
        line_items::{Column as LineItemCol, Entity as LineItems},
        products::{ActiveModel as ProductActive, Column as ProdCol, Entity as Products},
    },
    error::{AppError, AppResult},
    image::{CloudinaryImage, ImageInput},
    models::Product,
    response::{ApiResponse, Meta},
    routes::params::{ProductQuery, ProductSortBy, SortOrder},
    services::written,
    state::AppState,
};

pub async fn list_products(
    state: &AppState,
    ctx: &AccessContext,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    state
        .registry
        .list(ListKey::Product)
        .authorize(ctx, Operation::Query)?;
    let page = query.page();

    let mut condition = Condition::all();
    if let Some(q) = query.q.as_ref().map(|q| q.trim()).filter(|q| !q.is_empty()) {
        condition = condition.add(ProdCol::Name.contains(q));
    }

    let sort_col = match query.sort_by.unwrap_or(ProductSortBy::Name) {
        ProductSortBy::Name => ProdCol::Name,
        ProductSortBy::Price => ProdCol::Price,
        ProductSortBy::Stock => ProdCol::Stock,
    };
    let mut finder = Products::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Asc) {
        SortOrder::Asc => finder.order_by_asc(sort_col),
        SortOrder::Desc => finder.order_by_desc(sort_col),
    };
    finder = finder.order_by_asc(ProdCol::Id);

    let total = finder.clone().count(&state.orm).await?;

    let items = finder
        .limit(page.per_page as u64)
        .offset(page.offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

    Ok(ApiResponse::success(
        "Products",
        ProductList { items },
        Some(Meta::for_page(&page, total)),
    ))
}

pub async fn get_product(
    state: &AppState,
    ctx: &AccessContext,
    id: Uuid,
) -> AppResult<ApiResponse<Product>> {
    state
        .registry
        .list(ListKey::Product)
        .authorize(ctx, Operation::Query)?;
    let product = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Product", Product::from(product), None))
}

pub async fn create_product(
    state: &AppState,
    ctx: &AccessContext,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let products = state.registry.list(ListKey::Product);
    products.authorize(ctx, Operation::Create)?;
    products.validate(Operation::Create, &payload)?;

    let picture = match payload.picture {
        Some(input) => Some(picture_json(state, input)?),
        None => None,
    };

    let product = ProductActive {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name.unwrap_or_default()),
        picture: Set(picture),
        description: Set(payload.description),
        stock: Set(payload.stock.unwrap_or(0)),
        price: Set(payload.price.unwrap_or_default()),
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(product_id = %product.id, actor = ?ctx.user_id(), "product created");
    Ok(written(products, ctx, "Product created", Product::from(product)))
}

pub async fn update_product(
    state: &AppState,
    ctx: &AccessContext,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let products = state.registry.list(ListKey::Product);
    products.authorize(ctx, Operation::Update)?;
    products.validate(Operation::Update, &payload)?;

    let existing = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ProductActive = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(input) = payload.picture {
        active.picture = Set(Some(picture_json(state, input)?));
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(stock) = payload.stock {
        active.stock = Set(stock);
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }

    let product = active.update(&state.orm).await?;

    tracing::info!(product_id = %product.id, actor = ?ctx.user_id(), "product updated");
    Ok(written(products, ctx, "Updated", Product::from(product)))
}

pub async fn delete_product(
    state: &AppState,
    ctx: &AccessContext,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state
        .registry
        .list(ListKey::Product)
        .authorize(ctx, Operation::Delete)?;

    let references = LineItems::find()
        .filter(LineItemCol::ProductId.eq(id))
        .count(&state.orm)
        .await?;
    if references > 0 {
        return Err(AppError::Conflict(format!(
            "Product is referenced by {references} line item(s)"
        )));
    }

    let result = Products::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    tracing::info!(product_id = %id, actor = ?ctx.user_id(), "product deleted");
    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    ))
}

fn picture_json(state: &AppState, input: ImageInput) -> AppResult<serde_json::Value> {
    let products = state.registry.list(ListKey::Product);
    let folder = products.image_folder("picture")?;
    CloudinaryImage::from_input(
        input,
        &state.config.cloudinary,
        folder,
        ListKey::Product,
        "picture",
    )?
    .to_json()
}
