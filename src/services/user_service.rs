use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    access::{AccessContext, ListKey, Operation},
    dto::users::{CreateUserRequest, UpdateUserRequest, UserList},
    entity::users::{ActiveModel as UserActive, Column as UserCol, Entity as Users},
    error::{AppError, AppResult},
    models::User,
    response::{ApiResponse, Meta},
    routes::params::ListQuery,
    services::{auth_service::hash_password, written},
    state::AppState,
};

pub async fn list_users(
    state: &AppState,
    ctx: &AccessContext,
    query: ListQuery,
) -> AppResult<ApiResponse<UserList>> {
    state.registry.list(ListKey::User).authorize(ctx, Operation::Query)?;
    let page = query.page();

    let finder = Users::find()
        .order_by_asc(UserCol::CreatedAt)
        .order_by_asc(UserCol::Id);
    let total = finder.clone().count(&state.orm).await?;

    let items = finder
        .limit(page.per_page as u64)
        .offset(page.offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(User::from)
        .collect();

    Ok(ApiResponse::success(
        "Users",
        UserList { items },
        Some(Meta::for_page(&page, total)),
    ))
}

pub async fn get_user(state: &AppState, ctx: &AccessContext, id: Uuid) -> AppResult<ApiResponse<User>> {
    state.registry.list(ListKey::User).authorize(ctx, Operation::Query)?;
    let user = Users::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("User", User::from(user), None))
}

pub async fn create_user(
    state: &AppState,
    ctx: &AccessContext,
    payload: CreateUserRequest,
) -> AppResult<ApiResponse<User>> {
    let users = state.registry.list(ListKey::User);
    users.authorize(ctx, Operation::Create)?;
    users.validate(Operation::Create, &payload)?;

    let CreateUserRequest {
        name,
        email,
        is_admin,
        password,
    } = payload;
    let email = email.unwrap_or_default();
    ensure_email_free(&state.orm, &email, None).await?;

    let user = UserActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.unwrap_or_default()),
        email: Set(email),
        is_admin: Set(is_admin.unwrap_or(false)),
        password_hash: Set(hash_password(&password.unwrap_or_default())?),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(user_id = %user.id, actor = ?ctx.user_id(), "user created");
    Ok(written(users, ctx, "User created", User::from(user)))
}

pub async fn update_user(
    state: &AppState,
    ctx: &AccessContext,
    id: Uuid,
    payload: UpdateUserRequest,
) -> AppResult<ApiResponse<User>> {
    let users = state.registry.list(ListKey::User);
    users.authorize(ctx, Operation::Update)?;
    users.validate(Operation::Update, &payload)?;

    let existing = Users::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: UserActive = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(email) = payload.email {
        ensure_email_free(&state.orm, &email, Some(id)).await?;
        active.email = Set(email);
    }
    if let Some(is_admin) = payload.is_admin {
        active.is_admin = Set(is_admin);
    }
    if let Some(password) = payload.password {
        active.password_hash = Set(hash_password(&password)?);
    }

    let user = active.update(&state.orm).await?;

    tracing::info!(user_id = %user.id, actor = ?ctx.user_id(), "user updated");
    Ok(written(users, ctx, "Updated", User::from(user)))
}

pub async fn delete_user(
    state: &AppState,
    ctx: &AccessContext,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state.registry.list(ListKey::User).authorize(ctx, Operation::Delete)?;
    let result = Users::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    tracing::info!(user_id = %id, actor = ?ctx.user_id(), "user deleted");
    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    ))
}

async fn ensure_email_free<C: ConnectionTrait>(
    conn: &C,
    email: &str,
    except: Option<Uuid>,
) -> AppResult<()> {
    let mut finder = Users::find().filter(UserCol::Email.eq(email));
    if let Some(id) = except {
        finder = finder.filter(UserCol::Id.ne(id));
    }
    if finder.one(conn).await?.is_some() {
        return Err(AppError::Conflict("Email is already taken".into()));
    }
    Ok(())
}
