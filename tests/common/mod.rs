#![allow(dead_code)]

use chrono::Utc;
use presales_api::{
    access::AccessContext,
    config::AppConfig,
    entity::{
        products::{ActiveModel as ProductActive, Model as ProductModel},
        users::{ActiveModel as UserActive, Model as UserModel},
    },
    migration::Migrator,
    services::auth_service::{context_for, hash_password},
    state::AppState,
};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, Set};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

pub fn test_config() -> AppConfig {
    AppConfig::from_lookup(|key| {
        let value = match key {
            "DB_URL" => "localhost",
            "DB_USERNAME" => "keystone",
            "DB_PASSWORD" => "keystone",
            "SESSION_SECRET" => "integration-test-secret-integration-test",
            _ => return None,
        };
        Some(value.to_string())
    })
    .expect("test config")
}

/// Fresh in-memory database with every table migrated. A single pooled
/// connection keeps all queries on the same in-memory database.
pub async fn setup_state() -> AppState {
    let mut options = ConnectOptions::new("sqlite::memory:".to_owned());
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let orm = Database::connect(options).await.expect("sqlite connection");
    Migrator::up(&orm, None).await.expect("migrations");
    AppState::new(orm, test_config())
}

pub async fn insert_user(state: &AppState, email: &str, is_admin: bool) -> UserModel {
    UserActive {
        id: Set(Uuid::new_v4()),
        name: Set(email.split('@').next().unwrap_or(email).to_string()),
        email: Set(email.to_string()),
        is_admin: Set(is_admin),
        password_hash: Set(hash_password("correct horse battery").expect("hash")),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await
    .expect("insert user")
}

pub async fn admin_context(state: &AppState) -> AccessContext {
    let admin = insert_user(state, "admin@example.com", true).await;
    context_for(&admin)
}

pub async fn customer_context(state: &AppState) -> AccessContext {
    let customer = insert_user(state, "student@example.com", false).await;
    context_for(&customer)
}

pub async fn insert_product(state: &AppState, name: &str, price: i32) -> ProductModel {
    ProductActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        picture: Set(None),
        description: Set(None),
        stock: Set(10),
        price: Set(price),
    }
    .insert(&state.orm)
    .await
    .expect("insert product")
}
