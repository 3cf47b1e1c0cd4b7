use chrono::Utc;
use presales_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    entity::{
        products::{ActiveModel as ProductActive, Column as ProdCol, Entity as Products},
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users},
    },
    services::auth_service::hash_password,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde_json::json;
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_env_filter("info").init();

    let config = AppConfig::from_env()?;
    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    let email = std::env::var("SEED_ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".into());
    let password = std::env::var("SEED_ADMIN_PASSWORD").unwrap_or_else(|_| "admin1234".into());

    let admin_id = ensure_admin(&orm, &email, &password).await?;
    seed_products(&orm).await?;

    tracing::info!(%admin_id, "seed completed");
    Ok(())
}

async fn ensure_admin(orm: &DatabaseConnection, email: &str, password: &str) -> anyhow::Result<Uuid> {
    if let Some(existing) = Users::find()
        .filter(UserCol::Email.eq(email))
        .one(orm)
        .await?
    {
        tracing::info!(email, "admin already present");
        return Ok(existing.id);
    }

    let user = UserActive {
        id: Set(Uuid::new_v4()),
        name: Set("Admin".into()),
        email: Set(email.to_owned()),
        is_admin: Set(true),
        password_hash: Set(hash_password(password)?),
        created_at: Set(Utc::now().into()),
    }
    .insert(orm)
    .await?;

    tracing::info!(email, "admin created");
    Ok(user.id)
}

async fn seed_products(orm: &DatabaseConnection) -> anyhow::Result<()> {
    let products = [
        ("Prep Book: Mathematics", "Full-year practice problems", 150, 40),
        ("Prep Book: Physics", "Worked examples and past papers", 150, 40),
        ("Mock Exam Pack", "Three timed mock exams with answers", 90, 100),
        ("Formula Sheet", "Laminated quick reference", 20, 200),
    ];

    for (name, summary, price, stock) in products {
        let exists = Products::find()
            .filter(ProdCol::Name.eq(name))
            .one(orm)
            .await?
            .is_some();
        if exists {
            continue;
        }

        ProductActive {
            id: Set(Uuid::new_v4()),
            name: Set(name.into()),
            picture: Set(None),
            description: Set(Some(json!([
                { "type": "paragraph", "children": [{ "text": summary }] }
            ]))),
            stock: Set(stock),
            price: Set(price),
        }
        .insert(orm)
        .await?;
        tracing::info!(name, "product seeded");
    }

    Ok(())
}
