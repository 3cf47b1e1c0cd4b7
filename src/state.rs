use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{config::AppConfig, schema::SchemaRegistry};

#[derive(Clone)]
pub struct AppState {
    pub orm: DatabaseConnection,
    pub config: Arc<AppConfig>,
    pub registry: Arc<SchemaRegistry>,
}

impl AppState {
    pub fn new(orm: DatabaseConnection, config: AppConfig) -> Self {
        let registry = SchemaRegistry::new(&config.cloudinary);
        Self {
            orm,
            config: Arc::new(config),
            registry: Arc::new(registry),
        }
    }
}
