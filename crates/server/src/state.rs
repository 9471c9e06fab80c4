use std::sync::Arc;

use sea_orm::DatabaseConnection;
use service::product::{repository::mock::MockProductRepository, ProductRepository, ProductService, SeaOrmProductRepository};

/// Shared handler state; storage is injected, never global.
#[derive(Clone)]
pub struct AppState {
    pub products: ProductService,
}

impl AppState {
    pub fn new(repo: Arc<dyn ProductRepository>) -> Self {
        Self { products: ProductService::new(repo) }
    }

    pub fn with_db(db: DatabaseConnection) -> Self {
        Self::new(Arc::new(SeaOrmProductRepository::new(db)))
    }

    /// State over the in-memory repository (tests, demos).
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MockProductRepository::new()))
    }
}
