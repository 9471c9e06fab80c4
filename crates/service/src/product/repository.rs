use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use super::domain::{NewProduct, Product};
use crate::errors::ServiceError;

/// Persistence seam for products.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Product>, ServiceError>;
    async fn get(&self, id: i32) -> Result<Option<Product>, ServiceError>;
    async fn insert(&self, input: NewProduct) -> Result<Product, ServiceError>;
    /// Overwrite the mutable columns of an existing row.
    async fn update(&self, product: Product) -> Result<Product, ServiceError>;
    async fn delete(&self, id: i32) -> Result<bool, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmProductRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmProductRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait]
impl ProductRepository for SeaOrmProductRepository {
    async fn list(&self) -> Result<Vec<Product>, ServiceError> {
        Ok(models::product::list(&self.db).await?)
    }

    async fn get(&self, id: i32) -> Result<Option<Product>, ServiceError> {
        Ok(models::product::find(&self.db, id).await?)
    }

    async fn insert(&self, input: NewProduct) -> Result<Product, ServiceError> {
        Ok(models::product::create(&self.db, &input.name, input.price).await?)
    }

    async fn update(&self, product: Product) -> Result<Product, ServiceError> {
        Ok(models::product::update(&self.db, product).await?)
    }

    async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
        Ok(models::product::delete(&self.db, id).await?)
    }
}

/// Simple in-memory mock repository for tests and local experiments
pub mod mock {
    use super::*;
    use std::collections::BTreeMap;

    use chrono::Utc;
    use tokio::sync::RwLock;

    #[derive(Default)]
    struct Table {
        last_id: i32,
        rows: BTreeMap<i32, Product>,
    }

    #[derive(Default)]
    pub struct MockProductRepository {
        table: RwLock<Table>,
        unavailable: bool,
    }

    impl MockProductRepository {
        pub fn new() -> Self { Self::default() }

        /// Every call fails with a database error.
        pub fn unavailable() -> Self { Self { unavailable: true, ..Self::default() } }

        fn check(&self) -> Result<(), ServiceError> {
            if self.unavailable {
                return Err(ServiceError::Db("storage unavailable".into()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl ProductRepository for MockProductRepository {
        async fn list(&self) -> Result<Vec<Product>, ServiceError> {
            self.check()?;
            let table = self.table.read().await;
            Ok(table.rows.values().cloned().collect())
        }

        async fn get(&self, id: i32) -> Result<Option<Product>, ServiceError> {
            self.check()?;
            let table = self.table.read().await;
            Ok(table.rows.get(&id).cloned())
        }

        async fn insert(&self, input: NewProduct) -> Result<Product, ServiceError> {
            self.check()?;
            models::product::validate_name(&input.name)?;
            models::product::validate_price(input.price)?;
            let mut table = self.table.write().await;
            // ids keep growing after deletes, like a database sequence
            table.last_id += 1;
            let now = Utc::now().into();
            let product = Product {
                id: table.last_id,
                name: input.name,
                price: input.price,
                availability: true,
                created_at: now,
                updated_at: now,
            };
            table.rows.insert(product.id, product.clone());
            Ok(product)
        }

        async fn update(&self, mut product: Product) -> Result<Product, ServiceError> {
            self.check()?;
            models::product::validate_name(&product.name)?;
            models::product::validate_price(product.price)?;
            let mut table = self.table.write().await;
            let Some(stored) = table.rows.get_mut(&product.id) else {
                return Err(ServiceError::not_found("product"));
            };
            product.created_at = stored.created_at;
            product.updated_at = Utc::now().into();
            *stored = product.clone();
            Ok(product)
        }

        async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
            self.check()?;
            let mut table = self.table.write().await;
            Ok(table.rows.remove(&id).is_some())
        }
    }
}
