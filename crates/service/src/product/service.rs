use std::sync::Arc;

use tracing::{info, instrument};

use super::domain::{NewProduct, Product, ProductChanges};
use super::repository::ProductRepository;
use crate::errors::ServiceError;

/// Application service encapsulating the product lifecycle.
/// Each mutation is fetch, mutate, persist with no transaction around it, so
/// concurrent writes to the same id race and the last write wins.
#[derive(Clone)]
pub struct ProductService {
    repo: Arc<dyn ProductRepository>,
}

impl ProductService {
    pub fn new(repo: Arc<dyn ProductRepository>) -> Self { Self { repo } }

    pub async fn list(&self) -> Result<Vec<Product>, ServiceError> {
        self.repo.list().await
    }

    pub async fn get(&self, id: i32) -> Result<Product, ServiceError> {
        self.repo.get(id).await?.ok_or_else(|| ServiceError::not_found("product"))
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: NewProduct) -> Result<Product, ServiceError> {
        let created = self.repo.insert(input).await?;
        info!(id = created.id, "product_created");
        Ok(created)
    }

    #[instrument(skip(self, changes))]
    pub async fn replace(&self, id: i32, changes: ProductChanges) -> Result<Product, ServiceError> {
        let mut product = self.get(id).await?;
        changes.apply_to(&mut product);
        let updated = self.repo.update(product).await?;
        info!(id, "product_replaced");
        Ok(updated)
    }

    /// Flip availability to its negation.
    #[instrument(skip(self))]
    pub async fn toggle_availability(&self, id: i32) -> Result<Product, ServiceError> {
        let mut product = self.get(id).await?;
        product.availability = !product.availability;
        let updated = self.repo.update(product).await?;
        info!(id, availability = updated.availability, "product_availability_toggled");
        Ok(updated)
    }

    /// Hard delete after confirming the row exists.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.get(id).await?;
        // a concurrent delete may win the race; the product is gone either way
        self.repo.delete(id).await?;
        info!(id, "product_deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::repository::{mock::MockProductRepository, SeaOrmProductRepository};
    use crate::test_support::get_db;

    fn mock_service() -> ProductService {
        ProductService::new(Arc::new(MockProductRepository::new()))
    }

    fn teclado() -> NewProduct {
        NewProduct { name: "Teclado".into(), price: 50.0 }
    }

    #[tokio::test]
    async fn create_then_get_round_trips() -> Result<(), anyhow::Error> {
        let svc = mock_service();
        let created = svc.create(teclado()).await?;
        let found = svc.get(created.id).await?;
        assert_eq!(found.name, "Teclado");
        assert_eq!(found.price, 50.0);
        assert!(found.availability);
        Ok(())
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let svc = mock_service();
        assert!(matches!(svc.get(2000).await, Err(ServiceError::NotFound(_))));
        let changes = ProductChanges { name: "x".into(), price: 1.0, availability: true };
        assert!(matches!(svc.replace(2000, changes).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.toggle_availability(2000).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.delete(2000).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn replace_overwrites_all_mutable_fields() -> Result<(), anyhow::Error> {
        let svc = mock_service();
        let created = svc.create(teclado()).await?;
        let changes = ProductChanges { name: "Monitor Curvo".into(), price: 300.0, availability: false };
        let updated = svc.replace(created.id, changes).await?;
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Monitor Curvo");
        assert_eq!(updated.price, 300.0);
        assert!(!updated.availability);
        Ok(())
    }

    #[tokio::test]
    async fn toggle_twice_restores_availability() -> Result<(), anyhow::Error> {
        let svc = mock_service();
        let created = svc.create(teclado()).await?;
        assert!(!svc.toggle_availability(created.id).await?.availability);
        assert!(svc.toggle_availability(created.id).await?.availability);
        Ok(())
    }

    #[tokio::test]
    async fn delete_removes_row() -> Result<(), anyhow::Error> {
        let svc = mock_service();
        let created = svc.create(teclado()).await?;
        svc.delete(created.id).await?;
        assert!(matches!(svc.get(created.id).await, Err(ServiceError::NotFound(_))));
        assert!(svc.list().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn storage_failures_propagate() {
        let svc = ProductService::new(Arc::new(MockProductRepository::unavailable()));
        assert!(matches!(svc.list().await, Err(ServiceError::Db(_))));
        assert!(matches!(svc.create(teclado()).await, Err(ServiceError::Db(_))));
    }

    #[tokio::test]
    async fn lifecycle_over_seaorm() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let svc = ProductService::new(Arc::new(SeaOrmProductRepository::new(db)));

        let created = svc.create(teclado()).await?;
        let toggled = svc.toggle_availability(created.id).await?;
        assert!(!toggled.availability);
        let replaced = svc
            .replace(created.id, ProductChanges { name: "Teclado RGB".into(), price: 75.5, availability: true })
            .await?;
        assert_eq!(replaced.name, "Teclado RGB");
        assert!(replaced.availability);
        assert_eq!(svc.list().await?.len(), 1);
        svc.delete(created.id).await?;
        assert!(matches!(svc.get(created.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }
}
