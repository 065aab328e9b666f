//! Catalog service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::catalog::{
        errors::CatalogServiceError,
        models::{NewProduct, Product, Variant},
        repository::PgCatalogRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCatalogService {
    db: Db,
    repository: PgCatalogRepository,
}

impl PgCatalogService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCatalogRepository::new(),
        }
    }
}

#[async_trait]
impl CatalogService for PgCatalogService {
    async fn list_products(
        &self,
        category: Option<String>,
    ) -> Result<Vec<Product>, CatalogServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let products = self
            .repository
            .list_products(&mut tx, category.as_deref())
            .await?;

        tx.commit().await?;

        Ok(products)
    }

    async fn get_product(&self, product_id: String) -> Result<Product, CatalogServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let product = self.repository.get_product(&mut tx, &product_id).await?;

        tx.commit().await?;

        Ok(product)
    }

    async fn get_variant(&self, sku: String) -> Result<Variant, CatalogServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let variant = self.repository.get_variant(&mut tx, &sku).await?;

        tx.commit().await?;

        Ok(variant)
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, CatalogServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let created = self.repository.create_product(&mut tx, product).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn decrement_stock(
        &self,
        sku: String,
        quantity: u32,
    ) -> Result<Variant, CatalogServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let Some(variant) = self
            .repository
            .decrement_stock(&mut tx, &sku, quantity)
            .await?
        else {
            let current = self.repository.get_variant(&mut tx, &sku).await?;

            return Err(CatalogServiceError::InsufficientStock {
                sku,
                requested: quantity,
                available: current.stock,
            });
        };

        tx.commit().await?;

        Ok(variant)
    }
}

#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Retrieves all products, optionally narrowed to one category.
    async fn list_products(
        &self,
        category: Option<String>,
    ) -> Result<Vec<Product>, CatalogServiceError>;

    /// Retrieve a single product with its variants.
    async fn get_product(&self, product_id: String) -> Result<Product, CatalogServiceError>;

    /// Retrieve a single variant by sku.
    async fn get_variant(&self, sku: String) -> Result<Variant, CatalogServiceError>;

    /// Seeds a product and its variants.
    async fn create_product(&self, product: NewProduct) -> Result<Product, CatalogServiceError>;

    /// Atomically take `quantity` units of `sku`, failing rather than going negative.
    async fn decrement_stock(
        &self,
        sku: String,
        quantity: u32,
    ) -> Result<Variant, CatalogServiceError>;
}
