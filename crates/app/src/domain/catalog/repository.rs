//! Catalog Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use rustc_hash::FxHashMap;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::{
    database::{encode_amount, encode_count, try_get_amount, try_get_count},
    domain::catalog::models::{NewProduct, Product, Variant},
};

const LIST_PRODUCTS_SQL: &str = include_str!("sql/list_products.sql");
const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const LIST_VARIANTS_SQL: &str = include_str!("sql/list_variants.sql");
const GET_VARIANT_SQL: &str = include_str!("sql/get_variant.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const CREATE_VARIANT_SQL: &str = include_str!("sql/create_variant.sql");
const DECREMENT_STOCK_SQL: &str = include_str!("sql/decrement_stock.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCatalogRepository;

impl PgCatalogRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        category: Option<&str>,
    ) -> Result<Vec<Product>, sqlx::Error> {
        let mut products = query_as::<Postgres, Product>(LIST_PRODUCTS_SQL)
            .bind(category)
            .fetch_all(&mut **tx)
            .await?;

        let ids: Vec<String> = products.iter().map(|product| product.id.clone()).collect();

        let mut variants: FxHashMap<String, Vec<Variant>> = FxHashMap::default();

        for variant in self.list_variants(tx, &ids).await? {
            variants
                .entry(variant.product_id.clone())
                .or_default()
                .push(variant);
        }

        for product in &mut products {
            product.variants = variants.remove(&product.id).unwrap_or_default();
        }

        Ok(products)
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product_id: &str,
    ) -> Result<Product, sqlx::Error> {
        let mut product = query_as::<Postgres, Product>(GET_PRODUCT_SQL)
            .bind(product_id)
            .fetch_one(&mut **tx)
            .await?;

        product.variants = self.list_variants(tx, &[product.id.clone()]).await?;

        Ok(product)
    }

    pub(crate) async fn get_variant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        sku: &str,
    ) -> Result<Variant, sqlx::Error> {
        query_as::<Postgres, Variant>(GET_VARIANT_SQL)
            .bind(sku)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: NewProduct,
    ) -> Result<Product, sqlx::Error> {
        let mut created = query_as::<Postgres, Product>(CREATE_PRODUCT_SQL)
            .bind(&product.id)
            .bind(&product.name)
            .bind(&product.slug)
            .bind(&product.category)
            .bind(&product.description)
            .bind(&product.images)
            .fetch_one(&mut **tx)
            .await?;

        for (position, variant) in product.variants.into_iter().enumerate() {
            let position = i32::try_from(position).map_err(|e| sqlx::Error::ColumnDecode {
                index: "position".to_string(),
                source: Box::new(e),
            })?;

            let variant = query_as::<Postgres, Variant>(CREATE_VARIANT_SQL)
                .bind(variant.sku)
                .bind(&created.id)
                .bind(variant.size)
                .bind(encode_amount("price", variant.price)?)
                .bind(encode_count("stock", variant.stock)?)
                .bind(position)
                .fetch_one(&mut **tx)
                .await?;

            created.variants.push(variant);
        }

        Ok(created)
    }

    /// Conditionally decrement stock. `None` when the sku is unknown or has too few units.
    pub(crate) async fn decrement_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        sku: &str,
        quantity: u32,
    ) -> Result<Option<Variant>, sqlx::Error> {
        query_as::<Postgres, Variant>(DECREMENT_STOCK_SQL)
            .bind(sku)
            .bind(encode_count("quantity", quantity)?)
            .fetch_optional(&mut **tx)
            .await
    }

    async fn list_variants(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product_ids: &[String],
    ) -> Result<Vec<Variant>, sqlx::Error> {
        query_as::<Postgres, Variant>(LIST_VARIANTS_SQL)
            .bind(product_ids)
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Product {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            slug: row.try_get("slug")?,
            category: row.try_get("category")?,
            description: row.try_get("description")?,
            images: row.try_get("images")?,
            variants: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for Variant {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            sku: row.try_get("sku")?,
            product_id: row.try_get("product_id")?,
            size: row.try_get("size")?,
            price: try_get_amount(row, "price")?,
            stock: try_get_count(row, "stock")?,
        })
    }
}
