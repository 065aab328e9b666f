//! Cart Items Repository

use async_trait::async_trait;
use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use mockall::automock;
use sqlx::{FromRow, Postgres, Row, postgres::PgRow, query, query_as};

use crate::{
    database::{Db, encode_amount, encode_count, try_get_amount, try_get_count},
    domain::{carts::models::CartItem, sessions::GuestSession},
};

const GET_CART_ITEMS_SQL: &str = include_str!("../sql/get_cart_items.sql");
const PUT_CART_ITEM_SQL: &str = include_str!("../sql/put_cart_item.sql");
const DELETE_CART_ITEM_SQL: &str = include_str!("../sql/delete_cart_item.sql");
const CLEAR_CART_ITEMS_SQL: &str = include_str!("../sql/clear_cart_items.sql");
const PURGE_EXPIRED_CART_ITEMS_SQL: &str = include_str!("../sql/purge_expired_cart_items.sql");

/// Per-session line item storage.
#[automock]
#[async_trait]
pub trait CartItemsRepository: Send + Sync {
    /// Items for `session` that have not expired as of `now`, in insertion order.
    async fn get_items(
        &self,
        session: GuestSession,
        now: Timestamp,
    ) -> Result<Vec<CartItem>, sqlx::Error>;

    /// Insert or replace the line for `item.sku`.
    async fn put_item(
        &self,
        session: GuestSession,
        item: CartItem,
        expires_at: Timestamp,
    ) -> Result<CartItem, sqlx::Error>;

    /// Delete one line, returning the number of rows removed.
    async fn delete_item(&self, session: GuestSession, sku: String) -> Result<u64, sqlx::Error>;

    /// Delete every line for `session`.
    async fn clear_items(&self, session: GuestSession) -> Result<u64, sqlx::Error>;

    /// Delete every line whose expiry is at or before `now`.
    async fn purge_expired(&self, now: Timestamp) -> Result<u64, sqlx::Error>;
}

#[derive(Debug, Clone)]
pub struct PgCartItemsRepository {
    db: Db,
}

impl PgCartItemsRepository {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CartItemsRepository for PgCartItemsRepository {
    async fn get_items(
        &self,
        session: GuestSession,
        now: Timestamp,
    ) -> Result<Vec<CartItem>, sqlx::Error> {
        query_as::<Postgres, CartItem>(GET_CART_ITEMS_SQL)
            .bind(session.into_uuid())
            .bind(SqlxTimestamp::from(now))
            .fetch_all(self.db.pool())
            .await
    }

    async fn put_item(
        &self,
        session: GuestSession,
        item: CartItem,
        expires_at: Timestamp,
    ) -> Result<CartItem, sqlx::Error> {
        let mut tx = self.db.begin_transaction().await?;

        let stored = query_as::<Postgres, CartItem>(PUT_CART_ITEM_SQL)
            .bind(session.into_uuid())
            .bind(item.sku)
            .bind(item.product_id)
            .bind(item.product_name)
            .bind(item.size)
            .bind(encode_amount("price", item.price)?)
            .bind(encode_count("quantity", item.quantity)?)
            .bind(item.image)
            .bind(SqlxTimestamp::from(item.added_at))
            .bind(SqlxTimestamp::from(item.updated_at))
            .bind(SqlxTimestamp::from(expires_at))
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(stored)
    }

    async fn delete_item(&self, session: GuestSession, sku: String) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_CART_ITEM_SQL)
            .bind(session.into_uuid())
            .bind(sku)
            .execute(self.db.pool())
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    async fn clear_items(&self, session: GuestSession) -> Result<u64, sqlx::Error> {
        let rows_affected = query(CLEAR_CART_ITEMS_SQL)
            .bind(session.into_uuid())
            .execute(self.db.pool())
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    async fn purge_expired(&self, now: Timestamp) -> Result<u64, sqlx::Error> {
        let rows_affected = query(PURGE_EXPIRED_CART_ITEMS_SQL)
            .bind(SqlxTimestamp::from(now))
            .execute(self.db.pool())
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for CartItem {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            sku: row.try_get("sku")?,
            product_id: row.try_get("product_id")?,
            product_name: row.try_get("product_name")?,
            size: row.try_get("size")?,
            price: try_get_amount(row, "price")?,
            quantity: try_get_count(row, "quantity")?,
            image: row.try_get("image")?,
            added_at: row.try_get::<SqlxTimestamp, _>("added_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
