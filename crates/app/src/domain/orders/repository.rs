//! Orders Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{
    FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, types::Json,
};
use uuid::Uuid;

use crate::{
    database::{encode_amount, try_get_amount},
    domain::{
        orders::models::{
            CustomerContact, NewOrder, Order, OrderItem, OrderStatus, OrderUuid, PaymentStatus,
            PaymentUpdate, ShippingAddress,
        },
        sessions::{GuestSession, UserIdentity},
    },
};

const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");
const FIND_BY_RAZORPAY_ORDER_ID_SQL: &str = include_str!("sql/find_by_razorpay_order_id.sql");
const CREATE_ORDER_SQL: &str = include_str!("sql/create_order.sql");
const UPDATE_RAZORPAY_ORDER_ID_SQL: &str = include_str!("sql/update_razorpay_order_id.sql");
const UPDATE_PAYMENT_DETAILS_SQL: &str = include_str!("sql/update_payment_details.sql");
const FLAG_INVENTORY_RECONCILIATION_SQL: &str =
    include_str!("sql/flag_inventory_reconciliation.sql");
const LINK_TO_USER_SQL: &str = include_str!("sql/link_to_user.sql");
const DELETE_ORDER_SQL: &str = include_str!("sql/delete_order.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn find_by_razorpay_order_id(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        razorpay_order_id: &str,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(FIND_BY_RAZORPAY_ORDER_ID_SQL)
            .bind(razorpay_order_id)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: NewOrder,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(order.order_number)
            .bind(order.session.map(GuestSession::into_uuid))
            .bind(order.customer.email)
            .bind(order.customer.first_name)
            .bind(order.customer.last_name)
            .bind(order.customer.phone)
            .bind(Json(order.shipping_address))
            .bind(Json(order.items))
            .bind(encode_amount("subtotal", order.subtotal)?)
            .bind(encode_amount("tax", order.tax)?)
            .bind(encode_amount("shipping_cost", order.shipping_cost)?)
            .bind(encode_amount("total", order.total)?)
            .bind(order.currency)
            .bind(order.payment_method)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_razorpay_order_id(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        razorpay_order_id: &str,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(UPDATE_RAZORPAY_ORDER_ID_SQL)
            .bind(order.into_uuid())
            .bind(razorpay_order_id)
            .fetch_one(&mut **tx)
            .await
    }

    /// Apply `update` only while the order is pending. `None` when it was not.
    pub(crate) async fn update_payment_details(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        update: PaymentUpdate,
    ) -> Result<Option<Order>, sqlx::Error> {
        query_as::<Postgres, Order>(UPDATE_PAYMENT_DETAILS_SQL)
            .bind(order.into_uuid())
            .bind(update.payment_id)
            .bind(update.signature)
            .bind(update.payment_status.as_str())
            .bind(update.status.as_str())
            .bind(update.paid_at.map(SqlxTimestamp::from))
            .bind(update.confirmed_at.map(SqlxTimestamp::from))
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn flag_inventory_reconciliation(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(FLAG_INVENTORY_RECONCILIATION_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Attach `user` unless the order already has one. `None` when it did.
    pub(crate) async fn link_to_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        user: UserIdentity,
    ) -> Result<Option<Order>, sqlx::Error> {
        query_as::<Postgres, Order>(LINK_TO_USER_SQL)
            .bind(order.into_uuid())
            .bind(user.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn delete_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_ORDER_SQL)
            .bind(order.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

fn try_get_status<T>(row: &PgRow, col: &str) -> Result<T, sqlx::Error>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value: String = row.try_get(col)?;

    value.parse().map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for Order {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let shipping_address: Json<ShippingAddress> = row.try_get("shipping_address")?;
        let items: Json<Vec<OrderItem>> = row.try_get("items")?;

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            order_number: row.try_get("order_number")?,
            session: row
                .try_get::<Option<Uuid>, _>("session_uuid")?
                .map(GuestSession::from_uuid),
            user: row
                .try_get::<Option<Uuid>, _>("user_uuid")?
                .map(UserIdentity::from_uuid),
            placed_as_guest: row.try_get("placed_as_guest")?,
            linked_at: row
                .try_get::<Option<SqlxTimestamp>, _>("linked_at")?
                .map(SqlxTimestamp::to_jiff),
            customer: CustomerContact {
                email: row.try_get("customer_email")?,
                first_name: row.try_get("customer_first_name")?,
                last_name: row.try_get("customer_last_name")?,
                phone: row.try_get("customer_phone")?,
            },
            shipping_address: shipping_address.0,
            items: items.0,
            subtotal: try_get_amount(row, "subtotal")?,
            tax: try_get_amount(row, "tax")?,
            shipping_cost: try_get_amount(row, "shipping_cost")?,
            total: try_get_amount(row, "total")?,
            currency: row.try_get("currency")?,
            payment_method: row.try_get("payment_method")?,
            razorpay_order_id: row.try_get("razorpay_order_id")?,
            razorpay_payment_id: row.try_get("razorpay_payment_id")?,
            razorpay_signature: row.try_get("razorpay_signature")?,
            payment_status: try_get_status::<PaymentStatus>(row, "payment_status")?,
            status: try_get_status::<OrderStatus>(row, "status")?,
            inventory_reconciliation_pending: row.try_get("inventory_reconciliation_pending")?,
            paid_at: row
                .try_get::<Option<SqlxTimestamp>, _>("paid_at")?
                .map(SqlxTimestamp::to_jiff),
            confirmed_at: row
                .try_get::<Option<SqlxTimestamp>, _>("confirmed_at")?
                .map(SqlxTimestamp::to_jiff),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
