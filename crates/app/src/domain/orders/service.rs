//! Orders service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        orders::{
            errors::OrdersServiceError,
            models::{NewOrder, Order, OrderUuid, PaymentTransition, PaymentUpdate},
            repository::PgOrdersRepository,
        },
        sessions::UserIdentity,
    },
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    repository: PgOrdersRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgOrdersRepository::new(),
        }
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    #[tracing::instrument(
        name = "orders.service.create_order",
        skip(self, order),
        fields(order_uuid = %order.uuid, order_number = %order.order_number),
        err
    )]
    async fn create_order(&self, order: NewOrder) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let created = self.repository.create_order(&mut tx, order).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn get_order(&self, order: OrderUuid) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let order = self.repository.get_order(&mut tx, order).await?;

        tx.commit().await?;

        Ok(order)
    }

    async fn find_by_razorpay_order_id(
        &self,
        razorpay_order_id: String,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let order = self
            .repository
            .find_by_razorpay_order_id(&mut tx, &razorpay_order_id)
            .await?;

        tx.commit().await?;

        Ok(order)
    }

    async fn update_razorpay_order_id(
        &self,
        order: OrderUuid,
        razorpay_order_id: String,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let updated = self
            .repository
            .update_razorpay_order_id(&mut tx, order, &razorpay_order_id)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    #[tracing::instrument(
        name = "orders.service.update_payment_details",
        skip(self, update),
        fields(order_uuid = %order, status = %update.status),
        err
    )]
    async fn update_payment_details(
        &self,
        order: OrderUuid,
        update: PaymentUpdate,
    ) -> Result<PaymentTransition, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let transition = match self
            .repository
            .update_payment_details(&mut tx, order, update)
            .await?
        {
            Some(updated) => PaymentTransition::Applied(updated),
            None => PaymentTransition::Unchanged(self.repository.get_order(&mut tx, order).await?),
        };

        tx.commit().await?;

        Ok(transition)
    }

    #[tracing::instrument(
        name = "orders.service.flag_inventory_reconciliation",
        skip(self),
        fields(order_uuid = %order),
        err
    )]
    async fn flag_inventory_reconciliation(
        &self,
        order: OrderUuid,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let flagged = self
            .repository
            .flag_inventory_reconciliation(&mut tx, order)
            .await?;

        tx.commit().await?;

        Ok(flagged)
    }

    #[tracing::instrument(
        name = "orders.service.delete_order",
        skip(self),
        fields(order_uuid = %order),
        err
    )]
    async fn delete_order(&self, order: OrderUuid) -> Result<(), OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let rows_affected = self.repository.delete_order(&mut tx, order).await?;

        if rows_affected == 0 {
            return Err(OrdersServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn link_to_user(
        &self,
        order: OrderUuid,
        user: UserIdentity,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let Some(linked) = self.repository.link_to_user(&mut tx, order, user).await? else {
            self.repository.get_order(&mut tx, order).await?;

            return Err(OrdersServiceError::AlreadyLinked);
        };

        tx.commit().await?;

        Ok(linked)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Persist a new pending order from a priced snapshot.
    async fn create_order(&self, order: NewOrder) -> Result<Order, OrdersServiceError>;

    /// Retrieve a single order.
    async fn get_order(&self, order: OrderUuid) -> Result<Order, OrdersServiceError>;

    /// Retrieve the order a provider payment intent belongs to.
    async fn find_by_razorpay_order_id(
        &self,
        razorpay_order_id: String,
    ) -> Result<Order, OrdersServiceError>;

    /// Attach the provider's payment intent identifier.
    async fn update_razorpay_order_id(
        &self,
        order: OrderUuid,
        razorpay_order_id: String,
    ) -> Result<Order, OrdersServiceError>;

    /// Move a pending order to its payment outcome. Orders no longer pending are left alone.
    async fn update_payment_details(
        &self,
        order: OrderUuid,
        update: PaymentUpdate,
    ) -> Result<PaymentTransition, OrdersServiceError>;

    /// Mark an order whose stock decrement did not fully apply.
    async fn flag_inventory_reconciliation(
        &self,
        order: OrderUuid,
    ) -> Result<Order, OrdersServiceError>;

    /// Remove a pending order. Used to undo a checkout whose payment intent failed.
    async fn delete_order(&self, order: OrderUuid) -> Result<(), OrdersServiceError>;

    /// Attach a registered user to a guest order, once.
    async fn link_to_user(
        &self,
        order: OrderUuid,
        user: UserIdentity,
    ) -> Result<Order, OrdersServiceError>;
}
