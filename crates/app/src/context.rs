//! App Context

use std::sync::Arc;

use jiff::SignedDuration;
use thiserror::Error;

use crate::{
    database::{self, Db},
    domain::{
        carts::{CartItemsRepository, CartsService, DefaultCartsService, PgCartItemsRepository},
        catalog::{CatalogService, PgCatalogService},
        orders::{OrdersService, PgOrdersService},
        payments::{
            DefaultPaymentsService, PaymentsService,
            models::PaymentSettings,
            razorpay::{DEFAULT_API_BASE, PaymentGateway, RazorpayClient, RazorpayConfig},
        },
        sessions::DEFAULT_SESSION_TTL,
    },
    memory::MemoryStore,
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to run database migrations")]
    Migrations(#[source] sqlx::migrate::MigrateError),
}

/// Settings shared by every storage backend.
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub session_ttl: SignedDuration,
    pub payments: PaymentSettings,
    pub razorpay_api_base: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            session_ttl: DEFAULT_SESSION_TTL,
            payments: PaymentSettings::default(),
            razorpay_api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

impl AppSettings {
    /// Provider client, when both halves of the API key are configured.
    fn gateway(&self) -> Option<Arc<dyn PaymentGateway>> {
        let key_id = self.payments.key_id.clone()?;
        let key_secret = self.payments.key_secret.clone()?;

        Some(Arc::new(RazorpayClient::new(RazorpayConfig {
            key_id,
            key_secret,
            api_base: self.razorpay_api_base.clone(),
        })))
    }
}

#[derive(Clone)]
pub struct AppContext {
    pub catalog: Arc<dyn CatalogService>,
    pub carts: Arc<dyn CartsService>,
    pub orders: Arc<dyn OrdersService>,
    pub payments: Arc<dyn PaymentsService>,
}

impl AppContext {
    /// Build application context from a database URL, applying pending migrations.
    ///
    /// # Errors
    ///
    /// Returns an error when connecting to or migrating the database fails.
    pub async fn from_database_url(url: &str, settings: AppSettings) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        database::run_migrations(&pool)
            .await
            .map_err(AppInitError::Migrations)?;

        let db = Db::new(pool);

        Ok(Self::assemble(
            Arc::new(PgCatalogService::new(db.clone())),
            Arc::new(PgCartItemsRepository::new(db.clone())),
            Arc::new(PgOrdersService::new(db)),
            &settings,
        ))
    }

    /// Build application context over a fresh process-local store.
    #[must_use]
    pub fn in_memory(settings: AppSettings) -> Self {
        let store = MemoryStore::new();

        Self::assemble(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store),
            &settings,
        )
    }

    fn assemble(
        catalog: Arc<dyn CatalogService>,
        items: Arc<dyn CartItemsRepository>,
        orders: Arc<dyn OrdersService>,
        settings: &AppSettings,
    ) -> Self {
        let carts: Arc<dyn CartsService> = Arc::new(DefaultCartsService::new(
            Arc::clone(&catalog),
            items,
            settings.session_ttl,
        ));

        let payments = Arc::new(DefaultPaymentsService::new(
            Arc::clone(&orders),
            Arc::clone(&catalog),
            Arc::clone(&carts),
            settings.gateway(),
            settings.payments.clone(),
        ));

        Self {
            catalog,
            carts,
            orders,
            payments,
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::sessions::GuestSession,
        test::helpers::{new_item, new_product, payment_settings},
    };

    use super::*;

    #[test]
    fn gateway_requires_both_key_halves() {
        let mut settings = AppSettings::default();

        assert!(settings.gateway().is_none());

        settings.payments = payment_settings();

        assert!(settings.gateway().is_some());
    }

    #[tokio::test]
    async fn in_memory_context_shares_one_store() -> TestResult {
        let ctx = AppContext::in_memory(AppSettings::default());
        let session = GuestSession::new();

        ctx.catalog
            .create_product(new_product("noir", &[("NOIR-50", 1000, 3)]))
            .await?;

        let cart = ctx.carts.add_item(session, new_item("noir", "NOIR-50", 2)).await?;

        assert_eq!(cart.total_price(), 2000);
        assert!(ctx.carts.validate_cart(Some(session)).await?.is_valid());

        Ok(())
    }
}
