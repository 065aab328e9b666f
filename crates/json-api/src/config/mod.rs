//! Server configuration module

use clap::Parser;

use crate::config::{
    observability::{LoggingConfig, ObservabilityConfig},
    payments::PaymentsConfig,
    server::ListenConfig,
    sessions::SessionsConfig,
    storage::StorageConfig,
};

pub(crate) mod observability;
pub(crate) mod payments;
pub(crate) mod server;
pub(crate) mod sessions;
pub(crate) mod storage;

/// Storefront JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "storefront-json", about = "Storefront JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ListenConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Observability (traces/metrics) settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    /// Storage backend settings.
    #[command(flatten)]
    pub storage: StorageConfig,

    /// Guest session and cart lifetime settings.
    #[command(flatten)]
    pub sessions: SessionsConfig,

    /// Payment provider settings.
    #[command(flatten)]
    pub payments: PaymentsConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser as _;
    use testresult::TestResult;

    use super::{
        ServerConfig,
        storage::{StorageBackend, StorageConfig},
    };

    #[test]
    fn defaults_parse_without_database_for_memory_storage() -> TestResult {
        let config = ServerConfig::try_parse_from(["storefront-json", "--storage", "memory"])?;

        assert!(matches!(config.storage.storage, StorageBackend::Memory));
        assert_eq!(config.socket_addr(), "0.0.0.0:8080");
        assert_eq!(config.sessions.session_ttl_days, 7);
        assert_eq!(config.payments.payment_currency, "INR");
        assert_eq!(config.payments.order_number_prefix, "ORD");

        Ok(())
    }

    #[test]
    fn postgres_storage_requires_database_url() {
        let mut storage = StorageConfig {
            storage: StorageBackend::Postgres,
            database_url: Some("  ".to_string()),
        };

        assert!(storage.database_url().is_err());

        storage.database_url = Some("postgres://localhost/storefront".to_string());

        assert_eq!(storage.database_url(), Ok("postgres://localhost/storefront"));
    }
}
