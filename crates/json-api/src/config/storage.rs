//! Storage Config

use clap::Args;

/// Where carts, orders and the catalog live.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum StorageBackend {
    /// `PostgreSQL`, migrated on startup.
    Postgres,

    /// Process-local store; state is lost on restart.
    Memory,
}

/// Storage settings.
#[derive(Debug, Args)]
pub struct StorageConfig {
    /// Storage backend (postgres, memory)
    #[arg(long, env = "STORAGE", value_enum, default_value_t = StorageBackend::Postgres)]
    pub storage: StorageBackend,

    /// `PostgreSQL` connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,
}

impl StorageConfig {
    /// Connection string for the Postgres backend.
    ///
    /// # Errors
    ///
    /// Returns an error when no connection string is configured.
    pub fn database_url(&self) -> Result<&str, &'static str> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or("DATABASE_URL is required when STORAGE=postgres")
    }
}
