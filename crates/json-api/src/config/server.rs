//! Listener Config

use clap::Args;

/// Address the storefront API listens on.
#[derive(Debug, Args)]
pub struct ListenConfig {
    /// Interface to bind, `0.0.0.0` for every interface
    #[arg(short = 'H', long, env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port serving the storefront JSON API
    #[arg(short, long, env = "SERVER_PORT", default_value_t = 8080)]
    pub port: u16,
}

impl ListenConfig {
    /// `host:port` for the TCP listener.
    #[must_use]
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
