//! Sessions Config

use std::time::Duration;

use clap::Args;
use jiff::SignedDuration;

/// Guest session settings.
#[derive(Debug, Args)]
pub struct SessionsConfig {
    /// Lifetime of the session cookie and of stored cart lines, in days
    #[arg(long, env = "SESSION_TTL_DAYS", default_value_t = 7_u32)]
    pub session_ttl_days: u32,

    /// Mark the session cookie `Secure`
    #[arg(long, env = "SESSION_COOKIE_SECURE", default_value_t = false)]
    pub session_cookie_secure: bool,

    /// Seconds between sweeps of expired cart lines; 0 disables the sweep
    #[arg(long, env = "CART_PURGE_INTERVAL_SECS", default_value_t = 3_600_u64)]
    pub cart_purge_interval_secs: u64,
}

impl SessionsConfig {
    #[must_use]
    pub fn session_ttl(&self) -> SignedDuration {
        SignedDuration::from_hours(i64::from(self.session_ttl_days) * 24)
    }

    #[must_use]
    pub fn purge_interval(&self) -> Option<Duration> {
        (self.cart_purge_interval_secs > 0)
            .then(|| Duration::from_secs(self.cart_purge_interval_secs))
    }
}
