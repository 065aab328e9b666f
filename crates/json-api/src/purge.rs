//! Expired cart purging

use std::{sync::Arc, time::Duration};

use storefront_app::domain::carts::CartsService;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info};

/// Periodically delete cart lines whose session has expired.
pub(crate) async fn run(carts: Arc<dyn CartsService>, every: Duration) {
    let mut ticker = time::interval(every);

    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        match carts.purge_expired().await {
            Ok(0) => debug!("no expired cart lines"),
            Ok(purged) => info!(purged, "purged expired cart lines"),
            Err(error) => error!("failed to purge expired carts: {error}"),
        }
    }
}
