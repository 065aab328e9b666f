//! Storefront JSON API Server

use std::process;

use salvo::{
    affix_state::inject,
    oapi::{OpenApi, swagger_ui::SwaggerUi},
    prelude::*,
    trailing_slash::remove_slash,
};
use tracing::{error, info};

use storefront_app::context::{AppContext, AppSettings};

use crate::{
    config::{ServerConfig, storage::StorageBackend},
    observability::{Observability, metrics_handler, request_logging},
    router::app_router,
    sessions::SessionSettings,
    state::State,
};

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod cart;
mod config;
mod extensions;
mod fields;
mod healthcheck;
mod observability;
mod orders;
mod payments;
mod products;
mod purge;
mod router;
mod sessions;
mod shutdown;
mod state;
#[cfg(test)]
mod test_helpers;

async fn build_app_context(config: &ServerConfig) -> Result<AppContext, String> {
    let settings = AppSettings {
        session_ttl: config.sessions.session_ttl(),
        payments: config.payments.settings(),
        razorpay_api_base: config.payments.razorpay_api_base.clone(),
    };

    match config.storage.storage {
        StorageBackend::Postgres => {
            let url = config.storage.database_url()?;

            AppContext::from_database_url(url, settings)
                .await
                .map_err(|init_error| format!("failed to initialize app context: {init_error}"))
        }
        StorageBackend::Memory => {
            info!("using in-memory storage, data is lost on restart");

            Ok(AppContext::in_memory(settings))
        }
    }
}

/// Storefront JSON API Server entry point
#[tokio::main]
pub async fn main() {
    let config = ServerConfig::load().unwrap_or_else(|e| {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized yet, must use eprintln for config errors"
        )]
        {
            eprintln!("Configuration error: {e}");
        }

        process::exit(1);
    });

    let observability = Observability::init(&config).unwrap_or_else(|e| {
        #[expect(
            clippy::print_stderr,
            reason = "logging failed to initialize, must use eprintln"
        )]
        {
            eprintln!("Observability error: {e}");
        }

        process::exit(1);
    });

    let app = match build_app_context(&config).await {
        Ok(app) => app,
        Err(init_error) => {
            error!("{init_error}");

            process::exit(1);
        }
    };

    if let Some(every) = config.sessions.purge_interval() {
        tokio::spawn(purge::run(app.carts.clone(), every));
    }

    let sessions = SessionSettings {
        ttl: config.sessions.session_ttl(),
        secure: config.sessions.session_cookie_secure,
    };

    let addr = config.socket_addr();

    info!("Starting server on {addr}");

    let listener = TcpListener::new(addr).bind().await;

    let router = Router::new()
        .hoop(CatchPanic::new())
        .hoop(remove_slash())
        .hoop(request_logging)
        .hoop(inject(State::new(app, sessions)))
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(Router::with_path("metrics").get(metrics_handler))
        .push(app_router());

    let doc = OpenApi::new("Storefront API", env!("CARGO_PKG_VERSION")).merge_router(&router);

    let router = router
        .push(doc.into_router("/api-doc/openapi.json"))
        .push(SwaggerUi::new("/api-doc/openapi.json").into_router("docs"));

    let server = Server::new(listener);

    let handle = server.handle();

    tokio::spawn(async move {
        if let Err(error) = shutdown::listen(handle).await {
            error!("failed to listen for shutdown signal: {error}");
        }
    });

    server.serve(router).await;

    observability.shutdown();
}
