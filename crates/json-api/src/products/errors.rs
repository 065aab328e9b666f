//! Product Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::catalog::CatalogServiceError;

pub(crate) fn into_status_error(error: CatalogServiceError) -> StatusError {
    match error {
        CatalogServiceError::NotFound => StatusError::not_found().brief("Product not found"),
        CatalogServiceError::Sql(source) => {
            error!("failed to read catalog: {source}");

            StatusError::internal_server_error()
        }
        other => {
            error!("unexpected catalog error: {other}");

            StatusError::internal_server_error()
        }
    }
}
