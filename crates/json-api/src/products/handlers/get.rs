//! Get Product Handler

use std::sync::Arc;

use salvo::{http::header::CACHE_CONTROL, oapi::extract::PathParam, prelude::*};

use crate::{
    extensions::*,
    products::{CATALOG_CACHE_CONTROL, errors::into_status_error, models::ProductResponse},
    state::State,
};

/// Get Product Handler
///
/// Returns a product with its variants and live stock.
#[endpoint(
    tags("products"),
    summary = "Get Product",
    responses(
        (status_code = StatusCode::OK, description = "Product found"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
    ),
)]
pub(crate) async fn handler(
    product: PathParam<String>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let product = state
        .app
        .catalog
        .get_product(product.into_inner())
        .await
        .map_err(into_status_error)?;

    res.add_header(CACHE_CONTROL, CATALOG_CACHE_CONTROL, true)
        .or_500("failed to set cache-control header")?;

    Ok(Json(product.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::catalog::CatalogServiceError;

    use crate::test_helpers::{Mocks, make_product};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        mocks.service(Router::with_path("products/{product}").get(handler))
    }

    #[tokio::test]
    async fn test_get_returns_product() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .catalog
            .expect_get_product()
            .once()
            .withf(|id| id == "oud")
            .return_once(|_| Ok(make_product("oud", &[("OUD-50", 4500, 3)])));

        let mut res = TestClient::get("http://example.com/products/oud")
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: ProductResponse = res.take_json().await?;

        assert_eq!(body.id, "oud");
        assert_eq!(body.image.as_deref(), Some("/images/oud.jpg"));
        assert_eq!(
            body.variants.first().map(|variant| variant.inventory_status.as_str()),
            Some("IN_STOCK")
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_get_missing_product_returns_404() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .catalog
            .expect_get_product()
            .once()
            .return_once(|_| Err(CatalogServiceError::NotFound));

        let res = TestClient::get("http://example.com/products/nope")
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
