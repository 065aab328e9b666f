//! Add To Cart Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};

use storefront_app::domain::carts::models::NewCartItem;

use crate::{
    cart::{
        errors::into_status_error,
        models::{AddToCartRequest, CartResponse, quantity},
    },
    extensions::*,
    fields::required,
    sessions,
    state::State,
};

impl TryFrom<AddToCartRequest> for NewCartItem {
    type Error = String;

    fn try_from(request: AddToCartRequest) -> Result<Self, Self::Error> {
        Ok(NewCartItem {
            sku: required(request.sku, "sku")?,
            product_id: required(request.product_id, "productId")?,
            quantity: quantity(request.quantity)?,
        })
    }
}

/// Add To Cart Handler
///
/// Adds units of a variant, merging with an existing line for the same sku.
/// Starts a guest session when the caller has none.
#[endpoint(
    tags("cart"),
    summary = "Add Item to Cart",
    responses(
        (status_code = StatusCode::OK, description = "Item added"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid quantity or missing field"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::CONFLICT, description = "Out of stock"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<AddToCartRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CartResponse>, StatusError> {
    let item = NewCartItem::try_from(json.into_inner())
        .map_err(|brief| StatusError::bad_request().brief(brief))?;

    let session = sessions::ensure_session(depot, res)?;
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let cart = state
        .app
        .carts
        .add_item(session, item)
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::domain::carts::CartsServiceError;

    use crate::test_helpers::{Mocks, TEST_SESSION, make_cart, session_cookie};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        mocks.service(Router::with_path("cart").post(handler))
    }

    #[tokio::test]
    async fn test_add_with_session_returns_cart() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .carts
            .expect_add_item()
            .once()
            .withf(|session, item| {
                *session == TEST_SESSION
                    && item.sku == "OUD-50"
                    && item.product_id == "oud"
                    && item.quantity == 2
            })
            .return_once(|_, _| Ok(make_cart(&[("OUD-50", 1000, 2)])));

        let mut res = TestClient::post("http://example.com/cart")
            .add_header("cookie", session_cookie(), true)
            .json(&json!({
                "sku": "OUD-50",
                "productId": "oud",
                "productName": "Cheap Knockoff",
                "price": 1,
                "quantity": 2,
            }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(res.cookie("cart_session_id").is_none());

        let body: CartResponse = res.take_json().await?;

        assert_eq!(body.total_price, 2000);

        Ok(())
    }

    #[tokio::test]
    async fn test_add_without_session_sets_cookie() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .carts
            .expect_add_item()
            .once()
            .return_once(|_, _| Ok(make_cart(&[("OUD-50", 1000, 1)])));

        let res = TestClient::post("http://example.com/cart")
            .json(&json!({ "sku": "OUD-50", "productId": "oud", "quantity": 1 }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let cookie = res
            .cookie("cart_session_id")
            .ok_or("expected session cookie")?;

        assert!(cookie.value().parse::<uuid::Uuid>().is_ok());
        assert_eq!(cookie.http_only(), Some(true));

        Ok(())
    }

    #[tokio::test]
    async fn test_add_out_of_range_quantity_returns_400() -> TestResult {
        let res = TestClient::post("http://example.com/cart")
            .add_header("cookie", session_cookie(), true)
            .json(&json!({ "sku": "OUD-50", "productId": "oud", "quantity": 11 }))
            .send(&make_service(Mocks::default()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_add_missing_sku_returns_400() -> TestResult {
        let res = TestClient::post("http://example.com/cart")
            .json(&json!({ "productId": "oud", "quantity": 1 }))
            .send(&make_service(Mocks::default()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_add_unknown_product_returns_404() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .carts
            .expect_add_item()
            .once()
            .return_once(|_, _| Err(CartsServiceError::ProductNotFound));

        let res = TestClient::post("http://example.com/cart")
            .add_header("cookie", session_cookie(), true)
            .json(&json!({ "sku": "NOPE", "productId": "nope", "quantity": 1 }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_add_out_of_stock_returns_409() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.carts.expect_add_item().once().return_once(|_, _| {
            Err(CartsServiceError::OutOfStock {
                sku: "OUD-50".to_string(),
            })
        });

        let res = TestClient::post("http://example.com/cart")
            .add_header("cookie", session_cookie(), true)
            .json(&json!({ "sku": "OUD-50", "productId": "oud", "quantity": 1 }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }
}
