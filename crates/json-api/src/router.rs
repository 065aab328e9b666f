//! App Router

use salvo::Router;

use crate::{cart, orders, payments, products, sessions};

pub fn app_router() -> Router {
    Router::new()
        .hoop(sessions::middleware)
        .push(
            Router::with_path("products")
                .get(products::index::handler)
                .push(Router::with_path("{product}").get(products::get::handler)),
        )
        .push(
            Router::with_path("cart")
                .get(cart::get::handler)
                .post(cart::add::handler)
                .delete(cart::clear::handler)
                .push(Router::with_path("validate").get(cart::validate::handler))
                .push(
                    Router::with_path("{sku}")
                        .put(cart::update::handler)
                        .delete(cart::remove::handler),
                ),
        )
        .push(
            Router::with_path("orders")
                .push(Router::with_path("create").post(orders::create::handler))
                .push(Router::with_path("verify-payment").post(orders::verify::handler))
                .push(Router::with_path("{order}").get(orders::get::handler)),
        )
        .push(Router::with_path("payments/webhook").post(payments::webhook::handler))
}
