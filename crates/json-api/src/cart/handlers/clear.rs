//! Clear Cart Handler

use std::sync::Arc;

use salvo::prelude::*;

use storefront_app::domain::carts::models::Cart;

use crate::{
    cart::{errors::into_status_error, models::CartResponse},
    extensions::*,
    state::State,
};

/// Clear Cart Handler
///
/// Removes every line. Succeeds even when there is nothing to clear.
#[endpoint(tags("cart"), summary = "Clear Cart")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, StatusError> {
    let Some(session) = depot.guest_session() else {
        return Ok(Json(Cart::empty(None).into()));
    };

    let state = depot.obtain_or_500::<Arc<State>>()?;

    state
        .app
        .carts
        .clear_cart(session)
        .await
        .map_err(into_status_error)?;

    Ok(Json(Cart::empty(Some(session)).into()))
}
