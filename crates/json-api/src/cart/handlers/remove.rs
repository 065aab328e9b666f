//! Remove Cart Item Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};

use crate::{
    cart::{errors::into_status_error, models::CartResponse},
    extensions::*,
    state::State,
};

/// Remove Cart Item Handler
///
/// Removes a line. Removing a sku that is not in the cart is not an error.
#[endpoint(
    tags("cart"),
    summary = "Remove Cart Item",
    responses(
        (status_code = StatusCode::OK, description = "Item removed"),
        (status_code = StatusCode::NOT_FOUND, description = "No active cart session"),
    ),
)]
pub(crate) async fn handler(
    sku: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let session = depot
        .guest_session()
        .ok_or_else(|| StatusError::not_found().brief("No active cart session"))?;

    let state = depot.obtain_or_500::<Arc<State>>()?;

    let cart = state
        .app
        .carts
        .remove_item(session, sku.into_inner())
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}
