//! Update Cart Item Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};

use crate::{
    cart::{
        errors::update_status_error,
        models::{CartResponse, UpdateQuantityRequest, quantity},
    },
    extensions::*,
    state::State,
};

/// Update Cart Item Handler
///
/// Replaces the quantity of an existing line.
#[endpoint(
    tags("cart"),
    summary = "Update Cart Item Quantity",
    responses(
        (status_code = StatusCode::OK, description = "Quantity updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid quantity or short stock"),
        (status_code = StatusCode::NOT_FOUND, description = "No session or item not in cart"),
    ),
)]
pub(crate) async fn handler(
    sku: PathParam<String>,
    json: JsonBody<UpdateQuantityRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let quantity = quantity(json.into_inner().quantity)
        .map_err(|brief| StatusError::bad_request().brief(brief))?;

    let session = depot
        .guest_session()
        .ok_or_else(|| StatusError::not_found().brief("No active cart session"))?;

    let state = depot.obtain_or_500::<Arc<State>>()?;

    let cart = state
        .app
        .carts
        .update_quantity(session, sku.into_inner(), quantity)
        .await
        .map_err(update_status_error)?;

    Ok(Json(cart.into()))
}
