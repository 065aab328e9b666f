//! Get Cart Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use crate::{
    cart::{errors::into_status_error, models::CartResponse},
    extensions::*,
    state::State,
};

/// Get Cart Handler
///
/// Returns the caller's cart; callers without a session get an empty cart.
#[endpoint(tags("cart"), summary = "Get Cart")]
pub(crate) async fn handler(
    validate: QueryParam<bool, false>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.guest_session();

    let cart = state
        .app
        .carts
        .get_cart(session)
        .await
        .map_err(into_status_error)?;

    let mut response = CartResponse::from(cart);

    if validate.into_inner().unwrap_or(false) {
        let report = state
            .app
            .carts
            .validate_cart(session)
            .await
            .map_err(into_status_error)?;

        response.validation = Some(report.into());
    }

    Ok(Json(response))
}
