//! Validate Cart Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    cart::{errors::into_status_error, models::StockReportResponse},
    extensions::*,
    state::State,
};

/// Validate Cart Handler
///
/// Checks every line against live stock without changing the cart.
#[endpoint(tags("cart"), summary = "Validate Cart Stock")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<StockReportResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let report = state
        .app
        .carts
        .validate_cart(depot.guest_session())
        .await
        .map_err(into_status_error)?;

    Ok(Json(report.into()))
}
