//! Product Index Handler

use std::sync::Arc;

use salvo::{
    http::header::CACHE_CONTROL,
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    extensions::*,
    products::{CATALOG_CACHE_CONTROL, errors::into_status_error, models::ProductResponse},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductsResponse {
    /// The list of products
    pub products: Vec<ProductResponse>,
}

/// Product Index Handler
///
/// Returns the catalog, optionally narrowed to one category.
#[endpoint(tags("products"), summary = "List Products")]
pub(crate) async fn handler(
    category: QueryParam<String, false>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ProductsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let category = category
        .into_inner()
        .filter(|category| !category.trim().is_empty());

    let products = state
        .app
        .catalog
        .list_products(category)
        .await
        .map_err(into_status_error)?;

    res.add_header(CACHE_CONTROL, CATALOG_CACHE_CONTROL, true)
        .or_500("failed to set cache-control header")?;

    Ok(Json(ProductsResponse {
        products: products.into_iter().map(Into::into).collect(),
    }))
}
