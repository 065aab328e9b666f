//! Products

mod errors;
mod handlers;
mod models;

pub(crate) use handlers::*;

/// Catalog responses may be cached by shared caches for a minute.
pub(crate) const CATALOG_CACHE_CONTROL: &str = "public, s-maxage=60, stale-while-revalidate=300";
