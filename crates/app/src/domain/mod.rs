//! Storefront Domain Concerns

pub mod carts;
pub mod catalog;
pub mod orders;
pub mod payments;
pub mod sessions;
pub mod stock;
