//! Cart Repositories

mod items;

pub use items::{CartItemsRepository, MockCartItemsRepository, PgCartItemsRepository};
