//! Shared storefront domain, storage backends and payment integration.

pub mod context;
pub mod database;
pub mod domain;
pub mod memory;

#[cfg(test)]
mod test;

mod uuids;

pub use uuids::TypedUuid;
