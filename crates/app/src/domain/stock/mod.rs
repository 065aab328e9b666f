//! Stock Validation

pub mod models;
mod validator;

pub use validator::StockValidator;
