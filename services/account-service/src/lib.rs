//! HTTP surface for the account ledger
//!
//! Routes are registered by [`handlers::configure_routes`]; handlers expect a
//! `web::Data<Arc<ledger_core::Ledger>>` in the application data.

pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;

pub use errors::{ApiError, ApiResult};
