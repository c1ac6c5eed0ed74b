//! Storefront web layer
//!
//! This crate provides the Axum router serving the storefront pages: the
//! session-guarded catalog, login and signup pages, plus health, metrics
//! and static assets.

pub mod error;
pub mod pages;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::{AppState, MetricsHandle};
