//! Storefront Core Logic
//!
//! This crate provides the behavior behind the storefront pages: the login
//! and signup forms with their submission flow, and the product catalog
//! with filtering and admin editing.

pub mod auth_flow;
pub mod catalog;
pub mod error;
pub mod forms;

pub use auth_flow::{AuthFlow, LoginOutcome, SignupOutcome};
pub use catalog::{Catalog, FilterField, FilterState, ProductDraft, coerce_price, filter_products};
pub use error::CoreError;
pub use forms::{FieldErrors, LoginForm, SignupForm};
