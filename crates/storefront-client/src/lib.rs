//! Storefront API client
//!
//! This crate provides the client for the external auth and product APIs
//! the storefront pages are built on.

pub mod api;
pub mod client;
pub mod error;

pub use api::{
    AuthApi, AuthReply, Credentials, LoginRequest, Product, ProductApi, ProductPayload,
    RegisterRequest,
};
pub use client::{ApiClient, ApiClientConfig};
pub use error::ClientError;
