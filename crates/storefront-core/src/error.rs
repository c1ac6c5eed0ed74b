//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("API error: {0}")]
    Client(#[from] storefront_client::ClientError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Admin role required")]
    Forbidden,
}
