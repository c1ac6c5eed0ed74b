//! Web error types

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use storefront_core::CoreError;
use thiserror::Error;

use crate::pages;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Core(e) => match e {
                CoreError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden".to_string()),
                CoreError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
                CoreError::Client(_) => (
                    StatusCode::BAD_GATEWAY,
                    "The product service is unavailable".to_string(),
                ),
            },
        };

        (status, Html(pages::error_page(status, &message))).into_response()
    }
}
