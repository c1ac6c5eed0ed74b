//! Request extractors for the guarded pages

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::convert::Infallible;
use storefront_auth::{ROLE_HEADER, Role, session_token};
use storefront_client::Credentials;

use crate::state::AppState;

/// Role attached by the session middleware
///
/// Read from the `role` header; missing or unknown values resolve to
/// [`Role::User`].
pub struct PageRole(pub Role);

impl<S> FromRequestParts<S> for PageRole
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claim = parts.headers.get(ROLE_HEADER).and_then(|h| h.to_str().ok());
        Ok(PageRole(Role::resolve(claim)))
    }
}

/// Session cookie to forward on credentialed product API calls
pub struct SessionCredentials(pub Credentials);

impl<S> FromRequestParts<S> for SessionCredentials
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let cookie_name = app_state.verifier.cookie_name();

        let credentials = session_token(&parts.headers, cookie_name)
            .map(|token| Credentials::session(cookie_name, &token))
            .unwrap_or_default();

        Ok(SessionCredentials(credentials))
    }
}
