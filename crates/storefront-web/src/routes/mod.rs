//! Storefront routes

mod auth;
mod catalog;
mod extract;
mod health;

use axum::{
    Router,
    http::{StatusCode, Uri, header},
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::get,
};
use rust_embed::Embed;
use std::sync::Arc;
use storefront_auth::session_middleware;

use crate::state::{AppState, MetricsHandle};

pub use extract::{PageRole, SessionCredentials};

/// Embedded static assets
#[derive(Embed)]
#[folder = "$CARGO_MANIFEST_DIR/../../static"]
struct Assets;

/// Serve `/static/*` from the embedded assets
async fn serve_embedded_file(uri: Uri) -> Response {
    let Some(path) = uri.path().strip_prefix("/static/") else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match <Assets as Embed>::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            (
                [(header::CONTENT_TYPE, mime.as_ref())],
                content.data.into_owned(),
            )
                .into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Create the main router
///
/// The session middleware only wraps the guarded pages (`/`, `/login`,
/// `/signup`); health, metrics and static assets are served without it.
pub fn create_router(state: AppState, metrics_handle: Option<Arc<MetricsHandle>>) -> Router {
    let guarded = Router::new()
        .merge(catalog::routes())
        .merge(auth::routes())
        .route_layer(from_fn_with_state(
            state.verifier.clone(),
            session_middleware,
        ));

    let mut router = Router::new()
        .merge(guarded)
        .merge(health::routes())
        .with_state(state);

    if let Some(handle) = metrics_handle {
        router = router.route("/metrics", get(move || async move { handle.render() }));
    }

    router.fallback(serve_embedded_file)
}
