//! Login and signup routes

use axum::{
    Form, Router,
    extract::State,
    http::{HeaderValue, header::SET_COOKIE},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use storefront_core::{FieldErrors, LoginForm, LoginOutcome, SignupForm, SignupOutcome};
use tracing::warn;

use crate::pages;
use crate::state::AppState;

/// Redirect home, passing the auth service's cookies on to the browser
fn home_with_cookies(set_cookies: &[String]) -> Response {
    let mut response = Redirect::to("/").into_response();

    for cookie in set_cookies {
        match HeaderValue::from_str(cookie) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => warn!("Dropping invalid Set-Cookie from auth API: {}", e),
        }
    }

    response
}

/// GET /login
async fn login_page() -> Html<String> {
    Html(pages::login_page("", &FieldErrors::default(), None))
}

/// POST /login
async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    let outcome = state.auth.login(&form).await;

    match outcome {
        LoginOutcome::Success { set_cookies } => home_with_cookies(&set_cookies),
        LoginOutcome::Invalid(errors) => {
            Html(pages::login_page(&form.username, &errors, None)).into_response()
        }
        other => Html(pages::login_page(
            &form.username,
            &FieldErrors::default(),
            other.message(),
        ))
        .into_response(),
    }
}

/// GET /signup
async fn signup_page() -> Html<String> {
    Html(pages::signup_page(
        &SignupForm::default(),
        &FieldErrors::default(),
        None,
    ))
}

/// POST /signup
async fn signup(State(state): State<AppState>, Form(form): Form<SignupForm>) -> Response {
    let outcome = state.auth.signup(&form).await;

    match outcome {
        SignupOutcome::Created { set_cookies } => home_with_cookies(&set_cookies),
        SignupOutcome::Invalid(errors) => {
            Html(pages::signup_page(&form, &errors, None)).into_response()
        }
        other => Html(pages::signup_page(
            &form,
            &FieldErrors::default(),
            other.message(),
        ))
        .into_response(),
    }
}

/// Create auth routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(login))
        .route("/signup", get(signup_page).post(signup))
}
