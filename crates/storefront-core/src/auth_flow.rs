//! Login and signup submission

use serde_json::Value;
use std::sync::Arc;
use storefront_auth::encode_password;
use storefront_client::{AuthApi, LoginRequest, RegisterRequest};
use tracing::{debug, error, info, warn};

use crate::forms::{FieldErrors, LoginForm, SignupForm};

/// Reply the auth API sends for a successful login
pub const LOGIN_SUCCESS: &str = "Login successful";

/// Signup reply for an already taken username
const SIGNUP_DUPLICATE: f64 = -1.0;
/// Signup reply for a created account
const SIGNUP_CREATED: f64 = 1.0;

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password";
pub const DUPLICATE_USER_MESSAGE: &str = "Username Already Exists";
pub const UNAVAILABLE_MESSAGE: &str = "Something went wrong. Please try again.";

/// Result of submitting the login form
#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    /// Validation failed; nothing was sent
    Invalid(FieldErrors),
    /// Logged in; the cookies must reach the browser before navigating home
    Success { set_cookies: Vec<String> },
    /// Wrong credentials or any unexpected reply
    Rejected,
    /// The auth API could not be reached or failed
    Unavailable,
}

impl LoginOutcome {
    /// Message shown under the form
    pub fn message(&self) -> Option<&'static str> {
        match self {
            LoginOutcome::Rejected => Some(INVALID_CREDENTIALS_MESSAGE),
            LoginOutcome::Unavailable => Some(UNAVAILABLE_MESSAGE),
            LoginOutcome::Invalid(_) | LoginOutcome::Success { .. } => None,
        }
    }
}

/// Result of submitting the signup form
#[derive(Debug, Clone, PartialEq)]
pub enum SignupOutcome {
    /// Validation failed; nothing was sent
    Invalid(FieldErrors),
    /// Account created; the cookies must reach the browser before navigating home
    Created { set_cookies: Vec<String> },
    /// Username already taken
    Duplicate,
    /// Any other reply value. Nothing happens on the page.
    Unhandled(Value),
    /// The auth API could not be reached or failed
    Unavailable,
}

impl SignupOutcome {
    /// Message shown under the form
    pub fn message(&self) -> Option<&'static str> {
        match self {
            SignupOutcome::Duplicate => Some(DUPLICATE_USER_MESSAGE),
            SignupOutcome::Unavailable => Some(UNAVAILABLE_MESSAGE),
            _ => None,
        }
    }
}

/// Submits the auth forms to the external auth API
#[derive(Clone)]
pub struct AuthFlow {
    api: Arc<dyn AuthApi>,
}

impl AuthFlow {
    pub fn new(api: Arc<dyn AuthApi>) -> Self {
        Self { api }
    }

    /// Validate and submit the login form
    pub async fn login(&self, form: &LoginForm) -> LoginOutcome {
        if let Err(errors) = form.validate() {
            return LoginOutcome::Invalid(errors);
        }

        debug!("Login attempt for user: {}", form.username);

        let request = LoginRequest {
            username: form.username.clone(),
            password: encode_password(&form.password),
        };

        match self.api.login(&request).await {
            Ok(reply) if reply.data.as_str() == Some(LOGIN_SUCCESS) => {
                info!("User {} logged in", form.username);
                LoginOutcome::Success {
                    set_cookies: reply.set_cookies,
                }
            }
            Ok(reply) => {
                debug!("Login rejected for {}: {}", form.username, reply.data);
                LoginOutcome::Rejected
            }
            Err(e) if e.is_client_rejection() => {
                warn!("Login rejected for {}: {}", form.username, e);
                LoginOutcome::Rejected
            }
            Err(e) => {
                error!("Login Error: {}", e);
                LoginOutcome::Unavailable
            }
        }
    }

    /// Validate and submit the signup form
    pub async fn signup(&self, form: &SignupForm) -> SignupOutcome {
        if let Err(errors) = form.validate() {
            return SignupOutcome::Invalid(errors);
        }

        debug!("Signup attempt for user: {}", form.username);

        let request = RegisterRequest {
            firstname: form.first_name.clone(),
            lastname: form.last_name.clone(),
            username: form.username.clone(),
            password: encode_password(&form.password),
            role: form.role.as_str().to_string(),
        };

        match self.api.register(&request).await {
            Ok(reply) => match reply.data.as_f64() {
                Some(v) if v == SIGNUP_DUPLICATE => SignupOutcome::Duplicate,
                Some(v) if v == SIGNUP_CREATED => {
                    info!("User {} signed up as {}", form.username, form.role);
                    SignupOutcome::Created {
                        set_cookies: reply.set_cookies,
                    }
                }
                _ => {
                    warn!("Unhandled signup reply: {}", reply.data);
                    SignupOutcome::Unhandled(reply.data)
                }
            },
            Err(e) => {
                error!("Signup Error: {}", e);
                SignupOutcome::Unavailable
            }
        }
    }
}
