//! Session verification policy
//!
//! Decides, for a request to a guarded path, whether it is allowed with a
//! role, allowed anonymously, or redirected to the login page.

use axum::http::{HeaderMap, header::COOKIE};
use cookie::Cookie;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::jwt::JwtManager;
use crate::role::Role;

/// Paths the session layer is mounted on
pub const GUARDED_PATHS: [&str; 3] = ["/", "/login", "/signup"];

/// Guarded paths reachable without a session
pub const PUBLIC_PATHS: [&str; 2] = ["/login", "/signup"];

/// Cookie carrying the session token
pub const DEFAULT_COOKIE_NAME: &str = "token";

/// Login page
const LOGIN_PATH: &str = "/login";

/// Lifetime of tokens minted locally; verification follows the token's own `exp`
const LOCAL_TOKEN_EXPIRY_HOURS: i64 = 24;

/// What happens to a request whose token fails verification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidTokenPolicy {
    /// Let the request continue without a role and without redirecting
    #[default]
    Passthrough,
    /// Redirect exactly like a request without a token
    Redirect,
}

/// Outcome of verifying one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Verified session; the role is attached to the request
    Authenticated(Role),
    /// No session, but the path is public
    Anonymous,
    /// The token failed verification and the passthrough policy applies
    Unverified,
    /// Send the client to this location
    Redirect(String),
}

/// Session verifier
///
/// Holds the shared secret for the lifetime of the process. Construct it
/// once at start-up and share it behind an `Arc`.
#[derive(Clone)]
pub struct SessionVerifier {
    jwt: JwtManager,
    policy: InvalidTokenPolicy,
    cookie_name: String,
}

impl SessionVerifier {
    pub fn new(secret: &str, policy: InvalidTokenPolicy) -> Self {
        Self::with_manager(JwtManager::new(secret, LOCAL_TOKEN_EXPIRY_HOURS), policy)
    }

    pub fn with_manager(jwt: JwtManager, policy: InvalidTokenPolicy) -> Self {
        Self {
            jwt,
            policy,
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
        }
    }

    /// Read the token from a different cookie
    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn policy(&self) -> InvalidTokenPolicy {
        self.policy
    }

    pub fn jwt(&self) -> &JwtManager {
        &self.jwt
    }

    pub fn is_guarded(path: &str) -> bool {
        GUARDED_PATHS.contains(&path)
    }

    pub fn is_public(path: &str) -> bool {
        PUBLIC_PATHS.contains(&path)
    }

    /// Decide what happens to a request for `path`
    pub fn verify(&self, path: &str, query: Option<&str>, token: Option<&str>) -> Verdict {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return Self::unauthenticated(path, query);
        };

        match self.jwt.validate_token(token) {
            Ok(claims) if claims.has_user_id() => {
                let role = claims.role();
                debug!("Verified session on {} ({})", path, role);
                Verdict::Authenticated(role)
            }
            Ok(_) => {
                debug!("Session token on {} has no user identifier", path);
                Self::unauthenticated(path, query)
            }
            Err(e) => {
                warn!("JWT verification failed: {}", e);
                match self.policy {
                    InvalidTokenPolicy::Passthrough => Verdict::Unverified,
                    InvalidTokenPolicy::Redirect => Self::unauthenticated(path, query),
                }
            }
        }
    }

    fn unauthenticated(path: &str, query: Option<&str>) -> Verdict {
        if Self::is_public(path) {
            Verdict::Anonymous
        } else {
            Verdict::Redirect(login_redirect_location(query))
        }
    }
}

/// Login location carrying the original query string
pub fn login_redirect_location(query: Option<&str>) -> String {
    match query.filter(|q| !q.is_empty()) {
        Some(q) => format!("{}?{}", LOGIN_PATH, q),
        None => LOGIN_PATH.to_string(),
    }
}

/// Extract the session token from the request cookies.
///
/// An empty cookie value counts as no token.
pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| Cookie::split_parse(h).filter_map(Result::ok))
        .find(|c| c.name() == cookie_name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}
