//! Storefront session authentication
//!
//! This crate verifies the signed session token carried in the `token`
//! cookie, resolves the role claim, and provides the axum middleware that
//! gates the storefront pages. It also holds the password string encoder
//! the external auth service expects.

pub mod encoding;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod role;
pub mod session;

pub use encoding::{decode_magnitude, encode, encode_password, EncodeInput, EncodingError, ALPHABET};
pub use error::AuthError;
pub use jwt::{Claims, JwtManager};
pub use middleware::{session_middleware, ROLE_HEADER};
pub use role::Role;
pub use session::{
    login_redirect_location, session_token, InvalidTokenPolicy, SessionVerifier, Verdict,
    DEFAULT_COOKIE_NAME, GUARDED_PATHS, PUBLIC_PATHS,
};
