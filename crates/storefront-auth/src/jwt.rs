//! JWT token management

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;

use crate::error::AuthError;
use crate::role::Role;

/// Session token claims
///
/// The auth service owns the token format; only `userId` and `role` are
/// interpreted here. Both are kept as raw JSON values because the service
/// is free to send numbers or strings.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Claims {
    /// User identifier
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Value>,
    /// User role
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Value>,
    /// Expiration time (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    /// Issued at (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

impl Claims {
    /// Whether the token identifies a user.
    ///
    /// `null`, `false`, `0` and `""` do not count as an identifier.
    pub fn has_user_id(&self) -> bool {
        match &self.user_id {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Array(_)) | Some(Value::Object(_)) => true,
        }
    }

    /// Role claim resolved to the closed role set
    pub fn role(&self) -> Role {
        Role::resolve(self.role.as_ref().and_then(Value::as_str))
    }
}

/// JWT manager for token generation and validation
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry_hours: i64,
}

impl JwtManager {
    /// Create a new JWT manager
    pub fn new(secret: &str, token_expiry_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_expiry_hours,
        }
    }

    /// Generate a session token for a user
    pub fn generate_token(&self, user_id: &str, role: Option<Role>) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now + Duration::hours(self.token_expiry_hours);

        let claims = Claims {
            user_id: Some(Value::String(user_id.to_string())),
            role: role.map(|r| Value::String(r.as_str().to_string())),
            exp: Some(exp.timestamp()),
            iat: Some(now.timestamp()),
        };

        debug!("Generating token for user: {}", user_id);

        self.sign(&claims)
    }

    /// Sign arbitrary claims with HS256
    pub fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::default(), claims, &self.encoding_key).map_err(AuthError::from)
    }

    /// Validate a token and return its claims.
    ///
    /// Any HMAC algorithm is accepted. `exp` and `nbf` are checked when
    /// present, without leeway; tokens without `exp` never expire here.
    /// A token expires at its `exp` second, not after it. `aud` and `iss`
    /// are not checked.
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.required_spec_claims = HashSet::new();
        validation.leeway = 0;
        validation.validate_nbf = true;
        validation.validate_aud = false;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)?;

        // jsonwebtoken only rejects exp < now
        if token_data
            .claims
            .exp
            .is_some_and(|exp| exp <= Utc::now().timestamp())
        {
            return Err(AuthError::TokenExpired);
        }

        Ok(token_data.claims)
    }
}
