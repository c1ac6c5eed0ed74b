//! External API contracts

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ClientError;

// ==================== Auth Types ====================

/// POST /api/auth/login body
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LoginRequest {
    pub username: String,
    /// Encoded password
    pub password: String,
}

/// POST /api/auth/register body
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RegisterRequest {
    pub firstname: String,
    pub lastname: String,
    pub username: String,
    /// Encoded password
    pub password: String,
    pub role: String,
}

/// Reply of the auth API
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthReply {
    /// The `data` member of the JSON body (`null` when absent)
    pub data: Value,
    /// `Set-Cookie` headers to relay to the browser
    pub set_cookies: Vec<String>,
}

// ==================== Product Types ====================

/// Product as served by the product API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(rename = "productName", default)]
    pub product_name: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub detail: String,
}

/// Body of product create and update calls
///
/// The API reads the name from `name`; `productName` is sent as well so
/// both spellings carry the same value.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProductPayload {
    pub id: String,
    #[serde(rename = "productName")]
    pub product_name: String,
    pub name: String,
    pub price: f64,
    pub category: String,
    pub detail: String,
}

/// `{ "data": ... }` envelope used by every API reply
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: Option<T>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

// ==================== Credentials ====================

/// Session credentials forwarded on credentialed calls
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    cookie: Option<String>,
}

impl Credentials {
    /// No credentials
    pub fn none() -> Self {
        Self::default()
    }

    /// Forward the session cookie `name=token`
    pub fn session(name: &str, token: &str) -> Self {
        Self {
            cookie: Some(format!("{}={}", name, token)),
        }
    }

    /// Value for the outgoing `Cookie` header
    pub fn cookie_header(&self) -> Option<&str> {
        self.cookie.as_deref()
    }
}

// ==================== Traits ====================

/// External auth API
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// POST /api/auth/login
    async fn login(&self, request: &LoginRequest) -> Result<AuthReply, ClientError>;

    /// POST /api/auth/register
    async fn register(&self, request: &RegisterRequest) -> Result<AuthReply, ClientError>;
}

/// External product API
#[async_trait]
pub trait ProductApi: Send + Sync {
    /// GET /api/products
    async fn list_products(&self) -> Result<Vec<Product>, ClientError>;

    /// POST /api/products
    async fn create_product(
        &self,
        product: &ProductPayload,
        credentials: &Credentials,
    ) -> Result<(), ClientError>;

    /// PUT /api/products/{id}
    async fn update_product(
        &self,
        id: &str,
        product: &ProductPayload,
        credentials: &Credentials,
    ) -> Result<(), ClientError>;

    /// DELETE /api/products/{id}
    async fn delete_product(&self, id: &str, credentials: &Credentials) -> Result<(), ClientError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_product_accepts_numeric_id() {
        let product: Product = serde_json::from_value(json!({
            "id": 12,
            "productName": "Apple",
            "price": 10,
            "category": "Fruit",
            "detail": "Red"
        }))
        .unwrap();

        assert_eq!(product.id, "12");
        assert_eq!(product.product_name, "Apple");
        assert_eq!(product.price, 10.0);
    }

    #[test]
    fn test_product_rejects_missing_id() {
        let result: Result<Product, _> = serde_json::from_value(json!({ "productName": "x" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_payload_carries_both_name_fields() {
        let payload = ProductPayload {
            id: String::new(),
            product_name: "Pear".to_string(),
            name: "Pear".to_string(),
            price: 0.0,
            category: "Fruit".to_string(),
            detail: String::new(),
        };

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["productName"], "Pear");
        assert_eq!(value["name"], "Pear");
        assert_eq!(value["price"], 0.0);
    }

    #[test]
    fn test_envelope_without_data() {
        let envelope: Envelope<Vec<Product>> = serde_json::from_value(json!({})).unwrap();
        assert!(envelope.data.is_none());
    }

    #[test]
    fn test_session_credentials() {
        assert_eq!(Credentials::none().cookie_header(), None);
        assert_eq!(
            Credentials::session("token", "abc").cookie_header(),
            Some("token=abc")
        );
    }
}
