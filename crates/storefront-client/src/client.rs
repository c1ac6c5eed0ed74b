//! HTTP client for the external APIs

use async_trait::async_trait;
use reqwest::{
    Client, RequestBuilder, Response,
    header::{COOKIE, SET_COOKIE},
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, info};
use url::Url;

use crate::api::{
    AuthApi, AuthReply, Credentials, Envelope, LoginRequest, Product, ProductApi, ProductPayload,
    RegisterRequest,
};
use crate::error::ClientError;

/// API client configuration
#[derive(Clone, Debug)]
pub struct ApiClientConfig {
    /// Origin of the external API (`BASE_URL`)
    pub base_url: String,
    /// Skip TLS certificate verification
    pub skip_tls_verify: bool,
}

/// Client for the auth and product APIs
///
/// Requests carry no timeout and are never retried.
pub struct ApiClient {
    base_url: String,
    base: Url,
    client: Client,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(config: ApiClientConfig) -> Result<Self, ClientError> {
        let base = Url::parse(&config.base_url)?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }

        let mut builder = Client::builder();

        if config.skip_tls_verify {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder.build()?;

        info!("Created API client for {}", config.base_url);

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            base,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `/api/products/{id}` with the id as one percent-encoded segment
    fn product_endpoint(&self, id: &str) -> Result<Url, ClientError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(["api", "products", id]);
        Ok(url)
    }

    /// Attach the session cookie to a credentialed request
    fn credentialed(request: RequestBuilder, credentials: &Credentials) -> RequestBuilder {
        match credentials.cookie_header() {
            Some(cookie) => request.header(COOKIE, cookie),
            None => request,
        }
    }

    /// Send a request and turn non-success statuses into errors
    async fn send(operation: &'static str, request: RequestBuilder) -> Result<Response, ClientError> {
        let result = match request.send().await {
            Ok(response) if response.status().is_success() => Ok(response),
            Ok(response) => {
                let status = response.status().as_u16();
                Err(ClientError::Upstream {
                    status,
                    message: response.text().await.unwrap_or_default(),
                })
            }
            Err(e) => Err(ClientError::Http(e)),
        };

        let outcome = if result.is_ok() { "success" } else { "error" };
        metrics::counter!(
            "storefront_upstream_requests_total",
            "operation" => operation,
            "outcome" => outcome
        )
        .increment(1);

        if let Err(ref e) = result {
            error!("{} request failed: {}", operation, e);
        }

        result
    }

    async fn read_data<T: DeserializeOwned>(response: Response) -> Result<Option<T>, ClientError> {
        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
        Ok(envelope.data)
    }

    async fn post_auth<B: Serialize + Sync>(
        &self,
        operation: &'static str,
        path: &str,
        body: &B,
    ) -> Result<AuthReply, ClientError> {
        let url = self.endpoint(path);
        debug!("POST {}", url);

        let response = Self::send(operation, self.client.post(&url).json(body)).await?;

        let set_cookies = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|h| h.to_str().ok())
            .map(str::to_string)
            .collect();

        let data = Self::read_data::<Value>(response).await?.unwrap_or(Value::Null);

        Ok(AuthReply { data, set_cookies })
    }
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, request: &LoginRequest) -> Result<AuthReply, ClientError> {
        self.post_auth("login", "/api/auth/login", request).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthReply, ClientError> {
        self.post_auth("register", "/api/auth/register", request).await
    }
}

#[async_trait]
impl ProductApi for ApiClient {
    async fn list_products(&self) -> Result<Vec<Product>, ClientError> {
        let url = self.endpoint("/api/products");
        debug!("Fetching products: {}", url);

        let response = Self::send("list_products", self.client.get(&url)).await?;
        Ok(Self::read_data(response).await?.unwrap_or_default())
    }

    async fn create_product(
        &self,
        product: &ProductPayload,
        credentials: &Credentials,
    ) -> Result<(), ClientError> {
        let url = self.endpoint("/api/products");
        debug!("Creating product: {}", product.name);

        let request = Self::credentialed(self.client.post(&url).json(product), credentials);
        Self::send("create_product", request).await?;
        Ok(())
    }

    async fn update_product(
        &self,
        id: &str,
        product: &ProductPayload,
        credentials: &Credentials,
    ) -> Result<(), ClientError> {
        let url = self.product_endpoint(id)?;
        debug!("Updating product: {}", url);

        let request = Self::credentialed(self.client.put(url).json(product), credentials);
        Self::send("update_product", request).await?;
        Ok(())
    }

    async fn delete_product(&self, id: &str, credentials: &Credentials) -> Result<(), ClientError> {
        let url = self.product_endpoint(id)?;
        debug!("Deleting product: {}", url);

        let request = Self::credentialed(self.client.delete(url), credentials);
        Self::send("delete_product", request).await?;
        Ok(())
    }
}
