//! Application state

use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use storefront_auth::SessionVerifier;
use storefront_client::ProductApi;
use storefront_core::AuthFlow;

/// Prometheus render handle
pub type MetricsHandle = PrometheusHandle;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthFlow,
    pub products: Arc<dyn ProductApi>,
    pub verifier: Arc<SessionVerifier>,
}

impl AppState {
    pub fn new(auth: AuthFlow, products: Arc<dyn ProductApi>, verifier: Arc<SessionVerifier>) -> Self {
        Self {
            auth,
            products,
            verifier,
        }
    }
}
