//! Storefront - server-rendered product catalog with cookie sessions

use anyhow::{Context, Result};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;

use config::{Config, LogFormat, Overrides};
use storefront_auth::SessionVerifier;
use storefront_client::{ApiClient, ApiClientConfig};
use storefront_core::AuthFlow;
use storefront_web::{AppState, create_router};

/// Storefront - product catalog front end for the Auth and Product APIs
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Bind address
    #[arg(long, env = "STOREFRONT_BIND")]
    bind: Option<String>,

    /// Port
    #[arg(short, long, env = "STOREFRONT_PORT")]
    port: Option<u16>,

    /// Origin of the Auth and Product APIs
    #[arg(long, env = "BASE_URL")]
    base_url: Option<String>,

    /// Secret used to verify session tokens
    #[arg(long, env = "JWT_SECRET_AUTH", hide_env_values = true)]
    jwt_secret: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(&args.config)?;
    config.apply(Overrides {
        bind: args.bind,
        port: args.port,
        base_url: args.base_url,
        jwt_secret: args.jwt_secret,
    });

    init_logging(&config.logging.level, config.logging.format);

    info!("Starting Storefront v{}", env!("CARGO_PKG_VERSION"));

    if config.uses_default_secret() {
        warn!("Using the default JWT secret; set JWT_SECRET_AUTH in production");
    }

    let metrics_handle = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    // One client serves both the Auth and the Product API
    let client = Arc::new(ApiClient::new(ApiClientConfig {
        base_url: config.api.base_url.clone(),
        skip_tls_verify: config.api.skip_tls_verify,
    })?);

    let verifier = Arc::new(
        SessionVerifier::new(&config.auth.jwt_secret, config.auth.invalid_token_policy)
            .with_cookie_name(config.auth.cookie_name.clone()),
    );

    let state = AppState::new(AuthFlow::new(client.clone()), client, verifier);

    let app = create_router(state, Some(Arc::new(metrics_handle)))
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.server.bind_address, config.server.port)
        .parse()
        .context("Invalid bind address")?;

    info!("Listening on {}", addr);
    info!("API: {}", config.api.base_url);
    info!(
        "Invalid token policy: {:?}",
        config.auth.invalid_token_policy
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Initialize logging
fn init_logging(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(fmt::layer()).init(),
    }
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await
        }
    }
}
