//! resilience-gateway server entry point.
//!
//! Builds the load-balancer gateway and the recorder pool from the
//! environment and serves the operator HTTP surface.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use resilience_gateway::api;
use resilience_gateway::app_state::AppState;
use resilience_gateway::config::AgentConfig;
use resilience_gateway::recorder::{ConnectionConfig, EnvConfigSource};
use resilience_gateway::service::ResourceGateway;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = AgentConfig::from_env()?;
    tracing::info!(
        addr = %config.listen_addr,
        region = %config.aws_region,
        "starting resilience-gateway"
    );

    // Build the load-balancer gateway
    let gateway = ResourceGateway::create(
        config.credentials(),
        config.client_settings(),
        &config.aws_region,
    )
    .await?;

    // Build the recorder pool (lazy; no connection is opened yet)
    let recorder_pool = if config.recorder_enabled {
        let connection = ConnectionConfig::from_configuration(&EnvConfigSource)?;
        Some(config.apply_pool_limits(connection).create_pool()?)
    } else {
        tracing::info!("recorder disabled");
        None
    };

    let app_state = AppState {
        gateway: Arc::new(gateway),
        recorder_pool,
    };

    let app = with_docs(Router::new().merge(api::build_router()))
        .layer(api::request_timeout_layer(Duration::from_secs(
            config.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

#[cfg(feature = "swagger-ui")]
fn with_docs(router: Router<AppState>) -> Router<AppState> {
    use utoipa::OpenApi;
    use utoipa_swagger_ui::SwaggerUi;

    router.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api::ApiDoc::openapi()))
}

#[cfg(not(feature = "swagger-ui"))]
fn with_docs(router: Router<AppState>) -> Router<AppState> {
    router
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
    }
}
