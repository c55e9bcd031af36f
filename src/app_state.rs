//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use sqlx::AnyPool;

use crate::service::ResourceGateway;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Load-balancer gateway for the configured region.
    pub gateway: Arc<ResourceGateway>,
    /// Recorder pool, when the recorder is enabled.
    pub recorder_pool: Option<AnyPool>,
}
