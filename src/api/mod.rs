//! REST API layer: route handlers, DTOs, OpenAPI document and router
//! composition.
//!
//! Resource endpoints are mounted under `/api/v1`; health checks at the
//! root.

pub mod dto;
pub mod handlers;

use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use tower_http::timeout::TimeoutLayer;
use utoipa::OpenApi;

use crate::app_state::AppState;

/// OpenAPI document for every endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "resilience-gateway",
        description = "Load-balancer inspection and lifecycle gateway"
    ),
    paths(
        handlers::load_balancer::list_load_balancers,
        handlers::load_balancer::describe_attributes,
        handlers::load_balancer::list_tags,
        handlers::load_balancer::delete_load_balancer,
        handlers::system::health_handler,
        handlers::system::recorder_health_handler,
    ),
    components(schemas(
        dto::LoadBalancerListResponse,
        dto::TagListResponse,
        handlers::system::HealthResponse,
        crate::error::ErrorResponse,
        crate::error::ErrorBody,
        crate::domain::LoadBalancerDescriptor,
        crate::domain::ListenerConfig,
        crate::domain::LoadBalancerAttributes,
        crate::domain::ConnectionDraining,
        crate::domain::AccessLog,
        crate::domain::AdditionalAttribute,
        crate::domain::TagDescription,
        crate::domain::Tag,
    )),
    tags(
        (name = "Load Balancers", description = "Inspect and delete load balancers"),
        (name = "System", description = "Health checks"),
    )
)]
pub struct ApiDoc;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes())
}

/// Per-request timeout; a request still running after `timeout` is answered
/// with `408 Request Timeout`.
#[must_use]
pub fn request_timeout_layer(timeout: Duration) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Method, Request};
    use axum::routing::get;
    use tower::ServiceExt;

    use super::*;
    use crate::domain::{LoadBalancerAttributes, LoadBalancerDescriptor, Region, Tag};
    use crate::provider::{InMemoryLoadBalancerApi, LoadBalancerApi};
    use crate::recorder::ConnectionConfig;
    use crate::service::ResourceGateway;

    async fn app(with_recorder: bool) -> (Arc<InMemoryLoadBalancerApi>, Router) {
        let api = Arc::new(InMemoryLoadBalancerApi::new());
        api.insert(LoadBalancerDescriptor::named("web-elb")).await;
        api.insert_with(
            LoadBalancerDescriptor::named("tagged-elb"),
            LoadBalancerAttributes::default(),
            vec![Tag::new("owner", "janitor")],
        )
        .await;

        let Ok(region) = Region::new("us-west-2") else {
            panic!("valid region");
        };
        let gateway = ResourceGateway::new(Arc::clone(&api) as Arc<dyn LoadBalancerApi>, region);

        let recorder_pool = if with_recorder {
            let Ok(pool) =
                ConnectionConfig::new("sqlite", "", "", "sqlite::memory:").create_pool()
            else {
                panic!("sqlite pool");
            };
            Some(pool)
        } else {
            None
        };

        let state = AppState {
            gateway: Arc::new(gateway),
            recorder_pool,
        };
        (api, build_router().with_state(state))
    }

    async fn send(router: Router, method: Method, uri: &str) -> (StatusCode, serde_json::Value) {
        let Ok(request) = Request::builder().method(method).uri(uri).body(Body::empty()) else {
            panic!("request");
        };
        let Ok(response) = router.oneshot(request).await;
        let status = response.status();
        let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
            panic!("body");
        };
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn lists_all_load_balancers() {
        let (_api, router) = app(false).await;
        let (status, body) = send(router, Method::GET, "/api/v1/load-balancers").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["region"], "us-west-2");
        assert_eq!(body["count"], 2);
        assert_eq!(body["load_balancers"][0]["name"], "web-elb");
    }

    #[tokio::test]
    async fn lists_named_load_balancers() {
        let (_api, router) = app(false).await;
        let (status, body) = send(
            router,
            Method::GET,
            "/api/v1/load-balancers?names=tagged-elb",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 1);
    }

    #[tokio::test]
    async fn missing_attributes_is_404() {
        let (_api, router) = app(false).await;
        let (status, body) = send(
            router,
            Method::GET,
            "/api/v1/load-balancers/missing-elb/attributes",
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], 2001);
    }

    #[tokio::test]
    async fn tags_endpoint_returns_tags() {
        let (_api, router) = app(false).await;
        let (status, body) = send(
            router,
            Method::GET,
            "/api/v1/load-balancers/tagged-elb/tags",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tag_descriptions"][0]["tags"][0]["key"], "owner");
    }

    #[tokio::test]
    async fn delete_returns_no_content() {
        let (api, router) = app(false).await;
        let (status, _) = send(router, Method::DELETE, "/api/v1/load-balancers/web-elb").await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(api.calls().delete, 1);
    }

    #[tokio::test]
    async fn delete_blank_name_is_400_without_provider_call() {
        let (api, router) = app(false).await;
        let (status, _) = send(router, Method::DELETE, "/api/v1/load-balancers/%20").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(api.calls().delete, 0);
    }

    #[tokio::test]
    async fn provider_outage_is_502() {
        let (api, router) = app(false).await;
        api.set_unavailable(true);
        let (status, _) = send(router, Method::GET, "/api/v1/load-balancers").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn recorder_health_reflects_pool() {
        let (_api, router) = app(true).await;
        let (status, body) = send(router, Method::GET, "/health/recorder").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        let (_api, router) = app(false).await;
        let (status, _) = send(router, Method::GET, "/health/recorder").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn slow_request_times_out_with_408() {
        let router = Router::new()
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "late"
                }),
            )
            .layer(request_timeout_layer(Duration::from_millis(20)));

        let (status, _) = send(router, Method::GET, "/slow").await;
        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
    }

    #[test]
    fn openapi_lists_every_path() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/load-balancers",
            "/api/v1/load-balancers/{name}",
            "/api/v1/load-balancers/{name}/attributes",
            "/api/v1/load-balancers/{name}/tags",
            "/health",
            "/health/recorder",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
