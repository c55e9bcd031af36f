//! Load-balancer handlers: list, attributes, tags, delete.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get};
use axum::{Json, Router};

use crate::api::dto::{ListLoadBalancersQuery, LoadBalancerListResponse, TagListResponse};
use crate::app_state::AppState;
use crate::domain::LoadBalancerAttributes;
use crate::error::{ErrorResponse, GatewayError};

/// `GET /load-balancers`: List load balancers in the gateway's region.
///
/// # Errors
///
/// Returns [`GatewayError`] when a named load balancer does not exist or
/// the provider is unavailable.
#[utoipa::path(
    get,
    path = "/api/v1/load-balancers",
    tag = "Load Balancers",
    summary = "List load balancers",
    description = "Lists every load balancer in the region, or only the comma-separated `names`.",
    params(ListLoadBalancersQuery),
    responses(
        (status = 200, description = "Load balancers in provider order", body = LoadBalancerListResponse),
        (status = 404, description = "A named load balancer does not exist", body = ErrorResponse),
        (status = 502, description = "Provider unavailable", body = ErrorResponse),
    )
)]
pub async fn list_load_balancers(
    State(state): State<AppState>,
    Query(query): Query<ListLoadBalancersQuery>,
) -> Result<impl IntoResponse, GatewayError> {
    let names = query.name_list();
    let load_balancers = state.gateway.list_load_balancers(&names).await?;

    Ok(Json(LoadBalancerListResponse {
        region: state.gateway.region().to_string(),
        count: load_balancers.len(),
        load_balancers,
    }))
}

/// `GET /load-balancers/{name}/attributes`: Describe attributes.
///
/// # Errors
///
/// Returns [`GatewayError::NotFound`] if the load balancer does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/load-balancers/{name}/attributes",
    tag = "Load Balancers",
    summary = "Describe load balancer attributes",
    params(
        ("name" = String, Path, description = "Load balancer name"),
    ),
    responses(
        (status = 200, description = "Attribute bag", body = LoadBalancerAttributes),
        (status = 404, description = "Load balancer not found", body = ErrorResponse),
    )
)]
pub async fn describe_attributes(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, GatewayError> {
    let attributes = state.gateway.describe_attributes(&name).await?;
    Ok(Json(attributes))
}

/// `GET /load-balancers/{name}/tags`: List tags.
///
/// # Errors
///
/// Returns [`GatewayError::NotFound`] if the load balancer does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/load-balancers/{name}/tags",
    tag = "Load Balancers",
    summary = "List load balancer tags",
    params(
        ("name" = String, Path, description = "Load balancer name"),
    ),
    responses(
        (status = 200, description = "Tags; empty when untagged", body = TagListResponse),
        (status = 404, description = "Load balancer not found", body = ErrorResponse),
    )
)]
pub async fn list_tags(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, GatewayError> {
    let tag_descriptions = state.gateway.list_tags(&name).await?;
    Ok(Json(TagListResponse {
        name,
        tag_descriptions,
    }))
}

/// `DELETE /load-balancers/{name}`: Delete a load balancer.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidArgument`] for a blank name and
/// propagates provider failures.
#[utoipa::path(
    delete,
    path = "/api/v1/load-balancers/{name}",
    tag = "Load Balancers",
    summary = "Delete a load balancer",
    params(
        ("name" = String, Path, description = "Load balancer name"),
    ),
    responses(
        (status = 204, description = "Load balancer deleted"),
        (status = 400, description = "Blank name", body = ErrorResponse),
        (status = 502, description = "Provider unavailable", body = ErrorResponse),
    )
)]
pub async fn delete_load_balancer(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, GatewayError> {
    state.gateway.delete_load_balancer(&name).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Load-balancer routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/load-balancers", get(list_load_balancers))
        .route("/load-balancers/{name}", delete(delete_load_balancer))
        .route("/load-balancers/{name}/attributes", get(describe_attributes))
        .route("/load-balancers/{name}/tags", get(list_tags))
}
