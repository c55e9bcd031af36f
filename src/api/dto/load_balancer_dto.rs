//! Request/response DTOs for the load-balancer endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{LoadBalancerDescriptor, TagDescription};

/// Query parameters for `GET /load-balancers`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListLoadBalancersQuery {
    /// Comma-separated names. Omit to list every load balancer.
    pub names: Option<String>,
}

impl ListLoadBalancersQuery {
    /// Splits `names` into trimmed, non-empty entries.
    #[must_use]
    pub fn name_list(&self) -> Vec<String> {
        self.names
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Response body for `GET /load-balancers`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoadBalancerListResponse {
    /// Region that was queried.
    pub region: String,
    /// Number of load balancers returned.
    pub count: usize,
    /// Load balancers in provider order.
    pub load_balancers: Vec<LoadBalancerDescriptor>,
}

/// Response body for `GET /load-balancers/{name}/tags`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TagListResponse {
    /// Load balancer the tags were requested for.
    pub name: String,
    /// Tag descriptions; empty when the load balancer has no tags.
    pub tag_descriptions: Vec<TagDescription>,
}
