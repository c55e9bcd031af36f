//! Load balancer description as reported by the provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Read-only description of one load balancer.
///
/// Identity is the `name`, unique within an account and region. Values are
/// a snapshot of one provider response and must not be held across calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LoadBalancerDescriptor {
    /// Region-unique name.
    pub name: String,
    /// Public DNS name.
    pub dns_name: Option<String>,
    /// Route 53 hosted zone name.
    pub canonical_hosted_zone_name: Option<String>,
    /// `internet-facing` or `internal`.
    pub scheme: Option<String>,
    /// VPC the load balancer lives in.
    pub vpc_id: Option<String>,
    /// Configured listeners.
    pub listeners: Vec<ListenerConfig>,
    /// Availability zones the load balancer is placed in.
    pub availability_zones: Vec<String>,
    /// Subnets, for VPC load balancers.
    pub subnets: Vec<String>,
    /// Security groups, for VPC load balancers.
    pub security_groups: Vec<String>,
    /// IDs of registered back-end instances.
    pub instance_ids: Vec<String>,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
}

impl LoadBalancerDescriptor {
    /// Creates a descriptor carrying only a name. Remaining fields are
    /// empty and can be filled in by the caller.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dns_name: None,
            canonical_hosted_zone_name: None,
            scheme: None,
            vpc_id: None,
            listeners: Vec::new(),
            availability_zones: Vec::new(),
            subnets: Vec::new(),
            security_groups: Vec::new(),
            instance_ids: Vec::new(),
            created_at: None,
        }
    }
}

/// One listener: front-end port/protocol mapped to a back-end port/protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ListenerConfig {
    /// Front-end protocol (`HTTP`, `HTTPS`, `TCP`, `SSL`).
    pub protocol: String,
    /// Front-end port.
    pub load_balancer_port: i32,
    /// Back-end protocol.
    pub instance_protocol: Option<String>,
    /// Back-end port.
    pub instance_port: i32,
    /// Server certificate ARN for secure listeners.
    pub ssl_certificate_id: Option<String>,
    /// Policies enabled on the listener.
    pub policy_names: Vec<String>,
}
