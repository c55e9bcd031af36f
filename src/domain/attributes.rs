//! Provider-held configuration bag for a load balancer.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Attributes of one load balancer, associated 1:1 by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LoadBalancerAttributes {
    /// Whether requests are balanced across availability zones.
    pub cross_zone_load_balancing: Option<bool>,
    /// Connection draining settings.
    pub connection_draining: Option<ConnectionDraining>,
    /// Access log settings.
    pub access_log: Option<AccessLog>,
    /// Idle connection timeout in seconds.
    pub idle_timeout_secs: Option<i32>,
    /// Attributes the provider reports outside the well-known set.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional: Vec<AdditionalAttribute>,
}

/// Connection draining settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ConnectionDraining {
    /// Whether draining is enabled.
    pub enabled: bool,
    /// Maximum time in seconds to keep connections open while draining.
    pub timeout_secs: Option<i32>,
}

/// Access log settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AccessLog {
    /// Whether access logs are written.
    pub enabled: bool,
    /// Destination S3 bucket.
    pub s3_bucket_name: Option<String>,
    /// Key prefix inside the bucket.
    pub s3_bucket_prefix: Option<String>,
    /// Publishing interval in minutes.
    pub emit_interval_mins: Option<i32>,
}

/// Free-form key/value attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AdditionalAttribute {
    /// Attribute key.
    pub key: String,
    /// Attribute value.
    pub value: Option<String>,
}
