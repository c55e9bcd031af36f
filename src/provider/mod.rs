//! Provider seam: the cloud load-balancing API as an injected capability.
//!
//! [`LoadBalancerApi`] is the only place the gateway talks to the outside
//! world. [`AwsElbClient`] implements it over the AWS SDK;
//! [`InMemoryLoadBalancerApi`] implements it without network access and
//! counts calls so tests can assert on round trips.

pub mod aws;
pub mod memory;

use async_trait::async_trait;

use crate::domain::{LoadBalancerAttributes, LoadBalancerDescriptor, TagDescription};
use crate::error::GatewayError;

pub use aws::{AwsElbClient, ClientSettings, ElbClientBuilder};
pub use memory::{CallCounts, InMemoryLoadBalancerApi};

/// One page of a load-balancer listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadBalancerPage {
    /// Descriptors on this page, in provider order.
    pub load_balancers: Vec<LoadBalancerDescriptor>,
    /// Continuation token; `None` on the last page.
    pub next_marker: Option<String>,
}

/// Operations the gateway needs from a load-balancing provider.
///
/// Each method maps 1:1 to one provider request. Implementations must not
/// retry and must report a missing load balancer as
/// [`GatewayError::NotFound`].
#[async_trait]
pub trait LoadBalancerApi: Send + Sync + std::fmt::Debug {
    /// Fetches one page of load balancers. An empty `names` slice means
    /// every load balancer in the region.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotFound`] when a named load balancer does
    /// not exist, [`GatewayError::ProviderUnavailable`] otherwise.
    async fn describe_load_balancers(
        &self,
        names: &[String],
        marker: Option<String>,
    ) -> Result<LoadBalancerPage, GatewayError>;

    /// Fetches the attributes of one load balancer.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotFound`] when the load balancer does not
    /// exist, [`GatewayError::ProviderUnavailable`] otherwise.
    async fn describe_attributes(&self, name: &str)
    -> Result<LoadBalancerAttributes, GatewayError>;

    /// Fetches the tags of one load balancer.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotFound`] when the load balancer does not
    /// exist, [`GatewayError::ProviderUnavailable`] otherwise.
    async fn describe_tags(&self, name: &str) -> Result<Vec<TagDescription>, GatewayError>;

    /// Deletes one load balancer.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ProviderUnavailable`] on provider failure.
    async fn delete_load_balancer(&self, name: &str) -> Result<(), GatewayError>;
}
