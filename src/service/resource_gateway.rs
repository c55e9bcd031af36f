//! Resource gateway: read/delete facade over one region's load balancers.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{Instrument, Span};

use crate::domain::{LoadBalancerAttributes, LoadBalancerDescriptor, Region, TagDescription};
use crate::error::GatewayError;
use crate::provider::{AwsElbClient, ClientSettings, ElbClientBuilder, LoadBalancerApi};

/// Facade over one region's load-balancer inventory.
///
/// Stateless apart from the provider handle and a tracing span: nothing
/// returned by the provider is retained between calls, and every operation
/// addresses its resource by name. Failures are returned unchanged; the
/// gateway never retries.
#[derive(Debug, Clone)]
pub struct ResourceGateway {
    api: Arc<dyn LoadBalancerApi>,
    region: Region,
    span: Span,
}

impl ResourceGateway {
    /// Creates a gateway over an existing provider.
    ///
    /// Operations run inside a `resource_gateway` span carrying the region.
    #[must_use]
    pub fn new(api: Arc<dyn LoadBalancerApi>, region: Region) -> Self {
        let span = tracing::info_span!("resource_gateway", region = %region);
        Self { api, region, span }
    }

    /// Replaces the span operations are recorded under.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Builds a gateway backed by the AWS SDK.
    ///
    /// `credentials` and `settings` are each optional and applied only when
    /// present. The client endpoint is pinned to
    /// [`Region::endpoint_url`].
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidArgument`] if `region` is empty or
    /// malformed.
    pub async fn create(
        credentials: Option<aws_sdk_elasticloadbalancing::config::Credentials>,
        settings: Option<ClientSettings>,
        region: &str,
    ) -> Result<Self, GatewayError> {
        let region = Region::new(region)?;
        let client: AwsElbClient = ElbClientBuilder::new(region.clone())
            .credentials(credentials)
            .settings(settings)
            .build()
            .await;
        Ok(Self::new(Arc::new(client), region))
    }

    /// Region this gateway operates on.
    #[must_use]
    pub fn region(&self) -> &Region {
        &self.region
    }

    /// Lists load balancers. An empty `names` slice lists every load
    /// balancer in the region; otherwise only the named ones.
    ///
    /// Follows continuation markers until the provider reports the last
    /// page and preserves provider order. An empty inventory is `Ok`.
    ///
    /// # Errors
    ///
    /// Propagates [`GatewayError::NotFound`] and
    /// [`GatewayError::ProviderUnavailable`] from the provider. A marker the
    /// provider already returned once is reported as
    /// [`GatewayError::ProviderUnavailable`].
    pub async fn list_load_balancers(
        &self,
        names: &[String],
    ) -> Result<Vec<LoadBalancerDescriptor>, GatewayError> {
        async {
            if names.is_empty() {
                tracing::info!("getting all load balancers");
            } else {
                tracing::info!(count = names.len(), "getting load balancers by name");
            }

            let mut load_balancers = Vec::new();
            let mut seen = HashSet::new();
            let mut marker = None;
            loop {
                let page = self.api.describe_load_balancers(names, marker).await?;
                load_balancers.extend(page.load_balancers);
                match page.next_marker {
                    Some(next) if !seen.insert(next.clone()) => {
                        tracing::warn!(marker = %next, "pagination marker repeated");
                        return Err(GatewayError::ProviderUnavailable(format!(
                            "provider repeated pagination marker {next:?}"
                        )));
                    }
                    Some(next) => marker = Some(next),
                    None => break,
                }
            }

            tracing::info!(count = load_balancers.len(), "got load balancers");
            Ok::<_, GatewayError>(load_balancers)
        }
        .instrument(self.span.clone())
        .await
    }

    /// Fetches the attribute bag of one load balancer.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotFound`] if the provider has no such load
    /// balancer, [`GatewayError::ProviderUnavailable`] on provider failure.
    pub async fn describe_attributes(
        &self,
        name: &str,
    ) -> Result<LoadBalancerAttributes, GatewayError> {
        async {
            tracing::info!(name, "getting load balancer attributes");
            let attributes = self.api.describe_attributes(name).await?;
            tracing::info!(name, "got load balancer attributes");
            Ok::<_, GatewayError>(attributes)
        }
        .instrument(self.span.clone())
        .await
    }

    /// Fetches the tags of one load balancer.
    ///
    /// The provider's descriptions are returned as-is, including ones with
    /// an empty tag list. An untagged load balancer is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotFound`] if the provider has no such load
    /// balancer, [`GatewayError::ProviderUnavailable`] on provider failure.
    pub async fn list_tags(&self, name: &str) -> Result<Vec<TagDescription>, GatewayError> {
        async {
            tracing::info!(name, "getting load balancer tags");
            let descriptions = self.api.describe_tags(name).await?;
            tracing::info!(
                name,
                count = descriptions.iter().map(|d| d.tags.len()).sum::<usize>(),
                "got load balancer tags"
            );
            Ok::<_, GatewayError>(descriptions)
        }
        .instrument(self.span.clone())
        .await
    }

    /// Deletes one load balancer.
    ///
    /// The id is validated locally first; an empty or blank id never
    /// reaches the provider.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidArgument`] for an empty id and
    /// propagates provider failures otherwise.
    pub async fn delete_load_balancer(&self, id: &str) -> Result<(), GatewayError> {
        if id.trim().is_empty() {
            return Err(GatewayError::InvalidArgument(
                "load balancer id must not be empty".to_string(),
            ));
        }

        async {
            tracing::info!(id, "deleting load balancer");
            self.api.delete_load_balancer(id).await?;
            tracing::info!(id, "deleted load balancer");
            Ok::<_, GatewayError>(())
        }
        .instrument(self.span.clone())
        .await
    }
}
