//! AWS classic Elastic Load Balancing implementation of [`LoadBalancerApi`].
//!
//! The client is built with [`ElbClientBuilder`], which applies static
//! credentials and client settings only when they are supplied and pins the
//! endpoint to the region-templated host from [`Region::endpoint_url`].

use std::time::Duration;

use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_elasticloadbalancing::config::Credentials;
use aws_sdk_elasticloadbalancing::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_elasticloadbalancing::primitives::DateTime as SdkDateTime;
use aws_sdk_elasticloadbalancing::types as elb;
use aws_sdk_elasticloadbalancing::Client;
use chrono::{DateTime, Utc};

use super::{LoadBalancerApi, LoadBalancerPage};
use crate::domain::{
    AccessLog, AdditionalAttribute, ConnectionDraining, ListenerConfig, LoadBalancerAttributes,
    LoadBalancerDescriptor, Region, Tag, TagDescription,
};
use crate::error::GatewayError;

/// Service error codes the provider uses for a missing load balancer.
const NOT_FOUND_CODES: [&str; 2] = ["LoadBalancerNotFound", "LoadBalancerAttributeNotFound"];

/// Optional SDK client tuning. Every field left as `None` keeps the SDK
/// default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientSettings {
    /// TCP connect timeout.
    pub connect_timeout: Option<Duration>,
    /// Timeout for one whole operation, including SDK-level attempts.
    pub operation_timeout: Option<Duration>,
    /// Timeout for a single attempt.
    pub operation_attempt_timeout: Option<Duration>,
    /// Maximum attempts the SDK itself makes per operation.
    pub max_attempts: Option<u32>,
}

impl ClientSettings {
    fn timeout_config(&self) -> TimeoutConfig {
        let mut builder = TimeoutConfig::builder();
        if let Some(timeout) = self.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = self.operation_timeout {
            builder = builder.operation_timeout(timeout);
        }
        if let Some(timeout) = self.operation_attempt_timeout {
            builder = builder.operation_attempt_timeout(timeout);
        }
        builder.build()
    }
}

/// Builder for [`AwsElbClient`].
///
/// Credentials and settings are independent: each is applied only if set,
/// otherwise the default provider chain and SDK defaults are used.
#[derive(Debug, Clone)]
pub struct ElbClientBuilder {
    region: Region,
    credentials: Option<Credentials>,
    settings: Option<ClientSettings>,
}

impl ElbClientBuilder {
    /// Starts a builder for the given region.
    #[must_use]
    pub fn new(region: Region) -> Self {
        Self {
            region,
            credentials: None,
            settings: None,
        }
    }

    /// Uses static credentials instead of the default provider chain.
    #[must_use]
    pub fn credentials(mut self, credentials: Option<Credentials>) -> Self {
        self.credentials = credentials;
        self
    }

    /// Applies client tuning.
    #[must_use]
    pub fn settings(mut self, settings: Option<ClientSettings>) -> Self {
        self.settings = settings;
        self
    }

    /// Loads the shared SDK configuration: region and pinned endpoint
    /// always, credentials and settings only when supplied.
    pub async fn sdk_config(&self) -> SdkConfig {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_config::Region::new(self.region.as_str().to_owned()))
            .endpoint_url(self.region.endpoint_url());

        if let Some(credentials) = &self.credentials {
            loader = loader.credentials_provider(credentials.clone());
        }
        if let Some(settings) = &self.settings {
            loader = loader.timeout_config(settings.timeout_config());
            if let Some(attempts) = settings.max_attempts {
                loader = loader.retry_config(RetryConfig::standard().with_max_attempts(attempts));
            }
        }

        loader.load().await
    }

    /// Loads the SDK configuration and builds the client.
    pub async fn build(self) -> AwsElbClient {
        let sdk_config = self.sdk_config().await;
        tracing::debug!(
            region = %self.region,
            endpoint = %self.region.endpoint_url(),
            "elb client configured"
        );

        AwsElbClient {
            client: Client::new(&sdk_config),
            region: self.region,
        }
    }
}

/// [`LoadBalancerApi`] over the AWS SDK for classic ELB.
#[derive(Debug, Clone)]
pub struct AwsElbClient {
    client: Client,
    region: Region,
}

impl AwsElbClient {
    /// Wraps an already configured SDK client.
    #[must_use]
    pub fn from_client(client: Client, region: Region) -> Self {
        Self { client, region }
    }

    /// Region this client is pinned to.
    #[must_use]
    pub fn region(&self) -> &Region {
        &self.region
    }
}

#[async_trait]
impl LoadBalancerApi for AwsElbClient {
    async fn describe_load_balancers(
        &self,
        names: &[String],
        marker: Option<String>,
    ) -> Result<LoadBalancerPage, GatewayError> {
        let output = self
            .client
            .describe_load_balancers()
            .set_load_balancer_names((!names.is_empty()).then(|| names.to_vec()))
            .set_marker(marker)
            .send()
            .await
            .map_err(|e| classify(e, &names.join(",")))?;

        Ok(LoadBalancerPage {
            load_balancers: output
                .load_balancer_descriptions()
                .iter()
                .map(descriptor_from_sdk)
                .collect(),
            next_marker: output.next_marker().map(str::to_owned),
        })
    }

    async fn describe_attributes(
        &self,
        name: &str,
    ) -> Result<LoadBalancerAttributes, GatewayError> {
        let output = self
            .client
            .describe_load_balancer_attributes()
            .load_balancer_name(name)
            .send()
            .await
            .map_err(|e| classify(e, name))?;

        Ok(output
            .load_balancer_attributes()
            .map(attributes_from_sdk)
            .unwrap_or_default())
    }

    async fn describe_tags(&self, name: &str) -> Result<Vec<TagDescription>, GatewayError> {
        let output = self
            .client
            .describe_tags()
            .load_balancer_names(name)
            .send()
            .await
            .map_err(|e| classify(e, name))?;

        Ok(output
            .tag_descriptions()
            .iter()
            .map(|d| TagDescription {
                load_balancer_name: d.load_balancer_name().unwrap_or(name).to_owned(),
                tags: d
                    .tags()
                    .iter()
                    .map(|t| Tag {
                        key: t.key().to_owned(),
                        value: t.value().map(str::to_owned),
                    })
                    .collect(),
            })
            .collect())
    }

    async fn delete_load_balancer(&self, name: &str) -> Result<(), GatewayError> {
        self.client
            .delete_load_balancer()
            .load_balancer_name(name)
            .send()
            .await
            .map_err(|e| classify(e, name))?;
        Ok(())
    }
}

/// Maps an SDK failure onto the gateway taxonomy by service error code.
fn classify<E, R>(err: SdkError<E, R>, name: &str) -> GatewayError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let code = err.as_service_error().and_then(ProvideErrorMetadata::code);
    match code {
        Some(code) if NOT_FOUND_CODES.contains(&code) => GatewayError::NotFound(name.to_owned()),
        _ => GatewayError::ProviderUnavailable(DisplayErrorContext(&err).to_string()),
    }
}

fn descriptor_from_sdk(d: &elb::LoadBalancerDescription) -> LoadBalancerDescriptor {
    LoadBalancerDescriptor {
        name: d.load_balancer_name().unwrap_or_default().to_owned(),
        dns_name: d.dns_name().map(str::to_owned),
        canonical_hosted_zone_name: d.canonical_hosted_zone_name().map(str::to_owned),
        scheme: d.scheme().map(str::to_owned),
        vpc_id: d.vpc_id().map(str::to_owned),
        listeners: d
            .listener_descriptions()
            .iter()
            .filter_map(|ld| {
                ld.listener().map(|l| ListenerConfig {
                    protocol: l.protocol().to_owned(),
                    load_balancer_port: l.load_balancer_port(),
                    instance_protocol: l.instance_protocol().map(str::to_owned),
                    instance_port: l.instance_port(),
                    ssl_certificate_id: l.ssl_certificate_id().map(str::to_owned),
                    policy_names: ld.policy_names().to_vec(),
                })
            })
            .collect(),
        availability_zones: d.availability_zones().to_vec(),
        subnets: d.subnets().to_vec(),
        security_groups: d.security_groups().to_vec(),
        instance_ids: d
            .instances()
            .iter()
            .filter_map(|i| i.instance_id().map(str::to_owned))
            .collect(),
        created_at: d.created_time().and_then(to_chrono),
    }
}

fn attributes_from_sdk(a: &elb::LoadBalancerAttributes) -> LoadBalancerAttributes {
    LoadBalancerAttributes {
        cross_zone_load_balancing: a.cross_zone_load_balancing().map(|c| c.enabled()),
        connection_draining: a.connection_draining().map(|c| ConnectionDraining {
            enabled: c.enabled(),
            timeout_secs: c.timeout(),
        }),
        access_log: a.access_log().map(|l| AccessLog {
            enabled: l.enabled(),
            s3_bucket_name: l.s3_bucket_name().map(str::to_owned),
            s3_bucket_prefix: l.s3_bucket_prefix().map(str::to_owned),
            emit_interval_mins: l.emit_interval(),
        }),
        idle_timeout_secs: a.connection_settings().map(|c| c.idle_timeout()),
        additional: a
            .additional_attributes()
            .iter()
            .filter_map(|attr| {
                attr.key().map(|key| AdditionalAttribute {
                    key: key.to_owned(),
                    value: attr.value().map(str::to_owned),
                })
            })
            .collect(),
    }
}

fn to_chrono(t: &SdkDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(t.secs(), t.subsec_nanos())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use aws_credential_types::provider::ProvideCredentials;

    use super::*;

    #[test]
    fn maps_description_fields() {
        let Ok(listener) = elb::Listener::builder()
            .protocol("HTTP")
            .load_balancer_port(80)
            .instance_protocol("HTTP")
            .instance_port(8080)
            .build()
        else {
            panic!("valid listener");
        };
        let description = elb::LoadBalancerDescription::builder()
            .load_balancer_name("web-elb")
            .dns_name("web-elb-123.us-east-1.elb.amazonaws.com")
            .availability_zones("us-east-1a")
            .availability_zones("us-east-1b")
            .listener_descriptions(
                elb::ListenerDescription::builder()
                    .listener(listener)
                    .policy_names("ELBSecurityPolicy-2016-08")
                    .build(),
            )
            .instances(elb::Instance::builder().instance_id("i-0abc").build())
            .created_time(SdkDateTime::from_secs(1_700_000_000))
            .build();

        let descriptor = descriptor_from_sdk(&description);
        assert_eq!(descriptor.name, "web-elb");
        assert_eq!(descriptor.availability_zones, vec!["us-east-1a", "us-east-1b"]);
        assert_eq!(descriptor.instance_ids, vec!["i-0abc"]);
        assert_eq!(descriptor.listeners.len(), 1);
        let Some(l) = descriptor.listeners.first() else {
            panic!("listener mapped");
        };
        assert_eq!(l.protocol, "HTTP");
        assert_eq!(l.load_balancer_port, 80);
        assert_eq!(l.instance_port, 8080);
        assert_eq!(l.policy_names, vec!["ELBSecurityPolicy-2016-08"]);
        assert_eq!(
            descriptor.created_at.map(|t| t.timestamp()),
            Some(1_700_000_000)
        );
    }

    #[test]
    fn maps_attribute_bag() {
        let draining = elb::ConnectionDraining::builder()
            .enabled(true)
            .timeout(300)
            .build();
        let cross_zone = elb::CrossZoneLoadBalancing::builder().enabled(false).build();
        let attrs = elb::LoadBalancerAttributes::builder()
            .connection_draining(draining)
            .cross_zone_load_balancing(cross_zone)
            .additional_attributes(
                elb::AdditionalAttribute::builder()
                    .key("elb.http.desyncmitigationmode")
                    .value("defensive")
                    .build(),
            )
            .build();

        let mapped = attributes_from_sdk(&attrs);
        assert_eq!(mapped.cross_zone_load_balancing, Some(false));
        assert_eq!(
            mapped.connection_draining,
            Some(ConnectionDraining {
                enabled: true,
                timeout_secs: Some(300),
            })
        );
        assert!(mapped.access_log.is_none());
        assert_eq!(mapped.additional.len(), 1);
    }

    const PINNED_ENDPOINT: &str = "https://autoscaling.ap-southeast-2.amazonaws.com";

    fn builder() -> ElbClientBuilder {
        let Ok(region) = Region::new("ap-southeast-2") else {
            panic!("valid region");
        };
        ElbClientBuilder::new(region)
    }

    fn static_credentials() -> Credentials {
        Credentials::new("AKIDPINNED", "pinned-secret", None, None, "test")
    }

    fn tuned_settings() -> ClientSettings {
        ClientSettings {
            connect_timeout: Some(Duration::from_millis(1_234)),
            max_attempts: Some(1),
            ..ClientSettings::default()
        }
    }

    fn assert_pinned(config: &SdkConfig) {
        assert_eq!(config.endpoint_url(), Some(PINNED_ENDPOINT));
        assert_eq!(config.region().map(|r| r.as_ref()), Some("ap-southeast-2"));
    }

    async fn access_key_of(config: &SdkConfig) -> Option<String> {
        let provider = config.credentials_provider()?;
        provider
            .provide_credentials()
            .await
            .ok()
            .map(|c| c.access_key_id().to_owned())
    }

    fn assert_default_settings(config: &SdkConfig) {
        assert_ne!(
            config.timeout_config().and_then(|t| t.connect_timeout()),
            Some(Duration::from_millis(1_234))
        );
        assert_ne!(config.retry_config().map(|r| r.max_attempts()), Some(1));
    }

    fn assert_tuned_settings(config: &SdkConfig) {
        assert_eq!(
            config.timeout_config().and_then(|t| t.connect_timeout()),
            Some(Duration::from_millis(1_234))
        );
        assert_eq!(config.retry_config().map(|r| r.max_attempts()), Some(1));
    }

    #[tokio::test]
    async fn default_client_is_pinned_to_region() {
        let config = builder().sdk_config().await;
        assert_pinned(&config);
        assert_default_settings(&config);
    }

    #[tokio::test]
    async fn credentials_only_client() {
        let config = builder()
            .credentials(Some(static_credentials()))
            .sdk_config()
            .await;
        assert_pinned(&config);
        assert_eq!(access_key_of(&config).await.as_deref(), Some("AKIDPINNED"));
        assert_default_settings(&config);
    }

    #[tokio::test]
    async fn settings_only_client() {
        let config = builder().settings(Some(tuned_settings())).sdk_config().await;
        assert_pinned(&config);
        assert_tuned_settings(&config);
    }

    #[tokio::test]
    async fn credentials_and_settings_client() {
        let config = builder()
            .credentials(Some(static_credentials()))
            .settings(Some(tuned_settings()))
            .sdk_config()
            .await;
        assert_pinned(&config);
        assert_tuned_settings(&config);
        assert_eq!(access_key_of(&config).await.as_deref(), Some("AKIDPINNED"));
    }

    #[tokio::test]
    async fn built_client_keeps_region() {
        let client = builder().build().await;
        assert_eq!(client.region().as_str(), "ap-southeast-2");
    }

    #[test]
    fn settings_build_timeout_config() {
        let settings = ClientSettings {
            connect_timeout: Some(Duration::from_secs(2)),
            operation_timeout: Some(Duration::from_secs(30)),
            ..ClientSettings::default()
        };
        let config = settings.timeout_config();
        assert_eq!(config.connect_timeout(), Some(Duration::from_secs(2)));
        assert_eq!(config.operation_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.operation_attempt_timeout(), None);
    }
}
