//! Agent configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). The recorder's database keys are read
//! separately through [`crate::recorder::ConfigSource`] because they have no
//! defaults.

use std::net::SocketAddr;
use std::time::Duration;

use aws_sdk_elasticloadbalancing::config::Credentials;

use crate::error::GatewayError;
use crate::provider::ClientSettings;
use crate::recorder::{ConnectionConfig, DEFAULT_MAX_CONNECTIONS};

/// Top-level configuration of the gateway binary.
///
/// Loaded once at startup via [`AgentConfig::from_env`].
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// Region the load-balancer gateway is pinned to.
    pub aws_region: String,

    /// Static access key; the default provider chain is used when unset.
    pub aws_access_key: Option<String>,

    /// Static secret key paired with `aws_access_key`.
    pub aws_secret_key: Option<String>,

    /// SDK connect timeout in seconds.
    pub elb_connect_timeout_secs: Option<u64>,

    /// SDK whole-operation timeout in seconds.
    pub elb_operation_timeout_secs: Option<u64>,

    /// Maximum attempts the SDK makes per operation.
    pub elb_max_attempts: Option<u32>,

    /// Whether to build the recorder pool at startup.
    pub recorder_enabled: bool,

    /// Recorder pool ceiling.
    pub recorder_max_connections: u32,

    /// Seconds to wait for a free recorder connection.
    pub recorder_acquire_timeout_secs: u64,

    /// Per-request timeout for the HTTP surface, in seconds.
    pub request_timeout_secs: u64,
}

impl AgentConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidArgument`] if `LISTEN_ADDR` is set
    /// but cannot be parsed as a [`SocketAddr`].
    pub fn from_env() -> Result<Self, GatewayError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidArgument`] if `LISTEN_ADDR` is set
    /// but cannot be parsed as a [`SocketAddr`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, GatewayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let listen_addr: SocketAddr = lookup("LISTEN_ADDR")
            .unwrap_or_else(|| "0.0.0.0:3000".to_string())
            .parse()
            .map_err(|e| GatewayError::InvalidArgument(format!("LISTEN_ADDR: {e}")))?;

        let aws_region = lookup("SIMIANARMY_CLIENT_AWS_REGION")
            .or_else(|| lookup("AWS_REGION"))
            .unwrap_or_else(|| "us-east-1".to_string());

        Ok(Self {
            listen_addr,
            aws_region,
            aws_access_key: non_empty(lookup("SIMIANARMY_CLIENT_AWS_ACCOUNTKEY")),
            aws_secret_key: non_empty(lookup("SIMIANARMY_CLIENT_AWS_SECRETKEY")),
            elb_connect_timeout_secs: parse_opt(&lookup, "ELB_CONNECT_TIMEOUT_SECS"),
            elb_operation_timeout_secs: parse_opt(&lookup, "ELB_OPERATION_TIMEOUT_SECS"),
            elb_max_attempts: parse_opt(&lookup, "ELB_MAX_ATTEMPTS"),
            recorder_enabled: parse_bool(&lookup, "RECORDER_ENABLED", true),
            recorder_max_connections: parse_or(
                &lookup,
                "RECORDER_MAX_CONNECTIONS",
                DEFAULT_MAX_CONNECTIONS,
            ),
            recorder_acquire_timeout_secs: parse_or(&lookup, "RECORDER_ACQUIRE_TIMEOUT_SECS", 30),
            request_timeout_secs: parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30),
        })
    }

    /// Static credentials, when both halves are configured.
    #[must_use]
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.aws_access_key, &self.aws_secret_key) {
            (Some(key), Some(secret)) => Some(Credentials::new(
                key.clone(),
                secret.clone(),
                None,
                None,
                "resilience-gateway-config",
            )),
            _ => None,
        }
    }

    /// SDK client settings, when any of them is configured.
    #[must_use]
    pub fn client_settings(&self) -> Option<ClientSettings> {
        let settings = ClientSettings {
            connect_timeout: self.elb_connect_timeout_secs.map(Duration::from_secs),
            operation_timeout: self.elb_operation_timeout_secs.map(Duration::from_secs),
            operation_attempt_timeout: None,
            max_attempts: self.elb_max_attempts,
        };
        (settings != ClientSettings::default()).then_some(settings)
    }

    /// Applies the configured pool sizing to recorder connection settings.
    #[must_use]
    pub fn apply_pool_limits(&self, config: ConnectionConfig) -> ConnectionConfig {
        config
            .with_max_connections(self.recorder_max_connections)
            .with_acquire_timeout(Duration::from_secs(self.recorder_acquire_timeout_secs))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parses a key as `T`, returning `None` on missing or invalid values.
fn parse_opt<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|v| v.trim().parse().ok())
}

/// Parses a key as `T`, returning `default` on missing or invalid values.
fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    parse_opt(lookup, key).unwrap_or(default)
}

/// Parses a key as a boolean. Accepts `"true"`, `"1"`, `"false"`, `"0"`
/// (case-insensitive). Returns `default` otherwise.
fn parse_bool<F>(lookup: &F, key: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|v| v.to_ascii_lowercase()).as_deref() {
        Some("true" | "1") => true,
        Some("false" | "0") => false,
        _ => default,
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let Ok(config) = AgentConfig::from_lookup(lookup_from(&[])) else {
            panic!("defaults must load");
        };
        assert_eq!(config.listen_addr.port(), 3000);
        assert_eq!(config.aws_region, "us-east-1");
        assert_eq!(config.recorder_max_connections, DEFAULT_MAX_CONNECTIONS);
        assert!(config.recorder_enabled);
        assert!(config.credentials().is_none());
        assert!(config.client_settings().is_none());
    }

    #[test]
    fn bad_listen_addr_is_rejected() {
        let result = AgentConfig::from_lookup(lookup_from(&[("LISTEN_ADDR", "not-an-addr")]));
        assert!(matches!(result, Err(GatewayError::InvalidArgument(_))));
    }

    #[test]
    fn credentials_need_both_halves() {
        let Ok(config) = AgentConfig::from_lookup(lookup_from(&[(
            "SIMIANARMY_CLIENT_AWS_ACCOUNTKEY",
            "AKIDEXAMPLE",
        )])) else {
            panic!("config");
        };
        assert!(config.credentials().is_none());

        let Ok(config) = AgentConfig::from_lookup(lookup_from(&[
            ("SIMIANARMY_CLIENT_AWS_ACCOUNTKEY", "AKIDEXAMPLE"),
            ("SIMIANARMY_CLIENT_AWS_SECRETKEY", "secret"),
        ])) else {
            panic!("config");
        };
        assert!(config.credentials().is_some());
    }

    #[test]
    fn client_settings_only_when_configured() {
        let Ok(config) = AgentConfig::from_lookup(lookup_from(&[
            ("ELB_CONNECT_TIMEOUT_SECS", "3"),
            ("ELB_MAX_ATTEMPTS", "1"),
            ("ELB_OPERATION_TIMEOUT_SECS", "garbage"),
        ])) else {
            panic!("config");
        };
        let Some(settings) = config.client_settings() else {
            panic!("settings expected");
        };
        assert_eq!(settings.connect_timeout, Some(Duration::from_secs(3)));
        assert_eq!(settings.max_attempts, Some(1));
        assert_eq!(settings.operation_timeout, None);
    }

    #[test]
    fn region_prefers_simianarmy_key() {
        let Ok(config) = AgentConfig::from_lookup(lookup_from(&[
            ("AWS_REGION", "eu-west-1"),
            ("SIMIANARMY_CLIENT_AWS_REGION", "ap-south-1"),
        ])) else {
            panic!("config");
        };
        assert_eq!(config.aws_region, "ap-south-1");
    }

    #[test]
    fn parse_bool_accepts_variants() {
        let lookup = lookup_from(&[("A", "TRUE"), ("B", "0"), ("C", "maybe")]);
        assert!(parse_bool(&lookup, "A", false));
        assert!(!parse_bool(&lookup, "B", true));
        assert!(parse_bool(&lookup, "C", true));
    }

    #[test]
    fn pool_limits_are_applied() {
        let Ok(config) = AgentConfig::from_lookup(lookup_from(&[
            ("RECORDER_MAX_CONNECTIONS", "4"),
            ("RECORDER_ACQUIRE_TIMEOUT_SECS", "7"),
        ])) else {
            panic!("config");
        };
        let conn = config.apply_pool_limits(ConnectionConfig::new("sqlite", "", "", "sqlite::memory:"));
        assert_eq!(conn.max_connections(), 4);
        assert_eq!(conn.acquire_timeout(), Duration::from_secs(7));
    }
}
