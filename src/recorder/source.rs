//! Configuration lookup capability.

use std::collections::HashMap;

use crate::error::GatewayError;

/// String-valued configuration lookup by exact key.
///
/// Absence is an error; implementations never substitute defaults.
pub trait ConfigSource: Send + Sync + std::fmt::Debug {
    /// Returns the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::MissingConfiguration`] naming the key when
    /// it is absent.
    fn get_str(&self, key: &str) -> Result<String, GatewayError>;
}

/// Reads keys from the process environment.
///
/// A dotted key such as `simianarmy.recorder.db.url` is looked up as
/// `SIMIANARMY_RECORDER_DB_URL`. Call `dotenvy::dotenv()` beforehand to pick
/// up a `.env` file; [`crate::config::AgentConfig::from_env`] does so.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvConfigSource;

impl EnvConfigSource {
    /// Environment variable name for a dotted key.
    #[must_use]
    pub fn env_var_name(key: &str) -> String {
        key.chars()
            .map(|c| match c {
                '.' | '-' => '_',
                c => c.to_ascii_uppercase(),
            })
            .collect()
    }
}

impl ConfigSource for EnvConfigSource {
    fn get_str(&self, key: &str) -> Result<String, GatewayError> {
        std::env::var(Self::env_var_name(key))
            .map_err(|_| GatewayError::MissingConfiguration(key.to_string()))
    }
}

/// In-memory key/value source.
#[derive(Debug, Clone, Default)]
pub struct MapConfigSource {
    values: HashMap<String, String>,
}

impl MapConfigSource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a key.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl<K, V> FromIterator<(K, V)> for MapConfigSource
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl ConfigSource for MapConfigSource {
    fn get_str(&self, key: &str) -> Result<String, GatewayError> {
        self.values
            .get(key)
            .cloned()
            .ok_or_else(|| GatewayError::MissingConfiguration(key.to_string()))
    }
}
