//! Validated AWS region name.
//!
//! [`Region`] is a newtype around the region string so that an empty or
//! malformed region is rejected once, at construction, instead of
//! producing a client that silently talks to the wrong endpoint.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// A region the gateway is pinned to (e.g. `us-east-1`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Region(String);

impl Region {
    /// Validates and wraps a region name.
    ///
    /// Surrounding whitespace is trimmed. Only ASCII lowercase letters,
    /// digits and `-` are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidArgument`] if the name is empty or
    /// contains other characters.
    pub fn new(name: impl AsRef<str>) -> Result<Self, GatewayError> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(GatewayError::InvalidArgument(
                "region must not be empty".to_string(),
            ));
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(GatewayError::InvalidArgument(format!(
                "malformed region name: {name:?}"
            )));
        }
        Ok(Self(name.to_string()))
    }

    /// Returns the region name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Host the load-balancing client is pinned to for this region.
    ///
    /// The host is templated from the region rather than resolved by the
    /// SDK: `autoscaling.<region>.amazonaws.com`.
    #[must_use]
    pub fn endpoint_host(&self) -> String {
        format!("autoscaling.{}.amazonaws.com", self.0)
    }

    /// Full HTTPS endpoint URL for [`Self::endpoint_host`].
    #[must_use]
    pub fn endpoint_url(&self) -> String {
        format!("https://{}", self.endpoint_host())
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Region {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_is_region_templated() {
        let Ok(region) = Region::new("eu-west-1") else {
            panic!("valid region");
        };
        assert_eq!(region.endpoint_host(), "autoscaling.eu-west-1.amazonaws.com");
        assert_eq!(
            region.endpoint_url(),
            "https://autoscaling.eu-west-1.amazonaws.com"
        );
    }

    #[test]
    fn trims_whitespace() {
        let Ok(region) = Region::new("  us-east-1 ") else {
            panic!("valid region");
        };
        assert_eq!(region.as_str(), "us-east-1");
        assert_eq!(region.to_string(), "us-east-1");
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(
            Region::new(""),
            Err(GatewayError::InvalidArgument(_))
        ));
        assert!(matches!(
            Region::new("   "),
            Err(GatewayError::InvalidArgument(_))
        ));
    }

    #[test]
    fn rejects_host_injection() {
        assert!(matches!(
            Region::new("us-east-1.evil.com/"),
            Err(GatewayError::InvalidArgument(_))
        ));
        assert!(matches!(
            Region::new("US-EAST-1"),
            Err(GatewayError::InvalidArgument(_))
        ));
    }
}
