//! User-assigned key/value metadata on a load balancer.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single tag. The provider allows an absent value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Tag {
    /// Tag key.
    pub key: String,
    /// Tag value, if any.
    pub value: Option<String>,
}

impl Tag {
    /// Creates a tag with a value.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
        }
    }
}

/// The tags attached to one named load balancer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TagDescription {
    /// Name of the load balancer the tags belong to.
    pub load_balancer_name: String,
    /// Zero or more tags, in provider order.
    pub tags: Vec<Tag>,
}

impl TagDescription {
    /// Looks up the value of `key`, if the tag is present and has a value.
    #[must_use]
    pub fn value_of(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|t| t.key == key)
            .and_then(|t| t.value.as_deref())
    }
}
