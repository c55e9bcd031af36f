//! In-memory load-balancing provider.
//!
//! Holds an ordered inventory behind a [`tokio::sync::RwLock`] and counts
//! every request it serves. Used by the test suite and by embedders that
//! want to dry-run the agent against a fixed inventory.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{LoadBalancerApi, LoadBalancerPage};
use crate::domain::{LoadBalancerAttributes, LoadBalancerDescriptor, Tag, TagDescription};
use crate::error::GatewayError;

#[derive(Debug, Clone)]
struct Entry {
    descriptor: LoadBalancerDescriptor,
    attributes: LoadBalancerAttributes,
    tags: Vec<Tag>,
}

/// Number of requests served, per operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    /// `describe_load_balancers` requests (one per page).
    pub list: usize,
    /// `describe_attributes` requests.
    pub attributes: usize,
    /// `describe_tags` requests.
    pub tags: usize,
    /// `delete_load_balancer` requests.
    pub delete: usize,
}

impl CallCounts {
    /// Sum over all operations.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.list + self.attributes + self.tags + self.delete
    }
}

/// Provider backed by an in-process inventory.
#[derive(Debug, Default)]
pub struct InMemoryLoadBalancerApi {
    entries: RwLock<Vec<Entry>>,
    page_size: Option<usize>,
    unavailable: AtomicBool,
    list_calls: AtomicUsize,
    attribute_calls: AtomicUsize,
    tag_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

impl InMemoryLoadBalancerApi {
    /// Creates an empty provider that returns every listing in one page.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Splits listings into pages of at most `size` descriptors.
    #[must_use]
    pub fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = Some(size.max(1));
        self
    }

    /// Adds a load balancer with default attributes and no tags.
    pub async fn insert(&self, descriptor: LoadBalancerDescriptor) {
        self.insert_with(descriptor, LoadBalancerAttributes::default(), Vec::new())
            .await;
    }

    /// Adds a load balancer with the given attributes and tags, replacing
    /// any existing entry with the same name in place.
    pub async fn insert_with(
        &self,
        descriptor: LoadBalancerDescriptor,
        attributes: LoadBalancerAttributes,
        tags: Vec<Tag>,
    ) {
        let entry = Entry {
            descriptor,
            attributes,
            tags,
        };
        let mut entries = self.entries.write().await;
        match entries
            .iter_mut()
            .find(|e| e.descriptor.name == entry.descriptor.name)
        {
            Some(existing) => *existing = entry,
            None => entries.push(entry),
        }
    }

    /// Makes every subsequent request fail with
    /// [`GatewayError::ProviderUnavailable`] until reset.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Returns the number of requests served so far.
    #[must_use]
    pub fn calls(&self) -> CallCounts {
        CallCounts {
            list: self.list_calls.load(Ordering::SeqCst),
            attributes: self.attribute_calls.load(Ordering::SeqCst),
            tags: self.tag_calls.load(Ordering::SeqCst),
            delete: self.delete_calls.load(Ordering::SeqCst),
        }
    }

    fn check_available(&self) -> Result<(), GatewayError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(GatewayError::ProviderUnavailable(
                "in-memory provider marked unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl LoadBalancerApi for InMemoryLoadBalancerApi {
    async fn describe_load_balancers(
        &self,
        names: &[String],
        marker: Option<String>,
    ) -> Result<LoadBalancerPage, GatewayError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let entries = self.entries.read().await;
        if let Some(missing) = names
            .iter()
            .find(|n| !entries.iter().any(|e| &e.descriptor.name == *n))
        {
            return Err(GatewayError::NotFound(missing.clone()));
        }

        let matching: Vec<LoadBalancerDescriptor> = entries
            .iter()
            .filter(|e| names.is_empty() || names.contains(&e.descriptor.name))
            .map(|e| e.descriptor.clone())
            .collect();

        let start = match marker {
            Some(m) => m.parse::<usize>().map_err(|_| {
                GatewayError::ProviderUnavailable(format!("invalid marker: {m}"))
            })?,
            None => 0,
        };
        let size = self.page_size.unwrap_or(matching.len().max(1));
        let end = start.saturating_add(size).min(matching.len());
        let load_balancers = matching.get(start..end).map(<[_]>::to_vec).unwrap_or_default();
        let next_marker = (end < matching.len()).then(|| end.to_string());

        Ok(LoadBalancerPage {
            load_balancers,
            next_marker,
        })
    }

    async fn describe_attributes(
        &self,
        name: &str,
    ) -> Result<LoadBalancerAttributes, GatewayError> {
        self.attribute_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let entries = self.entries.read().await;
        entries
            .iter()
            .find(|e| e.descriptor.name == name)
            .map(|e| e.attributes.clone())
            .ok_or_else(|| GatewayError::NotFound(name.to_string()))
    }

    async fn describe_tags(&self, name: &str) -> Result<Vec<TagDescription>, GatewayError> {
        self.tag_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let entries = self.entries.read().await;
        let entry = entries
            .iter()
            .find(|e| e.descriptor.name == name)
            .ok_or_else(|| GatewayError::NotFound(name.to_string()))?;
        if entry.tags.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![TagDescription {
            load_balancer_name: entry.descriptor.name.clone(),
            tags: entry.tags.clone(),
        }])
    }

    async fn delete_load_balancer(&self, name: &str) -> Result<(), GatewayError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        // Deleting an unknown name succeeds, as the provider does.
        self.entries
            .write()
            .await
            .retain(|e| e.descriptor.name != name);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn pages_follow_markers() {
        let api = InMemoryLoadBalancerApi::new().with_page_size(2);
        for name in ["a", "b", "c"] {
            api.insert(LoadBalancerDescriptor::named(name)).await;
        }

        let Ok(first) = api.describe_load_balancers(&[], None).await else {
            panic!("first page");
        };
        assert_eq!(first.load_balancers.len(), 2);
        assert_eq!(first.next_marker.as_deref(), Some("2"));

        let Ok(second) = api.describe_load_balancers(&[], first.next_marker).await else {
            panic!("second page");
        };
        assert_eq!(second.load_balancers.len(), 1);
        assert!(second.next_marker.is_none());
        assert_eq!(api.calls().list, 2);
    }

    #[tokio::test]
    async fn insert_replaces_by_name() {
        let api = InMemoryLoadBalancerApi::new();
        api.insert(LoadBalancerDescriptor::named("a")).await;
        let mut updated = LoadBalancerDescriptor::named("a");
        updated.dns_name = Some("a.example.com".to_string());
        api.insert(updated.clone()).await;

        let Ok(page) = api.describe_load_balancers(&[], None).await else {
            panic!("list");
        };
        assert_eq!(page.load_balancers, vec![updated]);
    }

    #[tokio::test]
    async fn unknown_name_in_listing_is_not_found() {
        let api = InMemoryLoadBalancerApi::new();
        api.insert(LoadBalancerDescriptor::named("a")).await;
        let result = api
            .describe_load_balancers(&["ghost".to_string()], None)
            .await;
        assert!(matches!(result, Err(GatewayError::NotFound(n)) if n == "ghost"));
    }

    #[tokio::test]
    async fn unavailable_fails_every_call() {
        let api = InMemoryLoadBalancerApi::new();
        api.set_unavailable(true);
        assert!(matches!(
            api.describe_tags("a").await,
            Err(GatewayError::ProviderUnavailable(_))
        ));
        assert!(matches!(
            api.delete_load_balancer("a").await,
            Err(GatewayError::ProviderUnavailable(_))
        ));
        assert_eq!(api.calls().total(), 2);
    }
}
