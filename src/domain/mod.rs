//! Domain layer: load-balancer resource model.
//!
//! These types are provider-agnostic views of what the cloud load-balancing
//! API reports. They are produced fresh by every gateway call and never
//! cached; resources are always addressed by their region-unique name.

pub mod attributes;
pub mod load_balancer;
pub mod region;
pub mod tag;

pub use attributes::{AccessLog, AdditionalAttribute, ConnectionDraining, LoadBalancerAttributes};
pub use load_balancer::{ListenerConfig, LoadBalancerDescriptor};
pub use region::Region;
pub use tag::{Tag, TagDescription};
