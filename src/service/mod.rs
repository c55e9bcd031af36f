//! Service layer: the resource gateway facade.
//!
//! [`ResourceGateway`] translates the agent's four operations into
//! provider requests through an injected [`crate::provider::LoadBalancerApi`].

pub mod resource_gateway;

pub use resource_gateway::ResourceGateway;
