//! # resilience-gateway
//!
//! Load-balancer inspection and lifecycle gateway plus the recorder's
//! database pool factory, for a cloud-resilience automation agent.
//!
//! The agent's decision engine (which resources to terminate, and when)
//! lives elsewhere; this crate exposes the two leaf components it calls:
//!
//! - [`service::ResourceGateway`] lists, describes, tag-queries and deletes
//!   classic Elastic Load Balancers in one region, through an injected
//!   [`provider::LoadBalancerApi`].
//! - [`recorder::ConnectionConfig`] reads four configuration keys and
//!   builds the recorder's small bounded connection pool.
//!
//! ## Architecture
//!
//! ```text
//! Operator HTTP (api/)          Agent (external)
//!     │                               │
//!     ├── ResourceGateway (service/) ─┤
//!     │       │                       │
//!     │   LoadBalancerApi (provider/) │
//!     │       ├── AwsElbClient        │
//!     │       └── InMemoryLoadBalancerApi
//!     │                               │
//!     └── Recorder pool (recorder/) ──┘
//!             └── sqlx AnyPool (max 2)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod provider;
pub mod recorder;
pub mod service;
