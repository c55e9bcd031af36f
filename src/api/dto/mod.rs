//! Data Transfer Objects for REST request/response serialization.
//!
//! Domain types serialize as-is; these wrappers add listing metadata and
//! query parsing.

pub mod load_balancer_dto;

pub use load_balancer_dto::*;
