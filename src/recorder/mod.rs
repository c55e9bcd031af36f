//! Recorder connection pool: configuration lookup and pool construction.
//!
//! The audit recorder obtains its database handle once at startup:
//! [`ConnectionConfig::from_configuration`] reads four keys from a
//! [`ConfigSource`], and [`ConnectionConfig::create_pool`] turns them into
//! a small bounded `sqlx::AnyPool`. The pool connects lazily.

pub mod connection;
pub mod source;

pub use connection::{
    ConnectionConfig, DB_DRIVER_KEY, DB_PASS_KEY, DB_URL_KEY, DB_USER_KEY,
    DEFAULT_ACQUIRE_TIMEOUT, DEFAULT_MAX_CONNECTIONS, DatabaseDriver, ping,
};
pub use source::{ConfigSource, EnvConfigSource, MapConfigSource};
