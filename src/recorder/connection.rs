//! Recorder database connection settings and pool factory.

use std::fmt;
use std::time::Duration;

use sqlx::any::{AnyConnectOptions, AnyPoolOptions};
use sqlx::{AnyPool, ConnectOptions};
use url::Url;

use super::ConfigSource;
use crate::error::GatewayError;

/// Key holding the driver identifier.
pub const DB_DRIVER_KEY: &str = "simianarmy.recorder.db.driver";
/// Key holding the database user.
pub const DB_USER_KEY: &str = "simianarmy.recorder.db.user";
/// Key holding the database password.
pub const DB_PASS_KEY: &str = "simianarmy.recorder.db.pass";
/// Key holding the connection URL.
pub const DB_URL_KEY: &str = "simianarmy.recorder.db.url";

/// Pool ceiling for the recorder. The recorder is a low-throughput audit
/// sink, so a small bounded pool is enough.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 2;

/// How long `acquire` waits for a free connection before failing.
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// Database backend selected by the driver identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseDriver {
    /// PostgreSQL.
    Postgres,
    /// SQLite (file or in-memory).
    Sqlite,
}

impl DatabaseDriver {
    /// Resolves a driver identifier. Short names and the JDBC driver class
    /// names used by older deployments are both accepted, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidArgument`] for an unknown driver.
    pub fn resolve(identifier: &str) -> Result<Self, GatewayError> {
        match identifier.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "org.postgresql.driver" => Ok(Self::Postgres),
            "sqlite" | "sqlite3" | "org.sqlite.jdbc" => Ok(Self::Sqlite),
            other => Err(GatewayError::InvalidArgument(format!(
                "unsupported database driver: {other:?}"
            ))),
        }
    }

    fn accepts_scheme(self, scheme: &str) -> bool {
        match self {
            Self::Postgres => matches!(scheme, "postgres" | "postgresql"),
            Self::Sqlite => scheme == "sqlite",
        }
    }

    fn uses_credentials(self) -> bool {
        matches!(self, Self::Postgres)
    }
}

/// Immutable recorder connection settings.
///
/// Built once from configuration and never mutated; it owns no network
/// resource and only produces pools.
#[derive(Clone)]
pub struct ConnectionConfig {
    driver: String,
    user: String,
    password: String,
    url: String,
    max_connections: u32,
    acquire_timeout: Duration,
}

impl ConnectionConfig {
    /// Creates settings from the four raw values, with the default pool
    /// ceiling and acquire timeout.
    #[must_use]
    pub fn new(
        driver: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            driver: driver.into(),
            user: user.into(),
            password: password.into(),
            url: url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
        }
    }

    /// Reads driver, user, password and URL from `source`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::MissingConfiguration`] for the first absent
    /// key. No defaults are substituted.
    pub fn from_configuration(source: &dyn ConfigSource) -> Result<Self, GatewayError> {
        let driver = source.get_str(DB_DRIVER_KEY)?;
        let user = source.get_str(DB_USER_KEY)?;
        let password = source.get_str(DB_PASS_KEY)?;
        let url = source.get_str(DB_URL_KEY)?;
        Ok(Self::new(driver, user, password, url))
    }

    /// Overrides the pool ceiling. Values below one are raised to one.
    #[must_use]
    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections.max(1);
        self
    }

    /// Overrides how long `acquire` waits for a free connection.
    #[must_use]
    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    /// Driver identifier as configured.
    #[must_use]
    pub fn driver(&self) -> &str {
        &self.driver
    }

    /// Database user as configured.
    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Connection URL as configured (without embedded credentials).
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Pool ceiling.
    #[must_use]
    pub const fn max_connections(&self) -> u32 {
        self.max_connections
    }

    /// Acquire timeout.
    #[must_use]
    pub const fn acquire_timeout(&self) -> Duration {
        self.acquire_timeout
    }

    /// Builds the bounded pool. No connection is opened until the first
    /// acquire.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidArgument`] when the driver is unknown,
    /// the URL does not parse, or its scheme does not match the driver.
    pub fn create_pool(&self) -> Result<AnyPool, GatewayError> {
        sqlx::any::install_default_drivers();

        let driver = DatabaseDriver::resolve(&self.driver)?;
        let url = self.connection_url(driver)?;
        let options = AnyConnectOptions::from_url(&url).map_err(|e| {
            GatewayError::InvalidArgument(format!("invalid database url: {e}"))
        })?;

        let pool = AnyPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout)
            .connect_lazy_with(options);

        tracing::info!(
            ?driver,
            max_connections = self.max_connections,
            "recorder connection pool created"
        );
        Ok(pool)
    }

    /// Parses the configured URL and embeds user and password for backends
    /// that authenticate. A leading `jdbc:` prefix is dropped.
    fn connection_url(&self, driver: DatabaseDriver) -> Result<Url, GatewayError> {
        let raw = self.url.trim();
        let raw = raw.strip_prefix("jdbc:").unwrap_or(raw);
        let mut url = Url::parse(raw)
            .map_err(|e| GatewayError::InvalidArgument(format!("invalid database url: {e}")))?;

        if !driver.accepts_scheme(url.scheme()) {
            return Err(GatewayError::InvalidArgument(format!(
                "url scheme {:?} does not match driver {:?}",
                url.scheme(),
                self.driver
            )));
        }

        if driver.uses_credentials() {
            if !self.user.is_empty() {
                url.set_username(&self.user).map_err(|()| {
                    GatewayError::InvalidArgument("database url cannot carry a user".to_string())
                })?;
            }
            if !self.password.is_empty() {
                url.set_password(Some(&self.password)).map_err(|()| {
                    GatewayError::InvalidArgument(
                        "database url cannot carry a password".to_string(),
                    )
                })?;
            }
        }
        Ok(url)
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("driver", &self.driver)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("url", &self.url)
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .finish()
    }
}

/// Checks that the pool can hand out a working connection.
///
/// # Errors
///
/// Returns [`GatewayError::Persistence`] if no connection can be acquired
/// or the round trip fails.
pub async fn ping(pool: &AnyPool) -> Result<(), GatewayError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
