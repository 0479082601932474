//! Server settings loaded via OrthoConfig and the runtime configuration
//! built from them.

use std::net::{AddrParseError, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;

use gameswap::outbound::persistence::{DbPool, PoolConfig};

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_POOL_MIN_IDLE: u32 = 2;

/// Settings read from CLI flags, `GAMESWAP_*` environment variables and
/// configuration files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "GAMESWAP")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. The in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Upper bound on pooled connections.
    pub pool_max_size: Option<u32>,
    /// Idle connections the pool keeps warm.
    pub pool_min_idle: Option<u32>,
    /// Start without applying embedded migrations.
    #[ortho_config(default = false)]
    pub skip_migrations: bool,
}

impl ServerSettings {
    /// Parse the configured bind address, falling back to the default.
    ///
    /// # Errors
    ///
    /// Returns [`AddrParseError`] when the configured value is not a socket
    /// address.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
    }

    /// Pool configuration for `database_url`.
    pub fn pool_config(&self, database_url: &str) -> PoolConfig {
        PoolConfig::new(database_url)
            .with_max_size(self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE))
            .with_min_idle(Some(self.pool_min_idle.unwrap_or(DEFAULT_POOL_MIN_IDLE)))
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Configuration that serves from the in-memory store.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            db_pool: None,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Serve from PostgreSQL through `pool`.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for server settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("gameswap")]).expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env([
            ("GAMESWAP_BIND_ADDR", None::<String>),
            ("GAMESWAP_DATABASE_URL", None::<String>),
            ("GAMESWAP_POOL_MAX_SIZE", None::<String>),
            ("GAMESWAP_POOL_MIN_IDLE", None::<String>),
            ("GAMESWAP_SKIP_MIGRATIONS", None::<String>),
        ]);

        let settings = load_from_empty_args();

        assert_eq!(
            settings.bind_addr().expect("default address"),
            SocketAddr::from(([0, 0, 0, 0], 8080))
        );
        assert!(settings.database_url.is_none());
        assert!(!settings.skip_migrations);
        let pool = settings.pool_config("postgres://localhost/gameswap");
        assert_eq!(pool.max_size(), DEFAULT_POOL_MAX_SIZE);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("GAMESWAP_BIND_ADDR", Some("127.0.0.1:9090".to_owned())),
            (
                "GAMESWAP_DATABASE_URL",
                Some("postgres://db/gameswap".to_owned()),
            ),
            ("GAMESWAP_POOL_MAX_SIZE", Some("4".to_owned())),
            ("GAMESWAP_POOL_MIN_IDLE", None),
            ("GAMESWAP_SKIP_MIGRATIONS", Some("true".to_owned())),
        ]);

        let settings = load_from_empty_args();

        assert_eq!(
            settings.bind_addr().expect("configured address"),
            SocketAddr::from(([127, 0, 0, 1], 9090))
        );
        assert_eq!(
            settings.database_url.as_deref(),
            Some("postgres://db/gameswap")
        );
        assert!(settings.skip_migrations);
        let pool = settings.pool_config("postgres://db/gameswap");
        assert_eq!(pool.max_size(), 4);
        assert_eq!(pool.database_url(), "postgres://db/gameswap");
    }

    #[rstest]
    fn malformed_bind_address_is_reported() {
        let _guard = lock_env([
            ("GAMESWAP_BIND_ADDR", Some("not-an-address".to_owned())),
            ("GAMESWAP_DATABASE_URL", None),
        ]);

        let settings = load_from_empty_args();

        assert!(settings.bind_addr().is_err());
    }
}
