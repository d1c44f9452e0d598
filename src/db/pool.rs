use crate::config::DatabaseConfig;
use crate::error::{AccessError, IsRetryable};
use backon::{ExponentialBuilder, Retryable};
use sqlx::AnyPool;
use sqlx::any::{AnyPoolOptions, install_default_drivers};
use std::time::Duration;
use tracing::{debug, info, warn};

fn default_retry_policy() -> ExponentialBuilder {
    ExponentialBuilder::default()
        .with_min_delay(Duration::from_millis(500))
        .with_max_delay(Duration::from_secs(5))
        .with_max_times(5)
        .with_jitter()
}

/// Bounds applied to the pool behind a [`ConnectionHandle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolLimits {
    pub max_open: u32,
    /// Always equal to `max_open`; idle connections are the unused part of the open bound.
    pub max_idle: u32,
    pub max_lifetime: Duration,
}

impl From<&DatabaseConfig> for PoolLimits {
    fn from(cfg: &DatabaseConfig) -> Self {
        Self {
            max_open: cfg.max_open_connections,
            max_idle: cfg.max_idle_connections,
            max_lifetime: cfg.max_lifetime(),
        }
    }
}

/// Shared, cloneable handle to the bounded store pool.
///
/// Connection checkout and return are handled by the pool; callers only issue queries.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    pool: AnyPool,
    limits: PoolLimits,
}

impl ConnectionHandle {
    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    pub fn limits(&self) -> PoolLimits {
        self.limits
    }

    /// Connections currently open, idle or in use.
    pub fn size(&self) -> u32 {
        self.pool.size()
    }

    pub fn num_idle(&self) -> usize {
        self.pool.num_idle()
    }

    /// Round-trip a trivial statement through the pool.
    pub async fn ping(&self) -> Result<(), AccessError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(AccessError::Connection)?;
        Ok(())
    }

    /// Ping with exponential backoff while failures look transient.
    ///
    /// The pool itself is lazy; this is for callers that want reachability
    /// confirmed at startup rather than on first query.
    pub async fn wait_until_reachable(&self) -> Result<(), AccessError> {
        (|| async { self.ping().await })
            .retry(default_retry_policy())
            .when(|e: &AccessError| e.is_retryable())
            .notify(|err: &AccessError, dur: Duration| {
                warn!("store unreachable ({}), retrying in {:?}", err, dur);
            })
            .await?;
        debug!("store reachable");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Builds the store pool from [`DatabaseConfig`].
pub struct ConnectionManager;

impl ConnectionManager {
    /// Configure a lazy pool: no connection is attempted until first use.
    ///
    /// Fails when the configuration or connection URL is unusable, or when
    /// no Tokio runtime is running (the pool reaps expired connections on it).
    pub fn connect(cfg: &DatabaseConfig) -> Result<ConnectionHandle, AccessError> {
        cfg.validate()?;
        if tokio::runtime::Handle::try_current().is_err() {
            return Err(AccessError::InvalidConfig(
                "connection pool must be created inside a Tokio runtime".to_string(),
            ));
        }
        install_default_drivers();

        let limits = PoolLimits::from(cfg);
        let pool = AnyPoolOptions::new()
            .max_connections(limits.max_open)
            .min_connections(0)
            .max_lifetime(limits.max_lifetime)
            .connect_lazy(&cfg.url)
            .map_err(AccessError::Connection)?;

        info!(
            url = %cfg.redacted_url(),
            max_open = limits.max_open,
            max_idle = limits.max_idle,
            max_lifetime_secs = limits.max_lifetime.as_secs(),
            "connection pool configured"
        );

        Ok(ConnectionHandle { pool, limits })
    }
}
