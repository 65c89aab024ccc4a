//! Bounded connection pool.
//!
//! One producer task grows the idle queue on demand up to `max_size`, one
//! scanner task shrinks it back towards `init_size`, and any number of tasks
//! borrow connections through [`ConnectionPool::acquire`]. All shared state
//! sits behind a single mutex that is never held across an `.await`.

mod lease;
mod producer;
mod scanner;
mod shared;

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::config_loader;
use crate::error::DbError;
use crate::models::pool_config::PoolConfig;
use crate::udbc::driver::Driver;

pub use lease::Lease;
use shared::{Shared, close_quietly};

/// Point-in-time view of the pool's counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolStatus {
    /// 队列中的空闲连接数
    pub idle: usize,
    /// 已创建且未销毁的连接总数
    pub total: usize,
    /// 借出中的连接数
    pub in_use: usize,
    pub max_size: usize,
}

enum Inner {
    Ready {
        shared: Arc<Shared>,
        workers: Mutex<Vec<JoinHandle<()>>>,
    },
    /// 初始化失败后的零容量状态，不再重试
    Unavailable { reason: String },
}

/// 数据库连接池
pub struct ConnectionPool {
    inner: Inner,
}

impl ConnectionPool {
    /// Opens the pool: connects `init_size` connections up front and starts
    /// the producer and scanner on the current tokio runtime.
    ///
    /// Fails with [`DbError::Connection`] if any initial connection cannot be
    /// opened; connections opened so far are closed again.
    pub async fn open(config: PoolConfig, driver: impl Driver + 'static) -> Result<Self, DbError> {
        config.validate()?;
        let mut initial = Vec::with_capacity(config.init_size);
        for _ in 0..config.init_size {
            match driver.connect(&config).await {
                Ok(conn) => initial.push(conn),
                Err(e) => {
                    for conn in initial {
                        close_quietly(conn).await;
                    }
                    return Err(e);
                }
            }
        }

        let shared = Arc::new(Shared::new(config, Box::new(driver), initial));
        let workers = vec![
            tokio::spawn(producer::run(shared.clone())),
            tokio::spawn(scanner::run(shared.clone())),
        ];
        let config = &shared.config;
        info!(
            driver = shared.driver.r#type(),
            host = %config.host,
            port = config.port,
            init_size = config.init_size,
            max_size = config.max_size,
            "connection pool opened"
        );
        Ok(Self {
            inner: Inner::Ready {
                shared,
                workers: Mutex::new(workers),
            },
        })
    }

    /// Loads the configuration file at `path` and opens the pool.
    ///
    /// Never fails: a missing or invalid file, or a backing store that cannot
    /// be reached, is logged once and leaves the pool unavailable, so every
    /// later [`acquire`](Self::acquire) fails fast.
    pub async fn bootstrap(path: impl AsRef<Path>, driver: impl Driver + 'static) -> Self {
        let path = path.as_ref();
        let opened = match config_loader::load_from_path(path) {
            Ok(config) => Self::open(config, driver).await,
            Err(e) => Err(e),
        };
        opened.unwrap_or_else(|e| {
            error!(path = %path.display(), error = %e, "connection pool initialization failed");
            Self::unavailable(e.to_string())
        })
    }

    /// A pool that hands out nothing.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            inner: Inner::Unavailable {
                reason: reason.into(),
            },
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self.inner, Inner::Ready { .. })
    }

    pub fn config(&self) -> Option<&PoolConfig> {
        match &self.inner {
            Inner::Ready { shared, .. } => Some(&shared.config),
            Inner::Unavailable { .. } => None,
        }
    }

    fn shared(&self) -> Result<&Arc<Shared>, DbError> {
        match &self.inner {
            Inner::Ready { shared, .. } => Ok(shared),
            Inner::Unavailable { reason } => Err(DbError::PoolUnavailable(reason.clone())),
        }
    }

    /// 从连接池中获取一个空闲连接
    ///
    /// Waits up to `acquire_timeout` for a connection to become idle, waking
    /// the producer while the queue is empty. There is no internal retry: on
    /// expiry the caller gets [`DbError::AcquireTimeout`].
    pub async fn acquire(&self) -> Result<Lease, DbError> {
        let shared = self.shared()?;
        let timeout = shared.config.acquire_timeout;
        let deadline = Instant::now() + timeout;
        loop {
            // 先登记等待，再检查队列，避免丢失通知
            let notified = shared.available.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if let Some(conn) = shared.take_idle()? {
                debug!("connection acquired");
                return Ok(Lease::new(conn, shared.clone()));
            }
            shared.demand.notify_one();

            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                if let Some(conn) = shared.take_idle()? {
                    return Ok(Lease::new(conn, shared.clone()));
                }
                warn!(?timeout, "timed out waiting for an idle connection");
                return Err(DbError::AcquireTimeout(timeout));
            }
        }
    }

    pub fn status(&self) -> PoolStatus {
        let Ok(shared) = self.shared() else {
            return PoolStatus::default();
        };
        let state = shared.lock();
        PoolStatus {
            idle: state.idle.len(),
            total: state.total,
            in_use: state.total - state.idle.len(),
            max_size: shared.config.max_size,
        }
    }

    /// Closes idle connections, stops the producer and scanner, and fails
    /// every waiting and future `acquire` with [`DbError::PoolClosed`].
    /// Connections still leased are closed as they come back.
    pub async fn shutdown(&self) {
        let Inner::Ready { shared, workers } = &self.inner else {
            return;
        };
        let Some(drained) = shared.close() else {
            return;
        };
        shared.shutdown.cancel();
        shared.available.notify_waiters();

        let handles = std::mem::take(&mut *workers.lock().unwrap_or_else(PoisonError::into_inner));
        for handle in handles {
            if let Err(e) = handle.await {
                warn!(error = %e, "pool worker ended abnormally");
            }
        }
        let closed = drained.len();
        for conn in drained {
            close_quietly(conn).await;
        }
        info!(closed, in_use = shared.lock().total, "connection pool shut down");
    }
}

impl Drop for ConnectionPool {
    fn drop(&mut self) {
        if let Inner::Ready { shared, .. } = &self.inner {
            shared.shutdown.cancel();
        }
    }
}
