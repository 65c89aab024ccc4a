use std::time::Duration;

use crate::error::DbError;

/// 连接池配置
/// Pool sizing, timeouts and backing-store credentials. Immutable once the pool is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub init_size: usize,          // 连接池的初始连接量
    pub max_size: usize,           // 连接池的最大连接量
    pub max_idle: Duration,        // 连接最大空闲时间，同时也是回收任务的扫描周期
    pub acquire_timeout: Duration, // 获取连接的超时时间
    pub retry_backoff: Duration,   // 生产者建连失败后的等待时间
}

impl Default for PoolConfig {
    fn default() -> Self {
        PoolConfig {
            host: "127.0.0.1".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: String::new(),
            database: String::new(),
            init_size: 10,
            max_size: 1024,
            max_idle: Duration::from_secs(60),
            acquire_timeout: Duration::from_millis(100),
            retry_backoff: Duration::from_secs(1),
        }
    }
}

impl PoolConfig {
    pub fn new(host: impl Into<String>) -> Self {
        PoolConfig {
            host: host.into(),
            ..Default::default()
        }
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.user = user.into();
        self.password = password.into();
        self
    }

    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn init_size(mut self, init_size: usize) -> Self {
        self.init_size = init_size;
        self
    }

    pub fn max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn max_idle(mut self, max_idle: Duration) -> Self {
        self.max_idle = max_idle;
        self
    }

    pub fn acquire_timeout(mut self, acquire_timeout: Duration) -> Self {
        self.acquire_timeout = acquire_timeout;
        self
    }

    pub fn retry_backoff(mut self, retry_backoff: Duration) -> Self {
        self.retry_backoff = retry_backoff;
        self
    }

    /// Checks the sizing invariants the pool relies on.
    pub fn validate(&self) -> Result<(), DbError> {
        if self.host.trim().is_empty() {
            return Err(DbError::Config("host must not be empty".into()));
        }
        if self.init_size == 0 {
            return Err(DbError::Config("initSize must be positive".into()));
        }
        if self.init_size > self.max_size {
            return Err(DbError::Config(format!(
                "initSize ({}) exceeds maxSize ({})",
                self.init_size, self.max_size
            )));
        }
        if self.max_idle.is_zero() {
            return Err(DbError::Config("maxIdleTime must be positive".into()));
        }
        Ok(())
    }
}
