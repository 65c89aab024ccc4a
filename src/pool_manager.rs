use tokio::sync::OnceCell;

use crate::pool::ConnectionPool;

// 全局单例：首次访问时加载配置并建立连接，并发首访只会初始化一次
static POOL: OnceCell<ConnectionPool> = OnceCell::const_new();

impl ConnectionPool {
    /// 获取全局连接池实例
    ///
    /// Built on first use from [`DEFAULT_CONFIG_FILE`](crate::config_loader::DEFAULT_CONFIG_FILE)
    /// in the working directory with the MySQL driver. If that fails the
    /// instance stays unavailable for the life of the process.
    #[cfg(feature = "mysql")]
    pub async fn instance() -> &'static ConnectionPool {
        POOL.get_or_init(|| async {
            ConnectionPool::bootstrap(
                crate::config_loader::DEFAULT_CONFIG_FILE,
                crate::udbc_mysql::MysqlDriver::new(),
            )
            .await
        })
        .await
    }

    /// Builds the process-wide instance with `init`, unless one already exists.
    ///
    /// Returns the instance in effect afterwards.
    pub async fn install<F, Fut>(init: F) -> &'static ConnectionPool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ConnectionPool>,
    {
        POOL.get_or_init(init).await
    }

    /// The process-wide instance, if it has been created.
    pub fn global() -> Option<&'static ConnectionPool> {
        POOL.get()
    }
}
