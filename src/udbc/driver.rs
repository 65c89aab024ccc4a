use crate::error::DbError;
use crate::models::pool_config::PoolConfig;
use crate::udbc::connection::Connection;
use async_trait::async_trait;

/// Opens new physical connections for the pool.
#[async_trait]
pub trait Driver: Send + Sync {
    fn r#type(&self) -> &str;

    /// 使用配置中的 host/port/user/password/database 建立一个新连接。
    /// Must only return `Ok` once the connection has actually reached the server.
    async fn connect(&self, config: &PoolConfig) -> Result<Box<dyn Connection>, DbError>;
}
