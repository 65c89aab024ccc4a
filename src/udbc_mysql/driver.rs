use crate::error::DbError;
use crate::models::pool_config::PoolConfig;
use crate::udbc::connection::Connection;
use crate::udbc::driver::Driver;
use crate::udbc_mysql::connection::MysqlConnection;
use async_trait::async_trait;
use mysql_async::{Conn, OptsBuilder};
use tracing::debug;

const MYSQL_TYPE: &str = "mysql";

/// Opens single, unpooled `mysql_async` connections; pooling is ours.
#[derive(Debug, Default, Clone)]
pub struct MysqlDriver {
    prefer_socket: bool,
}

impl MysqlDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// 连接本机服务器时是否优先使用 unix socket
    pub fn prefer_socket(mut self, prefer_socket: bool) -> Self {
        self.prefer_socket = prefer_socket;
        self
    }

    fn opts(&self, config: &PoolConfig) -> OptsBuilder {
        let db_name = (!config.database.is_empty()).then(|| config.database.clone());
        OptsBuilder::default()
            .ip_or_hostname(config.host.clone())
            .tcp_port(config.port)
            .user(Some(config.user.clone()))
            .pass(Some(config.password.clone()))
            .db_name(db_name)
            .prefer_socket(self.prefer_socket)
    }
}

#[async_trait]
impl Driver for MysqlDriver {
    fn r#type(&self) -> &str {
        MYSQL_TYPE
    }

    async fn connect(&self, config: &PoolConfig) -> Result<Box<dyn Connection>, DbError> {
        let conn = Conn::new(self.opts(config)).await.map_err(|e| {
            DbError::Connection(format!("{}:{}: {}", config.host, config.port, e))
        })?;
        debug!(host = %config.host, port = config.port, id = conn.id(), "mysql connection established");
        Ok(Box::new(MysqlConnection::new(conn)))
    }
}
