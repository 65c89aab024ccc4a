//! 有界数据库连接池
//!
//! ```no_run
//! # async fn demo() -> Result<(), ezpool::error::DbError> {
//! use ezpool::ConnectionPool;
//!
//! let pool = ConnectionPool::instance().await;
//! let mut conn = pool.acquire().await?;
//! conn.execute("UPDATE user SET state = 'online' WHERE id = 1", &[]).await?;
//! // conn 离开作用域时自动归还连接池
//! # Ok(())
//! # }
//! ```

pub mod config_loader;
pub mod error;
pub mod models;
pub mod pool;
pub mod pool_manager;
pub mod udbc;
#[cfg(feature = "mysql")]
pub mod udbc_mysql;

pub use error::DbError;
pub use models::pool_config::PoolConfig;
pub use pool::{ConnectionPool, Lease, PoolStatus};
