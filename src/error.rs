use std::time::Duration;
use thiserror::Error;

/// Errors produced by the pool and its connections.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("General error: {0}")]
    General(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Query error: {0}")]
    Query(String),
    #[error("Value error: {0}")]
    Value(String),
    #[error("Database error: {0}")]
    Database(String),
    #[error("No idle connection became available within {0:?}")]
    AcquireTimeout(Duration),
    #[error("Connection pool is unavailable: {0}")]
    PoolUnavailable(String),
    #[error("Connection pool is closed")]
    PoolClosed,
}

#[cfg(feature = "mysql")]
impl From<mysql_async::Error> for DbError {
    fn from(e: mysql_async::Error) -> Self {
        DbError::Database(e.to_string())
    }
}
