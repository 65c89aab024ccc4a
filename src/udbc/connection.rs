use crate::error::DbError;
use crate::udbc::Row;
use crate::udbc::value::Value;
use async_trait::async_trait;

/// One physical connection to the backing store.
///
/// The pool hands a connection to exactly one [`Lease`](crate::pool::Lease) at a
/// time, so implementations need no internal locking.
#[async_trait]
pub trait Connection: Send + Sync {
    /// INSERT / UPDATE / DELETE，返回受影响的行数
    async fn execute(&mut self, sql: &str, args: &[Value]) -> Result<u64, DbError>;

    /// SELECT
    async fn query(&mut self, sql: &str, args: &[Value]) -> Result<Vec<Row>, DbError>;

    /// 关闭物理连接
    async fn close(self: Box<Self>) -> Result<(), DbError>;
}
