use async_trait::async_trait;
use mysql_async::prelude::Queryable;
use mysql_async::{Conn, Params, Row as MyRow};
use tracing::warn;

use crate::error::DbError;
use crate::udbc::Row;
use crate::udbc::connection::Connection;
use crate::udbc::value::Value;
use crate::udbc_mysql::value_codec::{from_mysql_value, to_mysql_value};

pub struct MysqlConnection {
    conn: Conn,
}

impl MysqlConnection {
    pub fn new(conn: Conn) -> Self {
        Self { conn }
    }

    /// 服务器端的连接 id
    pub fn id(&self) -> u32 {
        self.conn.id()
    }

    fn map_row(row: MyRow) -> Row {
        let mut out = Row::new();
        let cols = row.columns_ref();
        for i in 0..row.len() {
            let name = cols
                .get(i)
                .map(|c| c.name_str().to_string())
                .unwrap_or_else(|| i.to_string());
            let value = row.as_ref(i).map(from_mysql_value).unwrap_or(Value::Null);
            out.insert(name, value);
        }
        out
    }

    fn params(args: &[Value]) -> Params {
        Params::Positional(args.iter().map(to_mysql_value).collect())
    }

    fn statement_failed(&self, sql: &str, e: mysql_async::Error) -> DbError {
        warn!(sql, id = self.conn.id(), error = %e, "statement failed");
        DbError::Query(e.to_string())
    }
}

#[async_trait]
impl Connection for MysqlConnection {
    async fn execute(&mut self, sql: &str, args: &[Value]) -> Result<u64, DbError> {
        // 无参数时走文本协议，部分语句无法 prepare
        let result = if args.is_empty() {
            self.conn.query_drop(sql).await
        } else {
            self.conn.exec_drop(sql, Self::params(args)).await
        };
        match result {
            Ok(()) => Ok(self.conn.affected_rows()),
            Err(e) => Err(self.statement_failed(sql, e)),
        }
    }

    async fn query(&mut self, sql: &str, args: &[Value]) -> Result<Vec<Row>, DbError> {
        let result: Result<Vec<MyRow>, _> = if args.is_empty() {
            self.conn.query(sql).await
        } else {
            self.conn.exec(sql, Self::params(args)).await
        };
        match result {
            Ok(rows) => Ok(rows.into_iter().map(Self::map_row).collect()),
            Err(e) => Err(self.statement_failed(sql, e)),
        }
    }

    async fn close(self: Box<Self>) -> Result<(), DbError> {
        self.conn.disconnect().await?;
        Ok(())
    }
}
