#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use ezpool::udbc::Row;
use ezpool::udbc::connection::Connection;
use ezpool::udbc::driver::Driver;
use ezpool::udbc::value::Value;
use ezpool::{DbError, Lease, PoolConfig};

/// Counters shared between a test and the mock driver it hands to the pool.
#[derive(Default)]
pub struct MockStats {
    pub opened: AtomicUsize,
    pub closed: AtomicUsize,
    pub failures: AtomicUsize,
    pub fail_connects: AtomicBool,
    /// Per-connection flag set while a statement runs; catches a connection leased twice.
    busy: Vec<AtomicBool>,
}

impl MockStats {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            busy: (0..64).map(|_| AtomicBool::new(false)).collect(),
            ..Default::default()
        })
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail_connects.store(failing, Ordering::SeqCst);
    }
}

pub struct MockDriver {
    stats: Arc<MockStats>,
}

impl MockDriver {
    pub fn new(stats: &Arc<MockStats>) -> Self {
        Self {
            stats: stats.clone(),
        }
    }
}

#[async_trait]
impl Driver for MockDriver {
    fn r#type(&self) -> &str {
        "mock"
    }

    async fn connect(&self, config: &PoolConfig) -> Result<Box<dyn Connection>, DbError> {
        if self.stats.fail_connects.load(Ordering::SeqCst) {
            self.stats.failures.fetch_add(1, Ordering::SeqCst);
            return Err(DbError::Connection(format!("{}:{} refused", config.host, config.port)));
        }
        let id = self.stats.opened.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(Box::new(MockConnection {
            id,
            stats: self.stats.clone(),
        }))
    }
}

pub struct MockConnection {
    id: usize,
    stats: Arc<MockStats>,
}

#[async_trait]
impl Connection for MockConnection {
    async fn execute(&mut self, sql: &str, _args: &[Value]) -> Result<u64, DbError> {
        let slot = &self.stats.busy[self.id % 64];
        if slot.swap(true, Ordering::SeqCst) {
            return Err(DbError::General(format!("connection {} used concurrently", self.id)));
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
        slot.store(false, Ordering::SeqCst);
        if sql.starts_with("BAD") {
            return Err(DbError::Query(format!("syntax error near {sql}")));
        }
        Ok(1)
    }

    async fn query(&mut self, sql: &str, _args: &[Value]) -> Result<Vec<Row>, DbError> {
        if sql.contains("CONNECTION_ID()") {
            let mut row = HashMap::new();
            row.insert("id".to_string(), Value::I64(self.id as i64));
            return Ok(vec![row]);
        }
        Ok(Vec::new())
    }

    async fn close(self: Box<Self>) -> Result<(), DbError> {
        self.stats.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub fn config(init_size: usize, max_size: usize) -> PoolConfig {
    PoolConfig::new("127.0.0.1")
        .credentials("root", "123456")
        .database("chat")
        .init_size(init_size)
        .max_size(max_size)
        .max_idle(Duration::from_secs(1))
        .acquire_timeout(Duration::from_millis(100))
        .retry_backoff(Duration::from_millis(20))
}

/// The mock's connection id, as the server would report it.
pub async fn connection_id(lease: &mut Lease) -> i64 {
    let rows = lease.query("SELECT CONNECTION_ID()", &[]).await.unwrap();
    rows[0]["id"].as_i64().unwrap()
}
