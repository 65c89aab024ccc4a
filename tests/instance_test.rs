#![cfg(feature = "mysql")]

use std::path::Path;

use ezpool::config_loader::DEFAULT_CONFIG_FILE;
use ezpool::{ConnectionPool, DbError};

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_instance_without_config_file_fails_fast() {
    // 仓库里只提交 mysql.ini.example；本地放了真实配置时跳过
    if Path::new(DEFAULT_CONFIG_FILE).exists() {
        return;
    }
    let first = ConnectionPool::instance().await;
    let second = ConnectionPool::instance().await;
    assert!(std::ptr::eq(first, second));
    assert!(!first.is_available());
    assert!(matches!(first.acquire().await, Err(DbError::PoolUnavailable(_))));
}
