use std::time::{Duration, Instant};

use ezpool::ConnectionPool;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

const WORKERS: usize = 8;
const ROUNDS: usize = 50;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // 读取当前目录下的 mysql.ini
    let pool = ConnectionPool::instance().await;
    if !pool.is_available() {
        anyhow::bail!("connection pool unavailable, check mysql.ini");
    }

    let start = Instant::now();
    let mut handles = Vec::with_capacity(WORKERS);
    for worker in 0..WORKERS {
        handles.push(tokio::spawn(async move {
            for _ in 0..ROUNDS {
                let mut conn = ConnectionPool::instance().await.acquire().await?;
                conn.query("SELECT CONNECTION_ID() AS id", &[]).await?;
            }
            info!(worker, "worker finished");
            Ok::<_, ezpool::DbError>(())
        }));
    }
    for handle in handles {
        handle.await??;
    }
    info!(
        queries = WORKERS * ROUNDS,
        elapsed_ms = start.elapsed().as_millis() as u64,
        status = ?pool.status(),
        "benchmark done"
    );

    // 等待回收线程把多余的连接收回
    let idle = pool.config().map_or(Duration::ZERO, |c| c.max_idle);
    tokio::time::sleep(idle * 2).await;
    info!(status = ?pool.status(), "after idle scan");

    pool.shutdown().await;
    Ok(())
}
