use std::sync::Arc;

use tracing::debug;

use crate::pool::shared::{Shared, close_quietly};

/// 定时扫描，回收空闲超过 max_idle 的多余连接
pub(crate) async fn run(shared: Arc<Shared>) {
    let interval = shared.config.max_idle;
    debug!(?interval, "scanner started");
    loop {
        tokio::select! {
            () = tokio::time::sleep(interval) => {}
            () = shared.shutdown.cancelled() => break,
        }

        let expired = shared.evict_expired();
        if expired.is_empty() {
            continue;
        }
        debug!(evicted = expired.len(), total = shared.lock().total, "scanner evicted idle connections");
        for conn in expired {
            close_quietly(conn).await;
        }
    }
    debug!("scanner stopped");
}
