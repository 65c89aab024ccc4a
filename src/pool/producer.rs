use std::sync::Arc;

use tracing::{debug, warn};

use crate::pool::shared::{Shared, close_quietly};

/// 生产者：队列取空且未达上限时创建新连接
///
/// Sleeps on `demand` otherwise; it never polls, so a pool that is already at
/// `max_size` costs nothing until a consumer signals again.
pub(crate) async fn run(shared: Arc<Shared>) {
    debug!("producer started");
    loop {
        let notified = shared.demand.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();

        if !shared.reserve_slot() {
            tokio::select! {
                () = notified.as_mut() => continue,
                () = shared.shutdown.cancelled() => break,
            }
        }

        let connected = tokio::select! {
            result = shared.driver.connect(&shared.config) => result,
            () = shared.shutdown.cancelled() => {
                shared.release_slot();
                break;
            }
        };
        match connected {
            Ok(conn) => {
                if let Some(conn) = shared.push_idle(conn) {
                    close_quietly(conn).await;
                    break;
                }
                debug!(total = shared.lock().total, "producer added a connection");
            }
            Err(e) => {
                shared.release_slot();
                warn!(error = %e, backoff = ?shared.config.retry_backoff, "producer failed to open a connection");
                tokio::select! {
                    () = tokio::time::sleep(shared.config.retry_backoff) => {}
                    () = shared.shutdown.cancelled() => break,
                }
            }
        }
    }
    debug!("producer stopped");
}
