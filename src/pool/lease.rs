use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::trace;

use crate::pool::shared::Shared;
use crate::udbc::connection::Connection;

/// Exclusive borrow of one pooled connection.
///
/// Dropping the lease (or calling [`release`](Lease::release)) puts the
/// connection back at the tail of the idle queue. This happens exactly once,
/// whether the caller's work succeeded, failed or panicked. The connection is
/// never closed by the lease holder.
pub struct Lease {
    conn: Option<Box<dyn Connection>>,
    pool: Arc<Shared>,
    leased_at: Instant,
}

impl Lease {
    pub(crate) fn new(conn: Box<dyn Connection>, pool: Arc<Shared>) -> Self {
        Self {
            conn: Some(conn),
            pool,
            leased_at: Instant::now(),
        }
    }

    /// 显式归还连接，等价于 drop
    pub fn release(mut self) {
        self.give_back();
    }

    /// How long this lease has been held.
    pub fn leased_for(&self) -> Duration {
        self.leased_at.elapsed()
    }

    fn give_back(&mut self) {
        if let Some(conn) = self.conn.take() {
            trace!(held_ms = self.leased_at.elapsed().as_millis() as u64, "connection returned");
            self.pool.give_back(conn);
        }
    }
}

impl Deref for Lease {
    type Target = dyn Connection;

    fn deref(&self) -> &Self::Target {
        self.conn.as_deref().expect("lease used after release")
    }
}

impl DerefMut for Lease {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.conn.as_deref_mut().expect("lease used after release")
    }
}

impl Drop for Lease {
    fn drop(&mut self) {
        self.give_back();
    }
}

impl fmt::Debug for Lease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lease")
            .field("leased_for", &self.leased_for())
            .finish()
    }
}
