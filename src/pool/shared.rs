use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::DbError;
use crate::models::pool_config::PoolConfig;
use crate::udbc::connection::Connection;
use crate::udbc::driver::Driver;

/// A connection sitting in the idle queue, stamped with the moment it got there.
pub(crate) struct IdleConnection {
    pub(crate) conn: Box<dyn Connection>,
    pub(crate) idle_since: Instant,
}

impl IdleConnection {
    pub(crate) fn new(conn: Box<dyn Connection>) -> Self {
        Self {
            conn,
            idle_since: Instant::now(),
        }
    }
}

pub(crate) struct PoolState {
    /// FIFO：队头是空闲最久的连接
    pub(crate) idle: VecDeque<IdleConnection>,
    /// 已创建且未销毁的连接总数，包括借出的
    pub(crate) total: usize,
    pub(crate) closed: bool,
}

/// State shared by the pool handle, its leases and the background tasks.
pub(crate) struct Shared {
    pub(crate) config: PoolConfig,
    pub(crate) driver: Box<dyn Driver>,
    state: Mutex<PoolState>,
    /// 有连接入队时通知等待中的消费者
    pub(crate) available: Notify,
    /// 队列被取空时通知生产者
    pub(crate) demand: Notify,
    pub(crate) shutdown: CancellationToken,
}

impl Shared {
    pub(crate) fn new(
        config: PoolConfig,
        driver: Box<dyn Driver>,
        initial: Vec<Box<dyn Connection>>,
    ) -> Self {
        let total = initial.len();
        let idle = initial.into_iter().map(IdleConnection::new).collect();
        Self {
            config,
            driver,
            state: Mutex::new(PoolState {
                idle,
                total,
                closed: false,
            }),
            available: Notify::new(),
            demand: Notify::new(),
            shutdown: CancellationToken::new(),
        }
    }

    /// Never held across an `.await`, so a poisoned lock only means a panic
    /// in a non-async critical section; the state is still consistent.
    pub(crate) fn lock(&self) -> MutexGuard<'_, PoolState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Pops the longest-idle connection, waking the producer when that drains the queue.
    pub(crate) fn take_idle(&self) -> Result<Option<Box<dyn Connection>>, DbError> {
        let mut state = self.lock();
        if state.closed {
            return Err(DbError::PoolClosed);
        }
        let Some(entry) = state.idle.pop_front() else {
            return Ok(None);
        };
        let drained = state.idle.is_empty();
        drop(state);
        if drained {
            self.demand.notify_one();
        }
        Ok(Some(entry.conn))
    }

    /// Puts a connection (new or returned) at the tail of the queue.
    ///
    /// Hands the connection back when the pool is closed; `total` has already
    /// been decremented and the caller must close it.
    pub(crate) fn push_idle(&self, conn: Box<dyn Connection>) -> Option<Box<dyn Connection>> {
        let mut state = self.lock();
        if state.closed {
            state.total -= 1;
            return Some(conn);
        }
        state.idle.push_back(IdleConnection::new(conn));
        drop(state);
        self.available.notify_one();
        None
    }

    /// Called by `Lease` on drop; closing has to happen off the lock and off `Drop`.
    pub(crate) fn give_back(&self, conn: Box<dyn Connection>) {
        let Some(conn) = self.push_idle(conn) else {
            return;
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(close_quietly(conn));
            }
            Err(_) => debug!("no runtime to close a connection returned after shutdown"),
        }
    }

    /// Reserves room for one more connection when the queue is empty and the cap allows.
    pub(crate) fn reserve_slot(&self) -> bool {
        let mut state = self.lock();
        if state.closed || !state.idle.is_empty() || state.total >= self.config.max_size {
            return false;
        }
        state.total += 1;
        true
    }

    pub(crate) fn release_slot(&self) {
        let mut state = self.lock();
        state.total -= 1;
    }

    /// 回收空闲时间超过 max_idle 的连接，但总数不低于 init_size
    pub(crate) fn evict_expired(&self) -> Vec<Box<dyn Connection>> {
        let max_idle = self.config.max_idle;
        let mut state = self.lock();
        let mut expired = Vec::new();
        while state.total > self.config.init_size {
            match state.idle.front() {
                Some(head) if head.idle_since.elapsed() >= max_idle => {}
                // 队列按空闲时间单调排列，后面的连接只会更“新”
                _ => break,
            }
            if let Some(entry) = state.idle.pop_front() {
                state.total -= 1;
                expired.push(entry.conn);
            }
        }
        expired
    }

    /// Marks the pool closed and takes every idle connection out of it.
    pub(crate) fn close(&self) -> Option<Vec<Box<dyn Connection>>> {
        let mut state = self.lock();
        if state.closed {
            return None;
        }
        state.closed = true;
        let drained: Vec<_> = state.idle.drain(..).map(|entry| entry.conn).collect();
        state.total -= drained.len();
        Some(drained)
    }
}

pub(crate) async fn close_quietly(conn: Box<dyn Connection>) {
    if let Err(e) = conn.close().await {
        warn!(error = %e, "failed to close connection");
    }
}
