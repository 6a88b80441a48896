//! FIFO lock for async critical sections.
//!
//! Waiters are queued in arrival order and the lock is handed directly to the
//! head of the queue on release, so a late caller can never overtake a queued
//! one.

use crate::error::{Error, Kind, Result};
use futures::channel::oneshot;
use std::{collections::VecDeque, future::Future, sync::Mutex as StdMutex};

#[derive(Default)]
struct State {
    locked: bool,
    queue: VecDeque<oneshot::Sender<()>>,
}

#[derive(Default)]
pub struct Mutex {
    state: StdMutex<State>,
}

impl Mutex {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn is_locked(&self) -> bool {
        self.state().locked
    }

    pub async fn acquire(&self) {
        let mut waiter = {
            let mut state = self.state();
            if !state.locked {
                state.locked = true;
                return;
            }
            let (tx, rx) = oneshot::channel();
            state.queue.push_back(tx);
            Waiter {
                lock: self,
                rx: Some(rx),
            }
        };
        if let Some(rx) = waiter.rx.as_mut() {
            // The sender is only dropped by `release` after ownership was passed on.
            let _ = rx.await;
        }
        waiter.rx = None;
    }

    pub fn release(&self) -> Result<()> {
        let mut state = self.state();
        if !state.locked {
            return Err(Error::with_kind(Kind::LockNotAcquired));
        }
        while let Some(next) = state.queue.pop_front() {
            if next.send(()).is_ok() {
                return Ok(());
            }
        }
        state.locked = false;
        Ok(())
    }

    /// Runs `op` holding the lock. The lock is released however `op` exits.
    pub async fn run_exclusive<F, Fut, T>(&self, op: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        self.acquire().await;
        let _guard = Guard(self);
        op().await
    }
}

/// A queued `acquire`. Dropped before completion, it refuses the handoff or
/// passes on a handoff that already arrived.
struct Waiter<'a> {
    lock: &'a Mutex,
    rx: Option<oneshot::Receiver<()>>,
}
impl Drop for Waiter<'_> {
    fn drop(&mut self) {
        if let Some(mut rx) = self.rx.take() {
            rx.close();
            if let Ok(Some(())) = rx.try_recv() {
                let _ = self.lock.release();
            }
        }
    }
}

struct Guard<'a>(&'a Mutex);
impl Drop for Guard<'_> {
    fn drop(&mut self) {
        let _ = self.0.release();
    }
}
