use chrono::{Datelike, Local};
use std::sync::{
    atomic::{AtomicI64, AtomicU32, Ordering},
    Arc,
};

/// Wall clock used by the caches for staleness checks.
pub trait Clock: Send + Sync {
    /// Milliseconds since the unix epoch.
    fn now_millis(&self) -> i64;
    /// (month, day) of today in the local time zone, month starting at 1.
    fn local_month_day(&self) -> (u32, u32);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;
impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Local::now().timestamp_millis()
    }
    fn local_month_day(&self) -> (u32, u32) {
        let now = Local::now();
        (now.month(), now.day())
    }
}

/// Manually driven clock.
#[derive(Debug, Clone)]
pub struct ManualClock {
    millis: Arc<AtomicI64>,
    month_day: Arc<AtomicU32>,
}
impl ManualClock {
    pub fn new(millis: i64) -> Self {
        Self {
            millis: Arc::new(AtomicI64::new(millis)),
            month_day: Arc::new(AtomicU32::new(6 * 100 + 15)),
        }
    }
    pub fn set(&self, millis: i64) {
        self.millis.store(millis, Ordering::SeqCst);
    }
    pub fn advance(&self, millis: i64) {
        self.millis.fetch_add(millis, Ordering::SeqCst);
    }
    pub fn set_month_day(&self, month: u32, day: u32) {
        self.month_day.store(month * 100 + day, Ordering::SeqCst);
    }
}
impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.millis.load(Ordering::SeqCst)
    }
    fn local_month_day(&self) -> (u32, u32) {
        let v = self.month_day.load(Ordering::SeqCst);
        (v / 100, v % 100)
    }
}
