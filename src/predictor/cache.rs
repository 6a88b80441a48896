//! Storage-backed caches in front of the codeforces api.

pub mod complete;
pub mod contests;
pub mod ratings;

pub use complete::{ContestData, ContestsComplete, Rated};
pub use contests::Contests;
pub use ratings::Ratings;

pub(crate) fn millis(d: std::time::Duration) -> i64 {
    d.as_millis() as i64
}
