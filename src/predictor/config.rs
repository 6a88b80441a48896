pub mod client {
    use std::time::Duration;
    pub const API_BASE: &str = "https://codeforces.com/api/";
    pub const USER_AGENT: &str = concat!("cf-predictor/", env!("CARGO_PKG_VERSION"));
    pub const TIMEOUT: Duration = Duration::from_secs(30);
}
pub mod contests {
    use std::time::Duration;
    pub const REFRESH_INTERVAL: Duration = Duration::from_secs(6 * 60 * 60);
}
pub mod complete {
    use std::time::Duration;
    pub const MAX_FINISHED_CONTESTS_TO_CACHE: usize = 5;
    pub const MAGIC_CACHE_DURATION: Duration = Duration::from_secs(5 * 60);
    pub const RATING_PENDING_MAX_DAYS: i64 = 3;
    pub const FAKE_RATINGS_SINCE_CONTEST: u32 = 1360;
    pub const NEW_DEFAULT_RATING: i32 = 1400;
    /// (month, day) in local time, both ends inclusive.
    pub const MAGIC_START: (u32, u32) = (12, 24);
    pub const MAGIC_END: (u32, u32) = (1, 11);
}
pub mod ratings {
    use std::time::Duration;
    pub const MAX_SNAPSHOT_AGE: Duration = Duration::from_secs(60 * 60);
    pub const PREFETCH_WINDOW: Duration = Duration::from_secs(60 * 60);
}
pub mod delta {
    pub const UNRATED_HINTS: [&str; 6] = ["unrated", "fools", "q#", "kotlin", "marathon", "teams"];
    pub const EDU_ROUND_RATED_THRESHOLD: i32 = 2100;
}
