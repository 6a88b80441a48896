use super::millis;
use crate::{
    client::Api,
    clock::Clock,
    config::ratings::{MAX_SNAPSHOT_AGE, PREFETCH_WINDOW},
    error::Result,
    lock::Mutex,
    storage::Storage,
};
use log::{info, warn};
use std::{collections::HashMap, sync::Arc};

const RATINGS: &str = "cache.ratings";
const RATINGS_TIMESTAMP: &str = "cache.ratings.timestamp";

/// Snapshot of every rated user's current rating.
pub struct Ratings {
    api: Arc<dyn Api>,
    storage: Storage,
    clock: Arc<dyn Clock>,
    lock: Mutex,
}

impl Ratings {
    pub fn new(api: Arc<dyn Api>, storage: Storage, clock: Arc<dyn Clock>) -> Self {
        Self {
            api,
            storage,
            clock,
            lock: Mutex::new(),
        }
    }

    pub async fn timestamp(&self) -> Result<i64> {
        self.storage.get(RATINGS_TIMESTAMP, 0).await
    }

    /// A snapshot taken shortly before a contest started still describes the
    /// ratings its contestants entered with.
    async fn valid_for(&self, at_millis: i64) -> Result<bool> {
        let timestamp = self.timestamp().await?;
        Ok(timestamp > 0 && timestamp >= at_millis - millis(MAX_SNAPSHOT_AGE))
    }

    async fn refetch(&self) -> Result<HashMap<String, i32>> {
        let ratings: HashMap<String, i32> = self
            .api
            .user_rated_list(false)
            .await?
            .into_iter()
            .filter_map(|u| u.rating.map(|r| (u.handle, r)))
            .collect();
        info!("Fetched ratings of {} users", ratings.len());
        self.storage.set(RATINGS, &ratings).await?;
        self.storage
            .set(RATINGS_TIMESTAMP, &self.clock.now_millis())
            .await?;
        Ok(ratings)
    }

    /// Ratings as of `at_millis`, usually a contest start.
    pub async fn fetch_current_ratings(&self, at_millis: i64) -> Result<HashMap<String, i32>> {
        if self.valid_for(at_millis).await? {
            return self.storage.get(RATINGS, HashMap::new()).await;
        }
        self.refetch().await
    }

    async fn refresh(&self, contest_start_millis: i64) -> Result<()> {
        let now = self.clock.now_millis();
        if contest_start_millis - now > millis(PREFETCH_WINDOW)
            || self.valid_for(contest_start_millis).await?
        {
            return Ok(());
        }
        if let Err(e) = self.refetch().await {
            warn!("Unable to fetch ratings: {}", e);
        }
        Ok(())
    }

    /// Prefetches ratings when a contest starting at `contest_start_millis` is
    /// close and the stored snapshot would not be valid for it.
    pub async fn maybe_refresh_cache(&self, contest_start_millis: i64) -> Result<()> {
        self.lock
            .run_exclusive(|| self.refresh(contest_start_millis))
            .await
    }
}
