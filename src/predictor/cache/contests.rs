use super::millis;
use crate::{
    client::Api,
    clock::Clock,
    config::contests::REFRESH_INTERVAL,
    error::Result,
    lock::Mutex,
    storage::Storage,
    types::{Contest, ContestId},
};
use log::{info, warn};
use std::{collections::HashMap, sync::Arc};

const CONTESTS: &str = "cache.contests";
const CONTESTS_TIMESTAMP: &str = "cache.contests.timestamp";

/// Every contest the api lists, refreshed at most once per `REFRESH_INTERVAL`.
pub struct Contests {
    api: Arc<dyn Api>,
    storage: Storage,
    clock: Arc<dyn Clock>,
    lock: Mutex,
}

impl Contests {
    pub fn new(api: Arc<dyn Api>, storage: Storage, clock: Arc<dyn Clock>) -> Self {
        Self {
            api,
            storage,
            clock,
            lock: Mutex::new(),
        }
    }

    async fn last_attempt_time(&self) -> Result<i64> {
        self.storage.get(CONTESTS_TIMESTAMP, 0).await
    }
    async fn set_last_attempt_time(&self, time: i64) -> Result<()> {
        self.storage.set(CONTESTS_TIMESTAMP, &time).await
    }
    async fn contest_map(&self) -> Result<HashMap<ContestId, Contest>> {
        self.storage.get(CONTESTS, HashMap::new()).await
    }
    async fn set_contest_map(&self, map: &HashMap<ContestId, Contest>) -> Result<()> {
        self.storage.set(CONTESTS, map).await
    }

    async fn refresh(&self) -> Result<()> {
        let now = self.clock.now_millis();
        if now - self.last_attempt_time().await? <= millis(REFRESH_INTERVAL) {
            return Ok(());
        }
        self.set_last_attempt_time(now).await?;
        match self.api.contest_list().await {
            Ok(contests) => {
                info!("Refreshed contest list: {} contests", contests.len());
                self.set_contest_map(&contests.into_iter().map(|c| (c.id, c)).collect())
                    .await
            }
            Err(e) => {
                warn!("Unable to fetch contest list: {}", e);
                Ok(())
            }
        }
    }

    /// Refetches the list when the last attempt is older than the refresh
    /// interval. A failed fetch still counts as an attempt.
    pub async fn maybe_refresh(&self) -> Result<()> {
        self.lock.run_exclusive(|| self.refresh()).await
    }

    pub async fn list(&self) -> Result<Vec<Contest>> {
        Ok(self.contest_map().await?.into_values().collect())
    }
    pub async fn has_cached(&self, contest_id: ContestId) -> Result<bool> {
        Ok(self.contest_map().await?.contains_key(&contest_id))
    }
    pub async fn get_cached(&self, contest_id: ContestId) -> Result<Option<Contest>> {
        Ok(self.contest_map().await?.remove(&contest_id))
    }
    pub async fn update(&self, contest: Contest) -> Result<()> {
        let mut map = self.contest_map().await?;
        map.insert(contest.id, contest);
        self.set_contest_map(&map).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cache::fake::{contest, FakeApi},
        clock::ManualClock,
        storage::MemoryBackend,
        types::Phase,
    };
    use tokio::{sync::Notify, task::yield_now};

    const HOUR: i64 = 60 * 60 * 1000;

    fn setup() -> (Arc<FakeApi>, ManualClock, Arc<Contests>) {
        let api = Arc::new(FakeApi::default());
        let clock = ManualClock::new(100 * HOUR);
        let contests = Arc::new(Contests::new(
            api.clone(),
            Storage::local(Arc::new(MemoryBackend::new())),
            Arc::new(clock.clone()),
        ));
        (api, clock, contests)
    }

    #[tokio::test]
    async fn refresh_is_time_gated() {
        let (api, clock, contests) = setup();
        *api.contests.lock().unwrap() = Some(vec![contest(1, "Round 1", Phase::Finished, 0, 7200)]);

        contests.maybe_refresh().await.unwrap();
        assert_eq!(FakeApi::calls(&api.list_calls), 1);
        assert!(contests.has_cached(1).await.unwrap());

        clock.advance(6 * HOUR);
        contests.maybe_refresh().await.unwrap();
        assert_eq!(FakeApi::calls(&api.list_calls), 1);

        clock.advance(1);
        *api.contests.lock().unwrap() = Some(vec![contest(2, "Round 2", Phase::Before, 0, 7200)]);
        contests.maybe_refresh().await.unwrap();
        assert_eq!(FakeApi::calls(&api.list_calls), 2);
        // Replaced wholesale.
        assert!(!contests.has_cached(1).await.unwrap());
        assert_eq!(contests.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn failed_refresh_is_not_retried_early() {
        let (api, clock, contests) = setup();
        contests.update(contest(7, "Round 7", Phase::Finished, 0, 7200)).await.unwrap();

        contests.maybe_refresh().await.unwrap();
        assert_eq!(FakeApi::calls(&api.list_calls), 1);
        assert!(contests.has_cached(7).await.unwrap());

        *api.contests.lock().unwrap() = Some(Vec::new());
        clock.advance(HOUR);
        contests.maybe_refresh().await.unwrap();
        assert_eq!(FakeApi::calls(&api.list_calls), 1);
    }

    #[tokio::test]
    async fn concurrent_refreshes_queue_behind_fetch() {
        let (api, _clock, contests) = setup();
        *api.contests.lock().unwrap() = Some(Vec::new());
        let gate = Arc::new(Notify::new());
        *api.list_gate.lock().unwrap() = Some(gate.clone());

        let tasks: Vec<_> = (0..5)
            .map(|_| {
                let contests = contests.clone();
                tokio::spawn(async move { contests.maybe_refresh().await })
            })
            .collect();
        while FakeApi::calls(&api.list_calls) == 0 {
            yield_now().await;
        }
        for _ in 0..10 {
            yield_now().await;
        }
        // The first fetch is parked; everyone else waits for the lock.
        assert!(contests.lock.is_locked());
        assert!(tasks.iter().all(|t| !t.is_finished()));

        gate.notify_one();
        for t in tasks {
            t.await.unwrap().unwrap();
        }
        assert_eq!(FakeApi::calls(&api.list_calls), 1);
        assert!(!contests.lock.is_locked());
    }

    #[tokio::test]
    async fn update_upserts() {
        let (_api, _clock, contests) = setup();
        assert!(contests.list().await.unwrap().is_empty());
        contests.update(contest(3, "Old name", Phase::Coding, 0, 7200)).await.unwrap();
        contests.update(contest(3, "New name", Phase::Finished, 0, 7200)).await.unwrap();
        let c = contests.get_cached(3).await.unwrap().unwrap();
        assert_eq!(c.name, "New name");
        assert_eq!(c.phase, Phase::Finished);
        assert!(contests.get_cached(4).await.unwrap().is_none());
    }
}
