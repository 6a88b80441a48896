//! Complete contest data (standings and rating changes) for single contests.
//!
//! Finished contests never change, so up to `MAX_FINISHED_CONTESTS_TO_CACHE`
//! of them are kept, oldest inserted evicted first. The exception is the new
//! year "magic" period, when people rename themselves and the handles in a
//! cached ranklist go stale; then entries only live for `MAGIC_CACHE_DURATION`.

use super::millis;
use crate::{
    client::Api,
    clock::Clock,
    config::complete::{
        FAKE_RATINGS_SINCE_CONTEST, MAGIC_CACHE_DURATION, MAGIC_END, MAGIC_START,
        MAX_FINISHED_CONTESTS_TO_CACHE, NEW_DEFAULT_RATING, RATING_PENDING_MAX_DAYS,
    },
    error::Result,
    predict::Performance,
    storage::Storage,
    types::{Contest, ContestId, Phase, RanklistRow, RatingChange},
};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, OnceLock},
};

const CONTESTS_COMPLETE: &str = "cache.contests_complete";
const CONTESTS_COMPLETE_IDS: &str = "cache.contests_complete.ids";
const CONTESTS_COMPLETE_TIMESTAMP: &str = "cache.contests_complete.timestamp";

/// Whether a contest changes ratings. Only `Yes` carries rating data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rated {
    #[serde(rename_all = "camelCase")]
    Yes {
        rating_changes: Vec<RatingChange>,
        old_ratings: HashMap<String, i32>,
    },
    No,
    /// Not decided yet; re-derived on every fetch.
    Likely,
}
impl Rated {
    pub fn is_finished(&self) -> bool {
        !matches!(self, Rated::Likely)
    }
    pub fn name(&self) -> &'static str {
        match self {
            Rated::Yes { .. } => "YES",
            Rated::No => "NO",
            Rated::Likely => "LIKELY",
        }
    }
}

/// One contest entry, owned by [`ContestsComplete`]. The performance map is
/// derived data written at most once and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestData {
    pub contest: Contest,
    pub problems: usize,
    pub rows: Vec<RanklistRow>,
    pub fetch_time: i64,
    pub rated: Rated,
    #[serde(skip)]
    performances: OnceLock<HashMap<String, Performance>>,
}

impl ContestData {
    pub fn new(
        contest: Contest,
        problems: usize,
        rows: Vec<RanklistRow>,
        fetch_time: i64,
        rated: Rated,
    ) -> Self {
        Self {
            contest,
            problems,
            rows,
            fetch_time,
            rated,
            performances: OnceLock::new(),
        }
    }
    pub fn performances(&self) -> Option<&HashMap<String, Performance>> {
        self.performances.get()
    }
    /// Returns the memoized performances, running `calc` only the first time.
    pub fn performances_or_init<F>(&self, calc: F) -> &HashMap<String, Performance>
    where
        F: FnOnce() -> HashMap<String, Performance>,
    {
        self.performances.get_or_init(calc)
    }
}

/// Old ratings by handle. Since `FAKE_RATINGS_SINCE_CONTEST` the api reports
/// 0 for users who were unrated before the contest.
pub fn adjust_old_ratings(contest_id: ContestId, changes: &[RatingChange]) -> HashMap<String, i32> {
    let fake = contest_id >= FAKE_RATINGS_SINCE_CONTEST;
    changes
        .iter()
        .map(|c| {
            let old = if fake && c.old_rating == 0 {
                NEW_DEFAULT_RATING
            } else {
                c.old_rating
            };
            (c.handle.clone(), old)
        })
        .collect()
}

fn in_period(month_day: (u32, u32), start: (u32, u32), end: (u32, u32)) -> bool {
    if start <= end {
        start <= month_day && month_day <= end
    } else {
        month_day >= start || month_day <= end
    }
}

pub struct ContestsComplete {
    api: Arc<dyn Api>,
    storage: Storage,
    clock: Arc<dyn Clock>,
    resident: Mutex<HashMap<ContestId, Arc<ContestData>>>,
}

impl ContestsComplete {
    pub fn new(api: Arc<dyn Api>, storage: Storage, clock: Arc<dyn Clock>) -> Self {
        Self {
            api,
            storage,
            clock,
            resident: Mutex::new(HashMap::new()),
        }
    }

    async fn contests(&self) -> Result<HashMap<ContestId, ContestData>> {
        self.storage.get(CONTESTS_COMPLETE, HashMap::new()).await
    }
    async fn set_contests(&self, contests: &HashMap<ContestId, ContestData>) -> Result<()> {
        self.storage.set(CONTESTS_COMPLETE, contests).await
    }
    /// Resident ids, oldest first.
    pub async fn contest_ids(&self) -> Result<Vec<ContestId>> {
        self.storage.get(CONTESTS_COMPLETE_IDS, Vec::new()).await
    }
    async fn set_contest_ids(&self, ids: &[ContestId]) -> Result<()> {
        self.storage.set(CONTESTS_COMPLETE_IDS, ids).await
    }
    async fn timestamps(&self) -> Result<HashMap<ContestId, i64>> {
        self.storage.get(CONTESTS_COMPLETE_TIMESTAMP, HashMap::new()).await
    }
    async fn set_timestamps(&self, timestamps: &HashMap<ContestId, i64>) -> Result<()> {
        self.storage.set(CONTESTS_COMPLETE_TIMESTAMP, timestamps).await
    }

    fn resident(&self) -> std::sync::MutexGuard<'_, HashMap<ContestId, Arc<ContestData>>> {
        self.resident.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Shared handle for a stored entry, so the memoized performances survive
    /// between fetches of the same entry.
    fn handle_for(&self, id: ContestId, stored: ContestData) -> Arc<ContestData> {
        let mut resident = self.resident();
        match resident.get(&id) {
            Some(c) if c.fetch_time == stored.fetch_time => c.clone(),
            _ => {
                let c = Arc::new(stored);
                resident.insert(id, c.clone());
                c
            }
        }
    }

    pub fn is_magic_on(&self) -> bool {
        in_period(self.clock.local_month_day(), MAGIC_START, MAGIC_END)
    }

    /// A contest without a known start time is never old.
    fn is_old_contest(&self, contest: &Contest) -> bool {
        contest.end_time_seconds().map_or(false, |end| {
            self.clock.now_millis() / 1000 - end > RATING_PENDING_MAX_DAYS * 24 * 60 * 60
        })
    }

    async fn classify(&self, contest: &Contest) -> Result<Rated> {
        let mut rated = Rated::Likely;
        if contest.phase == Phase::Finished {
            match self.api.contest_rating_changes(contest.id).await {
                Ok(changes) if !changes.is_empty() => {
                    let old_ratings = adjust_old_ratings(contest.id, &changes);
                    rated = Rated::Yes {
                        rating_changes: changes,
                        old_ratings,
                    };
                }
                Ok(_) => {}
                Err(e) if e.is_rating_changes_unavailable() => rated = Rated::No,
                Err(e) => return Err(e),
            }
        }
        if rated == Rated::Likely && self.is_old_contest(contest) {
            rated = Rated::No;
        }
        Ok(rated)
    }

    pub async fn fetch(&self, contest_id: ContestId) -> Result<Arc<ContestData>> {
        if let Some(c) = self.contests().await?.remove(&contest_id) {
            debug!("Returning cached contest {}", contest_id);
            return Ok(self.handle_for(contest_id, c));
        }

        let standings = self.api.contest_standings(contest_id).await?;
        let rated = self.classify(&standings.contest).await?;
        info!("Contest {} rated: {}", contest_id, rated.name());
        let data = ContestData::new(
            standings.contest,
            standings.problems.len(),
            standings.rows,
            self.clock.now_millis(),
            rated,
        );
        if !data.rated.is_finished() {
            return Ok(Arc::new(data));
        }
        self.insert(contest_id, data).await
    }

    async fn insert(&self, contest_id: ContestId, data: ContestData) -> Result<Arc<ContestData>> {
        let now = self.clock.now_millis();
        let mut contests = self.contests().await?;
        let mut ids = self.contest_ids().await?;
        let mut timestamps = self.timestamps().await?;
        let tracked = timestamps.len();
        let mut evicted = Vec::new();

        contests.insert(contest_id, data.clone());
        if !ids.contains(&contest_id) {
            ids.push(contest_id);
        }
        while ids.len() > MAX_FINISHED_CONTESTS_TO_CACHE {
            let old = ids.remove(0);
            contests.remove(&old);
            timestamps.remove(&old);
            evicted.push(old);
        }
        if self.is_magic_on() {
            let expired: Vec<ContestId> = timestamps
                .iter()
                .filter(|(_, t)| now - **t > millis(MAGIC_CACHE_DURATION))
                .map(|(&id, _)| id)
                .collect();
            for id in expired {
                timestamps.remove(&id);
                contests.remove(&id);
                ids.retain(|&c| c != id);
                evicted.push(id);
            }
            timestamps.insert(contest_id, now);
        }
        if !evicted.is_empty() {
            info!("Evicted cached contests {:?}", evicted);
        }
        if timestamps.len() != tracked || self.is_magic_on() {
            self.set_timestamps(&timestamps).await?;
        }
        self.set_contests(&contests).await?;
        self.set_contest_ids(&ids).await?;

        let handle = Arc::new(data);
        let mut resident = self.resident();
        for id in evicted {
            resident.remove(&id);
        }
        resident.insert(contest_id, handle.clone());
        Ok(handle)
    }
}
