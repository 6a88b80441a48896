#![allow(dead_code)]

use async_trait::async_trait;
use cf_predictor::{
    client::Api,
    clock::ManualClock,
    error::{Error, Kind, Result},
    predict::{Contestant, Performance, Predict, PredictMode, PredictResult},
    settings::Settings,
    storage::{Backend, MemoryBackend, Storage},
    types::*,
    Predictor,
};
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

pub const NOW_SECS: i64 = 1_700_000_000;
pub const DAY_SECS: i64 = 24 * 60 * 60;

#[derive(Default)]
pub struct Fake {
    pub contests: Mutex<Vec<Contest>>,
    pub standings: Mutex<HashMap<ContestId, Standings>>,
    pub changes: Mutex<HashMap<ContestId, Option<Vec<RatingChange>>>>,
    pub users: Mutex<Vec<User>>,
    pub calls: AtomicUsize,
}

impl Fake {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
    /// `changes: None` answers like a contest without rating data.
    pub fn add(&self, standings: Standings, changes: Option<Vec<RatingChange>>) {
        let id = standings.contest.id;
        self.contests.lock().unwrap().push(standings.contest.clone());
        self.standings.lock().unwrap().insert(id, standings);
        self.changes.lock().unwrap().insert(id, changes);
    }
    pub fn set_rating(&self, handle: &str, rating: i32) {
        self.users.lock().unwrap().push(User {
            handle: handle.to_owned(),
            rating: Some(rating),
        });
    }
}

#[async_trait]
impl Api for Fake {
    async fn contest_list(&self) -> Result<Vec<Contest>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.contests.lock().unwrap().clone())
    }
    async fn contest_standings(&self, contest_id: ContestId) -> Result<Standings> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.standings
            .lock()
            .unwrap()
            .get(&contest_id)
            .cloned()
            .ok_or_else(|| Error::with_description(Kind::Api, "contest not found"))
    }
    async fn contest_rating_changes(&self, contest_id: ContestId) -> Result<Vec<RatingChange>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.changes.lock().unwrap().get(&contest_id) {
            Some(Some(v)) => Ok(v.clone()),
            _ => Err(Error::with_kind(Kind::RatingChangesUnavailable)),
        }
    }
    async fn user_rated_list(&self, _active_only: bool) -> Result<Vec<User>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.users.lock().unwrap().clone())
    }
}

/// Performance is the prior rating plus ten per point, the delta a tenth of
/// the gap between the two.
#[derive(Default)]
pub struct LinearPredict {
    pub calls: AtomicUsize,
    pub seen: Mutex<Vec<(PredictMode, Vec<String>)>>,
}

impl LinearPredict {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Predict for LinearPredict {
    fn predict(&self, contestants: &[Contestant], mode: PredictMode) -> Vec<PredictResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push((
            mode,
            contestants.iter().map(|c| c.handle.clone()).collect(),
        ));
        contestants
            .iter()
            .map(|c| {
                let effective = c.rating.unwrap_or(1400);
                let perf = effective + (c.points * 10.0) as i32;
                PredictResult {
                    handle: c.handle.clone(),
                    rating: c.rating,
                    effective_rating: effective,
                    delta: (perf - effective) / 10,
                    performance: if c.points >= 100.0 {
                        Performance::Infinite
                    } else {
                        Performance::Value(perf)
                    },
                }
            })
            .collect()
    }
}

pub struct Env {
    pub api: Arc<Fake>,
    pub predict: Arc<LinearPredict>,
    pub clock: ManualClock,
    pub backend: Arc<MemoryBackend>,
    pub predictor: Predictor,
}

pub fn env() -> Env {
    let api = Arc::new(Fake::default());
    let predict = Arc::new(LinearPredict::default());
    let clock = ManualClock::new(NOW_SECS * 1000);
    let backend = Arc::new(MemoryBackend::new());
    let shared: Arc<dyn Backend> = backend.clone();
    let predictor = Predictor::new(
        api.clone(),
        Storage::local(shared.clone()),
        Settings::new(Storage::sync(shared)),
        predict.clone(),
        Arc::new(clock.clone()),
    );
    Env {
        api,
        predict,
        clock,
        backend,
        predictor,
    }
}

pub fn contest(id: ContestId, name: &str, phase: Phase, start: i64) -> Contest {
    Contest {
        id,
        name: name.to_owned(),
        kind: Some(String::from("CF")),
        phase,
        frozen: false,
        duration_seconds: 2 * 60 * 60,
        start_time_seconds: Some(start),
        relative_time_seconds: None,
    }
}

pub fn row(handle: &str, points: f64, penalty: i64) -> RanklistRow {
    RanklistRow {
        party: Party {
            contest_id: None,
            members: vec![Member {
                handle: handle.to_owned(),
            }],
            participant_type: Some(String::from("CONTESTANT")),
            team_id: None,
            team_name: None,
            ghost: false,
        },
        rank: 0,
        points,
        penalty,
    }
}

pub fn change(handle: &str, old_rating: i32, new_rating: i32) -> RatingChange {
    RatingChange {
        contest_id: None,
        handle: handle.to_owned(),
        rank: 0,
        old_rating,
        new_rating,
    }
}

pub fn standings(contest: Contest, rows: Vec<RanklistRow>) -> Standings {
    Standings {
        contest,
        problems: Vec::new(),
        rows,
    }
}
