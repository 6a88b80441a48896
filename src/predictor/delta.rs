//! Decides per contest whether rating deltas are shown, and which kind.

use crate::{
    cache::{ContestData, Contests, ContestsComplete, Rated, Ratings},
    client::Api,
    clock::Clock,
    config::delta::{EDU_ROUND_RATED_THRESHOLD, UNRATED_HINTS},
    error::{Error, Kind, Result},
    predict::{Contestant, Predict, PredictMode, PredictResult},
    response::{PredictResponse, ResponseType},
    settings::{Prefs, Settings},
    storage::Storage,
    types::{ContestId, RanklistRow},
};
use log::debug;
use std::{collections::HashMap, sync::Arc};

pub fn is_unrated_by_name(contest_name: &str) -> bool {
    let lower = contest_name.to_lowercase();
    UNRATED_HINTS.iter().any(|hint| lower.contains(hint))
}

pub fn is_educational(contest_name: &str) -> bool {
    contest_name.to_lowercase().contains("educational")
}

fn any_row_has_team(rows: &[RanklistRow]) -> bool {
    rows.iter().any(|row| row.party.is_team())
}

/// Outcome of the decision tree, before any prediction work is done.
#[derive(Debug, Clone)]
pub enum Decision {
    Disabled,
    UnratedContest,
    Final(Arc<ContestData>),
    Predicted(Arc<ContestData>),
}

#[derive(Debug, Clone)]
pub enum Deltas {
    Disabled,
    UnratedContest,
    Ok {
        prefs: Prefs,
        response: PredictResponse,
    },
}

pub struct Predictor {
    contests: Arc<Contests>,
    complete: Arc<ContestsComplete>,
    ratings: Arc<Ratings>,
    settings: Settings,
    predict: Option<Arc<dyn Predict>>,
    clock: Arc<dyn Clock>,
}

impl Predictor {
    /// Builds every cache over the `local` storage namespace.
    pub fn new(
        api: Arc<dyn Api>,
        local: Storage,
        settings: Settings,
        predict: Arc<dyn Predict>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let mut predictor = Self::without_predict(api, local, settings, clock);
        predictor.predict = Some(predict);
        predictor
    }

    /// Decisions and cache maintenance only; computing deltas fails with
    /// [`Kind::Config`].
    pub fn without_predict(
        api: Arc<dyn Api>,
        local: Storage,
        settings: Settings,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            contests: Arc::new(Contests::new(api.clone(), local.clone(), clock.clone())),
            complete: Arc::new(ContestsComplete::new(api.clone(), local.clone(), clock.clone())),
            ratings: Arc::new(Ratings::new(api, local, clock.clone())),
            settings,
            predict: None,
            clock,
        }
    }

    fn predict(&self) -> Result<&dyn Predict> {
        self.predict
            .as_deref()
            .ok_or_else(|| Error::with_description(Kind::Config, "no predict function configured"))
    }

    pub fn contests(&self) -> &Contests {
        &self.contests
    }
    pub fn complete(&self) -> &ContestsComplete {
        &self.complete
    }
    pub fn ratings(&self) -> &Ratings {
        &self.ratings
    }
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub async fn predict_deltas(&self, contest_id: ContestId) -> Result<Deltas> {
        let prefs = self.settings.prefs().await?;
        self.compute_deltas(contest_id, &prefs).await
    }

    pub async fn compute_deltas(&self, contest_id: ContestId, prefs: &Prefs) -> Result<Deltas> {
        let response = match self.decide(contest_id, prefs).await? {
            Decision::Disabled => return Ok(Deltas::Disabled),
            Decision::UnratedContest => return Ok(Deltas::UnratedContest),
            Decision::Final(data) => self.get_final(&data)?,
            Decision::Predicted(data) => self.get_predicted(&data).await?,
        };
        Ok(Deltas::Ok {
            prefs: *prefs,
            response,
        })
    }

    pub async fn decide(&self, contest_id: ContestId, prefs: &Prefs) -> Result<Decision> {
        if !prefs.any_deltas() {
            return Ok(Decision::Disabled);
        }
        if let Some(contest) = self.contests.get_cached(contest_id).await? {
            if is_unrated_by_name(&contest.name) {
                debug!("Contest {} unrated by name", contest_id);
                return Ok(Decision::UnratedContest);
            }
        }

        let data = self.complete.fetch(contest_id).await?;
        self.contests.update(data.contest.clone()).await?;

        if data.rated == Rated::No {
            return Ok(Decision::UnratedContest);
        }
        if matches!(data.rated, Rated::Yes { .. }) && !prefs.force_predict {
            return Ok(if prefs.enable_final_deltas {
                Decision::Final(data)
            } else {
                Decision::Disabled
            });
        }

        // Still LIKELY from here on.
        if is_unrated_by_name(&data.contest.name) || any_row_has_team(&data.rows) {
            return Ok(Decision::UnratedContest);
        }
        if !prefs.enable_predict_deltas {
            return Ok(Decision::Disabled);
        }
        Ok(Decision::Predicted(data))
    }

    fn predict_for_rows<'a, I>(
        predict: &dyn Predict,
        rows: I,
        rating_before: &HashMap<String, i32>,
        mode: PredictMode,
    ) -> Vec<PredictResult>
    where
        I: IntoIterator<Item = &'a RanklistRow>,
    {
        let contestants: Vec<Contestant> = rows
            .into_iter()
            .map(|row| {
                let handle = row.handle();
                Contestant::new(
                    handle.to_owned(),
                    row.points,
                    row.penalty,
                    rating_before.get(handle).copied(),
                )
            })
            .collect();
        predict.predict(&contestants, mode)
    }

    /// Official deltas of a rated contest, with performances computed once
    /// per entry.
    pub fn get_final(&self, data: &ContestData) -> Result<PredictResponse> {
        let (changes, old_ratings) = match &data.rated {
            Rated::Yes {
                rating_changes,
                old_ratings,
            } => (rating_changes, old_ratings),
            other => {
                return Err(Error::with_description(
                    Kind::Config,
                    format!("no final deltas for a contest rated {}", other.name()),
                ))
            }
        };
        let predict = self.predict()?;
        let performances = data.performances_or_init(|| {
            let rows = data
                .rows
                .iter()
                .filter(|row| old_ratings.contains_key(row.handle()));
            Self::predict_for_rows(predict, rows, old_ratings, PredictMode::Final)
                .into_iter()
                .map(|r| (r.handle, r.performance))
                .collect()
        });

        let results = changes
            .iter()
            .map(|change| -> Result<PredictResult> {
                let performance = *performances.get(&change.handle).ok_or_else(|| {
                    Error::with_description(Kind::MissingPerformance, change.handle.clone())
                })?;
                let old = old_ratings
                    .get(&change.handle)
                    .copied()
                    .unwrap_or(change.old_rating);
                Ok(PredictResult::official(
                    change.handle.clone(),
                    old,
                    change.new_rating - old,
                    performance,
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(PredictResponse::new(
            results,
            ResponseType::Final,
            data.fetch_time,
        ))
    }

    pub async fn get_predicted(&self, data: &ContestData) -> Result<PredictResponse> {
        let predict = self.predict()?;
        let start = data.contest.start_time_millis().unwrap_or(0);
        let ratings = self.ratings.fetch_current_ratings(start).await?;
        let results = if is_educational(&data.contest.name) {
            // Educational standings also list contestants the round is not rated for.
            let rows = data.rows.iter().filter(|row| {
                ratings
                    .get(row.handle())
                    .map_or(true, |&r| r < EDU_ROUND_RATED_THRESHOLD)
            });
            Self::predict_for_rows(predict, rows, &ratings, PredictMode::Predicted)
        } else {
            Self::predict_for_rows(predict, &data.rows, &ratings, PredictMode::Predicted)
        };
        Ok(PredictResponse::new(
            results,
            ResponseType::Predicted,
            data.fetch_time,
        ))
    }

    pub async fn maybe_update_contest_list(&self) -> Result<()> {
        if !self.settings.prefs().await?.any_deltas() {
            return Ok(());
        }
        self.contests.maybe_refresh().await
    }

    /// Start (ms) of the closest list-cached contest that has not started
    /// and is not unrated by name.
    pub async fn nearest_upcoming_rated_contest_start(&self) -> Result<Option<i64>> {
        let now = self.clock.now_millis();
        Ok(self
            .contests
            .list()
            .await?
            .into_iter()
            .filter(|c| !is_unrated_by_name(&c.name))
            .map(|c| c.start_time_millis().unwrap_or(0))
            .filter(|&start| start >= now)
            .min())
    }

    pub async fn maybe_update_ratings(&self) -> Result<()> {
        let prefs = self.settings.prefs().await?;
        if !prefs.enable_predict_deltas || !prefs.enable_prefetch_ratings {
            return Ok(());
        }
        match self.nearest_upcoming_rated_contest_start().await? {
            Some(start) => self.ratings.maybe_refresh_cache(start).await,
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrated_hints() {
        assert!(is_unrated_by_name("Codeforces Round #700 (Div. 2, Unrated)"));
        assert!(is_unrated_by_name("April Fools Day Contest 2021"));
        assert!(is_unrated_by_name("Microsoft Q# Coding Contest"));
        assert!(is_unrated_by_name("Kotlin Heroes: Episode 7"));
        assert!(is_unrated_by_name("Marathon Round"));
        assert!(is_unrated_by_name("ICPC Teams Training"));
        assert!(!is_unrated_by_name("Educational Codeforces Round 105 (Rated for Div. 2)"));
    }

    #[test]
    fn educational() {
        assert!(is_educational("Educational Codeforces Round 105"));
        assert!(!is_educational("Codeforces Round #709"));
    }
}
