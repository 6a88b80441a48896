//! User preferences kept in the SYNC storage namespace.

use crate::{
    error::{Error, Kind, Result},
    storage::Storage,
};
use serde::Serialize;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    EnablePredictDeltas,
    EnableFinalDeltas,
    EnablePrefetchRatings,
    ShowColCurrentPerformance,
    ShowColPredictedDelta,
    ShowColRankUpDelta,
    ShowColFinalPerformance,
    ShowColFinalDelta,
    ShowColRankChange,
}

impl Flag {
    pub const ALL: [Flag; 9] = [
        Flag::EnablePredictDeltas,
        Flag::EnableFinalDeltas,
        Flag::EnablePrefetchRatings,
        Flag::ShowColCurrentPerformance,
        Flag::ShowColPredictedDelta,
        Flag::ShowColRankUpDelta,
        Flag::ShowColFinalPerformance,
        Flag::ShowColFinalDelta,
        Flag::ShowColRankChange,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Flag::EnablePredictDeltas => "enablePredictDeltas",
            Flag::EnableFinalDeltas => "enableFinalDeltas",
            Flag::EnablePrefetchRatings => "enablePrefetchRatings",
            Flag::ShowColCurrentPerformance => "showColCurrentPerformance",
            Flag::ShowColPredictedDelta => "showColPredictedDelta",
            Flag::ShowColRankUpDelta => "showColRankUpDelta",
            Flag::ShowColFinalPerformance => "showColFinalPerformance",
            Flag::ShowColFinalDelta => "showColFinalDelta",
            Flag::ShowColRankChange => "showColRankChange",
        }
    }

    // Final deltas were once called "fetch deltas"; the stored key kept the old name.
    fn key(self) -> String {
        match self {
            Flag::EnableFinalDeltas => String::from("settings.enableFetchDeltas"),
            other => format!("settings.{}", other.name()),
        }
    }
}
impl FromStr for Flag {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        Flag::ALL
            .iter()
            .copied()
            .find(|f| f.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::with_description(Kind::Config, format!("unknown preference {}", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Prefs {
    pub enable_predict_deltas: bool,
    pub enable_final_deltas: bool,
    pub enable_prefetch_ratings: bool,
    pub show_col_current_performance: bool,
    pub show_col_predicted_delta: bool,
    pub show_col_rank_up_delta: bool,
    pub show_col_final_performance: bool,
    pub show_col_final_delta: bool,
    pub show_col_rank_change: bool,
    /// Predict even when official rating changes exist. Never persisted.
    #[serde(skip)]
    pub force_predict: bool,
}
impl Default for Prefs {
    fn default() -> Self {
        Self {
            enable_predict_deltas: true,
            enable_final_deltas: true,
            enable_prefetch_ratings: true,
            show_col_current_performance: true,
            show_col_predicted_delta: true,
            show_col_rank_up_delta: true,
            show_col_final_performance: true,
            show_col_final_delta: true,
            show_col_rank_change: true,
            force_predict: false,
        }
    }
}
impl Prefs {
    pub fn get(&self, flag: Flag) -> bool {
        match flag {
            Flag::EnablePredictDeltas => self.enable_predict_deltas,
            Flag::EnableFinalDeltas => self.enable_final_deltas,
            Flag::EnablePrefetchRatings => self.enable_prefetch_ratings,
            Flag::ShowColCurrentPerformance => self.show_col_current_performance,
            Flag::ShowColPredictedDelta => self.show_col_predicted_delta,
            Flag::ShowColRankUpDelta => self.show_col_rank_up_delta,
            Flag::ShowColFinalPerformance => self.show_col_final_performance,
            Flag::ShowColFinalDelta => self.show_col_final_delta,
            Flag::ShowColRankChange => self.show_col_rank_change,
        }
    }
    fn slot(&mut self, flag: Flag) -> &mut bool {
        match flag {
            Flag::EnablePredictDeltas => &mut self.enable_predict_deltas,
            Flag::EnableFinalDeltas => &mut self.enable_final_deltas,
            Flag::EnablePrefetchRatings => &mut self.enable_prefetch_ratings,
            Flag::ShowColCurrentPerformance => &mut self.show_col_current_performance,
            Flag::ShowColPredictedDelta => &mut self.show_col_predicted_delta,
            Flag::ShowColRankUpDelta => &mut self.show_col_rank_up_delta,
            Flag::ShowColFinalPerformance => &mut self.show_col_final_performance,
            Flag::ShowColFinalDelta => &mut self.show_col_final_delta,
            Flag::ShowColRankChange => &mut self.show_col_rank_change,
        }
    }
    pub fn any_deltas(&self) -> bool {
        self.enable_predict_deltas || self.enable_final_deltas
    }
}

#[derive(Clone)]
pub struct Settings {
    storage: Storage,
}

impl Settings {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    pub async fn get(&self, flag: Flag) -> Result<bool> {
        self.storage.get(&flag.key(), true).await
    }
    pub async fn set(&self, flag: Flag, value: bool) -> Result<()> {
        self.storage.set(&flag.key(), &value).await
    }

    pub async fn prefs(&self) -> Result<Prefs> {
        let mut prefs = Prefs::default();
        for flag in Flag::ALL.iter().copied() {
            *prefs.slot(flag) = self.get(flag).await?;
        }
        Ok(prefs)
    }
}
