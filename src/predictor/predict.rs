//! Contract of the rating prediction algorithm.
//!
//! The algorithm itself lives outside this crate; the orchestrator only needs
//! something implementing [`Predict`].

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Contestant {
    pub handle: String,
    pub points: f64,
    pub penalty: i64,
    pub rating: Option<i32>,
}
impl Contestant {
    pub fn new(handle: String, points: f64, penalty: i64, rating: Option<i32>) -> Self {
        Self {
            handle,
            points,
            penalty,
            rating,
        }
    }
}

/// Performance of a contestant, which is unbounded for whoever is
/// impossible to outperform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Performance {
    Value(i32),
    Infinite,
}
impl Performance {
    pub fn as_rating(self) -> f64 {
        match self {
            Performance::Value(v) => f64::from(v),
            Performance::Infinite => f64::INFINITY,
        }
    }
}
impl fmt::Display for Performance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Performance::Value(v) => write!(f, "{}", v),
            Performance::Infinite => f.write_str("Infinity"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictResult {
    pub handle: String,
    /// Rating before the contest, `None` for unrated contestants.
    pub rating: Option<i32>,
    /// Rating the delta applies to; the default starting rating for unrated ones.
    pub effective_rating: i32,
    pub delta: i32,
    pub performance: Performance,
}
impl PredictResult {
    /// Result row built from official data, where both ratings coincide.
    pub fn official(handle: String, rating: i32, delta: i32, performance: Performance) -> Self {
        Self {
            handle,
            rating: Some(rating),
            effective_rating: rating,
            delta,
            performance,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictMode {
    Predicted,
    Final,
}

pub trait Predict: Send + Sync {
    /// Pure and deterministic: the same contestants always give the same results.
    fn predict(&self, contestants: &[Contestant], mode: PredictMode) -> Vec<PredictResult>;
}
