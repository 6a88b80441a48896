use crate::{
    error::{Error, Kind, Result},
    predict::{Performance, PredictResult},
    rank::{self, Rank},
};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseType {
    Predicted,
    Final,
}
impl ResponseType {
    pub fn as_str(self) -> &'static str {
        match self {
            ResponseType::Predicted => "PREDICTED",
            ResponseType::Final => "FINAL",
        }
    }
}
impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
impl FromStr for ResponseType {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "PREDICTED" => Ok(ResponseType::Predicted),
            "FINAL" => Ok(ResponseType::Final),
            _ => Err(Error::with_description(Kind::UnknownResponseType, s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedPerformance {
    pub value: String,
    pub color_class: Option<&'static str>,
}
impl From<Performance> for FormattedPerformance {
    fn from(perf: Performance) -> Self {
        Self {
            value: perf.to_string(),
            color_class: rank::for_rating(Some(perf.as_rating())).color_class,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RowDetail {
    #[serde(rename_all = "camelCase")]
    Predicted {
        delta_req_for_rank_up: i32,
        next_rank: Option<&'static Rank>,
    },
    #[serde(rename_all = "camelCase")]
    Final { new_rank: &'static Rank },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictResponseRow {
    pub delta: i32,
    pub rank: &'static Rank,
    pub performance: FormattedPerformance,
    #[serde(flatten)]
    pub detail: RowDetail,
}

/// Display rows keyed by handle.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictResponse {
    pub row_map: HashMap<String, PredictResponseRow>,
    #[serde(rename = "type")]
    pub kind: ResponseType,
    pub fetch_time: i64,
}

impl PredictResponse {
    pub fn new(results: Vec<PredictResult>, kind: ResponseType, fetch_time: i64) -> Self {
        let row_map = results
            .into_iter()
            .map(|r| {
                let row = format_row(&r, kind);
                (r.handle, row)
            })
            .collect();
        Self {
            row_map,
            kind,
            fetch_time,
        }
    }

    pub fn get(&self, handle: &str) -> Option<&PredictResponseRow> {
        self.row_map.get(handle)
    }
}

fn format_row(result: &PredictResult, kind: ResponseType) -> PredictResponseRow {
    let rank = rank::for_rating(result.rating.map(f64::from));
    let effective = result.effective_rating;
    let detail = match kind {
        ResponseType::Predicted => {
            let effective_rank = rank::for_rating(Some(f64::from(effective)));
            RowDetail::Predicted {
                delta_req_for_rank_up: effective_rank.high.map_or(0, |h| h - effective),
                next_rank: effective_rank.next(),
            }
        }
        // Unrated contestants already carry the default starting rating as
        // their old rating in final data, but keep the general formula.
        ResponseType::Final => RowDetail::Final {
            new_rank: rank::for_rating(Some(f64::from(effective + result.delta))),
        },
    };
    PredictResponseRow {
        delta: result.delta,
        rank,
        performance: result.performance.into(),
        detail,
    }
}
