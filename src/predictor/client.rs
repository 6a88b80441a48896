use crate::{
    error::{api_error, Result},
    types::{Contest, ContestId, RatingChange, Standings, User},
};
use async_trait::async_trait;
use serde::Deserialize;

pub mod session;
pub use session::Session;

/// The subset of the codeforces api the caches need.
#[async_trait]
pub trait Api: Send + Sync {
    async fn contest_list(&self) -> Result<Vec<Contest>>;
    async fn contest_standings(&self, contest_id: ContestId) -> Result<Standings>;
    /// Fails with `Kind::RatingChangesUnavailable` when the contest has no
    /// rating data.
    async fn contest_rating_changes(&self, contest_id: ContestId) -> Result<Vec<RatingChange>>;
    async fn user_rated_list(&self, active_only: bool) -> Result<Vec<User>>;
}

#[derive(Deserialize)]
pub(crate) struct Envelope<T> {
    status: String,
    #[serde(default)]
    comment: Option<String>,
    result: Option<T>,
}
impl<T> Envelope<T> {
    pub(crate) fn into_result(self) -> Result<T> {
        match self.result {
            Some(v) if self.status == "OK" => Ok(v),
            _ => Err(api_error(self.comment)),
        }
    }
}
