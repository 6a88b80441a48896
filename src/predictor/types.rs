use serde::{Deserialize, Serialize};

pub type ContestId = u32;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Before,
    Coding,
    PendingSystemTest,
    SystemTest,
    Finished,
}

/// Contest summary as returned by `contest.list` and inside standings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Contest {
    pub id: ContestId,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    pub phase: Phase,
    #[serde(default)]
    pub frozen: bool,
    #[serde(default)]
    pub duration_seconds: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time_seconds: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_time_seconds: Option<i64>,
}
impl Contest {
    pub fn start_time_millis(&self) -> Option<i64> {
        self.start_time_seconds.map(|s| s * 1000)
    }
    /// `None` while the start time is unknown.
    pub fn end_time_seconds(&self) -> Option<i64> {
        self.start_time_seconds.map(|s| s + self.duration_seconds)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Member {
    pub handle: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    #[serde(default)]
    pub contest_id: Option<ContestId>,
    pub members: Vec<Member>,
    #[serde(default)]
    pub participant_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
    #[serde(default)]
    pub ghost: bool,
}
impl Party {
    /// Handle of the first member; the one ratings are keyed by.
    pub fn handle(&self) -> &str {
        self.members.first().map_or("", |m| m.handle.as_str())
    }
    pub fn is_team(&self) -> bool {
        self.team_id.is_some() || self.team_name.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RanklistRow {
    pub party: Party,
    #[serde(default)]
    pub rank: u32,
    pub points: f64,
    pub penalty: i64,
}
impl RanklistRow {
    pub fn handle(&self) -> &str {
        self.party.handle()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    #[serde(default)]
    pub contest_id: Option<ContestId>,
    pub index: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Standings {
    pub contest: Contest,
    pub problems: Vec<Problem>,
    pub rows: Vec<RanklistRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RatingChange {
    #[serde(default)]
    pub contest_id: Option<ContestId>,
    pub handle: String,
    #[serde(default)]
    pub rank: u32,
    pub old_rating: i32,
    pub new_rating: i32,
}
impl RatingChange {
    pub fn delta(&self) -> i32 {
        self.new_rating - self.old_rating
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub handle: String,
    #[serde(default)]
    pub rating: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_standings_row() {
        let row: RanklistRow = serde_json::from_str(
            r#"{"party":{"contestId":1500,"members":[{"handle":"alice"}],
                "participantType":"CONTESTANT","ghost":false,"room":3},
                "rank":1,"points":6.0,"penalty":100,"successfulHackCount":0}"#,
        )
        .unwrap();
        assert_eq!(row.handle(), "alice");
        assert!(!row.party.is_team());
        assert_eq!(row.penalty, 100);
    }

    #[test]
    fn team_detected_by_name_or_id() {
        let party: Party =
            serde_json::from_str(r#"{"members":[{"handle":"a"}],"teamName":"t"}"#).unwrap();
        assert!(party.is_team());
        let party: Party = serde_json::from_str(r#"{"members":[{"handle":"a"}],"teamId":7}"#).unwrap();
        assert!(party.is_team());
    }

    #[test]
    fn decode_contest_phase() {
        let contest: Contest = serde_json::from_str(
            r#"{"id":1,"name":"Round","type":"CF","phase":"PENDING_SYSTEM_TEST","frozen":false,
                "durationSeconds":7200,"startTimeSeconds":1000}"#,
        )
        .unwrap();
        assert_eq!(contest.phase, Phase::PendingSystemTest);
        assert_eq!(contest.end_time_seconds(), Some(8200));
    }

    #[test]
    fn end_time_unknown_without_start() {
        let contest: Contest = serde_json::from_str(
            r#"{"id":2,"name":"Gym","type":"ICPC","phase":"FINISHED","frozen":false,
                "durationSeconds":18000}"#,
        )
        .unwrap();
        assert_eq!(contest.end_time_seconds(), None);
    }
}
