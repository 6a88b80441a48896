use super::{Api, Envelope};
use crate::{
    config::client::{API_BASE, TIMEOUT, USER_AGENT},
    error::{network_error, Error, Kind, Result},
    types::{Contest, ContestId, RatingChange, Standings, User},
};
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

/// HTTP client for `https://codeforces.com/api/`.
pub struct Session {
    client: Client,
    base: String,
}

impl Session {
    pub fn new() -> Result<Self> {
        Self::with_base(API_BASE)
    }
    pub fn with_base<T: Into<String>>(base: T) -> Result<Self> {
        let mut base = base.into();
        if !base.ends_with('/') {
            base.push('/');
        }
        Ok(Session {
            client: Client::builder()
                .user_agent(USER_AGENT)
                .timeout(TIMEOUT)
                .build()
                .map_err(network_error)?,
            base,
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, method: &str, query: &[(&str, String)]) -> Result<T> {
        debug!("GET {}{} {:?}", self.base, method, query);
        let response = self
            .client
            .get(format!("{}{}", self.base, method))
            .query(query)
            .send()
            .await
            .map_err(network_error)?;
        let status = response.status();
        let text = response.text().await.map_err(network_error)?;
        // Failed calls still carry an envelope with the reason in `comment`.
        match serde_json::from_str::<Envelope<T>>(&text) {
            Ok(env) => env.into_result(),
            Err(_) if status != StatusCode::OK => Err(Error::with_description(
                Kind::Http(status.as_u16()),
                text,
            )),
            Err(e) => Err(Error::from(e)),
        }
    }
}

#[async_trait]
impl Api for Session {
    async fn contest_list(&self) -> Result<Vec<Contest>> {
        self.fetch("contest.list", &[]).await
    }
    async fn contest_standings(&self, contest_id: ContestId) -> Result<Standings> {
        self.fetch("contest.standings", &[("contestId", contest_id.to_string())])
            .await
    }
    async fn contest_rating_changes(&self, contest_id: ContestId) -> Result<Vec<RatingChange>> {
        self.fetch(
            "contest.ratingChanges",
            &[("contestId", contest_id.to_string())],
        )
        .await
    }
    async fn user_rated_list(&self, active_only: bool) -> Result<Vec<User>> {
        self.fetch("user.ratedList", &[("activeOnly", active_only.to_string())])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        matchers::{method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    async fn session(server: &MockServer) -> Session {
        Session::with_base(format!("{}/api", server.uri())).unwrap()
    }

    #[tokio::test]
    async fn contest_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/contest.list"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"status":"OK","result":[{"id":1500,"name":"Codeforces Round #709 (Div. 1)",
                    "type":"CF","phase":"FINISHED","frozen":false,"durationSeconds":7200,
                    "startTimeSeconds":1616322900,"relativeTimeSeconds":100}]}"#,
            ))
            .mount(&server)
            .await;
        let list = session(&server).await.contest_list().await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, 1500);
    }

    #[tokio::test]
    async fn rating_changes_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/contest.ratingChanges"))
            .and(query_param("contestId", "1"))
            .respond_with(ResponseTemplate::new(400).set_body_string(
                r#"{"status":"FAILED","comment":"contestId: Rating changes are unavailable for this contest"}"#,
            ))
            .mount(&server)
            .await;
        let err = session(&server)
            .await
            .contest_rating_changes(1)
            .await
            .unwrap_err();
        assert!(err.is_rating_changes_unavailable());
    }

    #[tokio::test]
    async fn http_error_without_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/contest.standings"))
            .respond_with(ResponseTemplate::new(503).set_body_string("<html>busy</html>"))
            .mount(&server)
            .await;
        let err = session(&server)
            .await
            .contest_standings(2)
            .await
            .unwrap_err();
        assert!(matches!(err.kind(), Kind::Http(503)));
        assert!(!err.is_rating_changes_unavailable());
    }
}
