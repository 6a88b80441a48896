use std::{boxed::Box, convert::Into, error::Error as StdError, fmt, result::Result as StdResult};

const RATING_CHANGES_UNAVAILABLE: &str = "Rating changes are unavailable for this contest";

#[derive(Debug)]
pub struct Error(Box<Inner>);
#[derive(Debug)]
pub enum Kind {
    Network(reqwest::Error),
    Http(u16),
    Json(serde_json::Error),
    Api,
    RatingChangesUnavailable,
    Storage(Box<dyn StdError + Send + Sync>),
    LockNotAcquired,
    UnknownResponseType,
    MissingPerformance,
    Config,
}
#[derive(Debug)]
struct Inner {
    kind: Kind,
    description: Option<String>,
}

pub type Result<T> = StdResult<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.kind {
            Kind::Network(err) => write!(f, "Error sending request: {}", err)?,
            Kind::Http(status) => write!(f, "CF API: HTTP error {}", status)?,
            Kind::Json(err) => write!(f, "CF API: Invalid JSON: {}", err)?,
            Kind::Api => write!(f, "CF API: Error")?,
            Kind::RatingChangesUnavailable => f.write_str(RATING_CHANGES_UNAVAILABLE)?,
            Kind::Storage(err) => write!(f, "Storage: {}", err)?,
            Kind::LockNotAcquired => f.write_str("The lock must be acquired before release")?,
            Kind::UnknownResponseType => f.write_str("Unknown prediction type")?,
            Kind::MissingPerformance => f.write_str("No performance for rating change")?,
            Kind::Config => f.write_str("Invalid configuration")?,
        }
        self.write_description(f)
    }
}
impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match &self.0.kind {
            Kind::Network(x) => Some(x),
            Kind::Json(x) => Some(x),
            Kind::Storage(x) => Some(x.as_ref()),
            _ => None,
        }
    }
}
impl Error {
    fn new(inner: Inner) -> Self {
        Self(Box::new(inner))
    }
    pub fn with_kind(kind: Kind) -> Self {
        Self::new(Inner {
            kind,
            description: None,
        })
    }
    pub fn with_description<T: Into<String>>(kind: Kind, description: T) -> Self {
        Self::new(Inner {
            kind,
            description: Some(description.into()),
        })
    }
    pub fn kind(&self) -> &Kind {
        &self.0.kind
    }
    pub fn description(&self) -> Option<&str> {
        self.0.description.as_deref()
    }
    pub fn is_rating_changes_unavailable(&self) -> bool {
        matches!(self.0.kind, Kind::RatingChangesUnavailable)
    }
    fn write_description(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(d) = &self.0.description {
            write!(f, ": {}", d)
        } else {
            Ok(())
        }
    }
}

/// Maps a FAILED api envelope to an error, recognising the one comment the
/// finished-contest cache recovers from.
pub(crate) fn api_error(comment: Option<String>) -> Error {
    match comment {
        Some(c) if c.contains(RATING_CHANGES_UNAVAILABLE) => {
            Error::with_description(Kind::RatingChangesUnavailable, c)
        }
        Some(c) => Error::with_description(Kind::Api, c),
        None => Error::with_kind(Kind::Api),
    }
}
pub(crate) fn network_error(err: reqwest::Error) -> Error {
    Error::with_kind(Kind::Network(err))
}
pub(crate) fn storage_error<E: StdError + Send + Sync + 'static>(err: E) -> Error {
    Error::with_kind(Kind::Storage(Box::new(err)))
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::with_kind(Kind::Json(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_unavailable_comment() {
        let err = api_error(Some(String::from(
            "contestId: Rating changes are unavailable for this contest",
        )));
        assert!(err.is_rating_changes_unavailable());
        let err = api_error(Some(String::from("contestId: Contest with id 9999 not found")));
        assert!(!err.is_rating_changes_unavailable());
        assert_eq!(
            err.to_string(),
            "CF API: Error: contestId: Contest with id 9999 not found"
        );
    }
}
