use cf_predictor::{
    error::{Error, Kind, Result},
    types::ContestId,
};
use regex::Regex;

fn invalid(what: &str, arg: &str) -> Error {
    Error::with_description(Kind::Config, format!("invalid {}: {}", what, arg))
}

/// Contest id from a bare number or any url containing `/contest/<id>`.
pub fn read_contest(arg: &str) -> Result<ContestId> {
    let arg = arg.trim();
    if let Ok(id) = arg.parse() {
        return Ok(id);
    }
    let re = Regex::new(r"/(?:contest|gym)/(\d+)").map_err(|_| invalid("contest", arg))?;
    re.captures(arg)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .ok_or_else(|| invalid("contest", arg))
}

pub fn read_rating(arg: &str) -> Result<i32> {
    arg.trim().parse().map_err(|_| invalid("rating", arg))
}

pub fn read_bool(arg: &str) -> Result<bool> {
    match arg.trim().to_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(invalid("value", arg)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contest_from_id_or_url() {
        assert_eq!(read_contest("1500").unwrap(), 1500);
        assert_eq!(
            read_contest("https://codeforces.com/contest/1500/standings").unwrap(),
            1500
        );
        assert_eq!(
            read_contest("https://codeforces.com/contest/1843/problem/A").unwrap(),
            1843
        );
        assert!(read_contest("https://codeforces.com/profile/tourist").is_err());
        assert!(matches!(read_contest("abc").unwrap_err().kind(), Kind::Config));
    }

    #[test]
    fn bools() {
        assert!(read_bool("ON").unwrap());
        assert!(!read_bool("false").unwrap());
        assert!(read_bool("maybe").is_err());
    }

    #[test]
    fn ratings() {
        assert_eq!(read_rating(" 1899 ").unwrap(), 1899);
        assert!(read_rating("high").is_err());
    }
}
