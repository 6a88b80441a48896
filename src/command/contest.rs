use crate::{
    read::read_contest,
    write::{write_delta, write_rank},
};
use cf_predictor::{
    cache::Rated,
    delta::is_unrated_by_name,
    error::{Error, Kind, Result},
    rank,
    types::Contest,
    Decision, Predictor,
};
use chrono::{Local, TimeZone};
use std::io::Write;
use termcolor::{Color, StandardStream};

fn format_start(contest: &Contest) -> String {
    contest
        .start_time_seconds
        .and_then(|s| Local.timestamp_opt(s, 0).single())
        .map_or_else(|| String::from("unknown"), |t| t.format("%Y-%m-%d %H:%M").to_string())
}

/// Upcoming contests known to the list cache, soonest first.
pub async fn contests(stdout: &mut StandardStream, predictor: &Predictor, now: i64) -> Result<()> {
    let mut upcoming: Vec<Contest> = predictor
        .contests()
        .list()
        .await?
        .into_iter()
        .filter(|c| c.start_time_millis().map_or(false, |s| s >= now))
        .collect();
    upcoming.sort_by_key(|c| c.start_time_seconds);
    if upcoming.is_empty() {
        write_info!(stdout, "Info", "No upcoming contests cached, try refresh");
    }
    for c in upcoming {
        if is_unrated_by_name(&c.name) {
            write_warn!(stdout, "Unrated", "{} {} at {}", c.id, c.name, format_start(&c));
        } else {
            write_info!(stdout, "Rated", "{} {} at {}", c.id, c.name, format_start(&c));
        }
    }
    Ok(())
}

pub async fn status(stdout: &mut StandardStream, predictor: &Predictor, arg: &str) -> Result<()> {
    let id = read_contest(arg)?;
    let prefs = predictor.settings().prefs().await?;
    let data = match predictor.decide(id, &prefs).await? {
        Decision::Disabled => {
            write_warn!(stdout, "Status", "Deltas disabled for contest {}", id);
            return Ok(());
        }
        Decision::UnratedContest => {
            write_warn!(stdout, "Status", "Contest {} is unrated", id);
            return Ok(());
        }
        Decision::Final(data) => {
            write_ok!(stdout, "Status", "Final deltas for contest {}", id);
            data
        }
        Decision::Predicted(data) => {
            write_ok!(stdout, "Status", "Predicted deltas for contest {}", id);
            data
        }
    };
    write_info!(stdout, "Contest", "{} ({:?})", data.contest.name, data.contest.phase);
    write_info!(stdout, "Rated", "{}", data.rated.name());
    write_info!(
        stdout,
        "Standings",
        "{} rows, {} problems",
        data.rows.len(),
        data.problems
    );
    if let Rated::Yes { rating_changes, .. } = &data.rated {
        write_info!(stdout, "Changes", "{} rating changes", rating_changes.len());
    }
    Ok(())
}

/// Official rating changes of a rated contest, by final rank.
pub async fn changes(stdout: &mut StandardStream, predictor: &Predictor, arg: &str) -> Result<()> {
    let id = read_contest(arg)?;
    let data = predictor.complete().fetch(id).await?;
    let (changes, old_ratings) = match &data.rated {
        Rated::Yes {
            rating_changes,
            old_ratings,
        } => (rating_changes, old_ratings),
        other => {
            return Err(Error::with_description(
                Kind::Config,
                format!("contest {} is rated {}", id, other.name()),
            ))
        }
    };
    let mut changes: Vec<_> = changes.iter().collect();
    changes.sort_by_key(|c| c.rank);
    write_info!(stdout, "Contest", "{}", data.contest.name);
    for change in changes {
        let old = old_ratings
            .get(&change.handle)
            .copied()
            .unwrap_or(change.old_rating);
        let _ = write!(
            stdout,
            "{:>6} {:<24} {:>5} -> {:>5} ",
            change.rank, change.handle, old, change.new_rating
        );
        write_delta(stdout, change.new_rating - old);
        let _ = write!(stdout, " ");
        write_rank(stdout, rank::for_rating(Some(f64::from(change.new_rating))));
        let _ = writeln!(stdout);
    }
    Ok(())
}
