use cf_predictor::{error::Result, storage::Storage, Predictor};
use std::io::Write;
use termcolor::{Color, StandardStream};

/// Runs the periodic maintenance once: contest list, then ratings prefetch.
pub async fn refresh(stdout: &mut StandardStream, predictor: &Predictor) -> Result<()> {
    predictor.maybe_update_contest_list().await?;
    write_ok!(
        stdout,
        "Contests",
        "{} contests cached",
        predictor.contests().list().await?.len()
    );
    predictor.maybe_update_ratings().await?;
    match predictor.nearest_upcoming_rated_contest_start().await? {
        Some(start) if predictor.ratings().timestamp().await? > 0 => {
            write_ok!(stdout, "Ratings", "Snapshot ready for contest at {}", start / 1000)
        }
        Some(_) => write_info!(stdout, "Ratings", "Next rated contest is not close yet"),
        None => write_info!(stdout, "Ratings", "No upcoming rated contest"),
    }
    Ok(())
}

pub async fn clear_cache(stdout: &mut StandardStream, local: &Storage) -> Result<()> {
    let removed = local.clear().await?;
    write_ok!(stdout, "Success", "Removed {} cached entries", removed);
    Ok(())
}
