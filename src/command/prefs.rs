use crate::{
    read::{read_bool, read_rating},
    write::write_rank,
};
use cf_predictor::{
    error::Result,
    rank,
    settings::{Flag, Settings},
};
use std::io::Write;
use termcolor::{Color, StandardStream};

pub async fn prefs(
    stdout: &mut StandardStream,
    settings: &Settings,
    update: Option<(&str, &str)>,
) -> Result<()> {
    if let Some((name, value)) = update {
        let flag: Flag = name.parse()?;
        settings.set(flag, read_bool(value)?).await?;
        write_ok!(stdout, "Success", "Set {}", flag.name());
    }
    let prefs = settings.prefs().await?;
    for flag in Flag::ALL.iter().copied() {
        if prefs.get(flag) {
            write_ok!(stdout, "on", "{}", flag.name());
        } else {
            write_warn!(stdout, "off", "{}", flag.name());
        }
    }
    Ok(())
}

pub fn rank(stdout: &mut StandardStream, arg: &str) -> Result<()> {
    let rating = read_rating(arg)?;
    let tier = rank::for_rating(Some(f64::from(rating)));
    let _ = write!(stdout, "{:>9}: ", tier.abbr);
    write_rank(stdout, tier);
    let _ = writeln!(stdout);
    match (tier.high, tier.next()) {
        (Some(high), Some(next)) => {
            write_info!(stdout, "Next", "{} at {} ({} more)", next, high, high - rating)
        }
        _ => write_info!(stdout, "Next", "Already at the top"),
    }
    Ok(())
}
