use crate::color::{rank_color, reset_fg, set_fg};
use cf_predictor::rank::Rank;
use std::io::Write;
use termcolor::{Color, StandardStream};

/// Rank name in its tier colour, without a trailing newline.
pub fn write_rank(stdout: &mut StandardStream, rank: &Rank) {
    if let Some(color) = rank_color(rank.color_class) {
        set_fg(stdout, color);
    }
    let _ = write!(stdout, "{}", rank);
    reset_fg(stdout);
}

pub fn write_delta(stdout: &mut StandardStream, delta: i32) {
    set_fg(stdout, if delta >= 0 { Color::Green } else { Color::Red });
    let _ = write!(stdout, "{:+}", delta);
    reset_fg(stdout);
}
