use chrono::{DateTime, Local};
use std::{env, io::Write, path::Path, process::Command};
include!("./src/predictor/config.rs");

fn launch(cmd: &mut Command) -> String {
    cmd.output()
        .ok()
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .unwrap_or_default()
}
fn exec<I: std::iter::IntoIterator<Item = impl AsRef<std::ffi::OsStr>>>(
    cmd: &str,
    args: I,
) -> String {
    launch(Command::new(cmd).args(args))
}

fn set_short_version(out_dir: &Path, date: &DateTime<Local>, branch: &str, profile: &str) {
    write!(
        std::fs::File::create(out_dir.join("version")).expect("Failed to create version file"),
        "(git@{} {} {}) {}",
        exec("git", &["log", "-1", "--pretty=format:%h"]).trim(),
        branch,
        date.date_naive(),
        profile
    )
    .unwrap();
}
fn set_long_version(out_dir: &Path, date: &DateTime<Local>, branch: &str, profile: &str) {
    let mut f = std::io::BufWriter::new(
        std::fs::File::create(out_dir.join("long_version")).expect("Failed to create long version"),
    );
    writeln!(&mut f, "{}", profile).unwrap();
    writeln!(
        &mut f,
        "commit: {} git@{}",
        branch,
        exec("git", &["log", "-1", "--pretty=format:%H"]).trim()
    )
    .unwrap();
    writeln!(
        &mut f,
        "rustc: {} {}",
        exec(env::var("RUSTC").unwrap_or_default().as_str(), &["--version"]).trim(),
        env::var("TARGET").unwrap_or_default()
    )
    .unwrap();
    writeln!(&mut f, "date: {}", date.to_rfc3339()).unwrap();
    writeln!(
        &mut f,
        r#"contest_list:
    refresh_interval: {}s"#,
        contests::REFRESH_INTERVAL.as_secs()
    )
    .unwrap();
    writeln!(
        &mut f,
        r#"finished_contests:
    capacity: {}
    magic_cache_duration: {}s
    rating_pending_max_days: {}"#,
        complete::MAX_FINISHED_CONTESTS_TO_CACHE,
        complete::MAGIC_CACHE_DURATION.as_secs(),
        complete::RATING_PENDING_MAX_DAYS
    )
    .unwrap();
    writeln!(
        &mut f,
        r#"ratings:
    max_snapshot_age: {}s
    prefetch_window: {}s"#,
        ratings::MAX_SNAPSHOT_AGE.as_secs(),
        ratings::PREFETCH_WINDOW.as_secs()
    )
    .unwrap();
}
fn get_branch() -> String {
    let branch = exec("git", &["symbolic-ref", "--short", "-q", "HEAD"]);
    let trim = branch.trim();
    if trim.is_empty() {
        exec("git", &["describe", "--tags", "--exact-match", "HEAD"])
            .trim()
            .to_string()
    } else {
        trim.to_string()
    }
}

fn main() {
    println!("cargo:rerun-if-changed=src/predictor/config.rs");
    let profile = env::var("PROFILE").unwrap_or_default();
    let buf = env::var("OUT_DIR").unwrap();
    let out_dir = Path::new(buf.as_str());
    let branch = get_branch();
    let time = Local::now();
    set_short_version(out_dir, &time, &branch, &profile);
    set_long_version(out_dir, &time, &branch, &profile);
}
