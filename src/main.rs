use cf_predictor::{
    client::Session,
    clock::{Clock, SystemClock},
    error::Result,
    settings::Settings,
    storage::{Backend, FileBackend, Storage},
    Predictor,
};
use clap::{crate_description, crate_name, Arg, ArgMatches, Command};
use pretty_env_logger::init_timed;
use std::{io::Write, sync::Arc};
use termcolor::{Color, ColorChoice, StandardStream, WriteColor};

#[macro_use]
mod color;
mod command {
    pub mod contest;
    pub mod maintain;
    pub mod prefs;
}
mod read;
mod write;

use command::{contest, maintain, prefs};

fn cli() -> Command {
    let contest_arg = || Arg::new("contest").required(true).help("Contest id or url");
    Command::new(crate_name!())
        .about(crate_description!())
        .version(get_version!("version"))
        .long_version(get_version!("long_version"))
        .subcommand_required(true)
        .arg(
            Arg::new("storage")
                .long("storage")
                .value_name("PATH")
                .default_value(".cf-predictor")
                .help("Directory holding cached data and preferences"),
        )
        .arg(
            Arg::new("api")
                .long("api")
                .value_name("URL")
                .help("Base url of the contest api"),
        )
        .subcommand(Command::new("refresh").about("Refresh the contest list and prefetch ratings"))
        .subcommand(Command::new("contests").about("List upcoming contests"))
        .subcommand(
            Command::new("status")
                .about("Show which deltas a contest gets")
                .arg(contest_arg()),
        )
        .subcommand(
            Command::new("changes")
                .about("Show official rating changes of a contest")
                .arg(contest_arg()),
        )
        .subcommand(
            Command::new("rank")
                .about("Look up the rank of a rating")
                .arg(Arg::new("rating").required(true)),
        )
        .subcommand(
            Command::new("prefs")
                .about("Show or set preferences")
                .arg(Arg::new("name").requires("value"))
                .arg(Arg::new("value")),
        )
        .subcommand(Command::new("clear-cache").about("Remove all cached data"))
}

fn arg<'a>(matches: &'a ArgMatches, name: &str) -> &'a str {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .unwrap_or_default()
}

async fn run(stdout: &mut StandardStream, matches: &ArgMatches) -> Result<()> {
    if let Some(("rank", sub)) = matches.subcommand() {
        return prefs::rank(stdout, arg(sub, "rating"));
    }

    let backend: Arc<dyn Backend> = Arc::new(FileBackend::open(arg(matches, "storage")).await?);
    let local = Storage::local(backend.clone());
    let settings = Settings::new(Storage::sync(backend));
    let api = match matches.get_one::<String>("api") {
        Some(base) => Session::with_base(base.as_str())?,
        None => Session::new()?,
    };
    let clock = Arc::new(SystemClock);
    let predictor =
        Predictor::without_predict(Arc::new(api), local.clone(), settings.clone(), clock.clone());

    match matches.subcommand() {
        Some(("refresh", _)) => maintain::refresh(stdout, &predictor).await,
        Some(("contests", _)) => contest::contests(stdout, &predictor, clock.now_millis()).await,
        Some(("status", sub)) => contest::status(stdout, &predictor, arg(sub, "contest")).await,
        Some(("changes", sub)) => contest::changes(stdout, &predictor, arg(sub, "contest")).await,
        Some(("prefs", sub)) => {
            let update = sub
                .get_one::<String>("name")
                .map(|name| (name.as_str(), arg(sub, "value")));
            prefs::prefs(stdout, &settings, update).await
        }
        Some(("clear-cache", _)) => maintain::clear_cache(stdout, &local).await,
        _ => Ok(()),
    }
}

#[tokio::main]
async fn main() {
    init_timed();
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let matches = cli().get_matches();
    let code = match run(&mut stdout, &matches).await {
        Ok(()) => 0,
        Err(e) => {
            write_error!(&mut stdout, "Error", "{}", e);
            1
        }
    };
    let _ = stdout.reset();
    std::process::exit(code);
}
