mod app;
mod command;
mod config;
mod consts;
mod game;
mod util;
use crate::app::{App, AppError};
use crate::config::{Config, ConfigError};
use crate::game::Game;
use lexopt::{Arg, ValueExt};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static USAGE: &str = "\
Usage: gridsnake [options]

Play Snake in the terminal.

Options:
  -c, --config <PATH>     Read configuration from the given file
      --log-file <PATH>   Write log messages to the given file
      --seed <N>          Seed the random number generator with the given
                          integer
  -h, --help              Display this help message and exit
  -V, --version           Show the program version and exit
";

#[derive(Clone, Debug, Eq, PartialEq)]
enum Mode {
    Run(RunOptions),
    Help,
    Version,
}

impl Mode {
    fn from_parser(mut parser: lexopt::Parser) -> Result<Mode, lexopt::Error> {
        let mut opts = RunOptions::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('c') | Arg::Long("config") => {
                    opts.config = Some(PathBuf::from(parser.value()?));
                }
                Arg::Long("log-file") => {
                    opts.log_file = Some(PathBuf::from(parser.value()?));
                }
                Arg::Long("seed") => opts.seed = Some(parser.value()?.parse()?),
                Arg::Short('h') | Arg::Long("help") => return Ok(Mode::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Mode::Version),
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Mode::Run(opts))
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct RunOptions {
    config: Option<PathBuf>,
    log_file: Option<PathBuf>,
    seed: Option<u64>,
}

impl RunOptions {
    fn run(self) -> ExitCode {
        if let Some(ref path) = self.log_file {
            if let Err(e) = init_logging(path) {
                return report(&e);
            }
        }
        let config = match self.load_config() {
            Ok(config) => config,
            Err(e) => return report(&e),
        };
        let rng = match self.seed {
            Some(seed) => ChaCha12Rng::seed_from_u64(seed),
            None => ChaCha12Rng::from_rng(&mut rand::rng()),
        };
        let game = match Game::new(&config, rng) {
            Ok(game) => game,
            Err(e) => return report(&e),
        };
        let terminal = ratatui::init();
        let r = App::new(game).run(terminal);
        ratatui::restore();
        app_exit(r)
    }

    fn load_config(&self) -> Result<Config, ConfigError> {
        if let Some(ref path) = self.config {
            info!(path = %path.display(), "Loading configuration");
            return Config::load(path, false);
        }
        match Config::default_path() {
            Ok(path) => Config::load(&path, true),
            Err(e) => {
                warn!("{e}; using default configuration");
                Ok(Config::default())
            }
        }
    }
}

fn main() -> ExitCode {
    match Mode::from_parser(lexopt::Parser::from_env()) {
        Ok(Mode::Run(opts)) => opts.run(),
        Ok(Mode::Help) => {
            print!("{USAGE}");
            ExitCode::SUCCESS
        }
        Ok(Mode::Version) => {
            println!("gridsnake {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("gridsnake: {e}");
            eprintln!("Run `gridsnake --help` for usage.");
            ExitCode::from(2)
        }
    }
}

/// Send `tracing` output to the file at `path`.  The terminal belongs to the
/// game screen, so nothing is logged unless this is called.
fn init_logging(path: &Path) -> io::Result<()> {
    let file = fs_err::File::create(path)?;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gridsnake=debug")),
        )
        .init();
    Ok(())
}

fn app_exit(r: Result<(), AppError>) -> ExitCode {
    match r {
        Ok(()) => ExitCode::SUCCESS,
        Err(AppError::Io(ref e)) if e.kind() == ErrorKind::BrokenPipe => ExitCode::SUCCESS,
        Err(e) => report(&e),
    }
}

/// Print an error and its chain of causes to stderr
fn report(e: &dyn std::error::Error) -> ExitCode {
    error!("{e}");
    eprintln!("gridsnake: {e}");
    let mut source = e.source();
    if source.is_some() {
        eprintln!("\nCaused by:");
    }
    while let Some(src) = source {
        eprintln!("    {src}");
        source = src.source();
    }
    ExitCode::from(2)
}
