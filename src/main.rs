use anyhow::Context;
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};

use typeclock::{
    app::App,
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    logging,
    runtime::{self, CrosstermEventSource, FixedTicker, Runner},
    scores::CsvScoreStore,
    sentences::Difficulty,
    TICK_RATE_MS,
};

/// timed typing speed practice with per-difficulty high scores
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Type the sentence shown before the countdown runs out. The clock starts on your first keystroke; your words per minute and accuracy are saved and the best WPM per difficulty is kept."
)]
pub struct Cli {
    /// sentence pool to start with (defaults to the last one used)
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Difficulty>,

    /// length of the countdown in seconds
    #[clap(short = 's', long, value_parser = clap::value_parser!(u64).range(1..))]
    secs: Option<u64>,

    /// file the score log is kept in
    #[clap(long)]
    scores_file: Option<PathBuf>,
}

impl Cli {
    /// Command line flags take precedence over the saved config
    fn merge(&self, mut cfg: Config) -> Config {
        if let Some(d) = self.difficulty {
            cfg.difficulty = d;
        }
        if let Some(s) = self.secs {
            cfg.countdown_secs = s;
        }
        if let Some(p) = &self.scores_file {
            cfg.scores_file = Some(p.clone());
        }
        cfg
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(log_path) = AppDirs::log_path() {
        if let Err(e) = logging::init(&log_path) {
            eprintln!("logging disabled: {:#}", e);
        }
    }

    let config_store = FileConfigStore::new();
    let config = cli.merge(config_store.load());
    let store = match &config.scores_file {
        Some(path) => CsvScoreStore::with_path(path),
        None => CsvScoreStore::new(),
    };
    log::info!("score log at {}", store.path().display());

    let mut app = App::new(config.difficulty, config.countdown_secs, Box::new(store));

    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );
    let result = runtime::run(&mut terminal, &mut app, &mut runner);

    // restore the terminal before reporting anything
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // one-off flags stay out of the saved config
    if let Err(e) = config_store.save_difficulty(app.difficulty()) {
        log::warn!("could not save config: {:#}", e);
    }

    result.context("event loop failed")
}
