use clap::Parser;
use std::sync::mpsc;
use taskboard_cli::cli::{Cli, collect_config_overrides};
use taskboard_cli::session::{Event, Session, normalize_parse_error, spawn_stdin_reader};
use taskboard_core::board::{Board, BoardSettings};
use taskboard_core::clock::{SystemClock, spawn_ticker};
use taskboard_core::config::{load_config_with_fallback, merge_overrides};
use taskboard_core::error::AppError;
use taskboard_core::monitor::DeadlineMonitor;
use taskboard_core::notify::notifier_for;
use taskboard_core::view::MemorySurfaces;
use time::UtcOffset;
use tracing_subscriber::EnvFilter;

const LOG_ENV_VAR: &str = "TASKBOARD_LOG";

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), AppError> {
    // Must be resolved before any thread is spawned.
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);

    let loaded = load_config_with_fallback();
    if let Some(err) = loaded.error.as_ref() {
        tracing::warn!(error = %err, "using default configuration");
    }
    let overrides = collect_config_overrides(&cli.config_override)?;
    let config = merge_overrides(&loaded.config, &overrides);

    let board = Board::new(
        MemorySurfaces::new(),
        BoardSettings::from_config(&config, offset),
    );
    let monitor = DeadlineMonitor::new(notifier_for(config.desktop_notifications())?);
    let mut session = Session::new(
        board,
        monitor,
        SystemClock,
        config.theme(),
        config.aliases.clone(),
        cli.json,
    );

    let (sender, receiver) = mpsc::channel();
    spawn_ticker(config.tick_interval(), sender.clone(), Event::Tick);
    spawn_stdin_reader(sender);
    tracing::info!(
        tick_secs = config.tick_interval().as_secs(),
        offset = %offset,
        "session started"
    );

    session.run(&receiver)
}

fn main() {
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => {
            let _ = err.print();
            return;
        }
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    if let Err(err) = run(cli) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
