use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use pixelbox_core::scheduler::RunOutcome;
use pixelbox_games::registry;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::{Config, Overrides};
use crate::input::KeyMap;
use crate::runner::RunError;

mod config;
mod input;
mod overlay;
mod runner;
mod video;

const DEFAULT_GAME: &str = "snake";

#[derive(Parser)]
#[command(name = "pixelbox")]
#[command(version, about = "Tiny games on a 64x64 RGB panel", long_about = None)]
struct Cli {
    /// Game to launch
    #[arg(default_value = DEFAULT_GAME)]
    game: String,

    /// List available games and exit
    #[arg(long)]
    list: bool,

    /// Window pixels per panel pixel
    #[arg(long)]
    scale: Option<u32>,

    /// Target milliseconds between frames
    #[arg(long = "frame-ms")]
    frame_ms: Option<u64>,

    /// Settings file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "pixelbox_core=trace"
    #[arg(long)]
    log_level: Option<String>,

    /// Draw a frame rate counter in the corner
    #[arg(long)]
    show_fps: bool,
}

fn setup_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .init();
}

fn launch(cli: &Cli) -> Result<RunOutcome, RunError> {
    let entry = registry::find(&cli.game).ok_or_else(|| RunError::UnknownGame {
        name: cli.game.clone(),
        available: registry::all().iter().map(|e| e.name).collect(),
    })?;

    let config = Config::load(cli.config.as_deref())?;
    let overrides = Overrides {
        scale: cli.scale,
        frame_ms: cli.frame_ms,
        show_fps: cli.show_fps,
    };
    let settings = config.resolve(&overrides, entry.frame_interval)?;
    let key_map = KeyMap::from_config(&config.keys)?;

    runner::run(entry, &settings, key_map)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.list {
        for entry in registry::all() {
            println!("{:<10} {}", entry.name, entry.description);
        }
        return ExitCode::SUCCESS;
    }

    setup_logging(cli.log_level.as_deref());

    match launch(&cli) {
        Ok(RunOutcome::Finished {
            reason,
            frames,
            score,
        }) => {
            match score {
                Some(score) => info!("{reason} after {frames} frames, final score {score}"),
                None => info!("{reason} after {frames} frames"),
            }
            ExitCode::SUCCESS
        }
        Ok(RunOutcome::Cancelled { frames, .. }) => {
            info!("quit after {frames} frames");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
