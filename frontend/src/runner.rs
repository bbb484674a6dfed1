use std::fmt;

use pixelbox_core::display::{DisplayError, ShadowBuffer};
use pixelbox_core::platform::Platform;
use pixelbox_core::scheduler::{FrameScheduler, RunOutcome, SchedulerConfig, SchedulerError, StdClock};
use pixelbox_games::registry::GameEntry;
use tracing::info;

use crate::config::{ConfigError, RunSettings};
use crate::input::{KeyMap, KeyboardInput};
use crate::video::WindowSurface;

#[derive(Debug)]
pub enum RunError {
    Config(ConfigError),
    UnknownGame { name: String, available: Vec<&'static str> },
    Sdl(String),
    Display(DisplayError),
    Scheduler(SchedulerError),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::Config(e) => write!(f, "{e}"),
            RunError::UnknownGame { name, available } => {
                write!(f, "unknown game '{name}' (available: {})", available.join(", "))
            }
            RunError::Sdl(msg) => write!(f, "SDL: {msg}"),
            RunError::Display(e) => write!(f, "display: {e}"),
            RunError::Scheduler(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::Config(e) => Some(e),
            RunError::Display(e) => Some(e),
            RunError::Scheduler(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for RunError {
    fn from(e: ConfigError) -> Self {
        RunError::Config(e)
    }
}

impl From<DisplayError> for RunError {
    fn from(e: DisplayError) -> Self {
        RunError::Display(e)
    }
}

impl From<SchedulerError> for RunError {
    fn from(e: SchedulerError) -> Self {
        RunError::Scheduler(e)
    }
}

/// Open a window for `entry` and run it to completion on this thread.
pub fn run(
    entry: &GameEntry,
    settings: &RunSettings,
    key_map: KeyMap,
) -> Result<RunOutcome, RunError> {
    let sdl_context = sdl2::init().map_err(RunError::Sdl)?;
    let sdl_video = sdl_context.video().map_err(RunError::Sdl)?;

    let title = format!("pixelbox - {}", entry.name);
    let window = WindowSurface::new(
        &sdl_video,
        &title,
        settings.width,
        settings.height,
        settings.scale,
        settings.show_fps,
    )?;
    let pump = sdl_context.event_pump().map_err(RunError::Sdl)?;

    let mut display = ShadowBuffer::new(window);
    let mut input = KeyboardInput::new(pump, key_map);
    let mut game = (entry.create)();

    let platform = Platform::detect();
    let config = SchedulerConfig::for_platform(platform).with_frame_interval(settings.frame_interval);
    info!(
        "starting '{}' on {platform}: {}x{} at scale {}, {} ms per frame",
        entry.name,
        settings.width,
        settings.height,
        settings.scale,
        settings.frame_interval.as_millis()
    );

    let mut scheduler = FrameScheduler::new(config, StdClock::new());
    let outcome = pollster::block_on(scheduler.run(game.as_mut(), &mut display, &mut input))?;

    let skipped = scheduler.skipped_frames();
    if skipped > 0 {
        info!("{skipped} of {} frames were not shown", scheduler.frame());
    }
    let writes = display.surface().panel().writes();
    let presents = display.surface().panel().presents();
    info!("{} pixel writes over {} presents", writes, presents);
    Ok(outcome)
}
