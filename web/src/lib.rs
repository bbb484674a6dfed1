//! Browser host: canvas display, DOM keyboard and a timer-driven clock.
//!
//! The scheduler runs with [`Pacing::Yield`] so every pass ends in a
//! zero-delay timer and the page stays responsive.

pub mod canvas;
pub mod clock;
pub mod dom_input;

use std::fmt;
use std::future::Future;

use pixelbox_core::display::{DisplayError, ShadowBuffer};
use pixelbox_core::input::InputError;
use pixelbox_core::platform::Platform;
use pixelbox_core::scheduler::{FrameScheduler, Pacing, RunOutcome, SchedulerConfig, SchedulerError};
use pixelbox_games::registry;
use tracing::{error, info};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

pub use canvas::CanvasSurface;
pub use clock::BrowserClock;
pub use dom_input::DomInput;

pub const CANVAS_ID: &str = "pixelbox-canvas";
pub const PANEL_WIDTH: u32 = 64;
pub const PANEL_HEIGHT: u32 = 64;
const DEFAULT_GAME: &str = "snake";

#[derive(Debug)]
pub enum WebError {
    MissingDom(&'static str),
    UnknownGame(String),
    Display(DisplayError),
    Input(InputError),
    Scheduler(SchedulerError),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebError::MissingDom(what) => write!(f, "page has no {what}"),
            WebError::UnknownGame(name) => write!(f, "unknown game '{name}'"),
            WebError::Display(e) => write!(f, "display: {e}"),
            WebError::Input(e) => write!(f, "input: {e}"),
            WebError::Scheduler(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for WebError {}

fn setup_logging() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_wasm::{WASMLayer, WASMLayerConfigBuilder};

    let config = WASMLayerConfigBuilder::new()
        .set_max_level(tracing::Level::INFO)
        .build();
    tracing_subscriber::registry()
        .with(WASMLayer::new(config))
        .init();
}

fn spawn<F>(future: F)
where
    F: Future<Output = ()> + 'static,
{
    wasm_bindgen_futures::spawn_local(future);
}

/// Run `game` on the page's canvas until it ends.
pub async fn run_game(game: &str) -> Result<RunOutcome, WebError> {
    let window = web_sys::window().ok_or(WebError::MissingDom("window"))?;
    let document = window.document().ok_or(WebError::MissingDom("document"))?;
    let performance = window
        .performance()
        .ok_or(WebError::MissingDom("performance"))?;
    let canvas = document
        .get_element_by_id(CANVAS_ID)
        .and_then(|el| el.dyn_into::<web_sys::HtmlCanvasElement>().ok())
        .ok_or(WebError::MissingDom("canvas"))?;

    let entry = registry::find(game).ok_or_else(|| WebError::UnknownGame(game.to_string()))?;
    let surface =
        CanvasSurface::new(&canvas, PANEL_WIDTH, PANEL_HEIGHT).map_err(WebError::Display)?;
    let mut display = ShadowBuffer::new(surface);
    let mut input = DomInput::attach(&window).map_err(WebError::Input)?;
    let mut instance = (entry.create)();

    let platform = Platform::detect();
    let config = SchedulerConfig {
        pacing: Pacing::Yield,
        ..SchedulerConfig::for_platform(platform)
    }
    .with_frame_interval(entry.frame_interval);
    info!("starting '{}' on {platform}", entry.name);

    let mut scheduler = FrameScheduler::new(config, BrowserClock::new(performance));
    scheduler
        .run(instance.as_mut(), &mut display, &mut input)
        .await
        .map_err(WebError::Scheduler)
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    setup_logging();

    spawn(async {
        match run_game(DEFAULT_GAME).await {
            Ok(RunOutcome::Finished {
                reason,
                frames,
                score,
            }) => info!("{reason} after {frames} frames, score {score:?}"),
            Ok(RunOutcome::Cancelled { frames, .. }) => info!("quit after {frames} frames"),
            Err(e) => error!("{e}"),
        }
    });
}
