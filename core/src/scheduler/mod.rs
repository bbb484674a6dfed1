//! Frame scheduler: the per-frame game loop shared by every target.
//!
//! One frame is: poll input, update the game, draw into the shadow buffer,
//! present, then pace. Pacing is the only place the loop suspends. On
//! blocking targets it sleeps off the rest of the frame interval. On the
//! cooperative (browser) target it yields once per pass and relies on
//! frame-start timestamps to hold the frame rate, so it never blocks.
//!
//! ```text
//!  Idle ──start──▶ Running ──Step::Stop──▶ Finished
//!                     │
//!                     └──back / chord──▶ Cancelled
//! ```

pub mod clock;

pub use clock::{Clock, StdClock};

use std::error::Error;
use std::fmt;
use std::time::Duration;

use log::{debug, info, trace, warn};

use crate::display::{DisplaySurface, ShadowBuffer};
use crate::game::{Game, GameError, Step};
use crate::input::{InputSnapshot, InputSource};
use crate::platform::Platform;

/// How the scheduler waits out the remainder of a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pacing {
    /// Block for the remaining interval. For targets with no host event loop.
    Sleep,
    /// Yield to the host once per pass and never sleep. Frames that come due
    /// early are skipped by timestamp comparison.
    Yield,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Target time between frame starts.
    pub frame_interval: Duration,
    pub pacing: Pacing,
    /// Treat primary+secondary held together as a cancel request.
    pub cancel_on_both_buttons: bool,
}

impl SchedulerConfig {
    /// ~30 FPS.
    pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(33);

    /// Defaults with the pacing mode appropriate for `platform`.
    pub fn for_platform(platform: Platform) -> Self {
        Self {
            pacing: platform.default_pacing(),
            ..Self::default()
        }
    }

    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            frame_interval: Self::DEFAULT_FRAME_INTERVAL,
            pacing: Pacing::Sleep,
            cancel_on_both_buttons: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SchedulerState {
    Idle,
    Running,
    Finished,
    Cancelled,
}

/// How a run ended. `frames` counts frames that were drawn and presented;
/// `score` is the game's [`Game::score`] at that point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// The game returned [`Step::Stop`].
    Finished {
        reason: String,
        frames: u64,
        score: Option<u32>,
    },
    /// The user backed out.
    Cancelled { frames: u64, score: Option<u32> },
}

impl RunOutcome {
    pub fn frames(&self) -> u64 {
        match self {
            RunOutcome::Finished { frames, .. } | RunOutcome::Cancelled { frames, .. } => *frames,
        }
    }

    pub fn score(&self) -> Option<u32> {
        match self {
            RunOutcome::Finished { score, .. } | RunOutcome::Cancelled { score, .. } => *score,
        }
    }
}

/// Result of one [`FrameScheduler::tick`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tick {
    /// Cooperative pacing only: the next frame is not due yet. Nothing was
    /// polled or drawn.
    NotDue(Duration),
    /// A frame ran; `remaining` is what is left of its interval.
    Frame { remaining: Duration },
    /// The run is over.
    Done(RunOutcome),
}

#[derive(Debug)]
pub enum SchedulerError {
    /// `start` called on a scheduler that already ran.
    NotIdle(SchedulerState),

    /// `tick` called outside the Running state.
    NotRunning(SchedulerState),

    /// The game's update failed. Fatal to the run.
    Game {
        game: String,
        frame: u64,
        source: GameError,
    },
}

impl fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotIdle(state) => write!(f, "scheduler cannot start from {state:?}"),
            Self::NotRunning(state) => write!(f, "scheduler is not running ({state:?})"),
            Self::Game {
                game,
                frame,
                source,
            } => write!(f, "game '{game}' failed on frame {frame}: {source}"),
        }
    }
}

impl Error for SchedulerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Game { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub struct FrameScheduler<C: Clock> {
    config: SchedulerConfig,
    clock: C,
    state: SchedulerState,
    /// Start timestamp of the last frame that ran.
    frame_start: Option<Duration>,
    frame: u64,
    drawn: u64,
    skipped: u64,
}

impl<C: Clock> FrameScheduler<C> {
    pub fn new(config: SchedulerConfig, clock: C) -> Self {
        Self {
            config,
            clock,
            state: SchedulerState::Idle,
            frame_start: None,
            frame: 0,
            drawn: 0,
            skipped: 0,
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Number of the frame currently or last processed (1-based, 0 before
    /// the first frame).
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Frames whose present failed and were dropped.
    pub fn skipped_frames(&self) -> u64 {
        self.skipped
    }

    /// Reset the game and enter Running. The first tick is due immediately.
    pub fn start<G: Game + ?Sized>(&mut self, game: &mut G) -> Result<(), SchedulerError> {
        if self.state != SchedulerState::Idle {
            return Err(SchedulerError::NotIdle(self.state));
        }
        game.reset();
        self.state = SchedulerState::Running;
        self.frame_start = None;
        info!(
            "starting '{}' at {} ms/frame ({:?} pacing)",
            game.id(),
            self.config.frame_interval.as_millis(),
            self.config.pacing
        );
        Ok(())
    }

    fn is_cancel(&self, input: &InputSnapshot) -> bool {
        input.back || (self.config.cancel_on_both_buttons && input.buttons.is_chord())
    }

    /// Run one pass of the frame cycle.
    ///
    /// Cancellation is only observed here, at poll time, and skips the
    /// frame's update and draw. A [`Step::Stop`] still draws and presents
    /// the frame that produced it before the run ends.
    pub fn tick<G, S, I>(
        &mut self,
        game: &mut G,
        display: &mut ShadowBuffer<S>,
        input: &mut I,
    ) -> Result<Tick, SchedulerError>
    where
        G: Game + ?Sized,
        S: DisplaySurface,
        I: InputSource + ?Sized,
    {
        if self.state != SchedulerState::Running {
            return Err(SchedulerError::NotRunning(self.state));
        }

        let interval = self.config.frame_interval;
        let start = self.clock.now();
        if self.config.pacing == Pacing::Yield
            && let Some(last) = self.frame_start
        {
            let since = start.saturating_sub(last);
            if since < interval {
                return Ok(Tick::NotDue(interval - since));
            }
        }
        self.frame_start = Some(start);
        self.frame += 1;

        let snapshot = match input.poll() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                debug!("frame {}: input poll failed, using neutral input: {e}", self.frame);
                InputSnapshot::NEUTRAL
            }
        };

        if self.is_cancel(&snapshot) {
            self.state = SchedulerState::Cancelled;
            info!("'{}' cancelled on frame {}", game.id(), self.frame);
            return Ok(Tick::Done(RunOutcome::Cancelled {
                frames: self.drawn,
                score: game.score(),
            }));
        }

        let step = match game.update(&snapshot) {
            Ok(step) => step,
            Err(source) => {
                self.state = SchedulerState::Finished;
                return Err(SchedulerError::Game {
                    game: game.id().to_string(),
                    frame: self.frame,
                    source,
                });
            }
        };

        game.draw(display.frame_mut());
        self.drawn += 1;
        match display.present() {
            Ok(stats) => trace!("frame {}: {} pixels written", self.frame, stats.written),
            Err(e) => {
                self.skipped += 1;
                warn!("frame {}: skipped, {e}", self.frame);
            }
        }

        if let Step::Stop(reason) = step {
            self.state = SchedulerState::Finished;
            info!("'{}' finished on frame {}: {reason}", game.id(), self.frame);
            return Ok(Tick::Done(RunOutcome::Finished {
                reason,
                frames: self.drawn,
                score: game.score(),
            }));
        }

        let elapsed = self.clock.now().saturating_sub(start);
        if elapsed > interval {
            trace!(
                "frame {} overran by {} us",
                self.frame,
                (elapsed - interval).as_micros()
            );
        }
        Ok(Tick::Frame {
            remaining: interval.saturating_sub(elapsed),
        })
    }

    /// The suspension point between frames, and the only place control
    /// leaves the loop.
    async fn pace(&mut self, remaining: Duration) {
        match self.config.pacing {
            Pacing::Sleep => {
                if !remaining.is_zero() {
                    self.clock.sleep(remaining).await;
                }
            }
            Pacing::Yield => self.clock.yield_now().await,
        }
    }

    /// Start `game` and run frames until it stops, the user cancels, or
    /// update fails.
    ///
    /// Blocking hosts drive this with `pollster::block_on`; browser hosts
    /// spawn it on the page's event loop.
    pub async fn run<G, S, I>(
        &mut self,
        game: &mut G,
        display: &mut ShadowBuffer<S>,
        input: &mut I,
    ) -> Result<RunOutcome, SchedulerError>
    where
        G: Game + ?Sized,
        S: DisplaySurface,
        I: InputSource + ?Sized,
    {
        self.start(game)?;
        loop {
            let remaining = match self.tick(game, display, input)? {
                Tick::Done(outcome) => return Ok(outcome),
                Tick::Frame { remaining } | Tick::NotDue(remaining) => remaining,
            };
            self.pace(remaining).await;
        }
    }
}
