use std::error::Error;
use std::fmt;

use crate::display::Frame;
use crate::grid::GridError;
use crate::input::InputSnapshot;

/// Continuation signal returned by [`Game::update`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    Continue,
    /// End the run normally (game over, level cleared, ...). The reason is
    /// reported back to whoever launched the game.
    Stop(String),
}

impl Step {
    pub fn stop(reason: impl Into<String>) -> Self {
        Step::Stop(reason.into())
    }
}

/// Unrecoverable failure inside game logic. Indicates a bug, not a transient
/// condition, and ends the run.
#[derive(Debug)]
pub struct GameError {
    message: String,
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

impl GameError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(src) => write!(f, "{}: {src}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl Error for GameError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn Error + 'static))
    }
}

impl From<GridError> for GameError {
    fn from(e: GridError) -> Self {
        Self::with_source("grid access", e)
    }
}

/// A game as seen by the frame scheduler: a synchronous per-frame
/// update/draw pair.
///
/// Games are constructed by the caller and handed to the scheduler, which
/// never creates game state itself. `update` and `draw` always run to
/// completion; the scheduler suspends only between frames.
pub trait Game {
    /// Stable identifier used in logs and error reports (e.g., "snake").
    fn id(&self) -> &str;

    /// Reinitialize all game state. Called once before a run starts.
    fn reset(&mut self);

    /// Advance game logic by one frame.
    fn update(&mut self, input: &InputSnapshot) -> Result<Step, GameError>;

    /// Render the current state into the pending frame.
    fn draw(&mut self, frame: &mut Frame);

    /// Current score, for games that keep one. Reported with the run
    /// outcome so a host menu can show it.
    fn score(&self) -> Option<u32> {
        None
    }
}

impl<G: Game + ?Sized> Game for Box<G> {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn update(&mut self, input: &InputSnapshot) -> Result<Step, GameError> {
        (**self).update(input)
    }

    fn draw(&mut self, frame: &mut Frame) {
        (**self).draw(frame)
    }

    fn score(&self) -> Option<u32> {
        (**self).score()
    }
}
