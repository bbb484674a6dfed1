#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use pixelbox_core::display::{DisplayError, DisplaySurface, Frame, Rgb};
use pixelbox_core::game::{Game, GameError, Step};
use pixelbox_core::input::{InputError, InputSnapshot, InputSource};
use pixelbox_core::scheduler::Clock;

// ---------------------------------------------------------------------------
// CountingSurface
// ---------------------------------------------------------------------------

/// Display surface that records every forwarded pixel and can be told to
/// fail on a specific write.
pub struct CountingSurface {
    width: u32,
    height: u32,
    pub pixels: Vec<Rgb>,
    /// Every successful `set_pixel` since the last `take_writes`.
    pub writes: Vec<(i32, i32, Rgb)>,
    pub total_writes: u64,
    pub presents: u64,
    /// Fail the write attempt whose 1-based overall number equals this.
    pub fail_write_at: Option<u64>,
    pub fail_present: bool,
    attempts: u64,
}

impl CountingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb::BLACK; width as usize * height as usize],
            writes: Vec::new(),
            total_writes: 0,
            presents: 0,
            fail_write_at: None,
            fail_present: false,
            attempts: 0,
        }
    }

    pub fn take_writes(&mut self) -> Vec<(i32, i32, Rgb)> {
        std::mem::take(&mut self.writes)
    }

    pub fn pixel(&self, x: i32, y: i32) -> Rgb {
        self.pixels[y as usize * self.width as usize + x as usize]
    }
}

impl DisplaySurface for CountingSurface {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Rgb) -> Result<(), DisplayError> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return Ok(());
        }
        self.attempts += 1;
        if self.fail_write_at == Some(self.attempts) {
            return Err(DisplayError::Write {
                x,
                y,
                message: "bus timeout".to_string(),
            });
        }
        self.pixels[y as usize * self.width as usize + x as usize] = color;
        self.writes.push((x, y, color));
        self.total_writes += 1;
        Ok(())
    }

    fn clear(&mut self, color: Rgb) -> Result<(), DisplayError> {
        self.pixels.fill(color);
        Ok(())
    }

    fn present(&mut self) -> Result<(), DisplayError> {
        if self.fail_present {
            return Err(DisplayError::Present("vsync lost".to_string()));
        }
        self.presents += 1;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ScriptedInput
// ---------------------------------------------------------------------------

/// Input source that replays a fixed script, then reports neutral input.
pub struct ScriptedInput {
    script: VecDeque<Result<InputSnapshot, InputError>>,
    pub polls: u64,
}

impl ScriptedInput {
    pub fn new(script: Vec<Result<InputSnapshot, InputError>>) -> Self {
        Self {
            script: script.into(),
            polls: 0,
        }
    }

    pub fn neutral() -> Self {
        Self::new(Vec::new())
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> Result<InputSnapshot, InputError> {
        self.polls += 1;
        self.script
            .pop_front()
            .unwrap_or(Ok(InputSnapshot::NEUTRAL))
    }
}

// ---------------------------------------------------------------------------
// ManualClock
// ---------------------------------------------------------------------------

/// Clock whose time only moves when told to. Sleeping advances it by the
/// requested amount; yielding advances it by `yield_advance`.
#[derive(Clone)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
    pub sleeps: Rc<RefCell<Vec<Duration>>>,
    pub yields: Rc<Cell<u64>>,
    pub yield_advance: Duration,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Duration::ZERO)),
            sleeps: Rc::default(),
            yields: Rc::default(),
            yield_advance: Duration::ZERO,
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Shared handle to the current time, for games that simulate work.
    pub fn handle(&self) -> Rc<Cell<Duration>> {
        Rc::clone(&self.now)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }

    fn sleep(&mut self, duration: Duration) -> impl Future<Output = ()> {
        self.sleeps.borrow_mut().push(duration);
        self.advance(duration);
        std::future::ready(())
    }

    fn yield_now(&mut self) -> impl Future<Output = ()> {
        self.yields.set(self.yields.get() + 1);
        self.advance(self.yield_advance);
        std::future::ready(())
    }
}

// ---------------------------------------------------------------------------
// ScriptedGame
// ---------------------------------------------------------------------------

/// Game that records every call the scheduler makes.
pub struct ScriptedGame {
    pub calls: Vec<String>,
    pub resets: u32,
    pub updates: u64,
    pub draws: u64,
    pub inputs: Vec<InputSnapshot>,
    /// Return `Step::Stop` from this update (1-based).
    pub stop_on: Option<u64>,
    /// Return an error from this update (1-based).
    pub fail_on: Option<u64>,
    /// Simulated cost of one update, applied to `clock`.
    pub work: Duration,
    pub clock: Option<Rc<Cell<Duration>>>,
    /// Points earned per update, for scoring games.
    pub points: Option<u32>,
}

impl ScriptedGame {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            resets: 0,
            updates: 0,
            draws: 0,
            inputs: Vec::new(),
            stop_on: None,
            fail_on: None,
            work: Duration::ZERO,
            clock: None,
            points: None,
        }
    }

    pub fn stopping_on(frame: u64) -> Self {
        Self {
            stop_on: Some(frame),
            ..Self::new()
        }
    }
}

impl Game for ScriptedGame {
    fn id(&self) -> &str {
        "scripted"
    }

    fn reset(&mut self) {
        self.resets += 1;
        self.calls.push("reset".to_string());
    }

    fn update(&mut self, input: &InputSnapshot) -> Result<Step, GameError> {
        self.updates += 1;
        self.calls.push(format!("update {}", self.updates));
        self.inputs.push(*input);
        if let Some(clock) = &self.clock {
            clock.set(clock.get() + self.work);
        }
        if self.fail_on == Some(self.updates) {
            return Err(GameError::new("ball escaped the playfield"));
        }
        if self.stop_on == Some(self.updates) {
            return Ok(Step::stop("game over"));
        }
        Ok(Step::Continue)
    }

    fn draw(&mut self, frame: &mut Frame) {
        self.draws += 1;
        self.calls.push(format!("draw {}", self.draws));
        // One moving dot, so consecutive frames differ in exactly two pixels.
        let (w, _) = frame.dimensions();
        frame.clear(Rgb::BLACK);
        frame.set_pixel((self.draws % w as u64) as i32, 0, Rgb::WHITE);
    }

    fn score(&self) -> Option<u32> {
        self.points.map(|p| p * self.updates as u32)
    }
}
