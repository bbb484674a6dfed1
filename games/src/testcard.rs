//! Display test card: static color bars with a sweeping scanline.
//!
//! Handy for checking wiring and color order on a new panel. Between frames
//! only the scanline moves, so a shadowed display forwards two rows per
//! frame after the first. Primary cycles the bar brightness, the joystick
//! moves a crosshair. Runs until cancelled.

use std::time::Duration;

use pixelbox_core::display::{Frame, Rgb};
use pixelbox_core::game::{Game, GameError, Step};
use pixelbox_core::input::{Button, InputSnapshot};

use crate::registry::GameEntry;

pub const BARS: [Rgb; 8] = [
    Rgb::WHITE,
    Rgb::YELLOW,
    Rgb::CYAN,
    Rgb::GREEN,
    Rgb::MAGENTA,
    Rgb::RED,
    Rgb::BLUE,
    Rgb::BLACK,
];

const LEVELS: [u8; 4] = [255, 192, 128, 64];

#[derive(Default)]
pub struct TestCard {
    frame: u64,
    level: usize,
    primary_held: bool,
    cursor: (i32, i32),
}

impl TestCard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn brightness(&self) -> u8 {
        LEVELS[self.level]
    }

    pub fn cursor(&self) -> (i32, i32) {
        self.cursor
    }

    /// Row the scanline occupies for a frame of the given height.
    pub fn scanline(&self, height: u32) -> i32 {
        if height == 0 {
            return 0;
        }
        (self.frame % height as u64) as i32
    }
}

impl Game for TestCard {
    fn id(&self) -> &str {
        "testcard"
    }

    fn reset(&mut self) {
        *self = Self::default();
    }

    fn update(&mut self, input: &InputSnapshot) -> Result<Step, GameError> {
        self.frame += 1;

        // Edge-triggered so holding the button cycles once.
        let primary = input.pressed(Button::Primary);
        if primary && !self.primary_held {
            self.level = (self.level + 1) % LEVELS.len();
        }
        self.primary_held = primary;

        if let Some(dir) = input.direction {
            let (dx, dy) = dir.delta();
            self.cursor.0 += dx;
            self.cursor.1 += dy;
        }
        Ok(Step::Continue)
    }

    fn draw(&mut self, frame: &mut Frame) {
        let (w, h) = frame.dimensions();
        // The frame size is only known here.
        self.cursor.0 = self.cursor.0.clamp(0, w.saturating_sub(1) as i32);
        self.cursor.1 = self.cursor.1.clamp(0, h.saturating_sub(1) as i32);

        let bar_w = w.div_ceil(BARS.len() as u32).max(1);
        for (i, color) in BARS.iter().enumerate() {
            let x = (i as u32 * bar_w) as i32;
            frame.fill_rect(x, 0, bar_w, h, color.scaled(self.brightness()));
        }

        let line = self.scanline(h);
        frame.fill_rect(0, line, w, 1, Rgb::new(40, 40, 40));

        let (cx, cy) = self.cursor;
        frame.fill_rect(0, cy, w, 1, Rgb::RED);
        frame.fill_rect(cx, 0, 1, h, Rgb::RED);
    }
}

fn create_game() -> Box<dyn Game> {
    Box::new(TestCard::new())
}

inventory::submit! {
    GameEntry::new(
        "testcard",
        "Color bars and a crosshair for checking a new display",
        Duration::from_millis(50),
        create_game,
    )
}
