//! Snake on a 32x32 board drawn with 2x2 pixel cells.
//!
//! Board occupancy lives in a [`PackedGrid`] (one nibble per cell) so the
//! whole playfield costs 512 bytes, small enough for the embedded target.

use std::collections::VecDeque;
use std::time::Duration;

use pixelbox_core::display::{Frame, Rgb};
use pixelbox_core::game::{Game, GameError, Step};
use pixelbox_core::grid::PackedGrid;
use pixelbox_core::input::{Direction, InputSnapshot};

use crate::registry::GameEntry;

pub const BOARD_SIZE: usize = 32;
pub const CELL_PX: u32 = 2;
pub const START_LENGTH: usize = 3;
/// Frames between snake steps.
pub const MOVE_EVERY: u32 = 3;

pub const EMPTY: u8 = 0;
pub const BODY: u8 = 1;
pub const FOOD: u8 = 2;

const HEAD_COLOR: Rgb = Rgb::new(160, 255, 160);
const BODY_COLOR: Rgb = Rgb::GREEN;
const FOOD_COLOR: Rgb = Rgb::RED;
const CRASH_COLOR: Rgb = Rgb::YELLOW;

pub struct Snake {
    board: PackedGrid,
    /// Front is the head.
    body: VecDeque<(usize, usize)>,
    heading: Direction,
    queued: Direction,
    food: Option<(usize, usize)>,
    score: u32,
    frame: u32,
    crashed: bool,
    seed: u32,
    rng: u32,
}

impl Snake {
    pub fn new() -> Self {
        Self::with_seed(0x2545_F491)
    }

    /// Food placement is driven by a xorshift generator seeded here.
    pub fn with_seed(seed: u32) -> Self {
        let mut snake = Self {
            board: PackedGrid::new(BOARD_SIZE, BOARD_SIZE),
            body: VecDeque::with_capacity(BOARD_SIZE * BOARD_SIZE),
            heading: Direction::Right,
            queued: Direction::Right,
            food: None,
            score: 0,
            frame: 0,
            crashed: false,
            seed: seed.max(1),
            rng: seed.max(1),
        };
        snake.reset();
        snake
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn head(&self) -> (usize, usize) {
        self.body[0]
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    pub fn food(&self) -> Option<(usize, usize)> {
        self.food
    }

    pub fn board(&self) -> &PackedGrid {
        &self.board
    }

    /// Move the food to a fixed cell. Used to script deterministic games.
    /// Cells occupied by the snake are rejected.
    pub fn place_food(&mut self, row: usize, col: usize) -> Result<(), GameError> {
        if self.board.get(row, col)? == BODY {
            return Err(GameError::new(format!(
                "cell ({row}, {col}) is occupied by the snake"
            )));
        }
        if let Some((r, c)) = self.food.take() {
            self.board.set(r, c, EMPTY)?;
        }
        self.board.set(row, col, FOOD)?;
        self.food = Some((row, col));
        Ok(())
    }

    /// Horizontal snake in the middle of the board, heading right, plus the
    /// first food. Only fails if the board is narrower than `START_LENGTH`.
    fn lay_out_start(&mut self) -> Result<(), GameError> {
        let row = BOARD_SIZE / 2;
        let head_col = BOARD_SIZE / 2;
        for i in 0..START_LENGTH {
            let cell = (row, head_col - i);
            self.board.set(cell.0, cell.1, BODY)?;
            self.body.push_back(cell);
        }
        self.spawn_food()
    }

    fn next_random(&mut self) -> u32 {
        let mut x = self.rng;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.rng = x;
        x
    }

    /// Pick a random empty cell, scanning forward from a random start.
    /// Leaves `food` empty when the board is full.
    fn spawn_food(&mut self) -> Result<(), GameError> {
        let cells = BOARD_SIZE * BOARD_SIZE;
        let start = self.next_random() as usize % cells;
        for offset in 0..cells {
            let i = (start + offset) % cells;
            let (r, c) = (i / BOARD_SIZE, i % BOARD_SIZE);
            if self.board.get(r, c)? == EMPTY {
                self.board.set(r, c, FOOD)?;
                self.food = Some((r, c));
                return Ok(());
            }
        }
        self.food = None;
        Ok(())
    }

    fn steer(&mut self, direction: Option<Direction>) {
        // Diagonals are ambiguous on a cardinal board; reversing is suicide.
        if let Some(dir) = direction
            && !dir.is_diagonal()
            && dir != self.heading.opposite()
        {
            self.queued = dir;
        }
    }

    fn advance(&mut self) -> Result<Step, GameError> {
        self.heading = self.queued;
        let (dx, dy) = self.heading.delta();
        let (row, col) = self.head();
        let next_row = row as i64 + dy as i64;
        let next_col = col as i64 + dx as i64;
        let size = BOARD_SIZE as i64;
        if !(0..size).contains(&next_row) || !(0..size).contains(&next_col) {
            self.crashed = true;
            return Ok(Step::stop(format!("hit the wall with score {}", self.score)));
        }
        let next = (next_row as usize, next_col as usize);

        let eating = self.food == Some(next);
        if !eating && let Some((r, c)) = self.body.pop_back() {
            self.board.set(r, c, EMPTY)?;
        }
        if self.board.get(next.0, next.1)? == BODY {
            self.crashed = true;
            return Ok(Step::stop(format!("ran into itself with score {}", self.score)));
        }

        self.board.set(next.0, next.1, BODY)?;
        self.body.push_front(next);

        if eating {
            self.score += 1;
            self.food = None;
            self.spawn_food()?;
            if self.food.is_none() {
                return Ok(Step::stop(format!("board cleared with score {}", self.score)));
            }
        }
        Ok(Step::Continue)
    }

    fn fill_cell(frame: &mut Frame, (row, col): (usize, usize), color: Rgb) {
        frame.fill_rect(
            col as i32 * CELL_PX as i32,
            row as i32 * CELL_PX as i32,
            CELL_PX,
            CELL_PX,
            color,
        );
    }
}

impl Default for Snake {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for Snake {
    fn id(&self) -> &str {
        "snake"
    }

    fn reset(&mut self) {
        self.board = PackedGrid::new(BOARD_SIZE, BOARD_SIZE);
        self.body.clear();
        self.heading = Direction::Right;
        self.queued = Direction::Right;
        self.score = 0;
        self.frame = 0;
        self.crashed = false;
        self.rng = self.seed;
        self.food = None;

        let laid_out = self.lay_out_start();
        debug_assert!(laid_out.is_ok(), "start position off the board: {laid_out:?}");
    }

    fn update(&mut self, input: &InputSnapshot) -> Result<Step, GameError> {
        self.steer(input.direction);
        self.frame += 1;
        if self.frame % MOVE_EVERY != 0 {
            return Ok(Step::Continue);
        }
        self.advance()
    }

    fn draw(&mut self, frame: &mut Frame) {
        frame.clear(Rgb::BLACK);
        if let Some(food) = self.food {
            Self::fill_cell(frame, food, FOOD_COLOR);
        }
        for (i, &cell) in self.body.iter().enumerate() {
            let color = match i {
                0 if self.crashed => CRASH_COLOR,
                0 => HEAD_COLOR,
                _ => BODY_COLOR,
            };
            Self::fill_cell(frame, cell, color);
        }
    }

    fn score(&self) -> Option<u32> {
        Some(self.score)
    }
}

fn create_game() -> Box<dyn Game> {
    Box::new(Snake::new())
}

inventory::submit! {
    GameEntry::new(
        "snake",
        "Classic snake, eat the red dots and avoid the walls",
        Duration::from_millis(33),
        create_game,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_centered_heading_right() {
        let snake = Snake::new();
        assert_eq!(snake.len(), START_LENGTH);
        assert_eq!(snake.head(), (16, 16));
        assert_eq!(snake.heading(), Direction::Right);
        assert_eq!(snake.board().count(BODY), START_LENGTH);
        assert_eq!(snake.board().count(FOOD), 1);
    }

    #[test]
    fn test_lay_out_start_on_fresh_board() {
        let mut snake = Snake::new();
        snake.board = PackedGrid::new(BOARD_SIZE, BOARD_SIZE);
        snake.body.clear();
        assert!(snake.lay_out_start().is_ok());
        assert_eq!(snake.body.len(), START_LENGTH);
        assert_eq!(snake.board.count(BODY), START_LENGTH);
        assert_eq!(snake.board.count(FOOD), 1);
    }

    #[test]
    fn test_steer_ignores_reverse_and_diagonal() {
        let mut snake = Snake::new();
        snake.steer(Some(Direction::Left));
        assert_eq!(snake.queued, Direction::Right);
        snake.steer(Some(Direction::UpRight));
        assert_eq!(snake.queued, Direction::Right);
        snake.steer(Some(Direction::Up));
        assert_eq!(snake.queued, Direction::Up);
    }
}
