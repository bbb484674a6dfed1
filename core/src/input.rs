//! Device-independent input snapshot and the polling contract.
//!
//! Joystick, Nunchuk, keyboard and pointer drivers all reduce to an
//! [`InputSnapshot`]: the instantaneous direction, the held buttons, and
//! whether a back gesture is active. There is no event queue; press/hold
//! edge detection is up to the game.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    UpRight,
    Right,
    DownRight,
    Down,
    DownLeft,
    Left,
    UpLeft,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::Up,
        Direction::UpRight,
        Direction::Right,
        Direction::DownRight,
        Direction::Down,
        Direction::DownLeft,
        Direction::Left,
        Direction::UpLeft,
    ];

    /// Unit step in screen coordinates (y grows downwards).
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::UpRight => (1, -1),
            Direction::Right => (1, 0),
            Direction::DownRight => (1, 1),
            Direction::Down => (0, 1),
            Direction::DownLeft => (-1, 1),
            Direction::Left => (-1, 0),
            Direction::UpLeft => (-1, -1),
        }
    }

    /// Fold a signed step into a direction. Only the signs matter; (0, 0)
    /// yields `None`.
    pub fn from_delta(dx: i32, dy: i32) -> Option<Self> {
        match (dx.signum(), dy.signum()) {
            (0, -1) => Some(Direction::Up),
            (1, -1) => Some(Direction::UpRight),
            (1, 0) => Some(Direction::Right),
            (1, 1) => Some(Direction::DownRight),
            (0, 1) => Some(Direction::Down),
            (-1, 1) => Some(Direction::DownLeft),
            (-1, 0) => Some(Direction::Left),
            (-1, -1) => Some(Direction::UpLeft),
            _ => None,
        }
    }

    /// Normalize an 8-bit analog stick centered at 128, as reported by
    /// Nunchuk-style controllers. Stick y grows upwards. Each axis counts as
    /// deflected once it is more than `dead_zone` away from center.
    pub fn from_stick(x: u8, y: u8, dead_zone: u8) -> Option<Self> {
        let axis = |v: u8| {
            let off = v as i32 - 128;
            if off > dead_zone as i32 {
                1
            } else if off < -(dead_zone as i32) {
                -1
            } else {
                0
            }
        };
        Self::from_delta(axis(x), -axis(y))
    }

    pub const fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::UpRight => Direction::DownLeft,
            Direction::Right => Direction::Left,
            Direction::DownRight => Direction::UpLeft,
            Direction::Down => Direction::Up,
            Direction::DownLeft => Direction::UpRight,
            Direction::Left => Direction::Right,
            Direction::UpLeft => Direction::DownRight,
        }
    }

    /// True for the four diagonals.
    pub const fn is_diagonal(self) -> bool {
        let (dx, dy) = self.delta();
        dx != 0 && dy != 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Button {
    Primary,
    Secondary,
}

impl Button {
    const fn bit(self) -> u8 {
        match self {
            Button::Primary => 0x01,
            Button::Secondary => 0x02,
        }
    }
}

/// Set of currently held logical buttons.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Buttons(u8);

impl Buttons {
    pub const NONE: Self = Self(0);
    pub const BOTH: Self = Self(0x03);

    pub const fn contains(self, button: Button) -> bool {
        self.0 & button.bit() != 0
    }

    pub fn insert(&mut self, button: Button) {
        self.0 |= button.bit();
    }

    pub fn remove(&mut self, button: Button) {
        self.0 &= !button.bit();
    }

    pub const fn with(self, button: Button) -> Self {
        Self(self.0 | button.bit())
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Both primary and secondary held.
    pub const fn is_chord(self) -> bool {
        self.0 & Self::BOTH.0 == Self::BOTH.0
    }
}

impl FromIterator<Button> for Buttons {
    fn from_iter<T: IntoIterator<Item = Button>>(iter: T) -> Self {
        let mut set = Buttons::NONE;
        for b in iter {
            set.insert(b);
        }
        set
    }
}

/// One instantaneous poll result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub direction: Option<Direction>,
    pub buttons: Buttons,
    /// Explicit back gesture (Escape, window close, a dedicated back key).
    pub back: bool,
}

impl InputSnapshot {
    /// No direction, no buttons, no back gesture.
    pub const NEUTRAL: Self = Self {
        direction: None,
        buttons: Buttons::NONE,
        back: false,
    };

    pub fn pressed(&self, button: Button) -> bool {
        self.buttons.contains(button)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// The device stopped responding (e.g., controller unplugged).
    Disconnected,

    /// Any other device-level failure.
    Device(String),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "input device disconnected"),
            Self::Device(msg) => write!(f, "input device error: {msg}"),
        }
    }
}

impl std::error::Error for InputError {}

/// Non-blocking input device.
///
/// `poll` must return within microseconds and never wait on the device;
/// debouncing belongs to the driver underneath.
pub trait InputSource {
    fn poll(&mut self) -> Result<InputSnapshot, InputError>;
}

impl<I: InputSource + ?Sized> InputSource for Box<I> {
    fn poll(&mut self) -> Result<InputSnapshot, InputError> {
        (**self).poll()
    }
}

/// Input source that never reports anything. Used for attract modes and
/// headless runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct NeutralInput;

impl InputSource for NeutralInput {
    fn poll(&mut self) -> Result<InputSnapshot, InputError> {
        Ok(InputSnapshot::NEUTRAL)
    }
}
