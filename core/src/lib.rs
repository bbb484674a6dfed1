pub mod display;
pub mod game;
pub mod grid;
pub mod input;
pub mod platform;
pub mod scheduler;

pub mod prelude {
    pub use crate::display::{DisplayError, DisplaySurface, Frame, Rgb, ShadowBuffer};
    pub use crate::game::{Game, GameError, Step};
    pub use crate::grid::{GridError, PackedGrid};
    pub use crate::input::{Button, Buttons, Direction, InputError, InputSnapshot, InputSource};
    pub use crate::platform::Platform;
    pub use crate::scheduler::{
        Clock, FrameScheduler, Pacing, RunOutcome, SchedulerConfig, SchedulerError, StdClock,
    };
}
