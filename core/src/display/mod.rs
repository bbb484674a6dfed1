pub mod color;
pub mod frame;
pub mod memory;
pub mod shadow;

pub use color::Rgb;
pub use frame::Frame;
pub use memory::MemorySurface;
pub use shadow::{PresentStats, ShadowBuffer};

use std::fmt;

/// Errors raised by a display device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayError {
    /// The device or window could not be opened. Fatal at startup.
    Init(String),

    /// A single pixel write was rejected by the device. The frame is skipped.
    Write { x: i32, y: i32, message: String },

    /// Flushing buffered device state to the output failed. The frame is skipped.
    Present(String),
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init(msg) => write!(f, "display init failed: {msg}"),
            Self::Write { x, y, message } => {
                write!(f, "display write at ({x}, {y}) failed: {message}")
            }
            Self::Present(msg) => write!(f, "display present failed: {msg}"),
        }
    }
}

impl std::error::Error for DisplayError {}

/// Target-specific output device: an LED matrix, an OS window, a browser canvas.
///
/// Implementations write unconditionally; change tracking is layered on top
/// by [`ShadowBuffer`]. Every method except `present` must return without
/// handing control to a host event loop.
pub trait DisplaySurface {
    /// Fixed output size as (width, height) in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// Write one pixel. Coordinates outside the surface are a no-op and
    /// return `Ok(())`.
    fn set_pixel(&mut self, x: i32, y: i32, color: Rgb) -> Result<(), DisplayError>;

    /// Set every pixel to `color`.
    fn clear(&mut self, color: Rgb) -> Result<(), DisplayError>;

    /// Flush buffered device state to the physical or visual output.
    fn present(&mut self) -> Result<(), DisplayError>;
}

impl<S: DisplaySurface + ?Sized> DisplaySurface for Box<S> {
    fn dimensions(&self) -> (u32, u32) {
        (**self).dimensions()
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Rgb) -> Result<(), DisplayError> {
        (**self).set_pixel(x, y, color)
    }

    fn clear(&mut self, color: Rgb) -> Result<(), DisplayError> {
        (**self).clear(color)
    }

    fn present(&mut self) -> Result<(), DisplayError> {
        (**self).present()
    }
}
