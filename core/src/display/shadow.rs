//! Change-tracking wrapper around a [`DisplaySurface`].
//!
//! Games draw into a pending [`Frame`]; `present()` compares it against the
//! colors last forwarded to the device and writes only the pixels that
//! differ. On the LED-matrix target every forwarded pixel costs bus time, so
//! an unchanged frame must cost zero writes.

use super::{DisplayError, DisplaySurface, Frame, Rgb};

/// Result of a successful [`ShadowBuffer::present`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PresentStats {
    /// Pixels forwarded to the underlying surface during this present.
    pub written: usize,
}

pub struct ShadowBuffer<S: DisplaySurface> {
    surface: S,
    pending: Frame,
    /// Last color forwarded per pixel. `None` is the unset sentinel: it
    /// differs from every color, so the first present writes everything.
    shadow: Vec<Option<Rgb>>,
}

impl<S: DisplaySurface> ShadowBuffer<S> {
    /// Take exclusive ownership of `surface`. The pending layer starts black
    /// and the shadow starts unset.
    pub fn new(surface: S) -> Self {
        let (width, height) = surface.dimensions();
        Self {
            surface,
            pending: Frame::new(width, height, Rgb::BLACK),
            shadow: vec![None; width as usize * height as usize],
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pending.dimensions()
    }

    /// Queue one pixel. No device interaction; off-surface is a no-op.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgb) {
        self.pending.set_pixel(x, y, color);
    }

    /// Queue every pixel to `color`. Goes through the diff like any other
    /// write, so clearing to the color already shown costs nothing.
    pub fn clear(&mut self, color: Rgb) {
        self.pending.clear(color);
    }

    /// The pending layer, for drawing.
    pub fn frame(&self) -> &Frame {
        &self.pending
    }

    pub fn frame_mut(&mut self) -> &mut Frame {
        &mut self.pending
    }

    /// Number of pixels whose pending color differs from the shadow, i.e.
    /// how many writes the next `present()` will issue.
    pub fn dirty_count(&self) -> usize {
        self.pending
            .pixels()
            .iter()
            .zip(&self.shadow)
            .filter(|(p, s)| Some(**p) != **s)
            .count()
    }

    /// Forget what the device is showing. The next present rewrites every
    /// pixel; use after the device lost or cleared its contents behind our back.
    pub fn invalidate(&mut self) {
        self.shadow.fill(None);
    }

    /// Forward changed pixels to the surface, then present it exactly once.
    ///
    /// If a pixel write fails the sweep stops: pixels already forwarded keep
    /// their updated shadow, the rest stay dirty for the next present, and the
    /// surface is not presented for this frame.
    pub fn present(&mut self) -> Result<PresentStats, DisplayError> {
        let width = self.pending.width() as usize;
        let mut written = 0;
        for (i, (&color, last)) in self
            .pending
            .pixels()
            .iter()
            .zip(self.shadow.iter_mut())
            .enumerate()
        {
            if *last == Some(color) {
                continue;
            }
            let x = (i % width) as i32;
            let y = (i / width) as i32;
            self.surface.set_pixel(x, y, color)?;
            *last = Some(color);
            written += 1;
        }
        self.surface.present()?;
        Ok(PresentStats { written })
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Direct access to the device. Writes made here bypass change tracking;
    /// call [`invalidate`](Self::invalidate) afterwards if they alter pixels.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_inner(self) -> S {
        self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::MemorySurface;

    #[test]
    fn first_present_writes_everything() {
        let mut sb = ShadowBuffer::new(MemorySurface::new(4, 4));
        assert_eq!(sb.dirty_count(), 16);
        let stats = sb.present().unwrap();
        assert_eq!(stats.written, 16);
        assert_eq!(sb.surface().writes(), 16);
        assert_eq!(sb.surface().presents(), 1);
    }

    #[test]
    fn unchanged_frame_costs_nothing() {
        let mut sb = ShadowBuffer::new(MemorySurface::new(4, 4));
        sb.present().unwrap();
        sb.clear(Rgb::BLACK);
        assert_eq!(sb.present().unwrap().written, 0);
        // The surface is still presented once per frame.
        assert_eq!(sb.surface().presents(), 2);
    }

    #[test]
    fn invalidate_forces_full_rewrite() {
        let mut sb = ShadowBuffer::new(MemorySurface::new(2, 2));
        sb.present().unwrap();
        sb.invalidate();
        assert_eq!(sb.dirty_count(), 4);
        assert_eq!(sb.present().unwrap().written, 4);
    }

    #[test]
    fn pending_reaches_surface() {
        let mut sb = ShadowBuffer::new(MemorySurface::new(3, 3));
        sb.set_pixel(2, 1, Rgb::RED);
        sb.present().unwrap();
        assert_eq!(sb.surface().pixel(2, 1), Some(Rgb::RED));
        assert_eq!(sb.surface().pixel(0, 0), Some(Rgb::BLACK));
    }
}
