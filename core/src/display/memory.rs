use super::{DisplayError, DisplaySurface, Rgb};

/// In-memory RGB24 display surface.
///
/// Pixels are stored left-to-right, top-to-bottom, 3 bytes per pixel (R, G, B),
/// the same layout SDL streaming textures and PNG encoders expect. Windowed
/// and canvas frontends wrap one of these and upload `rgb24()` on present;
/// headless runs use it directly.
///
/// Every `set_pixel` and `present` call is counted, which makes the surface
/// useful for measuring how much traffic a frame generates.
pub struct MemorySurface {
    width: u32,
    height: u32,
    buffer: Vec<u8>,
    writes: u64,
    presents: u64,
}

impl MemorySurface {
    /// Create a surface with every pixel black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            buffer: vec![0u8; width as usize * height as usize * 3],
            writes: 0,
            presents: 0,
        }
    }

    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * 3)
    }

    /// Read back one pixel, `None` if off-surface.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb> {
        self.offset(x, y)
            .map(|o| Rgb::new(self.buffer[o], self.buffer[o + 1], self.buffer[o + 2]))
    }

    /// Raw RGB24 contents.
    pub fn rgb24(&self) -> &[u8] {
        &self.buffer
    }

    /// Number of in-bounds `set_pixel` calls since creation or the last reset.
    pub fn writes(&self) -> u64 {
        self.writes
    }

    /// Number of `present` calls since creation or the last reset.
    pub fn presents(&self) -> u64 {
        self.presents
    }

    pub fn reset_counters(&mut self) {
        self.writes = 0;
        self.presents = 0;
    }
}

impl DisplaySurface for MemorySurface {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Rgb) -> Result<(), DisplayError> {
        if let Some(o) = self.offset(x, y) {
            self.buffer[o] = color.r;
            self.buffer[o + 1] = color.g;
            self.buffer[o + 2] = color.b;
            self.writes += 1;
        }
        Ok(())
    }

    fn clear(&mut self, color: Rgb) -> Result<(), DisplayError> {
        for px in self.buffer.chunks_exact_mut(3) {
            px[0] = color.r;
            px[1] = color.g;
            px[2] = color.b;
        }
        Ok(())
    }

    fn present(&mut self) -> Result<(), DisplayError> {
        self.presents += 1;
        Ok(())
    }
}
