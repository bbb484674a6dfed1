use std::time::{Duration, Instant};

/// 3x5 bitmap digits, MSB-left in the top three bits of each row. Small
/// enough that "30.3" fits across a 64 pixel panel.
const DIGITS: [[u8; 5]; 10] = [
    [0xE0, 0xA0, 0xA0, 0xA0, 0xE0],
    [0x40, 0xC0, 0x40, 0x40, 0xE0],
    [0xE0, 0x20, 0xE0, 0x80, 0xE0],
    [0xE0, 0x20, 0x60, 0x20, 0xE0],
    [0xA0, 0xA0, 0xE0, 0x20, 0x20],
    [0xE0, 0x80, 0xE0, 0x20, 0xE0],
    [0xE0, 0x80, 0xE0, 0xA0, 0xE0],
    [0xE0, 0x20, 0x40, 0x40, 0x40],
    [0xE0, 0xA0, 0xE0, 0xA0, 0xE0],
    [0xE0, 0xA0, 0xE0, 0x20, 0xE0],
];
const DOT: [u8; 5] = [0x00, 0x00, 0x00, 0x00, 0x40];
const BLANK: [u8; 5] = [0; 5];

const GLYPH_W: usize = 3;
const GLYPH_H: usize = 5;
const INK: [u8; 3] = [255, 255, 0];

fn glyph_for(ch: u8) -> &'static [u8; 5] {
    match ch {
        b'0'..=b'9' => &DIGITS[(ch - b'0') as usize],
        b'.' => &DOT,
        _ => &BLANK,
    }
}

/// Draw `text` onto an RGB24 buffer at the top-left corner with 1px
/// padding. Pixels that fall outside the buffer are dropped.
pub fn draw_text(buffer: &mut [u8], width: usize, height: usize, text: &str) {
    let (x0, y0) = (1usize, 1usize);
    for (ci, ch) in text.bytes().enumerate() {
        let gx = x0 + ci * (GLYPH_W + 1);
        for (row, &bits) in glyph_for(ch).iter().enumerate() {
            let py = y0 + row;
            for col in 0..GLYPH_W {
                let px = gx + col;
                if bits & (0x80 >> col) == 0 || px >= width || py >= height {
                    continue;
                }
                let offset = (py * width + px) * 3;
                buffer[offset..offset + 3].copy_from_slice(&INK);
            }
        }
    }
}

/// Frames-per-second over a rolling one second window.
pub struct FpsCounter {
    window_start: Instant,
    frames: u32,
    fps: f32,
}

impl FpsCounter {
    const WINDOW: Duration = Duration::from_secs(1);

    pub fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            frames: 0,
            fps: 0.0,
        }
    }

    /// Count one presented frame and return the latest rate.
    pub fn tick(&mut self, now: Instant) -> f32 {
        self.frames += 1;
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed >= Self::WINDOW {
            self.fps = self.frames as f32 / elapsed.as_secs_f32();
            self.frames = 0;
            self.window_start = now;
        }
        self.fps
    }

    pub fn label(&self) -> String {
        format!("{:.1}", self.fps)
    }
}
