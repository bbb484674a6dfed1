use std::time::Instant;

use pixelbox_core::display::{DisplayError, DisplaySurface, MemorySurface, Rgb};
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{Canvas, TextureCreator};
use sdl2::video::{Window, WindowContext};

use crate::overlay::{self, FpsCounter};

/// SDL window backed by an in-memory RGB24 panel.
///
/// Pixel writes land in the [`MemorySurface`]; `present` uploads the whole
/// buffer into a streaming texture scaled up to the window.
pub struct WindowSurface {
    canvas: Canvas<Window>,
    texture_creator: TextureCreator<WindowContext>,
    panel: MemorySurface,
    fps: Option<FpsCounter>,
    /// Upload copy; the overlay is drawn here, never into the panel.
    upload: Vec<u8>,
}

impl WindowSurface {
    /// Create an SDL window and renderer for the given panel resolution.
    pub fn new(
        sdl_video: &sdl2::VideoSubsystem,
        title: &str,
        width: u32,
        height: u32,
        scale: u32,
        show_fps: bool,
    ) -> Result<Self, DisplayError> {
        let window = sdl_video
            .window(title, width * scale, height * scale)
            .position_centered()
            .build()
            .map_err(|e| DisplayError::Init(e.to_string()))?;

        let canvas = window
            .into_canvas()
            .accelerated()
            .build()
            .map_err(|e| DisplayError::Init(e.to_string()))?;

        let texture_creator = canvas.texture_creator();
        let panel = MemorySurface::new(width, height);

        Ok(Self {
            canvas,
            texture_creator,
            upload: panel.rgb24().to_vec(),
            panel,
            fps: show_fps.then(|| FpsCounter::new(Instant::now())),
        })
    }

    pub fn panel(&self) -> &MemorySurface {
        &self.panel
    }
}

impl DisplaySurface for WindowSurface {
    fn dimensions(&self) -> (u32, u32) {
        self.panel.dimensions()
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Rgb) -> Result<(), DisplayError> {
        self.panel.set_pixel(x, y, color)
    }

    fn clear(&mut self, color: Rgb) -> Result<(), DisplayError> {
        self.panel.clear(color)
    }

    /// Upload the panel to a texture and present it.
    fn present(&mut self) -> Result<(), DisplayError> {
        let (width, height) = self.panel.dimensions();
        self.upload.copy_from_slice(self.panel.rgb24());
        if let Some(fps) = &mut self.fps {
            fps.tick(Instant::now());
            overlay::draw_text(
                &mut self.upload,
                width as usize,
                height as usize,
                &fps.label(),
            );
        }

        let mut texture = self
            .texture_creator
            .create_texture_streaming(PixelFormatEnum::RGB24, width, height)
            .map_err(|e| DisplayError::Present(e.to_string()))?;
        texture
            .update(None, &self.upload, (width * 3) as usize)
            .map_err(|e| DisplayError::Present(e.to_string()))?;

        self.canvas.clear();
        self.canvas
            .copy(&texture, None, None)
            .map_err(DisplayError::Present)?;
        self.canvas.present();
        self.panel.present()
    }
}
