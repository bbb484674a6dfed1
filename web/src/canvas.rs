use pixelbox_core::display::{DisplayError, DisplaySurface, MemorySurface, Rgb};
use wasm_bindgen::{Clamped, JsCast};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

/// Expand packed RGB24 into opaque RGBA32 for `ImageData`.
pub fn rgb24_to_rgba(src: &[u8], dst: &mut [u8]) {
    for (rgb, rgba) in src.chunks_exact(3).zip(dst.chunks_exact_mut(4)) {
        rgba[..3].copy_from_slice(rgb);
        rgba[3] = 0xFF;
    }
}

/// A 2D canvas sized to the panel. The page scales it up with CSS.
pub struct CanvasSurface {
    context: CanvasRenderingContext2d,
    panel: MemorySurface,
    rgba: Vec<u8>,
}

impl CanvasSurface {
    pub fn new(canvas: &HtmlCanvasElement, width: u32, height: u32) -> Result<Self, DisplayError> {
        canvas.set_width(width);
        canvas.set_height(height);
        let context = canvas
            .get_context("2d")
            .map_err(|e| DisplayError::Init(format!("{e:?}")))?
            .ok_or_else(|| DisplayError::Init("canvas has no 2d context".to_string()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| DisplayError::Init("unexpected context type".to_string()))?;

        Ok(Self {
            context,
            panel: MemorySurface::new(width, height),
            rgba: vec![0; width as usize * height as usize * 4],
        })
    }
}

impl DisplaySurface for CanvasSurface {
    fn dimensions(&self) -> (u32, u32) {
        self.panel.dimensions()
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Rgb) -> Result<(), DisplayError> {
        self.panel.set_pixel(x, y, color)
    }

    fn clear(&mut self, color: Rgb) -> Result<(), DisplayError> {
        self.panel.clear(color)
    }

    fn present(&mut self) -> Result<(), DisplayError> {
        let (width, height) = self.panel.dimensions();
        rgb24_to_rgba(self.panel.rgb24(), &mut self.rgba);
        let image = ImageData::new_with_u8_clamped_array_and_sh(Clamped(&self.rgba), width, height)
            .map_err(|e| DisplayError::Present(format!("{e:?}")))?;
        self.context
            .put_image_data(&image, 0.0, 0.0)
            .map_err(|e| DisplayError::Present(format!("{e:?}")))?;
        self.panel.present()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb24_to_rgba() {
        let src = [1, 2, 3, 250, 251, 252];
        let mut dst = [0u8; 8];
        rgb24_to_rgba(&src, &mut dst);
        assert_eq!(dst, [1, 2, 3, 255, 250, 251, 252, 255]);
    }
}
