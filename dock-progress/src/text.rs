//! Badge label rasterisation with fontdue.
//!
//! DejaVu Sans Bold is embedded as the default face. Hosts that want their
//! platform's badge typography hand over other font bytes instead.

use std::sync::Arc;

use fontdue::{Font, FontSettings};
use glam::Vec2;
use tiny_skia::Pixmap;

use crate::error::{OverlayError, Result};
use crate::theme::Color;

static DEJAVU_SANS_BOLD_TTF: &[u8] = include_bytes!("../assets/DejaVuSans-Bold.ttf");

#[derive(Clone)]
pub struct LabelFont {
    font: Arc<Font>,
}

impl LabelFont {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let font = Font::from_bytes(bytes, FontSettings::default())
            .map_err(|e| OverlayError::Font(e.to_string()))?;
        Ok(Self { font: Arc::new(font) })
    }

    /// The bundled DejaVu Sans Bold face.
    pub fn embedded() -> Result<Self> {
        Self::from_bytes(DEJAVU_SANS_BOLD_TTF)
    }

    /// Measure the advance width of a single line at `size` pixels.
    pub fn measure(&self, text: &str, size: f32) -> f32 {
        text.chars()
            .map(|ch| self.font.metrics(ch, size).advance_width)
            .sum()
    }

    /// Draw one line whose box is centered on `center`.
    pub fn draw_centered(
        &self,
        pixmap: &mut Pixmap,
        text: &str,
        center: Vec2,
        size: f32,
        color: Color,
    ) {
        let x = center.x - self.measure(text, size) / 2.0;
        let y = center.y - size / 2.0;
        self.draw(pixmap, text, x, y, size, color);
    }

    /// Render a single line with its top-left at (x, y). Returns the advance.
    pub fn draw(
        &self,
        pixmap: &mut Pixmap,
        text: &str,
        x: f32,
        y: f32,
        size: f32,
        color: Color,
    ) -> f32 {
        let pw = pixmap.width() as i32;
        let ph = pixmap.height() as i32;
        let color_alpha = color.a as f32 / 255.0;
        let mut cursor_x = x;

        for ch in text.chars() {
            let (metrics, bitmap) = self.font.rasterize(ch, size);
            if bitmap.is_empty() {
                cursor_x += metrics.advance_width;
                continue;
            }

            let gx = cursor_x as i32 + metrics.xmin;
            let gy = y as i32 + (size as i32 - metrics.height as i32 - metrics.ymin);
            let data = pixmap.data_mut();

            for row in 0..metrics.height {
                for col in 0..metrics.width {
                    let coverage = bitmap[row * metrics.width + col];
                    if coverage == 0 {
                        continue;
                    }
                    let px = gx + col as i32;
                    let py = gy + row as i32;
                    if px < 0 || py < 0 || px >= pw || py >= ph {
                        continue;
                    }
                    let idx = (py as usize * pw as usize + px as usize) * 4;

                    // Source-over onto premultiplied RGBA.
                    let a = coverage as f32 / 255.0 * color_alpha;
                    let inv = 1.0 - a;
                    data[idx] = (color.r as f32 * a + data[idx] as f32 * inv) as u8;
                    data[idx + 1] = (color.g as f32 * a + data[idx + 1] as f32 * inv) as u8;
                    data[idx + 2] = (color.b as f32 * a + data[idx + 2] as f32 * inv) as u8;
                    data[idx + 3] = (255.0 * a + data[idx + 3] as f32 * inv) as u8;
                }
            }

            cursor_x += metrics.advance_width;
        }
        cursor_x - x
    }
}

impl std::fmt::Debug for LabelFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelFont").finish_non_exhaustive()
    }
}
