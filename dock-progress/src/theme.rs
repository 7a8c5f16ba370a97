//! Overlay colors.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
    pub fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
    /// Same color with its alpha scaled by `factor`.
    pub fn with_alpha(self, factor: f32) -> Color {
        Color {
            a: (self.a as f32 * factor.clamp(0.0, 1.0)).round() as u8,
            ..self
        }
    }
}

pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);

// Bar
pub const BAR_TRACK: Color = Color::rgba(0xFF, 0xFF, 0xFF, 204);
pub const BAR_INNER: Color = Color::rgba(0x00, 0x00, 0x00, 204);
pub const BAR_FILL: Color = WHITE;

// Badge and pie
pub const BADGE_BACKGROUND: Color = Color::rgb(0xF0, 0xF5, 0xFF);
pub const BADGE_LABEL: Color = Color::rgb(0x1C, 0x21, 0x28);
pub const SHADOW: Color = Color::rgba(0x00, 0x00, 0x00, 0x50);

// Accents
pub const ACCENT_BLUE: Color = Color::rgb(0x58, 0xA6, 0xFF);
pub const ACCENT_GREEN: Color = Color::rgb(0x3F, 0xB9, 0x50);
pub const ACCENT_RED: Color = Color::rgb(0xF8, 0x51, 0x49);
