//! Raster canvas the overlay renderers draw into.
//!
//! A thin wrapper around a tiny-skia `Pixmap` exposing only the primitives
//! the styles need. Every primitive quietly does nothing when the geometry
//! degenerates (zero-size rect, fewer than two points); the next repaint
//! simply tries again.

use glam::Vec2;
use tiny_skia::{
    FillRule, FilterQuality, LineCap, LineJoin, Paint, Path, PathBuilder, Pixmap, PixmapPaint,
    Stroke, Transform,
};

use crate::error::{OverlayError, Result};
use crate::geometry::Rect;
use crate::text::LabelFont;
use crate::theme::Color;

/// Layers used to fake a blurred shadow.
const SHADOW_LAYERS: u32 = 4;

pub struct Canvas {
    pixmap: Pixmap,
    font: Option<LabelFont>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixmap = Pixmap::new(width, height).ok_or(OverlayError::CanvasSize { width, height })?;
        Ok(Self::from_pixmap(pixmap))
    }

    pub fn from_pixmap(pixmap: Pixmap) -> Self {
        Self { pixmap, font: None }
    }

    /// Attach the font used for badge labels.
    pub fn with_font(mut self, font: LabelFont) -> Self {
        self.font = Some(font);
        self
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.width() as f32, self.height() as f32)
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }

    /// Un-premultiplied color at a pixel, for probing rendered output.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some(Color::rgba(c.red(), c.green(), c.blue(), c.alpha()))
    }

    pub fn clear(&mut self, color: Color) {
        self.pixmap.fill(color.to_skia());
    }

    pub fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Color) {
        if let Some(path) = rounded_rect_path(rect, radius) {
            self.fill(&path, color);
        }
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        if let Some(path) = PathBuilder::from_circle(center.x, center.y, radius) {
            self.fill(&path, color);
        }
    }

    /// Fill the polygon through `points`.
    pub fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        if let Some(path) = polyline_path(points, true) {
            self.fill(&path, color);
        }
    }

    /// Stroke an open (or closed) polyline.
    pub fn stroke_polyline(
        &mut self,
        points: &[Vec2],
        closed: bool,
        width: f32,
        cap: LineCap,
        color: Color,
    ) {
        let Some(path) = polyline_path(points, closed) else {
            return;
        };
        let stroke = Stroke {
            width,
            line_cap: cap,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(&path, &paint(color), &stroke, Transform::identity(), None);
    }

    /// Soft shadow under a disc, approximated with widening translucent discs.
    pub fn drop_shadow(&mut self, center: Vec2, radius: f32, offset: Vec2, color: Color) {
        let spread = radius * 0.04;
        let layer_color = color.with_alpha(1.0 / SHADOW_LAYERS as f32);
        for i in 0..SHADOW_LAYERS {
            self.fill_circle(center + offset, radius + spread * i as f32, layer_color);
        }
    }

    /// Copy `src` scaled into `dst`. The source is only read.
    pub fn draw_pixmap(&mut self, src: &Pixmap, dst: Rect) {
        if dst.is_empty() || src.width() == 0 || src.height() == 0 {
            return;
        }
        let sx = dst.width / src.width() as f32;
        let sy = dst.height / src.height() as f32;
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        self.pixmap.draw_pixmap(
            0,
            0,
            src.as_ref(),
            &paint,
            Transform::from_row(sx, 0.0, 0.0, sy, dst.x, dst.y),
            None,
        );
    }

    /// Draw a centered single-line label. Without a font this is a no-op.
    pub fn draw_label(&mut self, text: &str, center: Vec2, size: f32, color: Color) {
        if size <= 0.0 {
            return;
        }
        if let Some(font) = self.font.clone() {
            font.draw_centered(&mut self.pixmap, text, center, size, color);
        }
    }

    fn fill(&mut self, path: &Path, color: Color) {
        self.pixmap
            .fill_path(path, &paint(color), FillRule::Winding, Transform::identity(), None);
    }
}

fn paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color.to_skia());
    paint.anti_alias = true;
    paint
}

fn polyline_path(points: &[Vec2], closed: bool) -> Option<Path> {
    let (first, rest) = points.split_first()?;
    if rest.is_empty() {
        return None;
    }
    let mut pb = PathBuilder::new();
    pb.move_to(first.x, first.y);
    for p in rest {
        pb.line_to(p.x, p.y);
    }
    if closed {
        pb.close();
    }
    pb.finish()
}

fn rounded_rect_path(rect: Rect, r: f32) -> Option<Path> {
    let Rect { x, y, width: w, height: h } = rect;
    if rect.is_empty() {
        return None;
    }
    let r = r.min(w / 2.0).min(h / 2.0);
    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y);
    pb.line_to(x + w - r, y);
    pb.quad_to(x + w, y, x + w, y + r);
    pb.line_to(x + w, y + h - r);
    pb.quad_to(x + w, y + h, x + w - r, y + h);
    pb.line_to(x + r, y + h);
    pb.quad_to(x, y + h, x, y + h - r);
    pb.line_to(x, y + r);
    pb.quad_to(x, y, x + r, y);
    pb.close();
    pb.finish()
}
