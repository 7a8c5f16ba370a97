//! Per-style overlay renderers.
//!
//! Renderers only read the style parameters and the displayed progress they
//! are handed; they never reach back into controller state. [`render`] is the
//! single dispatch point, matched exhaustively over [`Style`].

use std::f32::consts::TAU;

use glam::Vec2;
use tiny_skia::LineCap;

use crate::canvas::Canvas;
use crate::config::EngineConfig;
use crate::easing::clamp_unit;
use crate::format::{kilo_short_string, scaled_font_size};
use crate::geometry::Rect;
use crate::style::Style;
use crate::theme::{self, Color};

const BAR_HEIGHT: f32 = 10.0;
const BAR_BOTTOM_OFFSET: f32 = 20.0;

const SQUIRCLE_EXPONENT: f32 = 5.0;
const SQUIRCLE_SEGMENTS: usize = 128;
const SQUIRCLE_LINE_WIDTH: f32 = 5.0;

const CIRCLE_SEGMENTS: usize = 128;
const CIRCLE_LINE_WIDTH: f32 = 4.0;

/// Icon side the badge font sizes were picked for.
const BADGE_REFERENCE_SIDE: f32 = 128.0;

/// Draw `style` for `progress` into `bounds`.
pub fn render(
    style: &Style,
    canvas: &mut Canvas,
    bounds: Rect,
    progress: f64,
    config: &EngineConfig,
) {
    let progress = clamp_unit(progress);
    let fraction = progress as f32;

    match style {
        Style::Bar => draw_bar(canvas, bounds, fraction),
        Style::Squircle { inset, color } => {
            draw_squircle(canvas, bounds, fraction, *inset, *color, config)
        }
        Style::Circle { radius, color } => {
            draw_circle(canvas, bounds, fraction, *radius, *color, config)
        }
        Style::Badge { color, value } => {
            draw_badge(canvas, bounds, fraction, *color, value.value(), config)
        }
        Style::Pie { color } => draw_pie(canvas, bounds, fraction, *color, config),
        Style::Custom(draw) => draw.draw(canvas, bounds, progress),
    }
}

fn draw_bar(canvas: &mut Canvas, bounds: Rect, progress: f32) {
    let track = Rect::new(
        bounds.x,
        bounds.max_y() - BAR_BOTTOM_OFFSET - BAR_HEIGHT,
        bounds.width,
        BAR_HEIGHT,
    );
    canvas.fill_rounded_rect(track, track.height / 2.0, theme::BAR_TRACK);

    let inner = track.inset(0.5, 0.5);
    canvas.fill_rounded_rect(inner, inner.height / 2.0, theme::BAR_INNER);

    let mut fill = track.inset(1.0, 1.0);
    fill.width *= progress;
    canvas.fill_rounded_rect(fill, fill.height / 2.0, theme::BAR_FILL);
}

fn draw_squircle(
    canvas: &mut Canvas,
    bounds: Rect,
    progress: f32,
    inset: Option<f32>,
    color: Color,
    config: &EngineConfig,
) {
    let mut rect = bounds.inset(config.squircle_inset, config.squircle_inset);
    if let Some(extra) = inset {
        rect = rect.inset(extra, extra);
    }
    let outline = squircle_points(rect);
    let fraction = progress * config.cap_compensation;
    stroke_fraction(canvas, &outline, fraction, SQUIRCLE_LINE_WIDTH, LineCap::Round, color);
}

fn draw_circle(
    canvas: &mut Canvas,
    bounds: Rect,
    progress: f32,
    radius: f32,
    color: Color,
    config: &EngineConfig,
) {
    let radius = if radius > 0.0 { radius } else { config.default_circle_radius };
    let ring = arc_points(bounds.center(), radius, 1.0, CIRCLE_SEGMENTS);
    let fraction = progress * config.cap_compensation;
    stroke_fraction(canvas, &ring, fraction, CIRCLE_LINE_WIDTH, LineCap::Round, color);
}

fn draw_badge(
    canvas: &mut Canvas,
    bounds: Rect,
    progress: f32,
    color: Color,
    value: i64,
    config: &EngineConfig,
) {
    let (center, radius) = badge_disc(bounds, config);
    draw_badge_background(canvas, center, radius);

    let ring_width = radius * 0.16;
    let ring = arc_points(center, radius - ring_width / 2.0, 1.0, CIRCLE_SEGMENTS);
    stroke_fraction(canvas, &ring, progress, ring_width, LineCap::Butt, color);

    let label = kilo_short_string(value);
    let size = scaled_font_size(&label) * bounds.min_side() / BADGE_REFERENCE_SIDE;
    canvas.draw_label(&label, center, size, theme::BADGE_LABEL);
}

fn draw_pie(canvas: &mut Canvas, bounds: Rect, progress: f32, color: Color, config: &EngineConfig) {
    let (center, radius) = badge_disc(bounds, config);
    draw_badge_background(canvas, center, radius);

    let wedge_radius = radius * 0.9;
    if progress >= 1.0 {
        canvas.fill_circle(center, wedge_radius, color);
    } else if progress > 0.0 {
        let mut wedge = vec![center];
        wedge.extend(arc_points(center, wedge_radius, progress, CIRCLE_SEGMENTS));
        canvas.fill_polygon(&wedge, color);
    }
}

/// Center and radius of the disc shared by the badge and pie styles,
/// anchored at the bottom-right corner.
pub fn badge_disc(bounds: Rect, config: &EngineConfig) -> (Vec2, f32) {
    let radius = bounds.min_side() * config.badge_scale;
    let margin = radius * 0.1;
    let center = Vec2::new(bounds.max_x() - radius - margin, bounds.max_y() - radius - margin);
    (center, radius)
}

fn draw_badge_background(canvas: &mut Canvas, center: Vec2, radius: f32) {
    canvas.drop_shadow(center, radius, Vec2::new(0.0, radius * 0.08), theme::SHADOW);
    canvas.fill_circle(center, radius, theme::BADGE_BACKGROUND);
}

/// Stroke the leading `fraction` of a closed outline. At 1 or more the
/// outline is stroked closed so the joint has no cap seam.
fn stroke_fraction(
    canvas: &mut Canvas,
    outline: &[Vec2],
    fraction: f32,
    width: f32,
    cap: LineCap,
    color: Color,
) {
    if fraction >= 1.0 {
        canvas.stroke_polyline(outline, true, width, cap, color);
    } else {
        let partial = trim_polyline(outline, fraction);
        canvas.stroke_polyline(&partial, false, width, cap, color);
    }
}

/// Superellipse outline inscribed in `rect`, starting at 12 o'clock and
/// running clockwise. The last point repeats the first.
pub fn squircle_points(rect: Rect) -> Vec<Vec2> {
    let center = rect.center();
    let a = rect.width / 2.0;
    let b = rect.height / 2.0;
    let power = 2.0 / SQUIRCLE_EXPONENT;

    (0..=SQUIRCLE_SEGMENTS)
        .map(|i| {
            let phi = TAU * (i % SQUIRCLE_SEGMENTS) as f32 / SQUIRCLE_SEGMENTS as f32;
            let (s, c) = phi.sin_cos();
            Vec2::new(
                center.x + a * s.signum() * s.abs().powf(power),
                center.y - b * c.signum() * c.abs().powf(power),
            )
        })
        .collect()
}

/// Points on a circular arc from 12 o'clock, clockwise, covering `sweep` of
/// a full turn.
pub fn arc_points(center: Vec2, radius: f32, sweep: f32, full_segments: usize) -> Vec<Vec2> {
    let sweep = sweep.clamp(0.0, 1.0);
    let segments = ((full_segments as f32 * sweep).ceil() as usize).max(1);

    (0..=segments)
        .map(|i| {
            let phi = TAU * sweep * i as f32 / segments as f32;
            let (s, c) = phi.sin_cos();
            Vec2::new(center.x + radius * s, center.y - radius * c)
        })
        .collect()
}

/// Leading part of a polyline covering `fraction` of its arc length.
pub fn trim_polyline(points: &[Vec2], fraction: f32) -> Vec<Vec2> {
    let fraction = fraction.clamp(0.0, 1.0);
    if points.len() < 2 || fraction <= 0.0 {
        return Vec::new();
    }

    let total: f32 = points.windows(2).map(|w| w[0].distance(w[1])).sum();
    let mut remaining = total * fraction;
    let mut trimmed = vec![points[0]];

    for w in points.windows(2) {
        let len = w[0].distance(w[1]);
        if remaining >= len {
            trimmed.push(w[1]);
            remaining -= len;
        } else {
            if remaining > 0.0 && len > 0.0 {
                trimmed.push(w[0].lerp(w[1], remaining / len));
            }
            break;
        }
    }
    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::LabelFont;
    use std::cell::Cell;
    use std::rc::Rc;

    fn canvas() -> Canvas {
        Canvas::new(128, 128).unwrap()
    }

    fn alpha(canvas: &Canvas, x: u32, y: u32) -> u8 {
        canvas.pixel(x, y).map(|c| c.a).unwrap_or(0)
    }

    fn polyline_length(points: &[Vec2]) -> f32 {
        points.windows(2).map(|w| w[0].distance(w[1])).sum()
    }

    #[test]
    fn trim_keeps_requested_length() {
        let line = [Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0)];
        let half = trim_polyline(&line, 0.5);
        assert_eq!(half, vec![Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)]);

        let quarter = trim_polyline(&line, 0.25);
        assert!((polyline_length(&quarter) - 5.0).abs() < 1e-4);
        assert!(trim_polyline(&line, 0.0).is_empty());
        assert_eq!(trim_polyline(&line, 1.0).len(), 3);
    }

    #[test]
    fn squircle_starts_at_top_and_turns_clockwise() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        let points = squircle_points(rect);
        assert_eq!(points.len(), SQUIRCLE_SEGMENTS + 1);
        assert!((points[0] - Vec2::new(50.0, 0.0)).length() < 1e-3);
        assert_eq!(points[0], points[SQUIRCLE_SEGMENTS]);

        // A quarter of the way round we are on the right edge.
        let quarter = points[SQUIRCLE_SEGMENTS / 4];
        assert!((quarter - Vec2::new(100.0, 50.0)).length() < 0.1);

        // Fuller than a circle: the diagonal sample sits outside radius 50.
        let diagonal = points[SQUIRCLE_SEGMENTS / 8];
        assert!(diagonal.distance(rect.center()) > 55.0);
    }

    #[test]
    fn arc_covers_requested_sweep() {
        let center = Vec2::new(0.0, 0.0);
        let half = arc_points(center, 10.0, 0.5, 64);
        assert!((half[0] - Vec2::new(0.0, -10.0)).length() < 1e-4);
        assert!((half[half.len() - 1] - Vec2::new(0.0, 10.0)).length() < 1e-4);
        assert!(half[1].x > 0.0, "arc must run clockwise");
    }

    #[test]
    fn bar_fill_tracks_progress() {
        let config = EngineConfig::default();
        let bounds = Rect::from_size(128.0, 128.0);
        let bar_y = (128.0 - BAR_BOTTOM_OFFSET - BAR_HEIGHT / 2.0) as u32;

        let mut c = canvas();
        render(&Style::Bar, &mut c, bounds, 0.5, &config);
        let left = c.pixel(20, bar_y).unwrap();
        let right = c.pixel(108, bar_y).unwrap();
        assert_eq!((left.r, left.a), (255, 255), "filled part is opaque white");
        assert!(right.r < 64, "unfilled part shows the dark inner track");

        let mut full = canvas();
        render(&Style::Bar, &mut full, bounds, 1.7, &config);
        assert_eq!(full.pixel(108, bar_y).unwrap().r, 255, "overshoot renders as full");
    }

    #[test]
    fn circle_arc_starts_at_twelve() {
        let config = EngineConfig::default();
        let style = Style::circle(40.0, theme::ACCENT_RED);
        let mut c = canvas();
        render(&style, &mut c, Rect::from_size(128.0, 128.0), 0.25, &config);

        assert!(alpha(&c, 70, 24) > 0, "just right of 12 o'clock is stroked");
        assert_eq!(alpha(&c, 64, 104), 0, "6 o'clock is not reached");
        assert_eq!(alpha(&c, 24, 64), 0, "9 o'clock is not reached");
    }

    #[test]
    fn circle_without_radius_uses_default() {
        let config = EngineConfig::default();
        let mut c = canvas();
        let style = Style::circle(0.0, theme::ACCENT_RED);
        render(&style, &mut c, Rect::from_size(128.0, 128.0), 1.0, &config);
        // Default radius 55 around (64, 64): the top of the ring is near y = 9.
        assert!(alpha(&c, 64, 9) > 0);
        assert_eq!(alpha(&c, 64, 30), 0);
    }

    #[test]
    fn squircle_completes_with_cap_compensation() {
        let config = EngineConfig::default();
        let style = Style::squircle(theme::ACCENT_GREEN);
        let mut c = canvas();
        render(&style, &mut c, Rect::from_size(128.0, 128.0), 0.99, &config);
        // 0.99 * 1.02 exceeds one, so the closing segment left of 12 o'clock is drawn.
        let top = config.squircle_inset.round() as u32;
        assert!(alpha(&c, 56, top) > 0);

        let mut short = canvas();
        render(&style, &mut short, Rect::from_size(128.0, 128.0), 0.9, &config);
        assert_eq!(alpha(&short, 56, top), 0);
    }

    #[test]
    fn pie_wedge_fills_clockwise() {
        let config = EngineConfig::default();
        let bounds = Rect::from_size(128.0, 128.0);
        let (center, radius) = badge_disc(bounds, &config);
        let mut c = canvas();
        render(&Style::pie(theme::ACCENT_RED), &mut c, bounds, 0.25, &config);

        let probe = |dx: f32, dy: f32| {
            let p = center + Vec2::new(dx, dy) * radius * 0.5;
            c.pixel(p.x as u32, p.y as u32).unwrap()
        };
        assert_eq!(probe(0.5, -0.5), theme::ACCENT_RED, "upper right quadrant is filled");
        assert_eq!(probe(-0.5, 0.5), theme::BADGE_BACKGROUND, "lower left shows the disc");
    }

    #[test]
    fn badge_reads_value_at_render_time() {
        let config = EngineConfig::default();
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let style = Style::badge(theme::ACCENT_BLUE, move || {
            counter.set(counter.get() + 1);
            42
        });
        let mut c = canvas();
        render(&style, &mut c, Rect::from_size(128.0, 128.0), 0.5, &config);
        render(&style, &mut c, Rect::from_size(128.0, 128.0), 0.6, &config);
        assert_eq!(calls.get(), 2);

        let (center, _) = badge_disc(Rect::from_size(128.0, 128.0), &config);
        assert_eq!(alpha(&c, center.x as u32, center.y as u32), 255);
    }

    #[test]
    fn custom_receives_bounds_and_clamped_progress() {
        let config = EngineConfig::default();
        let seen = Rc::new(Cell::new((Rect::from_size(0.0, 0.0), -1.0)));
        let sink = seen.clone();
        let style = Style::custom_with_progress(move |_: &mut Canvas, bounds: Rect, progress: f64| {
            sink.set((bounds, progress));
        });
        let mut c = canvas();
        let bounds = Rect::new(4.0, 4.0, 120.0, 120.0);
        render(&style, &mut c, bounds, 1.3, &config);

        assert_eq!(seen.get(), (bounds, 1.0));
        assert!(c.pixmap().data().iter().all(|&b| b == 0), "engine draws nothing itself");
    }

    #[test]
    fn squircle_extra_inset_pulls_the_outline_in() {
        let config = EngineConfig::default();
        let bounds = Rect::from_size(128.0, 128.0);
        let style = Style::Squircle {
            inset: Some(10.0),
            color: theme::ACCENT_GREEN,
        };
        let mut c = canvas();
        render(&style, &mut c, bounds, 1.0, &config);

        // Default top edge sits at y = 14.4; the extra inset moves it to 24.4.
        assert_eq!(alpha(&c, 64, 14), 0);
        assert!(alpha(&c, 64, 24) > 0);
        assert!(alpha(&c, 24, 64) > 0, "left edge moves in too");
        assert_eq!(alpha(&c, 14, 64), 0);
    }

    #[test]
    fn badge_ring_has_butt_caps_and_no_compensation() {
        let config = EngineConfig::default();
        let bounds = Rect::from_size(128.0, 128.0);
        let (center, _) = badge_disc(bounds, &config);
        let style = Style::badge(theme::ACCENT_BLUE, || 0);
        let mut c = canvas();
        render(&style, &mut c, bounds, 0.5, &config);

        // Half a turn ends exactly at 6 o'clock. Just before it the ring is
        // drawn; a few pixels past it the disc shows, which a round cap or
        // the 1.02 stretch would have covered.
        let y = (center.y + 24.0) as u32;
        let before = c.pixel((center.x + 3.0) as u32, y).unwrap();
        let after = c.pixel((center.x - 4.0) as u32, y).unwrap();
        assert_eq!(before, theme::ACCENT_BLUE);
        assert_eq!(after, theme::BADGE_BACKGROUND);
    }

    #[test]
    fn badge_label_is_drawn_inside_the_disc() {
        let config = EngineConfig::default();
        let bounds = Rect::from_size(128.0, 128.0);
        let (center, radius) = badge_disc(bounds, &config);
        let style = Style::badge(theme::ACCENT_BLUE, || 8);

        let label_pixels = |c: &Canvas| {
            let reach = radius * 0.6;
            let (x0, x1) = ((center.x - reach) as u32, (center.x + reach) as u32);
            let (y0, y1) = ((center.y - reach) as u32, (center.y + reach) as u32);
            (y0..=y1)
                .flat_map(|y| (x0..=x1).map(move |x| (x, y)))
                .filter_map(|(x, y)| c.pixel(x, y))
                .filter(|p| p.r < 0x80 && p.g < 0x80 && p.a == 255)
                .count()
        };

        let mut plain = canvas();
        render(&style, &mut plain, bounds, 0.0, &config);
        assert_eq!(label_pixels(&plain), 0, "no font, no label");

        let mut labelled = canvas().with_font(LabelFont::embedded().unwrap());
        render(&style, &mut labelled, bounds, 0.0, &config);
        assert!(label_pixels(&labelled) > 20, "label ink expected around the disc center");
    }
}
