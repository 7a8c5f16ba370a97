//! Overlay styles.
//!
//! Exactly one `Style` is active on a controller at a time. Switching styles
//! never touches progress state. Callback-carrying variants hold their
//! capability behind an `Rc`: styles live on the controller's thread and are
//! cheap to clone.

use std::fmt;
use std::rc::Rc;

use crate::canvas::Canvas;
use crate::geometry::Rect;
use crate::theme::{self, Color};

/// Supplies the number shown inside a badge. Evaluated at render time.
pub trait BadgeValue {
    fn value(&self) -> i64;
}

impl<F: Fn() -> i64> BadgeValue for F {
    fn value(&self) -> i64 {
        self()
    }
}

/// Caller-owned drawing for `Style::Custom`.
pub trait CustomDraw {
    /// `progress` is the displayed progress, already clamped to `[0, 1]`.
    fn draw(&self, canvas: &mut Canvas, bounds: Rect, progress: f64);
}

impl<F: Fn(&mut Canvas, Rect, f64)> CustomDraw for F {
    fn draw(&self, canvas: &mut Canvas, bounds: Rect, progress: f64) {
        self(canvas, bounds, progress)
    }
}

#[derive(Clone, Default)]
pub enum Style {
    /// Rounded horizontal bar near the bottom edge.
    #[default]
    Bar,
    /// Superellipse outline traced around the icon silhouette.
    Squircle { inset: Option<f32>, color: Color },
    /// Arc from 12 o'clock, clockwise.
    Circle { radius: f32, color: Color },
    /// Corner disc with a progress ring and a numeric label.
    Badge { color: Color, value: Rc<dyn BadgeValue> },
    /// Corner disc filled with a wedge.
    Pie { color: Color },
    /// Everything is drawn by the caller.
    Custom(Rc<dyn CustomDraw>),
}

/// Payload-free discriminant of a [`Style`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StyleKind {
    Bar,
    Squircle,
    Circle,
    Badge,
    Pie,
    Custom,
}

impl Style {
    pub fn squircle(color: Color) -> Self {
        Style::Squircle { inset: None, color }
    }

    pub fn circle(radius: f32, color: Color) -> Self {
        Style::Circle { radius, color }
    }

    pub fn badge(color: Color, value: impl BadgeValue + 'static) -> Self {
        Style::Badge {
            color,
            value: Rc::new(value),
        }
    }

    pub fn pie(color: Color) -> Self {
        Style::Pie { color }
    }

    /// Custom drawing that only needs the overlay bounds.
    pub fn custom(draw: impl Fn(&mut Canvas, Rect) + 'static) -> Self {
        Style::Custom(Rc::new(move |canvas: &mut Canvas, bounds: Rect, _progress: f64| {
            draw(canvas, bounds)
        }))
    }

    /// Custom drawing that also follows the animated progress.
    pub fn custom_with_progress(draw: impl CustomDraw + 'static) -> Self {
        Style::Custom(Rc::new(draw))
    }

    pub fn kind(&self) -> StyleKind {
        match self {
            Style::Bar => StyleKind::Bar,
            Style::Squircle { .. } => StyleKind::Squircle,
            Style::Circle { .. } => StyleKind::Circle,
            Style::Badge { .. } => StyleKind::Badge,
            Style::Pie { .. } => StyleKind::Pie,
            Style::Custom(_) => StyleKind::Custom,
        }
    }
}

impl fmt::Debug for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Style::Bar => f.write_str("Bar"),
            Style::Squircle { inset, color } => f
                .debug_struct("Squircle")
                .field("inset", inset)
                .field("color", color)
                .finish(),
            Style::Circle { radius, color } => f
                .debug_struct("Circle")
                .field("radius", radius)
                .field("color", color)
                .finish(),
            Style::Badge { color, .. } => f
                .debug_struct("Badge")
                .field("color", color)
                .finish_non_exhaustive(),
            Style::Pie { color } => f.debug_struct("Pie").field("color", color).finish(),
            Style::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Each kind with its default parameters.
impl From<StyleKind> for Style {
    fn from(kind: StyleKind) -> Self {
        match kind {
            StyleKind::Bar => Style::Bar,
            StyleKind::Squircle => Style::squircle(theme::ACCENT_BLUE),
            StyleKind::Circle => Style::circle(55.0, theme::ACCENT_BLUE),
            StyleKind::Badge => Style::badge(theme::ACCENT_BLUE, || 0),
            StyleKind::Pie => Style::pie(theme::ACCENT_BLUE),
            StyleKind::Custom => Style::custom(|_, _| {}),
        }
    }
}
