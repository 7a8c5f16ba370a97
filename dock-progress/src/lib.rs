//! Animated progress overlays for application icons.
//!
//! A [`ProgressController`] keeps a target progress value, eases a displayed
//! value toward it one display refresh at a time, and draws the result in one
//! of several [`Style`]s on top of the host's icon.
//!
//! ```no_run
//! use dock_progress::{ManualClock, PixmapHost, ProgressController, Style, theme};
//! use dock_progress::tiny_skia::Pixmap;
//!
//! let host = PixmapHost::new(Pixmap::new(128, 128).unwrap());
//! let vsync = ManualClock::new();
//! let mut controller = ProgressController::new(host.clone(), vsync.clone());
//! controller.set_style(Style::circle(40.0, theme::ACCENT_BLUE));
//! controller.set_progress(0.4);
//!
//! // From the display refresh callback:
//! vsync.tick(1.0 / 60.0);
//! controller.pump();
//! if host.take_dirty() {
//!     let _frame = controller.compose();
//! }
//! ```

pub mod canvas;
pub mod clock;
pub mod config;
pub mod controller;
pub mod easing;
pub mod error;
pub mod format;
pub mod geometry;
pub mod host;
pub mod shapes;
pub mod source;
pub mod style;
pub mod text;
pub mod theme;

pub use canvas::Canvas;
pub use clock::{FrameClock, ManualClock, ThreadClock};
pub use config::EngineConfig;
pub use controller::{ProgressController, ProgressState, RenderRequest};
pub use error::{OverlayError, Result};
pub use format::{kilo_short_string, scaled_font_size};
pub use geometry::Rect;
pub use host::{HostSurface, PixmapHost};
pub use source::{ProgressSource, SourceEvent, SourceSubscription};
pub use style::{BadgeValue, CustomDraw, Style, StyleKind};
pub use text::LabelFont;
pub use theme::Color;

pub use tiny_skia;
