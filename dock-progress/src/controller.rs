//! The progress animation engine.
//!
//! [`ProgressController`] owns the target and displayed progress, the active
//! style and the optional external-source subscription. It has single-thread
//! affinity: construct it on the thread that paints the icon and keep every
//! call there. Ticks and source updates produced elsewhere are marshalled in
//! by [`ProgressController::pump`].
//!
//! Per animation cycle the controller moves `Idle -> Animating -> Idle`.
//! While idle the clock is stopped and the displayed value equals the
//! clamped target.

use tiny_skia::Pixmap;
use tracing::{debug, trace, warn};

use crate::canvas::Canvas;
use crate::clock::FrameClock;
use crate::config::EngineConfig;
use crate::easing::{clamp_unit, ease_in_out, lerp};
use crate::geometry::Rect;
use crate::host::HostSurface;
use crate::shapes;
use crate::source::{ProgressSource, SourceSubscription};
use crate::style::Style;

/// Snapshot of the animation state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ProgressState {
    /// Last requested value, stored verbatim.
    pub target: f64,
    /// Animated value, always within `[0, 1]`.
    pub displayed: f64,
    /// Seconds accumulated since the current cycle started.
    pub elapsed: f64,
    pub animating: bool,
}

/// What to draw and where, for one repaint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderRequest {
    pub bounds: Rect,
    pub progress: f64,
}

pub struct ProgressController {
    state: ProgressState,
    style: Style,
    config: EngineConfig,
    clock: Box<dyn FrameClock>,
    host: Box<dyn HostSurface>,
    subscription: Option<SourceSubscription>,
}

impl ProgressController {
    pub fn new(host: impl HostSurface + 'static, clock: impl FrameClock + 'static) -> Self {
        Self::with_config(host, clock, EngineConfig::default())
    }

    pub fn with_config(
        host: impl HostSurface + 'static,
        clock: impl FrameClock + 'static,
        config: EngineConfig,
    ) -> Self {
        Self {
            state: ProgressState::default(),
            style: Style::default(),
            config: config.sanitized(),
            clock: Box::new(clock),
            host: Box::new(host),
            subscription: None,
        }
    }

    pub fn progress(&self) -> f64 {
        self.state.target
    }

    pub fn displayed_progress(&self) -> f64 {
        self.state.displayed
    }

    pub fn state(&self) -> ProgressState {
        self.state
    }

    pub fn is_animating(&self) -> bool {
        self.state.animating
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Replace the active style. Progress state is left alone.
    pub fn set_style(&mut self, style: Style) {
        debug!(from = ?self.style.kind(), to = ?style.kind(), "style changed");
        self.style = style;
        self.host.request_repaint();
    }

    /// Set the target progress.
    ///
    /// Positive values animate toward `clamp(value, 0, 1)`. When the previous
    /// target was already complete (>= 1) the displayed value jumps straight
    /// to the new target instead of easing back down. Values <= 0 stop the
    /// animation and show the clamped value at once.
    pub fn set_progress(&mut self, value: f64) {
        let previous = self.state.target;
        self.state.target = value;

        if !(value > 0.0) {
            self.stop_animation();
            self.state.displayed = clamp_unit(value);
            self.state.elapsed = 0.0;
            self.host.request_repaint();
            return;
        }

        if previous >= 1.0 && !self.state.animating {
            self.state.displayed = clamp_unit(value);
            self.state.elapsed = 0.0;
            self.host.request_repaint();
        }
        self.start_animation();
    }

    /// Return to zero from any state.
    pub fn reset_progress(&mut self) {
        self.stop_animation();
        self.state.target = 0.0;
        self.state.displayed = 0.0;
        self.state.elapsed = 0.0;
        self.host.request_repaint();
    }

    /// Follow `source`, replacing any earlier one. `None` detaches and resets.
    pub fn attach_external_source(&mut self, source: Option<&ProgressSource>) {
        // Dropping the old subscription unsubscribes it.
        self.subscription = source.map(ProgressSource::subscribe);
        match source {
            Some(_) => debug!("attached external progress source"),
            None => {
                debug!("detached external progress source");
                self.reset_progress();
            }
        }
    }

    pub fn has_external_source(&self) -> bool {
        self.subscription.as_ref().is_some_and(SourceSubscription::is_alive)
    }

    /// Apply pending updates from the external source.
    pub fn sync_source(&mut self) {
        let Some(subscription) = &self.subscription else {
            return;
        };
        let updates = subscription.take_updates();
        if !subscription.is_alive() {
            debug!("external progress source dropped");
            self.subscription = None;
        }
        for value in updates {
            self.set_progress(value);
        }
    }

    /// Advance the animation by one display refresh.
    pub fn on_frame_tick(&mut self, refresh_period: f64) {
        if !self.state.animating {
            trace!("tick while idle ignored");
            return;
        }

        let period = if refresh_period > 0.0 && refresh_period.is_finite() {
            refresh_period
        } else {
            warn!(
                refresh_period,
                fallback = self.config.fallback_refresh_period,
                "frame clock reported a non-positive refresh period"
            );
            self.config.fallback_refresh_period
        };
        self.state.elapsed += period;

        let goal = clamp_unit(self.state.target);
        if (self.state.displayed - goal).abs() <= self.config.convergence_threshold {
            self.state.displayed = goal;
            self.state.elapsed = 0.0;
            self.stop_animation();
        } else {
            let t = clamp_unit(ease_in_out(clamp_unit(self.state.elapsed)));
            self.state.displayed = clamp_unit(lerp(self.state.displayed, goal, t));
            trace!(displayed = self.state.displayed, goal, "tick");
        }

        self.host.request_repaint();
    }

    /// Drain source updates and every pending clock tick. Returns the number
    /// of ticks applied.
    pub fn pump(&mut self) -> usize {
        self.sync_source();
        let mut ticks = 0;
        while self.state.animating {
            let Some(period) = self.clock.poll_tick() else {
                break;
            };
            self.on_frame_tick(period);
            ticks += 1;
        }
        ticks
    }

    pub fn render_request(&self) -> RenderRequest {
        RenderRequest {
            bounds: self.host.overlay_bounds(),
            progress: self.state.displayed,
        }
    }

    /// Draw the overlay for the current state onto `canvas`.
    pub fn render(&self, canvas: &mut Canvas) {
        self.render_into(canvas, self.render_request());
    }

    pub fn render_into(&self, canvas: &mut Canvas, request: RenderRequest) {
        shapes::render(&self.style, canvas, request.bounds, request.progress, &self.config);
    }

    /// Compose the host's icon with the overlay. Returns `None` when no
    /// canvas is available for this frame.
    pub fn compose(&self) -> Option<Pixmap> {
        let request = self.render_request();
        let width = request.bounds.max_x().ceil() as u32;
        let height = request.bounds.max_y().ceil() as u32;
        let mut canvas = match Canvas::new(width, height) {
            Ok(canvas) => canvas,
            Err(e) => {
                debug!(error = %e, "skipping frame");
                return None;
            }
        };
        if let Some(icon) = self.host.base_icon() {
            canvas.draw_pixmap(&icon, request.bounds);
        }
        if let Some(font) = self.host.label_font() {
            canvas = canvas.with_font(font);
        }
        self.render_into(&mut canvas, request);
        Some(canvas.into_pixmap())
    }

    fn start_animation(&mut self) {
        if !self.state.animating {
            debug!(goal = self.state.target, "animation started");
            self.state.animating = true;
        }
        self.clock.start();
    }

    fn stop_animation(&mut self) {
        if self.state.animating {
            debug!(displayed = self.state.displayed, "animation stopped");
            self.state.animating = false;
        }
        self.clock.stop();
    }
}
