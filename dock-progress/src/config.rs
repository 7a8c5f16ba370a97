//! Engine tuning knobs.
//!
//! Every field has a default, so a partial JSON document (or none at all) is
//! a valid configuration.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Gap between displayed and target progress below which animation stops.
    pub convergence_threshold: f64,
    /// Refresh period substituted when the frame clock reports zero.
    pub fallback_refresh_period: f64,
    /// Stroke length multiplier so round caps meet at full completion.
    pub cap_compensation: f32,
    /// Inset of the squircle outline from the overlay edge.
    pub squircle_inset: f32,
    /// Radius used by circle styles whose radius is not positive.
    pub default_circle_radius: f32,
    /// Badge disc radius as a fraction of the overlay's shorter side.
    pub badge_scale: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            convergence_threshold: 0.01,
            fallback_refresh_period: 1.0 / 60.0,
            cap_compensation: 1.02,
            squircle_inset: 14.4,
            default_circle_radius: 55.0,
            badge_scale: 0.21,
        }
    }
}

impl EngineConfig {
    /// Parse a JSON document, repairing out-of-range values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Replace values the engine cannot work with by their defaults.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if !(self.convergence_threshold > 0.0 && self.convergence_threshold.is_finite()) {
            warn!(
                value = self.convergence_threshold,
                "convergence_threshold must be positive, using default"
            );
            self.convergence_threshold = defaults.convergence_threshold;
        }
        if !(self.fallback_refresh_period > 0.0 && self.fallback_refresh_period.is_finite()) {
            warn!(
                value = self.fallback_refresh_period,
                "fallback_refresh_period must be positive, using default"
            );
            self.fallback_refresh_period = defaults.fallback_refresh_period;
        }
        if !(self.cap_compensation >= 1.0 && self.cap_compensation.is_finite()) {
            warn!(
                value = self.cap_compensation,
                "cap_compensation must be at least 1, using default"
            );
            self.cap_compensation = defaults.cap_compensation;
        }
        if !(self.squircle_inset >= 0.0 && self.squircle_inset.is_finite()) {
            self.squircle_inset = defaults.squircle_inset;
        }
        if !(self.default_circle_radius > 0.0 && self.default_circle_radius.is_finite()) {
            self.default_circle_radius = defaults.default_circle_radius;
        }
        if !(self.badge_scale > 0.0 && self.badge_scale <= 0.5) {
            warn!(value = self.badge_scale, "badge_scale must be in (0, 0.5], using default");
            self.badge_scale = defaults.badge_scale;
        }
        self
    }
}
