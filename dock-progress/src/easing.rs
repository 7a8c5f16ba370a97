//! Easing curves used by the progress animation.
//!
//! Every curve expects `t` in `[0, 1]`. Callers build `t` themselves, so an
//! out-of-range value is a bug at the call site and trips a debug assertion
//! rather than being clamped silently here.

#[inline]
fn check_unit(t: f64) {
    debug_assert!((0.0..=1.0).contains(&t), "easing parameter {t} outside [0, 1]");
}

/// Clamp a progress value into `[0, 1]`. NaN maps to 0.
#[inline]
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    check_unit(t);
    a + (b - a) * t
}

/// Cubic Hermite smoothstep between two edges.
pub fn smoothstep(edge0: f64, edge1: f64, x: f64) -> f64 {
    let t = clamp_unit((x - edge0) / (edge1 - edge0));
    t * t * (3.0 - 2.0 * t)
}

pub fn ease_in(t: f64) -> f64 {
    check_unit(t);
    smoothstep(0.0, 1.0, t)
}

pub fn ease_out(t: f64) -> f64 {
    check_unit(t);
    1.0 - ease_in(1.0 - t)
}

pub fn ease_in_out(t: f64) -> f64 {
    lerp(ease_in(t), ease_out(t), t)
}
