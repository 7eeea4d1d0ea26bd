#![forbid(unsafe_code)]

//! Presentation helpers: spring smoothing and easing curves.
//!
//! None of this carries correctness contracts. State machines record the
//! latest input exactly; these helpers only shape how it is drawn.

pub mod spring;

pub use spring::Spring;

/// An easing curve mapping t ∈ [0, 1] to [0, 1].
pub type EasingFn = fn(f32) -> f32;

#[inline]
#[must_use]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

#[inline]
#[must_use]
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

#[inline]
#[must_use]
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

#[inline]
#[must_use]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Progress of an animation of `duration` that started at `start`, shaped
/// by `easing`. Zero-length animations are complete once started.
#[must_use]
pub fn eased_progress(
    start: std::time::Duration,
    now: std::time::Duration,
    duration: std::time::Duration,
    easing: EasingFn,
) -> f32 {
    if now < start {
        return 0.0;
    }
    if duration.is_zero() {
        return 1.0;
    }
    let t = (now - start).as_secs_f64() / duration.as_secs_f64();
    easing(t as f32)
}
