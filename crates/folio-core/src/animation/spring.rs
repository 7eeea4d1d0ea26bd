#![forbid(unsafe_code)]

//! Damped spring used to ease decorative elements toward a target.
//!
//!   F = -stiffness × (position - target) - damping × velocity
//!   a = F / mass
//!
//! # Parameters
//!
//! - **stiffness** (k): restoring force. Higher = faster response.
//! - **damping** (c): velocity drag. Critical damping is `2√(k·m)`.
//! - **mass** (m): inertia. Lighter springs react faster.
//!
//! # Invariants
//!
//! 1. Stiffness and mass are always positive (clamped on construction).
//! 2. A spring at rest stays at rest until `set_target()` moves the target.
//! 3. Coming to rest snaps `position` exactly onto `target`.
//!
//! # Failure Modes
//!
//! - Very large dt: subdivided into 4ms steps for stability.
//! - Zero damping: oscillates forever; `is_at_rest()` may never be true.

use std::time::Duration;

/// Maximum dt per integration step (4ms).
const MAX_STEP_SECS: f64 = 0.004;

/// Position delta (pixels) below which the spring may come to rest.
const DEFAULT_REST_THRESHOLD: f64 = 0.01;

/// Velocity (pixels/s) below which the spring may come to rest.
const DEFAULT_VELOCITY_THRESHOLD: f64 = 0.1;

const MIN_STIFFNESS: f64 = 0.1;
const MIN_MASS: f64 = 0.01;

/// A damped harmonic oscillator over raw (unclamped) positions.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use folio_core::animation::Spring;
///
/// let mut spring = Spring::new(0.0, 100.0)
///     .with_stiffness(200.0)
///     .with_damping(10.0)
///     .with_mass(0.1);
///
/// for _ in 0..240 {
///     spring.advance(Duration::from_millis(16));
/// }
/// assert!((spring.position() - 100.0).abs() < 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct Spring {
    position: f64,
    velocity: f64,
    target: f64,
    stiffness: f64,
    damping: f64,
    mass: f64,
    rest_threshold: f64,
    velocity_threshold: f64,
    at_rest: bool,
}

impl Spring {
    /// Create a spring at `initial` moving toward `target`.
    ///
    /// Defaults: stiffness 170, damping 26, mass 1.
    #[must_use]
    pub fn new(initial: f64, target: f64) -> Self {
        Self {
            position: initial,
            velocity: 0.0,
            target,
            stiffness: 170.0,
            damping: 26.0,
            mass: 1.0,
            rest_threshold: DEFAULT_REST_THRESHOLD,
            velocity_threshold: DEFAULT_VELOCITY_THRESHOLD,
            at_rest: initial == target,
        }
    }

    /// Spring resting at `position`.
    #[must_use]
    pub fn at(position: f64) -> Self {
        Self::new(position, position)
    }

    #[must_use]
    pub fn with_stiffness(mut self, k: f64) -> Self {
        self.stiffness = k.max(MIN_STIFFNESS);
        self
    }

    #[must_use]
    pub fn with_damping(mut self, c: f64) -> Self {
        self.damping = c.max(0.0);
        self
    }

    #[must_use]
    pub fn with_mass(mut self, m: f64) -> Self {
        self.mass = m.max(MIN_MASS);
        self
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    #[inline]
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    #[inline]
    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    #[inline]
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.at_rest
    }

    /// Damping coefficient at which the spring stops overshooting.
    #[must_use]
    pub fn critical_damping(&self) -> f64 {
        2.0 * (self.stiffness * self.mass).sqrt()
    }

    /// Move the target. Wakes the spring if it was at rest.
    pub fn set_target(&mut self, target: f64) {
        if self.target != target {
            self.target = target;
            self.at_rest = false;
        }
    }

    /// Jump to `position` with zero velocity.
    pub fn snap_to(&mut self, position: f64) {
        self.position = position;
        self.target = position;
        self.velocity = 0.0;
        self.at_rest = true;
    }

    // Semi-implicit Euler.
    fn step(&mut self, dt: f64) {
        let displacement = self.position - self.target;
        let force = -self.stiffness * displacement - self.damping * self.velocity;
        self.velocity += force / self.mass * dt;
        self.position += self.velocity * dt;
    }

    /// Advance the spring by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        if self.at_rest {
            return;
        }

        let mut remaining = dt.as_secs_f64();
        while remaining > 0.0 {
            let step_dt = remaining.min(MAX_STEP_SECS);
            self.step(step_dt);
            remaining -= step_dt;
        }

        if (self.position - self.target).abs() < self.rest_threshold
            && self.velocity.abs() < self.velocity_threshold
        {
            self.position = self.target;
            self.velocity = 0.0;
            self.at_rest = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    fn settle(spring: &mut Spring, frames: usize) {
        for _ in 0..frames {
            spring.advance(FRAME);
        }
    }

    #[test]
    fn new_spring_at_target_is_at_rest() {
        let spring = Spring::at(5.0);
        assert!(spring.is_at_rest());
        assert_eq!(spring.position(), 5.0);
    }

    #[test]
    fn converges_to_target() {
        let mut spring = Spring::new(0.0, 240.0)
            .with_stiffness(100.0)
            .with_damping(10.0)
            .with_mass(0.3);
        settle(&mut spring, 600);
        assert!(spring.is_at_rest());
        assert_eq!(spring.position(), 240.0);
    }

    #[test]
    fn overdamped_spring_does_not_overshoot() {
        let mut spring = Spring::new(0.0, 100.0).with_stiffness(200.0).with_mass(0.5);
        let c = spring.critical_damping() * 1.5;
        spring = spring.with_damping(c);
        for _ in 0..300 {
            spring.advance(FRAME);
            assert!(spring.position() <= 100.0 + 1e-3);
        }
    }

    #[test]
    fn set_target_wakes_spring() {
        let mut spring = Spring::at(0.0);
        spring.set_target(10.0);
        assert!(!spring.is_at_rest());
        spring.advance(FRAME);
        assert!(spring.position() > 0.0);
    }

    #[test]
    fn snap_to_stops_motion() {
        let mut spring = Spring::new(0.0, 100.0);
        spring.advance(FRAME);
        spring.snap_to(42.0);
        assert!(spring.is_at_rest());
        assert_eq!(spring.position(), 42.0);
        assert_eq!(spring.velocity(), 0.0);
    }

    #[test]
    fn parameters_are_clamped() {
        let spring = Spring::new(0.0, 1.0)
            .with_stiffness(-5.0)
            .with_damping(-1.0)
            .with_mass(0.0);
        assert!(spring.critical_damping() > 0.0);
    }

    #[test]
    fn zero_dt_is_noop() {
        let mut spring = Spring::new(0.0, 1.0);
        spring.advance(Duration::ZERO);
        assert_eq!(spring.position(), 0.0);
    }
}
