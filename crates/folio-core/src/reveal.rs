#![forbid(unsafe_code)]

//! Section entrance triggers.
//!
//! Each content section plays its entrance animation the first time enough
//! of it scrolls into view. [`visible_ratio`] does the intersection math
//! (viewport grown or shrunk by a root margin), [`SectionAnimator`] turns the
//! ratio into a one-shot trigger and staggers the children's entrances.

use std::time::Duration;

use crate::animation::{EasingFn, ease_out_cubic, eased_progress};

/// Vertical extent of a section in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionBounds {
    pub top: f64,
    pub height: f64,
}

impl SectionBounds {
    #[must_use]
    pub const fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Fraction of `bounds` inside the viewport `[scroll_y, scroll_y + viewport_height]`
/// grown on both edges by `root_margin` (negative margins shrink it).
#[must_use]
pub fn visible_ratio(
    bounds: SectionBounds,
    scroll_y: f64,
    viewport_height: f64,
    root_margin: f64,
) -> f64 {
    if bounds.height <= 0.0 {
        return 0.0;
    }
    let view_top = scroll_y - root_margin;
    let view_bottom = scroll_y + viewport_height + root_margin;
    if view_bottom <= view_top {
        return 0.0;
    }
    let overlap = bounds.bottom().min(view_bottom) - bounds.top.max(view_top);
    (overlap / bounds.height).clamp(0.0, 1.0)
}

/// Tunables for [`SectionAnimator`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealConfig {
    /// Visible fraction at which the section counts as in view.
    pub threshold: f64,
    /// Pixels added around the viewport; negative values shrink it.
    pub root_margin: f64,
    /// Stay revealed after scrolling back out.
    pub once: bool,
    pub delay_children: Duration,
    pub stagger: Duration,
    /// Entrance duration of a single child.
    pub child_duration: Duration,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            root_margin: 0.0,
            once: true,
            delay_children: Duration::ZERO,
            stagger: Duration::from_millis(100),
            child_duration: Duration::from_millis(500),
        }
    }
}

/// One-shot visibility trigger for a content section.
#[derive(Debug, Clone)]
pub struct SectionAnimator {
    config: RevealConfig,
    in_view: bool,
    revealed_at: Option<Duration>,
}

impl SectionAnimator {
    #[must_use]
    pub fn new(config: RevealConfig) -> Self {
        Self {
            config,
            in_view: false,
            revealed_at: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &RevealConfig {
        &self.config
    }

    /// Feed the current visible ratio. Returns `true` when the entrance
    /// starts on this call.
    pub fn observe(&mut self, ratio: f64, now: Duration) -> bool {
        let intersecting = ratio > 0.0 && ratio >= self.config.threshold;
        if self.config.once && self.revealed_at.is_some() {
            return false;
        }
        let was_in_view = self.in_view;
        self.in_view = intersecting;
        if intersecting && !was_in_view {
            self.revealed_at = Some(now);
            return true;
        }
        if !intersecting && !self.config.once {
            self.revealed_at = None;
        }
        false
    }

    /// Whether the entrance has been triggered (and not reset).
    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.revealed_at.is_some()
    }

    #[must_use]
    pub fn revealed_at(&self) -> Option<Duration> {
        self.revealed_at
    }

    /// Start offset of child `index` relative to the trigger.
    #[must_use]
    pub fn child_delay(&self, index: usize) -> Duration {
        let index = u32::try_from(index).unwrap_or(u32::MAX);
        self.config
            .delay_children
            .saturating_add(self.config.stagger.saturating_mul(index))
    }

    /// Eased entrance progress of child `index` at `now`.
    #[must_use]
    pub fn child_progress(&self, index: usize, now: Duration) -> f32 {
        self.child_progress_with(index, now, ease_out_cubic)
    }

    #[must_use]
    pub fn child_progress_with(&self, index: usize, now: Duration, easing: EasingFn) -> f32 {
        match self.revealed_at {
            None => 0.0,
            Some(start) => eased_progress(
                start.saturating_add(self.child_delay(index)),
                now,
                self.config.child_duration,
                easing,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn ratio_of_partially_visible_section() {
        let section = SectionBounds::new(900.0, 400.0);
        // Viewport 0..1000 covers 100 of 400 px.
        assert!((visible_ratio(section, 0.0, 1000.0, 0.0) - 0.25).abs() < 1e-9);
        assert_eq!(visible_ratio(section, 2000.0, 1000.0, 0.0), 0.0);
        assert_eq!(visible_ratio(section, 900.0, 1000.0, 0.0), 1.0);
    }

    #[test]
    fn negative_margin_shrinks_viewport() {
        let section = SectionBounds::new(900.0, 400.0);
        // Viewport 0..1000 shrunk by 100px on each side ends at 900.
        assert_eq!(visible_ratio(section, 0.0, 1000.0, -100.0), 0.0);
        assert!(visible_ratio(section, 0.0, 1000.0, 100.0) > 0.25);
    }

    #[test]
    fn zero_height_section_is_never_visible() {
        assert_eq!(
            visible_ratio(SectionBounds::new(0.0, 0.0), 0.0, 800.0, 0.0),
            0.0
        );
    }

    #[test]
    fn triggers_once_at_threshold() {
        let mut section = SectionAnimator::new(RevealConfig::default());
        assert!(!section.observe(0.05, ms(0)));
        assert!(section.observe(0.1, ms(10)));
        assert!(!section.observe(0.5, ms(20)));
        assert!(!section.observe(0.0, ms(30)));
        assert!(!section.observe(0.5, ms(40)));
        assert!(section.is_revealed());
        assert_eq!(section.revealed_at(), Some(ms(10)));
    }

    #[test]
    fn repeating_trigger_resets_when_out_of_view() {
        let mut section = SectionAnimator::new(RevealConfig {
            once: false,
            ..RevealConfig::default()
        });
        assert!(section.observe(0.5, ms(0)));
        assert!(!section.observe(0.0, ms(10)));
        assert!(!section.is_revealed());
        assert!(section.observe(0.5, ms(20)));
    }

    #[test]
    fn children_are_staggered() {
        let mut section = SectionAnimator::new(RevealConfig {
            delay_children: ms(200),
            stagger: ms(80),
            ..RevealConfig::default()
        });
        assert_eq!(section.child_delay(0), ms(200));
        assert_eq!(section.child_delay(3), ms(440));
        assert_eq!(section.child_progress(0, ms(1000)), 0.0);

        section.observe(1.0, ms(1000));
        assert_eq!(section.child_progress(1, ms(1200)), 0.0);
        assert_eq!(section.child_progress(0, ms(1700)), 1.0);
        let mid = section.child_progress(0, ms(1450));
        assert!(mid > 0.5 && mid < 1.0, "ease-out runs ahead of linear: {mid}");
    }
}
