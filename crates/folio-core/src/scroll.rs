#![forbid(unsafe_code)]

//! Window scroll tracking.
//!
//! [`ScrollTracker`] turns raw scroll offsets into a [`ScrollState`]: vertical
//! position, direction of travel, whether the user is actively scrolling, and
//! whether the viewport touches the top or bottom of the document.
//!
//! # Idle debounce
//!
//! Every scroll event marks the page as scrolling and pushes the idle
//! deadline to `now + idle_timeout`. The flag only clears once the host polls
//! at or after that deadline, so a burst of events keeps it set and the clear
//! happens exactly one timeout after the last event of the burst.
//!
//! # Invariants
//!
//! 1. `position_y` is never negative.
//! 2. `direction` changes only when the position strictly changes.
//! 3. `at_top && at_bottom` only when the document is no taller than the
//!    viewport plus the bottom slack.
//! 4. At most one idle deadline is pending at any time.

use std::time::Duration;

/// Quiet period after the last scroll event before `is_scrolling` clears.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_millis(150);

/// Distance from the document end that still counts as "at bottom".
pub const DEFAULT_BOTTOM_SLACK: f64 = 50.0;

/// Direction of the most recent position change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ScrollDirection {
    Up,
    Down,
    /// No movement observed yet.
    #[default]
    None,
}

impl ScrollDirection {
    /// Direction implied by moving from `previous` to `next`, keeping
    /// `current` when the position did not change.
    #[must_use]
    pub fn between(previous: f64, next: f64, current: Self) -> Self {
        if next > previous {
            Self::Down
        } else if next < previous {
            Self::Up
        } else {
            current
        }
    }

    /// Stable lowercase label for hosts and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::None => "none",
        }
    }
}

/// Layout measurements read from the window at the time of an event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    /// Vertical scroll offset of the window.
    pub scroll_y: f64,
    /// Height of the visible viewport.
    pub viewport_height: f64,
    /// Full height of the document.
    pub document_height: f64,
}

impl ScrollMetrics {
    #[must_use]
    pub const fn new(scroll_y: f64, viewport_height: f64, document_height: f64) -> Self {
        Self {
            scroll_y,
            viewport_height,
            document_height,
        }
    }

    /// Largest reachable scroll offset (zero for documents that fit).
    #[must_use]
    pub fn max_scroll(&self) -> f64 {
        (self.document_height - self.viewport_height).max(0.0)
    }
}

/// Read-only scroll snapshot published to consumers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollState {
    pub position_y: f64,
    pub direction: ScrollDirection,
    pub is_scrolling: bool,
    pub at_top: bool,
    pub at_bottom: bool,
    /// `position_y / max_scroll`, clamped to [0, 1].
    pub progress: f64,
    /// Absolute distance between the two latest samples; zero once idle.
    pub velocity: f64,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            position_y: 0.0,
            direction: ScrollDirection::None,
            is_scrolling: false,
            at_top: true,
            at_bottom: false,
            progress: 0.0,
            velocity: 0.0,
        }
    }
}

/// Tunables for [`ScrollTracker`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollConfig {
    pub idle_timeout: Duration,
    pub bottom_slack: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            bottom_slack: DEFAULT_BOTTOM_SLACK,
        }
    }
}

impl ScrollConfig {
    #[must_use]
    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Negative slack is clamped to zero.
    #[must_use]
    pub fn with_bottom_slack(mut self, slack: f64) -> Self {
        self.bottom_slack = slack.max(0.0);
        self
    }
}

/// Derives [`ScrollState`] from a stream of scroll offsets.
#[derive(Debug, Clone)]
pub struct ScrollTracker {
    config: ScrollConfig,
    state: ScrollState,
    idle_deadline: Option<Duration>,
}

impl Default for ScrollTracker {
    fn default() -> Self {
        Self::new(ScrollConfig::default())
    }
}

impl ScrollTracker {
    #[must_use]
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            config,
            state: ScrollState::default(),
            idle_deadline: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> &ScrollState {
        &self.state
    }

    /// Take the initial measurement when the provider mounts.
    ///
    /// Position, boundaries and progress are filled in; the page is not
    /// marked as scrolling and no direction is inferred.
    pub fn mount(&mut self, metrics: ScrollMetrics) -> ScrollState {
        let position = metrics.scroll_y.max(0.0);
        self.state = ScrollState {
            position_y: position,
            ..ScrollState::default()
        };
        self.apply_boundaries(&metrics);
        self.idle_deadline = None;
        self.state
    }

    /// Re-measure boundaries after a layout change. Position follows the
    /// window but neither direction nor the scrolling flag change.
    pub fn on_resize(&mut self, metrics: ScrollMetrics) -> ScrollState {
        self.state.position_y = metrics.scroll_y.max(0.0);
        self.apply_boundaries(&metrics);
        self.state
    }

    /// Record one scroll event observed at `now`.
    pub fn on_scroll(&mut self, metrics: ScrollMetrics, now: Duration) -> ScrollState {
        let previous = self.state.position_y;
        let position = metrics.scroll_y.max(0.0);

        self.state.direction = ScrollDirection::between(previous, position, self.state.direction);
        self.state.velocity = (position - previous).abs();
        self.state.position_y = position;
        self.apply_boundaries(&metrics);
        self.state.is_scrolling = true;
        self.idle_deadline = Some(now.saturating_add(self.config.idle_timeout));

        self.state
    }

    /// Clear `is_scrolling` if the idle deadline has been reached.
    ///
    /// Returns `true` when the state changed.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.idle_deadline {
            Some(deadline) if now >= deadline => {
                self.idle_deadline = None;
                self.state.is_scrolling = false;
                self.state.velocity = 0.0;
                tracing::debug!(
                    position_y = self.state.position_y,
                    direction = self.state.direction.as_str(),
                    "scroll idle"
                );
                true
            }
            _ => false,
        }
    }

    /// Pending idle deadline, if the page is currently scrolling.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.idle_deadline
    }

    /// Drop the pending idle deadline and mark the page as still.
    pub fn teardown(&mut self) {
        self.idle_deadline = None;
        self.state.is_scrolling = false;
        self.state.velocity = 0.0;
    }

    fn apply_boundaries(&mut self, metrics: &ScrollMetrics) {
        let position = self.state.position_y;
        self.state.at_top = position <= 0.0;
        self.state.at_bottom = metrics.viewport_height + position
            >= metrics.document_height - self.config.bottom_slack;
        let max_scroll = metrics.max_scroll();
        self.state.progress = if max_scroll > 0.0 {
            (position / max_scroll).clamp(0.0, 1.0)
        } else {
            0.0
        };
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: f64 = 800.0;
    const DOCUMENT: f64 = 2000.0;

    fn at(y: f64) -> ScrollMetrics {
        ScrollMetrics::new(y, VIEWPORT, DOCUMENT)
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn default_state_is_at_top_and_still() {
        let tracker = ScrollTracker::default();
        let state = tracker.state();
        assert_eq!(state.position_y, 0.0);
        assert_eq!(state.direction, ScrollDirection::None);
        assert!(state.at_top);
        assert!(!state.at_bottom);
        assert!(!state.is_scrolling);
    }

    #[test]
    fn mount_measures_without_scrolling() {
        let mut tracker = ScrollTracker::default();
        let state = tracker.mount(at(600.0));
        assert_eq!(state.position_y, 600.0);
        assert!(!state.is_scrolling);
        assert!(!state.at_top);
        assert_eq!(state.direction, ScrollDirection::None);
        assert_eq!(tracker.next_deadline(), None);
    }

    #[test]
    fn direction_follows_position_changes() {
        let mut tracker = ScrollTracker::default();
        assert_eq!(tracker.on_scroll(at(100.0), ms(0)).direction, ScrollDirection::Down);
        assert_eq!(tracker.on_scroll(at(40.0), ms(10)).direction, ScrollDirection::Up);
        // Equal offsets keep the previous direction.
        assert_eq!(tracker.on_scroll(at(40.0), ms(20)).direction, ScrollDirection::Up);
    }

    #[test]
    fn idle_clears_exactly_after_timeout() {
        let mut tracker = ScrollTracker::default();
        tracker.on_scroll(at(10.0), ms(1000));
        assert!(tracker.state().is_scrolling);
        assert!(!tracker.poll(ms(1149)));
        assert!(tracker.state().is_scrolling);
        assert!(tracker.poll(ms(1150)));
        assert!(!tracker.state().is_scrolling);
        assert_eq!(tracker.state().velocity, 0.0);
    }

    #[test]
    fn burst_restarts_idle_deadline() {
        let mut tracker = ScrollTracker::default();
        tracker.on_scroll(at(10.0), ms(0));
        tracker.on_scroll(at(20.0), ms(100));
        tracker.on_scroll(at(30.0), ms(200));
        assert_eq!(tracker.next_deadline(), Some(ms(350)));
        assert!(!tracker.poll(ms(300)));
        assert!(tracker.state().is_scrolling);
        assert!(tracker.poll(ms(350)));
    }

    #[test]
    fn bottom_threshold_honours_slack() {
        let mut tracker = ScrollTracker::default();
        // 2000 - 800 - 50 = 1150
        assert!(!tracker.on_scroll(at(1149.0), ms(0)).at_bottom);
        assert!(tracker.on_scroll(at(1150.0), ms(1)).at_bottom);
        assert!(tracker.on_scroll(at(1200.0), ms(2)).at_bottom);
    }

    #[test]
    fn negative_offsets_clamp_to_top() {
        let mut tracker = ScrollTracker::default();
        let state = tracker.on_scroll(at(-30.0), ms(0));
        assert_eq!(state.position_y, 0.0);
        assert!(state.at_top);
    }

    #[test]
    fn short_document_is_both_top_and_bottom() {
        let mut tracker = ScrollTracker::default();
        let state = tracker.mount(ScrollMetrics::new(0.0, 800.0, 600.0));
        assert!(state.at_top && state.at_bottom);
        assert_eq!(state.progress, 0.0);
    }

    #[test]
    fn progress_and_velocity() {
        let mut tracker = ScrollTracker::default();
        tracker.on_scroll(at(300.0), ms(0));
        let state = tracker.on_scroll(at(600.0), ms(16));
        assert_eq!(state.velocity, 300.0);
        assert!((state.progress - 0.5).abs() < 1e-9);
    }

    #[test]
    fn resize_updates_boundaries_only() {
        let mut tracker = ScrollTracker::default();
        tracker.on_scroll(at(1000.0), ms(0));
        tracker.poll(ms(150));
        let state = tracker.on_resize(ScrollMetrics::new(1000.0, 800.0, 1700.0));
        assert!(state.at_bottom);
        assert!(!state.is_scrolling);
        assert_eq!(state.direction, ScrollDirection::Down);
    }

    #[test]
    fn teardown_drops_pending_deadline() {
        let mut tracker = ScrollTracker::default();
        tracker.on_scroll(at(10.0), ms(0));
        tracker.teardown();
        assert_eq!(tracker.next_deadline(), None);
        assert!(!tracker.state().is_scrolling);
        assert!(!tracker.poll(ms(1000)));
    }
}
