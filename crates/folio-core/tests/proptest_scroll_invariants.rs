//! Property-based invariant tests for scroll tracking.
//!
//! ## Invariants
//!
//! 1. Direction is Down iff the latest offset grew, Up iff it shrank,
//!    unchanged otherwise.
//! 2. `is_scrolling` clears exactly one idle timeout after the last event.
//! 3. `at_bottom` matches `scroll_y >= document - viewport - slack`.
//! 4. `at_top && at_bottom` implies the document fits the viewport plus slack.

use std::time::Duration;

use folio_core::scroll::{
    DEFAULT_BOTTOM_SLACK, DEFAULT_IDLE_TIMEOUT, ScrollDirection, ScrollMetrics, ScrollTracker,
};
use proptest::prelude::*;

// ── Strategies ────────────────────────────────────────────────────────────

fn arb_offsets(max_n: usize) -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(0u32..5000, 1..max_n)
}

fn arb_gaps(max_n: usize) -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(1u64..149, 1..max_n)
}

// ── 1. Direction ──────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn direction_tracks_latest_delta(offsets in arb_offsets(64)) {
        let mut tracker = ScrollTracker::default();
        let mut previous = 0.0;
        let mut expected = ScrollDirection::None;
        for (i, offset) in offsets.iter().enumerate() {
            let y = f64::from(*offset);
            if y > previous {
                expected = ScrollDirection::Down;
            } else if y < previous {
                expected = ScrollDirection::Up;
            }
            let state = tracker.on_scroll(
                ScrollMetrics::new(y, 800.0, 6000.0),
                Duration::from_millis(i as u64),
            );
            prop_assert_eq!(state.direction, expected);
            previous = y;
        }
    }
}

// ── 2. Idle timeout ───────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn idle_clears_exactly_after_last_event(gaps in arb_gaps(32)) {
        let mut tracker = ScrollTracker::default();
        let mut now = Duration::ZERO;
        for (i, gap) in gaps.iter().enumerate() {
            now += Duration::from_millis(*gap);
            tracker.on_scroll(ScrollMetrics::new(i as f64, 800.0, 2000.0), now);
            // Every gap is shorter than the timeout, so the burst stays live.
            prop_assert!(tracker.state().is_scrolling);
        }
        let deadline = now + DEFAULT_IDLE_TIMEOUT;
        prop_assert!(!tracker.poll(deadline - Duration::from_nanos(1)));
        prop_assert!(tracker.state().is_scrolling);
        prop_assert!(tracker.poll(deadline));
        prop_assert!(!tracker.state().is_scrolling);
    }
}

// ── 3/4. Boundaries ───────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn bottom_flag_matches_threshold(y in 0u32..3000) {
        let mut tracker = ScrollTracker::default();
        let y = f64::from(y);
        let state = tracker.on_scroll(ScrollMetrics::new(y, 800.0, 2000.0), Duration::ZERO);
        prop_assert_eq!(state.at_bottom, y >= 2000.0 - 800.0 - DEFAULT_BOTTOM_SLACK);
        prop_assert_eq!(state.at_top, y == 0.0);
    }

    #[test]
    fn top_and_bottom_only_for_short_documents(
        y in 0u32..3000,
        viewport in 100u32..2000,
        document in 100u32..6000,
    ) {
        let mut tracker = ScrollTracker::default();
        let metrics = ScrollMetrics::new(f64::from(y), f64::from(viewport), f64::from(document));
        let state = tracker.on_scroll(metrics, Duration::ZERO);
        if state.at_top && state.at_bottom {
            prop_assert!(f64::from(document) <= f64::from(viewport) + DEFAULT_BOTTOM_SLACK);
        }
        prop_assert!((0.0..=1.0).contains(&state.progress));
    }
}
