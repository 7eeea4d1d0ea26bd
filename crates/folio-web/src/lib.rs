#![forbid(unsafe_code)]

//! `folio-web` provides the web-facing backend for the folio page runtime.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding page (JS) pushes scroll, resize,
//!   pointer and frame events.
//! - **Deterministic time**: the host advances a monotonic clock explicitly,
//!   usually from `performance.now()` or `requestAnimationFrame` timestamps.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! DOM bindings (`sessionStorage`, hit testing, the body cursor style) live in
//! the `dom` module and only build for `wasm32`. Native builds use
//! [`headless::HeadlessHost`] instead.

#[cfg(target_arch = "wasm32")]
pub mod dom;
pub mod headless;
#[cfg(feature = "input-parser")]
pub mod input_parser;

use core::time::Duration;
use std::collections::VecDeque;

use folio_backend::{Backend, BackendClock, PageHost, SessionStore};
use folio_core::event::PageEvent;

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Set current monotonic time. Earlier times are ignored.
    pub fn set(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Set current time from a millisecond timestamp such as
    /// `performance.now()`. Negative and non-finite values are ignored.
    pub fn set_ms(&mut self, ms: f64) {
        if let Some(now) = duration_from_ms(ms) {
            self.set(now);
        }
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

impl BackendClock for DeterministicClock {
    fn now_mono(&self) -> Duration {
        self.now
    }
}

/// Convert a host millisecond timestamp into a [`Duration`].
#[must_use]
pub fn duration_from_ms(ms: f64) -> Option<Duration> {
    if ms.is_finite() && ms >= 0.0 {
        Some(Duration::from_nanos((ms * 1_000_000.0).round() as u64))
    } else {
        None
    }
}

/// Host-driven event queue.
///
/// Events carry the host timestamp they were observed at. Timestamps are
/// clamped so they never run backwards.
#[derive(Debug, Clone, Default)]
pub struct HostEventQueue {
    queue: VecDeque<(Duration, PageEvent)>,
    last: Duration,
}

impl HostEventQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an event observed at `at`.
    pub fn push(&mut self, at: Duration, event: PageEvent) {
        let at = at.max(self.last);
        self.last = at;
        self.queue.push_back((at, event));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drain all pending events in arrival order.
    pub fn drain(&mut self) -> impl Iterator<Item = (Duration, PageEvent)> + '_ {
        self.queue.drain(..)
    }
}

/// Backend bundle for the web: a host clock plus session and page handles.
#[derive(Debug, Clone)]
pub struct WebBackend<St, H> {
    clock: DeterministicClock,
    store: St,
    host: H,
}

impl<St, H> WebBackend<St, H>
where
    St: SessionStore + Clone,
    H: PageHost,
{
    #[must_use]
    pub fn new(store: St, host: H) -> Self {
        Self {
            clock: DeterministicClock::new(),
            store,
            host,
        }
    }

    /// Mutable access for the host to advance time.
    pub fn clock_mut(&mut self) -> &mut DeterministicClock {
        &mut self.clock
    }
}

impl<St, H> Backend for WebBackend<St, H>
where
    St: SessionStore + Clone,
    H: PageHost,
{
    type Clock = DeterministicClock;
    type Store = St;
    type Host = H;

    fn clock(&self) -> &Self::Clock {
        &self.clock
    }

    fn store(&self) -> Self::Store {
        self.store.clone()
    }

    fn host(&self) -> Self::Host {
        self.host.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessHost;
    use folio_backend::NativeCursorControl;
    use folio_core::scroll::ScrollMetrics;
    use folio_core::session::MemorySessionStore;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn clock_is_monotonic() {
        let mut clock = DeterministicClock::new();
        clock.set(Duration::from_millis(50));
        clock.set(Duration::from_millis(20));
        assert_eq!(clock.now_mono(), Duration::from_millis(50));
        clock.advance(Duration::from_millis(16));
        assert_eq!(clock.now_mono(), Duration::from_millis(66));
    }

    #[test]
    fn clock_accepts_performance_now_values() {
        let mut clock = DeterministicClock::new();
        clock.set_ms(1234.5);
        assert_eq!(clock.now_mono(), Duration::from_micros(1_234_500));
        clock.set_ms(f64::NAN);
        clock.set_ms(-1.0);
        assert_eq!(clock.now_mono(), Duration::from_micros(1_234_500));
    }

    #[test]
    fn queue_preserves_order_and_clamps_time() {
        let mut queue = HostEventQueue::new();
        let metrics = ScrollMetrics::new(10.0, 800.0, 2000.0);
        queue.push(Duration::from_millis(30), PageEvent::Scroll(metrics));
        queue.push(Duration::from_millis(10), PageEvent::Frame);
        assert_eq!(queue.len(), 2);

        let drained: Vec<_> = queue.drain().collect();
        assert_eq!(
            drained,
            vec![
                (Duration::from_millis(30), PageEvent::Scroll(metrics)),
                (Duration::from_millis(30), PageEvent::Frame),
            ]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn backend_hands_out_shared_handles() {
        let session = Rc::new(RefCell::new(MemorySessionStore::new()));
        let mut backend = WebBackend::new(Rc::clone(&session), HeadlessHost::new());
        backend.clock_mut().set_ms(500.0);
        assert_eq!(backend.clock().now_mono(), Duration::from_millis(500));

        backend.store().set("hasCompletedBoot", "true").unwrap();
        assert_eq!(session.borrow().write_count(), 1);

        let mut host = backend.host();
        host.hide_native_cursor();
        assert!(backend.host().native_cursor_hidden());
    }
}
