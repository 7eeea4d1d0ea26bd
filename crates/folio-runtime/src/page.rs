#![forbid(unsafe_code)]

//! Page runtime: mounts every interaction component at the page root and
//! routes host events and timers to them.
//!
//! # Lifecycle
//!
//! ```text
//! mount ──▶ handle(event, now)* ──▶ unmount / drop
//! ```
//!
//! On mount the runtime measures the scroll position, consults the boot
//! flag, hides the native pointer and schedules the first boot stage. Every
//! call to [`PageRuntime::handle`] first fires timers that are already due,
//! then applies the event, so timer callbacks and events interleave in the
//! order the browser event loop would run them.
//!
//! Components never talk to each other. Their state leaves the runtime
//! only through [`ReadSignal`]s.
//!
//! # Invariants
//!
//! 1. At most one scroll idle timer and one boot stage timer are pending.
//! 2. Boot observers never see `Ready` before the session flag is stored.
//! 3. After unmount no timer is pending and the native pointer is restored.

use std::time::Duration;

use folio_backend::{Backend, BackendClock, PageHost};
use folio_core::boot::{BootSequencer, BootState, BootTransition};
use folio_core::cursor::{CursorFollower, CursorFrame, CursorState};
use folio_core::event::PageEvent;
use folio_core::nav::{NavState, SectionSpy};
use folio_core::reveal::{RevealConfig, SectionAnimator, SectionBounds, visible_ratio};
use folio_core::scroll::{ScrollMetrics, ScrollState, ScrollTracker};
use folio_core::session::SessionStore;
use tracing::{debug, info, info_span};

use crate::config::FolioConfig;
use crate::reactive::{Observable, ReadSignal};
use crate::timer::{Scheduler, TimerId, TimerTask};

/// A content section with its entrance trigger.
#[derive(Debug, Clone)]
struct Section {
    id: String,
    bounds: SectionBounds,
    animator: SectionAnimator,
}

/// Owned, writable ends of the published state.
#[derive(Debug, Clone)]
struct Signals {
    scroll: Observable<ScrollState>,
    boot: Observable<BootState>,
    cursor: Observable<CursorState>,
    nav: Observable<NavState>,
}

/// Root of the interaction core for one page view.
pub struct PageRuntime<S, St, H>
where
    S: Scheduler,
    St: SessionStore,
    H: PageHost,
{
    scheduler: S,
    store: St,
    host: H,
    scroll: ScrollTracker,
    scroll_timer: Option<TimerId>,
    boot: BootSequencer,
    boot_timer: Option<TimerId>,
    cursor: CursorFollower<H>,
    spy: SectionSpy,
    sections: Vec<Section>,
    reveal: RevealConfig,
    metrics: ScrollMetrics,
    last_frame: Option<Duration>,
    signals: Signals,
    mounted: bool,
}

impl<S, St, H> std::fmt::Debug for PageRuntime<S, St, H>
where
    S: Scheduler,
    St: SessionStore,
    H: PageHost,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageRuntime")
            .field("scroll", self.scroll.state())
            .field("boot", &self.boot.state())
            .field("cursor", &self.cursor.state())
            .field("sections", &self.sections.len())
            .field("pending_timers", &self.scheduler.pending())
            .field("mounted", &self.mounted)
            .finish()
    }
}

impl<S, St, H> PageRuntime<S, St, H>
where
    S: Scheduler,
    St: SessionStore,
    H: PageHost,
{
    /// Mount every component at `now` against the initial layout.
    pub fn mount(
        config: &FolioConfig,
        scheduler: S,
        store: St,
        host: H,
        metrics: ScrollMetrics,
        now: Duration,
    ) -> Self {
        let _span = info_span!("folio.mount").entered();

        let mut scroll = ScrollTracker::new(config.scroll_config());
        let initial_scroll = scroll.mount(metrics);
        let boot = BootSequencer::mount(config.boot_config(), &store, now);
        let cursor = CursorFollower::mount(config.cursor_config(), host.clone(), now);
        let spy = SectionSpy::new(config.nav_config());

        let signals = Signals {
            scroll: Observable::new("scroll", initial_scroll),
            boot: Observable::new("boot", boot.state()),
            cursor: Observable::new("cursor", cursor.state()),
            nav: Observable::new("nav", spy.state(&initial_scroll)),
        };

        let mut page = Self {
            scheduler,
            store,
            host,
            scroll,
            scroll_timer: None,
            boot,
            boot_timer: None,
            cursor,
            spy,
            sections: Vec::new(),
            reveal: config.reveal_config(),
            metrics,
            last_frame: None,
            signals,
            mounted: true,
        };
        page.schedule_boot_stage();
        info!(
            boot = ?page.boot.state(),
            position_y = initial_scroll.position_y,
            "page mounted"
        );
        page
    }

    /// Mount against a backend, reading the current time from its clock.
    pub fn mount_on<B>(
        config: &FolioConfig,
        scheduler: S,
        backend: &B,
        metrics: ScrollMetrics,
    ) -> Self
    where
        B: Backend<Store = St, Host = H>,
    {
        let now = backend.clock().now_mono();
        Self::mount(config, scheduler, backend.store(), backend.host(), metrics, now)
    }

    // -- read side ---------------------------------------------------------

    #[must_use]
    pub fn scroll_signal(&self) -> ReadSignal<ScrollState> {
        self.signals.scroll.reader()
    }

    #[must_use]
    pub fn boot_signal(&self) -> ReadSignal<BootState> {
        self.signals.boot.reader()
    }

    #[must_use]
    pub fn cursor_signal(&self) -> ReadSignal<CursorState> {
        self.signals.cursor.reader()
    }

    #[must_use]
    pub fn nav_signal(&self) -> ReadSignal<NavState> {
        self.signals.nav.reader()
    }

    #[must_use]
    pub fn scroll_state(&self) -> ScrollState {
        *self.scroll.state()
    }

    #[must_use]
    pub fn boot(&self) -> &BootSequencer {
        &self.boot
    }

    #[must_use]
    pub fn cursor_state(&self) -> CursorState {
        self.cursor.state()
    }

    #[must_use]
    pub fn cursor_frame(&self) -> CursorFrame {
        self.cursor.frame()
    }

    #[must_use]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    #[must_use]
    pub fn store(&self) -> &St {
        &self.store
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Whether section `id` has played its entrance.
    #[must_use]
    pub fn section_revealed(&self, id: &str) -> bool {
        self.section(id).is_some_and(|s| s.animator.is_revealed())
    }

    /// Entrance progress of child `index` in section `id`.
    #[must_use]
    pub fn section_child_progress(&self, id: &str, index: usize, now: Duration) -> f32 {
        self.section(id)
            .map_or(0.0, |s| s.animator.child_progress(index, now))
    }

    // -- write side --------------------------------------------------------

    /// Register (or move) a content section and evaluate it immediately.
    pub fn register_section(&mut self, id: &str, bounds: SectionBounds, now: Duration) {
        match self.sections.iter_mut().find(|s| s.id == id) {
            Some(section) => section.bounds = bounds,
            None => self.sections.push(Section {
                id: id.to_owned(),
                bounds,
                animator: SectionAnimator::new(self.reveal),
            }),
        }
        self.spy.upsert(id, bounds);
        self.refresh_layout_consumers(now);
    }

    /// Apply one host event observed at `now`.
    pub fn handle(&mut self, event: PageEvent, now: Duration) {
        if !self.mounted {
            debug!(kind = event.kind(), "event after unmount ignored");
            return;
        }
        self.run_timers(now);

        match event {
            PageEvent::Scroll(metrics) => {
                self.metrics = metrics;
                let state = self.scroll.on_scroll(metrics, now);
                self.restart_scroll_timer();
                self.signals.scroll.set(state);
                self.refresh_layout_consumers(now);
            }
            PageEvent::Resize(metrics) => {
                self.metrics = metrics;
                let state = self.scroll.on_resize(metrics);
                self.signals.scroll.set(state);
                self.refresh_layout_consumers(now);
            }
            PageEvent::PointerMove { x, y } => {
                let state = self.cursor.on_pointer_move(x, y, &self.host);
                self.signals.cursor.set(state);
            }
            PageEvent::Frame => {
                let dt = self
                    .last_frame
                    .map_or(Duration::ZERO, |last| now.saturating_sub(last));
                self.last_frame = Some(now);
                self.cursor.advance(now, dt);
            }
        }
    }

    /// Fire every timer due at `now`.
    pub fn run_timers(&mut self, now: Duration) {
        for task in self.scheduler.take_due(now) {
            match task {
                TimerTask::ScrollIdle => {
                    self.scroll_timer = None;
                    if self.scroll.poll(now) {
                        self.signals.scroll.set(*self.scroll.state());
                    }
                }
                TimerTask::BootStage => {
                    self.boot_timer = None;
                    let transitions = self.boot.advance(now, &mut self.store);
                    self.publish_boot(&transitions);
                    self.schedule_boot_stage();
                }
            }
        }
        self.enforce_boot_ceiling(now);
    }

    /// Cancel every timer and tear components down. Idempotent.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        if let Some(id) = self.scroll_timer.take() {
            self.scheduler.cancel(id);
        }
        if let Some(id) = self.boot_timer.take() {
            self.scheduler.cancel(id);
        }
        self.scroll.teardown();
        self.cursor.release();
        info!(boot = ?self.boot.state(), "page unmounted");
    }

    fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    fn restart_scroll_timer(&mut self) {
        if let Some(id) = self.scroll_timer.take() {
            self.scheduler.cancel(id);
        }
        if let Some(deadline) = self.scroll.next_deadline() {
            self.scroll_timer = Some(self.scheduler.schedule(deadline, TimerTask::ScrollIdle));
        }
    }

    fn schedule_boot_stage(&mut self) {
        if self.boot_timer.is_some() {
            return;
        }
        if let Some(deadline) = self.boot.next_deadline() {
            self.boot_timer = Some(self.scheduler.schedule(deadline, TimerTask::BootStage));
        }
    }

    /// Boot watchdog. Runs on every event and timer pass so lost timers
    /// are recovered even when the host sends no frames.
    fn enforce_boot_ceiling(&mut self, now: Duration) {
        let forced = self.boot.enforce_ceiling(now, &mut self.store);
        if forced.is_empty() {
            return;
        }
        if let Some(id) = self.boot_timer.take() {
            self.scheduler.cancel(id);
        }
        self.publish_boot(&forced);
    }

    fn publish_boot(&self, transitions: &[BootTransition]) {
        for transition in transitions {
            self.signals.boot.set(transition.to);
        }
    }

    fn refresh_layout_consumers(&mut self, now: Duration) {
        let state = *self.scroll.state();
        for section in &mut self.sections {
            let ratio = visible_ratio(
                section.bounds,
                state.position_y,
                self.metrics.viewport_height,
                self.reveal.root_margin,
            );
            if section.animator.observe(ratio, now) {
                debug!(section = %section.id, ratio, "section revealed");
            }
        }
        self.signals.nav.set(self.spy.state(&state));
    }
}

impl<S, St, H> Drop for PageRuntime<S, St, H>
where
    S: Scheduler,
    St: SessionStore,
    H: PageHost,
{
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::TimerQueue;
    use folio_core::cursor::{NativeCursorControl, PointerProbe};
    use folio_core::session::MemorySessionStore;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct TestHost {
        hidden: Rc<Cell<bool>>,
    }

    impl PointerProbe for TestHost {
        fn cursor_at(&self, x: f64, _y: f64) -> Option<String> {
            Some(if x < 100.0 { "pointer" } else { "default" }.into())
        }
    }

    impl NativeCursorControl for TestHost {
        fn hide_native_cursor(&mut self) {
            self.hidden.set(true);
        }

        fn restore_native_cursor(&mut self) {
            self.hidden.set(false);
        }
    }

    type TestPage = PageRuntime<TimerQueue, Rc<RefCell<MemorySessionStore>>, TestHost>;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn layout(y: f64) -> ScrollMetrics {
        ScrollMetrics::new(y, 800.0, 2000.0)
    }

    fn mount(
        session: &Rc<RefCell<MemorySessionStore>>,
        host: &TestHost,
        now: Duration,
    ) -> TestPage {
        PageRuntime::mount(
            &FolioConfig::default(),
            TimerQueue::new(),
            Rc::clone(session),
            host.clone(),
            layout(0.0),
            now,
        )
    }

    #[test]
    fn mount_schedules_first_boot_stage() {
        let session = Rc::new(RefCell::new(MemorySessionStore::new()));
        let page = mount(&session, &TestHost::default(), Duration::ZERO);
        assert_eq!(page.scheduler().next_deadline(), Some(ms(300)));
        assert_eq!(page.boot_signal().get(), BootState::Idle);
        assert!(page.scroll_signal().get().at_top);
    }

    #[test]
    fn scroll_timer_is_restarted_not_stacked() {
        let session = Rc::new(RefCell::new(MemorySessionStore::new()));
        let mut page = mount(&session, &TestHost::default(), Duration::ZERO);
        page.handle(PageEvent::Scroll(layout(10.0)), ms(0));
        page.handle(PageEvent::Scroll(layout(20.0)), ms(100));
        // One boot stage timer plus one scroll timer.
        assert_eq!(page.scheduler().pending(), 2);
        page.run_timers(ms(249));
        assert!(page.scroll_signal().get().is_scrolling);
        page.run_timers(ms(250));
        assert!(!page.scroll_signal().get().is_scrolling);
    }

    #[test]
    fn pointer_moves_publish_cursor_state() {
        let session = Rc::new(RefCell::new(MemorySessionStore::new()));
        let mut page = mount(&session, &TestHost::default(), Duration::ZERO);
        page.handle(PageEvent::PointerMove { x: 50.0, y: 60.0 }, ms(5));
        let cursor = page.cursor_signal().get();
        assert_eq!((cursor.x, cursor.y), (50.0, 60.0));
        assert!(cursor.is_over_interactive);
    }

    #[test]
    fn unmount_cancels_timers_and_restores_pointer() {
        let session = Rc::new(RefCell::new(MemorySessionStore::new()));
        let host = TestHost::default();
        let mut page = mount(&session, &host, Duration::ZERO);
        page.handle(PageEvent::Scroll(layout(10.0)), ms(0));
        assert!(host.hidden.get());
        page.unmount();
        assert_eq!(page.scheduler().pending(), 0);
        assert!(!page.is_mounted());
        assert!(!host.hidden.get());
    }

    #[test]
    fn events_after_unmount_are_ignored() {
        let session = Rc::new(RefCell::new(MemorySessionStore::new()));
        let mut page = mount(&session, &TestHost::default(), Duration::ZERO);
        page.unmount();
        page.handle(PageEvent::Scroll(layout(500.0)), ms(10));
        assert_eq!(page.scroll_state().position_y, 0.0);
        assert_eq!(page.scheduler().pending(), 0);
    }

    #[test]
    fn sections_reveal_as_they_scroll_in() {
        let session = Rc::new(RefCell::new(MemorySessionStore::new()));
        let mut page = mount(&session, &TestHost::default(), Duration::ZERO);
        page.register_section("about", SectionBounds::new(400.0, 400.0), ms(0));
        page.register_section("projects", SectionBounds::new(1500.0, 400.0), ms(0));
        assert!(page.section_revealed("about"));
        assert!(!page.section_revealed("projects"));

        page.handle(PageEvent::Scroll(layout(1450.0)), ms(50));
        assert!(page.section_revealed("projects"));
        assert_eq!(page.nav_signal().get().active.as_deref(), Some("projects"));
        assert!(page.nav_signal().get().scrolled);
        assert_eq!(page.section_child_progress("projects", 0, ms(50)), 0.0);
        assert_eq!(page.section_child_progress("projects", 0, ms(600)), 1.0);
        assert!(!page.section_revealed("missing"));
    }
}
