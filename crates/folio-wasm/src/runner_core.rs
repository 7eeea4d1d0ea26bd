#![forbid(unsafe_code)]

//! Platform-independent runner core wrapping [`PageRuntime`].
//!
//! This module contains the logic shared between the wasm-bindgen exports
//! and the native test harness. No JS/WASM types here.

use core::time::Duration;

use folio_backend::{Backend, BackendClock, PageHost, SessionStore};
use folio_core::boot::BootState;
use folio_core::event::PageEvent;
use folio_core::reveal::SectionBounds;
use folio_core::scroll::ScrollMetrics;
use folio_runtime::{FolioConfig, PageRuntime, TimerQueue};
use folio_web::input_parser::parse_host_input;
use folio_web::{HostEventQueue, WebBackend};
use serde_json::{Value, json};

/// Outcome of one [`RunnerCore::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult {
    pub mounted: bool,
    pub events_processed: u32,
    pub boot_ready: bool,
}

/// Platform-independent page runner.
pub struct RunnerCore<St, H>
where
    St: SessionStore + Clone,
    H: PageHost,
{
    backend: WebBackend<St, H>,
    config: FolioConfig,
    queue: HostEventQueue,
    page: Option<PageRuntime<TimerQueue, St, H>>,
    logs: Vec<String>,
}

impl<St, H> RunnerCore<St, H>
where
    St: SessionStore + Clone,
    H: PageHost,
{
    /// Create an unmounted runner with the default configuration.
    pub fn new(store: St, host: H) -> Self {
        Self {
            backend: WebBackend::new(store, host),
            config: FolioConfig::default(),
            queue: HostEventQueue::new(),
            page: None,
            logs: Vec::new(),
        }
    }

    /// Replace the configuration from JSON. Only allowed before mount.
    pub fn configure_json(&mut self, json: &str) -> Result<(), String> {
        if self.page.is_some() {
            return Err("configure after mount".to_owned());
        }
        let config = FolioConfig::from_json_str(json).map_err(|err| err.to_string())?;
        self.config = config;
        Ok(())
    }

    #[must_use]
    pub fn config(&self) -> &FolioConfig {
        &self.config
    }

    /// Mount the page against the initial layout. A second call is ignored.
    pub fn mount(&mut self, scroll_y: f64, viewport_height: f64, document_height: f64) {
        if self.page.is_some() {
            self.logs.push("runner_mount_ignored: already mounted".to_owned());
            return;
        }
        let metrics = ScrollMetrics::new(scroll_y, viewport_height, document_height);
        self.page = Some(PageRuntime::mount_on(
            &self.config,
            TimerQueue::new(),
            &self.backend,
            metrics,
        ));
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.page.is_some()
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.backend.clock().now_mono()
    }

    /// Set the clock from a `performance.now()` timestamp.
    pub fn set_time_ms(&mut self, t_ms: f64) {
        self.backend.clock_mut().set_ms(t_ms);
    }

    /// Advance the clock by `dt_ms`. Non-finite and negative values are ignored.
    pub fn advance_time_ms(&mut self, dt_ms: f64) {
        if let Some(dt) = folio_web::duration_from_ms(dt_ms) {
            self.backend.clock_mut().advance(dt);
        }
    }

    /// Parse a JSON-encoded host input and queue it.
    ///
    /// Returns `true` if the input was accepted, `false` if it was
    /// malformed or had no page event mapping.
    pub fn push_encoded_input(&mut self, json: &str) -> bool {
        match parse_host_input(json) {
            Ok(Some(input)) => {
                self.backend.clock_mut().set(input.at);
                self.queue.push(input.at, input.event);
                true
            }
            Ok(None) => false,
            Err(err) => {
                tracing::debug!(error = %err, "host input rejected");
                self.logs.push(format!("input_parse_error: {err}"));
                false
            }
        }
    }

    /// Queue an event at the current clock time.
    pub fn push_event(&mut self, event: PageEvent) {
        let now = self.now();
        self.queue.push(now, event);
    }

    /// Register a content section for reveal and navigation tracking.
    pub fn register_section(&mut self, id: &str, top: f64, height: f64) -> bool {
        let now = self.now();
        match self.page.as_mut() {
            Some(page) => {
                page.register_section(id, SectionBounds::new(top, height), now);
                true
            }
            None => false,
        }
    }

    /// Apply queued events in order, then one animation frame at the
    /// current clock time.
    pub fn step(&mut self) -> StepResult {
        let now = self.now();
        let Some(page) = self.page.as_mut() else {
            let dropped = self.queue.len();
            if dropped > 0 {
                self.logs
                    .push(format!("runner_step_unmounted: dropped {dropped} events"));
                self.queue.drain().for_each(drop);
            }
            return StepResult {
                mounted: false,
                events_processed: 0,
                boot_ready: false,
            };
        };

        let mut processed = 0u32;
        for (at, event) in self.queue.drain() {
            page.handle(event, at);
            processed = processed.saturating_add(1);
        }
        page.handle(PageEvent::Frame, now);

        StepResult {
            mounted: true,
            events_processed: processed,
            boot_ready: page.boot().is_ready(),
        }
    }

    /// Entrance progress for child `index` of section `id`.
    #[must_use]
    pub fn section_progress(&self, id: &str, index: usize) -> f32 {
        self.page
            .as_ref()
            .map_or(0.0, |page| page.section_child_progress(id, index, self.now()))
    }

    #[must_use]
    pub fn page(&self) -> Option<&PageRuntime<TimerQueue, St, H>> {
        self.page.as_ref()
    }

    /// JSON snapshot of everything presentation code reads.
    #[must_use]
    pub fn snapshot(&self) -> Value {
        let Some(page) = self.page.as_ref() else {
            return json!({ "mounted": false });
        };
        let scroll = page.scroll_state();
        let boot = page.boot();
        let cursor = page.cursor_state();
        let frame = page.cursor_frame();
        let nav = page.nav_signal().get();
        let (boot_label, stage) = match boot.state() {
            BootState::Idle => ("idle", None),
            BootState::Stage(n) => ("stage", Some(n)),
            BootState::Ready => ("ready", None),
        };
        let lines: Vec<Value> = boot
            .visible_lines()
            .map(|line| {
                json!({
                    "tag": line.tag,
                    "message": line.message,
                    "details": line.details,
                })
            })
            .collect();

        json!({
            "mounted": true,
            "t_ms": self.now().as_secs_f64() * 1000.0,
            "scroll": {
                "position_y": scroll.position_y,
                "direction": scroll.direction.as_str(),
                "is_scrolling": scroll.is_scrolling,
                "at_top": scroll.at_top,
                "at_bottom": scroll.at_bottom,
                "progress": scroll.progress,
                "velocity": scroll.velocity,
            },
            "boot": {
                "state": boot_label,
                "stage": stage,
                "overlay_visible": boot.overlay_visible(),
                "shows_cursor": boot.shows_cursor(),
                "lines": lines,
            },
            "cursor": {
                "x": cursor.x,
                "y": cursor.y,
                "is_over_interactive": cursor.is_over_interactive,
                "visible": frame.visible,
                "ring": {
                    "x": frame.ring_x,
                    "y": frame.ring_y,
                    "scale": frame.ring_scale,
                    "opacity": frame.ring_opacity,
                },
                "dot": { "x": frame.dot_x, "y": frame.dot_y, "scale": frame.dot_scale },
            },
            "nav": {
                "scrolled": nav.scrolled,
                "active": nav.active,
            },
        })
    }

    #[must_use]
    pub fn snapshot_json(&self) -> String {
        self.snapshot().to_string()
    }

    /// Drain runner logs accumulated since the last call.
    pub fn take_logs(&mut self) -> Vec<String> {
        std::mem::take(&mut self.logs)
    }

    /// Unmount the page, cancelling timers and restoring the native cursor.
    pub fn unmount(&mut self) {
        if let Some(mut page) = self.page.take() {
            page.unmount();
        }
        self.queue.drain().for_each(drop);
    }
}
