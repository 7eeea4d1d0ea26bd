#![forbid(unsafe_code)]

//! Once-per-session boot log.
//!
//! The boot overlay prints a short terminal-style log, one stage at a time,
//! then disappears. [`BootSequencer`] is a linear state machine:
//!
//! ```text
//! Idle ─d1─▶ Stage(1) ─d2─▶ Stage(2) ─ … ─dN─▶ Stage(N) ─settle─▶ Ready
//! ```
//!
//! Each edge fires after the dwell time of the state it leaves. There is no
//! skip or cancel path: once started, the sequence always reaches `Ready`.
//!
//! # Session gating
//!
//! On mount the sequencer reads a session flag. When present it starts in
//! `Ready` and never emits a transition. When absent it runs the script and
//! writes the flag as it enters `Ready`, before the transition is handed back
//! to the caller, so nothing observes `Ready` without the flag being stored.
//!
//! # Clocking
//!
//! [`reduce`] is the pure step function. [`BootSequencer::advance`] applies it
//! with cumulative deadlines so a late wake-up still walks every stage in
//! order. [`BootSequencer::enforce_ceiling`] is the watchdog for hosts whose
//! timers never fire: past the ceiling it walks the remaining stages at once.
//!
//! # Failure Modes
//!
//! - Store unavailable on read: treated as "flag absent", the log runs again.
//! - Store unavailable on write: logged, the sequence still completes.

use std::time::Duration;

use crate::session::SessionStore;

/// Session key for the completion flag.
pub const DEFAULT_STORAGE_KEY: &str = "hasCompletedBoot";

/// Slack added on top of the scripted duration before the watchdog forces
/// completion.
pub const DEFAULT_CEILING_MARGIN: Duration = Duration::from_millis(500);

const FLAG_VALUE: &str = "true";

// ---------------------------------------------------------------------------
// Script
// ---------------------------------------------------------------------------

/// One line of boot log output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootLine {
    /// Highlighted subsystem tag (`SYSTEM`, `DISPLAY`, ...). `None` for
    /// untagged lines.
    pub tag: Option<String>,
    pub message: String,
    /// Indented `> ...` detail rows under the message.
    pub details: Vec<String>,
}

impl BootLine {
    #[must_use]
    pub fn tagged(tag: &str, message: &str) -> Self {
        Self {
            tag: Some(tag.to_owned()),
            message: message.to_owned(),
            details: Vec::new(),
        }
    }

    #[must_use]
    pub fn plain(message: &str) -> Self {
        Self {
            tag: None,
            message: message.to_owned(),
            details: Vec::new(),
        }
    }

    #[must_use]
    pub fn detail(mut self, text: &str) -> Self {
        self.details.push(text.to_owned());
        self
    }
}

/// One reveal stage of the script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootStep {
    /// Time spent in the previous state before this stage is revealed.
    pub delay: Duration,
    /// Log line revealed by this stage, if any.
    pub line: Option<BootLine>,
    /// Whether the blinking block cursor is shown from this stage onward.
    pub shows_cursor: bool,
}

impl BootStep {
    #[must_use]
    pub fn line(delay: Duration, line: BootLine) -> Self {
        Self {
            delay,
            line: Some(line),
            shows_cursor: false,
        }
    }

    #[must_use]
    pub fn cursor(delay: Duration) -> Self {
        Self {
            delay,
            line: None,
            shows_cursor: true,
        }
    }
}

/// Ordered stages plus the settle time before `Ready`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootScript {
    steps: Vec<BootStep>,
    settle: Duration,
}

impl Default for BootScript {
    fn default() -> Self {
        Self::portfolio()
    }
}

impl BootScript {
    #[must_use]
    pub fn new(steps: Vec<BootStep>, settle: Duration) -> Self {
        Self { steps, settle }
    }

    /// The site's boot log: five stages, ready after 3.7s.
    #[must_use]
    pub fn portfolio() -> Self {
        let ms = Duration::from_millis;
        Self::new(
            vec![
                BootStep::line(ms(300), BootLine::tagged("SYSTEM", "Initializing")),
                BootStep::cursor(ms(800)),
                BootStep::line(
                    ms(400),
                    BootLine::tagged("DISPLAY", "Minimal Interface Loaded")
                        .detail("Teenage Engineering mode: ENABLED")
                        .detail("Interface style: MINIMAL"),
                ),
                BootStep::line(
                    ms(800),
                    BootLine::tagged("MEMORY", "Portfolio Data Loaded")
                        .detail("Projects: OK")
                        .detail("Experience: OK")
                        .detail("Skills: OK"),
                ),
                BootStep::line(ms(600), BootLine::plain("SYSTEM READY")),
            ],
            ms(800),
        )
    }

    #[must_use]
    pub fn steps(&self) -> &[BootStep] {
        &self.steps
    }

    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn settle(&self) -> Duration {
        self.settle
    }

    /// Time spent in `state` before the next edge. `None` for `Ready`.
    #[must_use]
    pub fn dwell(&self, state: BootState) -> Option<Duration> {
        match state {
            BootState::Ready => None,
            BootState::Idle => Some(self.steps.first().map_or(self.settle, |s| s.delay)),
            BootState::Stage(n) => Some(self.steps.get(n).map_or(self.settle, |s| s.delay)),
        }
    }

    /// Scripted time from `Idle` to `Ready`.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.steps
            .iter()
            .fold(self.settle, |acc, step| acc.saturating_add(step.delay))
    }
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// Position in the boot sequence. Ordering follows the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BootState {
    Idle,
    /// One-based stage index.
    Stage(usize),
    Ready,
}

impl BootState {
    /// The state following `self` in a script with `stage_count` stages.
    #[must_use]
    pub fn next(self, stage_count: usize) -> Self {
        match self {
            Self::Idle if stage_count > 0 => Self::Stage(1),
            Self::Stage(n) if n < stage_count => Self::Stage(n + 1),
            _ => Self::Ready,
        }
    }

    /// Numeric stage: 0 for idle, 1..=N for stages, N+1 for ready.
    #[must_use]
    pub fn index(self, stage_count: usize) -> usize {
        match self {
            Self::Idle => 0,
            Self::Stage(n) => n,
            Self::Ready => stage_count + 1,
        }
    }

    #[must_use]
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// Pure step function: the state after spending `elapsed` in `state`.
///
/// Advances at most one edge. `Ready` is absorbing.
#[must_use]
pub fn reduce(script: &BootScript, state: BootState, elapsed: Duration) -> BootState {
    match script.dwell(state) {
        Some(dwell) if elapsed >= dwell => state.next(script.stage_count()),
        _ => state,
    }
}

/// One edge taken by the sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootTransition {
    pub from: BootState,
    pub to: BootState,
    /// Scheduled time of the edge (the watchdog time for forced edges).
    pub at: Duration,
    /// Taken by the ceiling watchdog rather than its own timer.
    pub forced: bool,
}

/// Tunables for [`BootSequencer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootConfig {
    pub script: BootScript,
    pub storage_key: String,
    pub ceiling_margin: Duration,
}

impl Default for BootConfig {
    fn default() -> Self {
        Self {
            script: BootScript::portfolio(),
            storage_key: DEFAULT_STORAGE_KEY.to_owned(),
            ceiling_margin: DEFAULT_CEILING_MARGIN,
        }
    }
}

/// Timer-driven boot stage machine.
#[derive(Debug, Clone)]
pub struct BootSequencer {
    config: BootConfig,
    state: BootState,
    started_at: Duration,
    /// Scheduled entry time of the current state.
    entered_at: Duration,
    skipped: bool,
    flag_written: bool,
}

impl BootSequencer {
    /// Mount the sequencer, consulting the session flag.
    pub fn mount<S>(config: BootConfig, store: &S, now: Duration) -> Self
    where
        S: SessionStore + ?Sized,
    {
        let completed = match store.get(&config.storage_key) {
            Ok(value) => value.is_some_and(|v| !v.is_empty()),
            Err(err) => {
                tracing::warn!(
                    key = %config.storage_key,
                    error = %err,
                    "boot flag unreadable, running boot sequence"
                );
                false
            }
        };

        let state = if completed {
            tracing::info!(key = %config.storage_key, "boot already completed this session");
            BootState::Ready
        } else {
            tracing::info!(
                stages = config.script.stage_count(),
                total_ms = config.script.total().as_millis() as u64,
                "boot sequence started"
            );
            BootState::Idle
        };

        Self {
            config,
            state,
            started_at: now,
            entered_at: now,
            skipped: completed,
            flag_written: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> BootState {
        self.state
    }

    #[must_use]
    pub fn script(&self) -> &BootScript {
        &self.config.script
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.state.is_ready()
    }

    /// Whether the sequence was skipped because the flag was already set.
    #[must_use]
    pub fn was_skipped(&self) -> bool {
        self.skipped
    }

    /// Whether this sequencer stored the completion flag.
    #[must_use]
    pub fn flag_written(&self) -> bool {
        self.flag_written
    }

    /// The overlay covers the page until `Ready`.
    #[must_use]
    pub fn overlay_visible(&self) -> bool {
        !self.state.is_ready()
    }

    /// When the current stage's timer is due. `None` once ready.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.config
            .script
            .dwell(self.state)
            .map(|dwell| self.entered_at.saturating_add(dwell))
    }

    /// Time at which the watchdog forces completion.
    #[must_use]
    pub fn ceiling(&self) -> Duration {
        self.started_at
            .saturating_add(self.config.script.total())
            .saturating_add(self.config.ceiling_margin)
    }

    /// Fire every edge whose deadline is at or before `now`.
    pub fn advance<S>(&mut self, now: Duration, store: &mut S) -> Vec<BootTransition>
    where
        S: SessionStore + ?Sized,
    {
        let mut transitions = Vec::new();
        while let Some(deadline) = self.next_deadline() {
            if now < deadline {
                break;
            }
            let next = reduce(
                &self.config.script,
                self.state,
                now.saturating_sub(self.entered_at),
            );
            self.enter(next, deadline, false, store, &mut transitions);
        }
        transitions
    }

    /// Watchdog: past the ceiling, walk every remaining stage immediately.
    pub fn enforce_ceiling<S>(&mut self, now: Duration, store: &mut S) -> Vec<BootTransition>
    where
        S: SessionStore + ?Sized,
    {
        let mut transitions = Vec::new();
        if self.state.is_ready() || now < self.ceiling() {
            return transitions;
        }
        tracing::warn!(
            state = ?self.state,
            ceiling_ms = self.ceiling().as_millis() as u64,
            "boot timers stalled, forcing completion"
        );
        while !self.state.is_ready() {
            let next = self.state.next(self.config.script.stage_count());
            self.enter(next, now, true, store, &mut transitions);
        }
        transitions
    }

    /// Log lines revealed so far.
    pub fn visible_lines(&self) -> impl Iterator<Item = &BootLine> + '_ {
        let revealed = self.revealed_steps();
        self.config.script.steps[..revealed]
            .iter()
            .filter_map(|step| step.line.as_ref())
    }

    /// Whether the blinking cursor is currently shown.
    #[must_use]
    pub fn shows_cursor(&self) -> bool {
        let revealed = self.revealed_steps();
        self.config.script.steps[..revealed]
            .iter()
            .any(|step| step.shows_cursor)
    }

    fn revealed_steps(&self) -> usize {
        let count = self.config.script.stage_count();
        match self.state {
            BootState::Idle => 0,
            BootState::Stage(n) => n.min(count),
            // Nothing is drawn once ready.
            BootState::Ready => 0,
        }
    }

    fn enter<S>(
        &mut self,
        next: BootState,
        at: Duration,
        forced: bool,
        store: &mut S,
        out: &mut Vec<BootTransition>,
    ) where
        S: SessionStore + ?Sized,
    {
        debug_assert!(next > self.state, "boot transitions must move forward");
        if next.is_ready() {
            self.persist_flag(store);
        }
        out.push(BootTransition {
            from: self.state,
            to: next,
            at,
            forced,
        });
        tracing::debug!(from = ?self.state, to = ?next, forced, "boot stage");
        self.state = next;
        self.entered_at = at;
        if next.is_ready() {
            tracing::info!(forced, "boot sequence ready");
        }
    }

    fn persist_flag<S>(&mut self, store: &mut S)
    where
        S: SessionStore + ?Sized,
    {
        if self.flag_written {
            return;
        }
        match store.set(&self.config.storage_key, FLAG_VALUE) {
            Ok(()) => {
                self.flag_written = true;
                tracing::info!(key = %self.config.storage_key, "boot flag stored");
            }
            Err(err) => {
                tracing::warn!(
                    key = %self.config.storage_key,
                    error = %err,
                    "boot flag not stored"
                );
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
