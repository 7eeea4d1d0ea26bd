#![forbid(unsafe_code)]

//! Decorative pointer follower.
//!
//! [`CursorFollower`] records the latest pointer position in client viewport
//! coordinates and whether the element under it shows the `pointer` cursor.
//! A ring and a dot chase that position on springs; the springs only affect
//! [`CursorFrame`], never [`CursorState`].
//!
//! While mounted, the platform's own pointer is hidden. The follower owns a
//! [`NativeCursorGuard`] that restores it on drop, so the page gets its
//! pointer back however the follower goes away, including panic unwinding.

use std::time::Duration;

use crate::animation::Spring;

/// CSS cursor keyword that marks an element as interactive.
pub const POINTER_KEYWORD: &str = "pointer";

/// Delay before the overlay is drawn, avoiding a flash at (0, 0) on load.
pub const DEFAULT_REVEAL_DELAY: Duration = Duration::from_millis(1000);

/// Answers "which cursor does the element at this point ask for?".
pub trait PointerProbe {
    /// Computed `cursor` style of the topmost element at client
    /// coordinates `(x, y)`, or `None` when there is no element.
    fn cursor_at(&self, x: f64, y: f64) -> Option<String>;
}

/// Toggles the platform's native pointer indicator.
pub trait NativeCursorControl {
    fn hide_native_cursor(&mut self);
    fn restore_native_cursor(&mut self);
}

/// Hides the native pointer for its lifetime.
#[derive(Debug)]
pub struct NativeCursorGuard<C: NativeCursorControl> {
    control: C,
}

impl<C: NativeCursorControl> NativeCursorGuard<C> {
    pub fn new(mut control: C) -> Self {
        control.hide_native_cursor();
        Self { control }
    }
}

impl<C: NativeCursorControl> Drop for NativeCursorGuard<C> {
    fn drop(&mut self) {
        self.control.restore_native_cursor();
    }
}

/// Latest pointer sample. Read-only to consumers.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CursorState {
    pub x: f64,
    pub y: f64,
    pub is_over_interactive: bool,
}

/// Spring parameters for one overlay element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringParams {
    pub stiffness: f64,
    pub damping: f64,
    pub mass: f64,
}

impl SpringParams {
    fn spring_at(self, position: f64) -> Spring {
        Spring::at(position)
            .with_stiffness(self.stiffness)
            .with_damping(self.damping)
            .with_mass(self.mass)
    }
}

/// Tunables for [`CursorFollower`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorConfig {
    pub reveal_delay: Duration,
    pub ring: SpringParams,
    pub dot: SpringParams,
    pub ring_radius: f64,
    pub dot_radius: f64,
    pub ring_hover_scale: f64,
    pub dot_hover_scale: f64,
    pub ring_opacity: f64,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            reveal_delay: DEFAULT_REVEAL_DELAY,
            ring: SpringParams {
                stiffness: 100.0,
                damping: 10.0,
                mass: 0.3,
            },
            dot: SpringParams {
                stiffness: 200.0,
                damping: 10.0,
                mass: 0.1,
            },
            ring_radius: 24.0,
            dot_radius: 4.0,
            ring_hover_scale: 1.5,
            dot_hover_scale: 1.2,
            ring_opacity: 0.8,
        }
    }
}

/// Draw instructions for the overlay at one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorFrame {
    pub visible: bool,
    /// Top-left corner of the ring.
    pub ring_x: f64,
    pub ring_y: f64,
    pub ring_scale: f64,
    pub ring_opacity: f64,
    /// Top-left corner of the dot.
    pub dot_x: f64,
    pub dot_y: f64,
    pub dot_scale: f64,
}

#[derive(Debug, Clone)]
struct SpringPoint {
    x: Spring,
    y: Spring,
}

impl SpringPoint {
    fn new(params: SpringParams) -> Self {
        Self {
            x: params.spring_at(0.0),
            y: params.spring_at(0.0),
        }
    }

    fn set_target(&mut self, x: f64, y: f64) {
        self.x.set_target(x);
        self.y.set_target(y);
    }

    fn snap_to(&mut self, x: f64, y: f64) {
        self.x.snap_to(x);
        self.y.snap_to(y);
    }

    fn advance(&mut self, dt: Duration) {
        self.x.advance(dt);
        self.y.advance(dt);
    }
}

/// Pointer-following overlay state.
pub struct CursorFollower<C: NativeCursorControl> {
    config: CursorConfig,
    state: CursorState,
    ring: SpringPoint,
    dot: SpringPoint,
    mounted_at: Duration,
    visible: bool,
    has_moved: bool,
    native: Option<NativeCursorGuard<C>>,
}

impl<C: NativeCursorControl> std::fmt::Debug for CursorFollower<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CursorFollower")
            .field("state", &self.state)
            .field("visible", &self.visible)
            .field("mounted_at", &self.mounted_at)
            .finish_non_exhaustive()
    }
}

impl<C: NativeCursorControl> CursorFollower<C> {
    /// Mount the follower and hide the native pointer.
    pub fn mount(config: CursorConfig, control: C, now: Duration) -> Self {
        Self {
            ring: SpringPoint::new(config.ring),
            dot: SpringPoint::new(config.dot),
            config,
            state: CursorState::default(),
            mounted_at: now,
            visible: false,
            has_moved: false,
            native: Some(NativeCursorGuard::new(control)),
        }
    }

    /// Latest recorded pointer sample.
    #[inline]
    #[must_use]
    pub fn state(&self) -> CursorState {
        self.state
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Restore the native pointer now instead of on drop. Idempotent.
    pub fn release(&mut self) {
        self.native = None;
    }

    #[must_use]
    pub fn is_released(&self) -> bool {
        self.native.is_none()
    }

    /// Record a pointer move to client coordinates `(x, y)`.
    pub fn on_pointer_move<P>(&mut self, x: f64, y: f64, probe: &P) -> CursorState
    where
        P: PointerProbe + ?Sized,
    {
        let keyword = probe.cursor_at(x, y);
        self.state = CursorState {
            x,
            y,
            is_over_interactive: keyword.as_deref() == Some(POINTER_KEYWORD),
        };

        if self.has_moved {
            self.ring.set_target(x, y);
            self.dot.set_target(x, y);
        } else {
            // First sample: start the springs on the pointer instead of
            // sweeping in from the corner.
            self.ring.snap_to(x, y);
            self.dot.snap_to(x, y);
            self.has_moved = true;
        }
        self.state
    }

    /// Advance presentation by `dt`, with `now` deciding visibility.
    pub fn advance(&mut self, now: Duration, dt: Duration) {
        if !self.visible && now >= self.mounted_at.saturating_add(self.config.reveal_delay) {
            self.visible = true;
        }
        self.ring.advance(dt);
        self.dot.advance(dt);
    }

    /// Overlay geometry for the current frame.
    #[must_use]
    pub fn frame(&self) -> CursorFrame {
        let hover = self.state.is_over_interactive;
        let cfg = &self.config;
        CursorFrame {
            visible: self.visible,
            ring_x: self.ring.x.position() - cfg.ring_radius,
            ring_y: self.ring.y.position() - cfg.ring_radius,
            ring_scale: if hover { cfg.ring_hover_scale } else { 1.0 },
            ring_opacity: cfg.ring_opacity,
            dot_x: self.dot.x.position() - cfg.dot_radius,
            dot_y: self.dot.y.position() - cfg.dot_radius,
            dot_scale: if hover { cfg.dot_hover_scale } else { 1.0 },
        }
    }
}
