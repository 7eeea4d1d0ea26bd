#![forbid(unsafe_code)]

//! Canonical page events pushed by the host.
//!
//! Hosts translate DOM callbacks into [`PageEvent`] values and hand them to
//! the runtime together with the monotonic time they were observed at.

use crate::scroll::ScrollMetrics;

/// One host input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageEvent {
    /// Window `scroll`, with layout measured at the time of the event.
    Scroll(ScrollMetrics),
    /// Window `resize`; re-measures boundaries without counting as a scroll.
    Resize(ScrollMetrics),
    /// `pointermove` in client viewport coordinates.
    PointerMove { x: f64, y: f64 },
    /// Animation frame; advances timers, watchdogs and smoothing.
    Frame,
}

impl PageEvent {
    /// Short label for logs and traces.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Scroll(_) => "scroll",
            Self::Resize(_) => "resize",
            Self::PointerMove { .. } => "pointer_move",
            Self::Frame => "frame",
        }
    }
}
