#![forbid(unsafe_code)]

//! Core: pure interaction state for the folio portfolio site.
//!
//! # Role in folio
//! `folio-core` owns every piece of state the page reacts to: scroll
//! position, the once-per-session boot log, the decorative pointer follower,
//! and per-section entrance triggers. Nothing here touches a browser API or
//! reads a clock; the host passes monotonic time in as a [`Duration`] and the
//! state machines answer with new state and the next deadline they care about.
//!
//! # Primary responsibilities
//! - **ScrollTracker**: position, direction, idle debounce, top/bottom flags.
//! - **BootSequencer**: timer-driven stage machine gated by a session flag.
//! - **CursorFollower**: latest pointer coordinates plus spring smoothing.
//! - **SectionAnimator**: threshold-based one-shot reveal with staggering.
//!
//! # How it fits in the system
//! `folio-runtime` drives these machines from a scheduler and publishes
//! their state to read-only observers. `folio-web` feeds them browser input.
//!
//! [`Duration`]: std::time::Duration

pub mod animation;
pub mod boot;
pub mod cursor;
pub mod event;
pub mod logging;
pub mod nav;
pub mod reveal;
pub mod scroll;
pub mod session;

pub use boot::{
    BootConfig, BootLine, BootScript, BootSequencer, BootState, BootStep, BootTransition,
};
pub use cursor::{
    CursorConfig, CursorFollower, CursorFrame, CursorState, NativeCursorControl,
    NativeCursorGuard, PointerProbe, SpringParams,
};
pub use event::PageEvent;
pub use nav::{NavConfig, NavState, SectionSpy};
pub use reveal::{RevealConfig, SectionAnimator, SectionBounds};
pub use scroll::{ScrollConfig, ScrollDirection, ScrollMetrics, ScrollState, ScrollTracker};
pub use session::{
    MemorySessionStore, SessionStore, StoreError, StoreResult, UnavailableSessionStore,
};
