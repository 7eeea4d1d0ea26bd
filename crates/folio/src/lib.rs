#![forbid(unsafe_code)]

//! folio public facade crate.
//!
//! This crate provides the stable surface area for embedding the portfolio
//! interaction core. It re-exports common types from the internal crates and
//! offers a lightweight prelude.
//!
//! ```
//! use folio::prelude::*;
//! use folio::web::{DeterministicClock, headless::HeadlessHost};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use std::time::Duration;
//!
//! let session = Rc::new(RefCell::new(MemorySessionStore::new()));
//! let mut page = PageRuntime::mount(
//!     &FolioConfig::default(),
//!     TimerQueue::new(),
//!     Rc::clone(&session),
//!     HeadlessHost::new(),
//!     ScrollMetrics::new(0.0, 800.0, 2000.0),
//!     Duration::ZERO,
//! );
//! page.handle(PageEvent::PointerMove { x: 120.0, y: 340.0 }, Duration::from_millis(5));
//! assert_eq!(page.cursor_state().x, 120.0);
//! # let _ = DeterministicClock::new();
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use folio_core::{
    BootConfig, BootLine, BootScript, BootSequencer, BootState, BootStep, BootTransition,
    CursorConfig, CursorFollower, CursorFrame, CursorState, MemorySessionStore, NavConfig,
    NavState, PageEvent, RevealConfig, ScrollConfig, ScrollDirection, ScrollMetrics, ScrollState,
    ScrollTracker, SectionAnimator, SectionBounds, SectionSpy, SessionStore, StoreError,
    UnavailableSessionStore,
};

// --- Backend re-exports ----------------------------------------------------

pub use folio_backend::{Backend, BackendClock, NativeCursorControl, PageHost, PointerProbe};

// --- Runtime re-exports ----------------------------------------------------

pub use folio_runtime::{
    ConfigError, FolioConfig, Observable, PageRuntime, ReadSignal, Scheduler, Subscription,
    TimerQueue,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for folio embedders.
#[derive(Debug)]
pub enum Error {
    /// Session storage failure.
    Store(StoreError),
    /// Configuration could not be loaded or failed validation.
    Config(ConfigError),
    /// Host input could not be decoded.
    #[cfg(feature = "input-parser")]
    Input(folio_web::input_parser::InputParseError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
            #[cfg(feature = "input-parser")]
            Self::Input(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Config(err) => Some(err),
            #[cfg(feature = "input-parser")]
            Self::Input(err) => Some(err),
        }
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

#[cfg(feature = "input-parser")]
impl From<folio_web::input_parser::InputParseError> for Error {
    fn from(err: folio_web::input_parser::InputParseError) -> Self {
        Self::Input(err)
    }
}

/// Standard result type for folio APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        BootState, CursorState, Error, FolioConfig, MemorySessionStore, NavState, PageEvent,
        PageRuntime, ReadSignal, Result, ScrollDirection, ScrollMetrics, ScrollState,
        SectionBounds, SessionStore, TimerQueue,
    };

    pub use crate::{backend, core, runtime};

    #[cfg(feature = "web")]
    pub use crate::web;
}

pub use folio_backend as backend;
pub use folio_core as core;
pub use folio_core::logging;
pub use folio_runtime as runtime;
#[cfg(feature = "web")]
pub use folio_web as web;
