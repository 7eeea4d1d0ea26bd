#![forbid(unsafe_code)]

//! folio Runtime
//!
//! This crate ties the pure state machines of `folio-core` to a host: it
//! owns the timers, routes page events, and publishes component state to
//! read-only observers.
//!
//! # Key Components
//!
//! - [`PageRuntime`] - Page-root mount that drives every component
//! - [`Scheduler`] / [`TimerQueue`] - Host-driven deadline timers
//! - [`Observable`] / [`ReadSignal`] - Version-tracked state publication
//! - [`FolioConfig`] - Policy-as-data tunables, loadable from TOML or JSON
//!
//! # How it fits in the system
//! `folio-web` and `folio-wasm` construct a [`PageRuntime`] with a clock,
//! a session store and a page host from `folio-backend`, then feed it
//! events. Presentation code subscribes to the signals it needs.

pub mod config;
pub mod page;
pub mod reactive;
pub mod timer;

pub use config::{
    BootPolicy, BootStepPolicy, ConfigError, CursorPolicy, FolioConfig, NavPolicy, RevealPolicy,
    ScrollPolicy, SpringPolicy,
};
pub use page::PageRuntime;
pub use reactive::{Observable, ReadSignal, Subscription};
pub use timer::{Scheduler, TimerId, TimerQueue, TimerTask};
