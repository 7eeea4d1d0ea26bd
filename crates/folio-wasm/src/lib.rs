#![forbid(unsafe_code)]

//! WASM runner for the folio portfolio site.
//!
//! This crate provides `PortfolioRunner`, a `wasm-bindgen`-exported struct
//! that wraps `folio_runtime::PageRuntime` and exposes it to JavaScript for
//! host-driven execution. The page forwards DOM callbacks, calls `step()`
//! from `requestAnimationFrame`, and renders from `snapshot()`.
//!
//! [`runner_core::RunnerCore`] holds the logic and runs natively, against
//! the headless host, in tests and replay tools.

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::PortfolioRunner;

pub mod runner_core;

pub use runner_core::{RunnerCore, StepResult};
