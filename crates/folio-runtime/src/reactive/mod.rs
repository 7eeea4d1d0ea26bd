#![forbid(unsafe_code)]

//! Read-only publication of component state.

pub mod observable;

pub use observable::{Observable, ReadSignal, Subscription};
