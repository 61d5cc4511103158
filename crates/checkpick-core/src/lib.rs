#![forbid(unsafe_code)]

//! Core: canonical input events and logging plumbing shared by the picker crates.

pub mod event;
pub mod logging;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, trace, warn};
