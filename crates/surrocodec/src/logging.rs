//! Logging support.
//!
//! Re-exports the `tracing` macros used by the engines when the `tracing`
//! feature is enabled. Without it the macros expand to nothing so the core
//! stays free of dependencies in `no_std` builds.

#[cfg(feature = "tracing")]
pub(crate) use tracing::{debug, trace};

#[cfg(not(feature = "tracing"))]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub(crate) use debug;
#[cfg(not(feature = "tracing"))]
pub(crate) use trace;
