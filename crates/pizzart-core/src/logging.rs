#![forbid(unsafe_code)]

//! Engine log points that compile away unless the `tracing` feature is on.
//!
//! Pricing and finalization emit `debug!`/`trace!` events through
//! `crate::debug!` and `crate::trace!`. With the feature they are the
//! `tracing` macros; without it they swallow their arguments, so field
//! expressions are not evaluated either.

#[cfg(feature = "tracing")]
pub use tracing::{debug, trace};

#[cfg(not(feature = "tracing"))]
mod disabled {
    /// Discards a debug event.
    #[macro_export]
    macro_rules! debug {
        ($($event:tt)*) => {};
    }

    /// Discards a trace event.
    #[macro_export]
    macro_rules! trace {
        ($($event:tt)*) => {};
    }
}
