#![forbid(unsafe_code)]

//! Low-level runtime tracing controlled by environment variable.
//!
//! Set `PIZZART_DEBUG_TRACE=1` to print timestamped runtime internals
//! (subscription churn, task dispatch, discarded results) to stderr. When
//! unset, each trace point costs one static bool load.
//!
//! ```ignore
//! use pizzart_runtime::debug_trace;
//! debug_trace!("task finished: {}", name);
//! ```

use std::sync::LazyLock;
use std::time::Instant;

/// Environment variable that enables debug tracing.
pub const DEBUG_TRACE_ENV: &str = "PIZZART_DEBUG_TRACE";

static DEBUG_TRACE_ENABLED: LazyLock<bool> = LazyLock::new(|| {
    std::env::var(DEBUG_TRACE_ENV)
        .map(|v| parse_flag(&v))
        .unwrap_or(false)
});

static START_TIME: LazyLock<Instant> = LazyLock::new(Instant::now);

pub(crate) fn parse_flag(value: &str) -> bool {
    let value = value.trim();
    value == "1" || value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("yes")
}

/// Whether debug tracing is enabled.
#[inline]
pub fn is_enabled() -> bool {
    *DEBUG_TRACE_ENABLED
}

/// Milliseconds since the first trace call.
#[inline]
pub fn elapsed_ms() -> u64 {
    u64::try_from(START_TIME.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Print to stderr when `PIZZART_DEBUG_TRACE` is set.
#[macro_export]
macro_rules! debug_trace {
    ($($arg:tt)*) => {
        if $crate::debug_trace::is_enabled() {
            eprintln!(
                "[PIZZART {:>8}ms] {}",
                $crate::debug_trace::elapsed_ms(),
                format_args!($($arg)*)
            );
        }
    };
}
