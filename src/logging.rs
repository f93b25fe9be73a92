//! Navigator diagnostics, routed to [`log`](https://docs.rs/log) or
//! [`tracing`](https://docs.rs/tracing) by cargo feature.
//!
//! Hosts that already run a `tracing` subscriber switch the default `log`
//! feature off and turn `tracing` on. Enable at most one. With neither the
//! macros expand to nothing and visits run silently.
//!
//! | Feature    | Backend         | Default |
//! |------------|-----------------|---------|
//! | `log`      | `log` crate     | yes     |
//! | `tracing`  | `tracing` crate | no      |
//!
//! # What gets logged where
//!
//! - `trace_log!`: handler `matches` results, ignored engine callbacks,
//!   classification cache hits/misses.
//! - `debug_log!`: visit state transitions, resolved route/policy decisions.
//! - `info_log!`: proposals accepted and visits started by the navigator.
//! - `warn_log!`: visit failures, retries of superseded visits.
//! - `error_log!`: routing loops, configuration files that could not be read.
//!
//! ```ignore
//! use hybrid_navigator::{debug_log, warn_log};
//!
//! debug_log!("Visit {} started for '{}'", visit.id(), visit.location());
//! warn_log!("Visit {} failed: {}", visit.id(), error);
//! ```

/// Per-callback noise: handler predicates, stray engine callbacks, cache lookups.
///
/// Takes the same arguments as `format!`.
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::trace!($($arg)*);
        #[cfg(feature = "log")]
        ::log::trace!($($arg)*);
    };
}

/// Visit transitions and decision results.
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::debug!($($arg)*);
        #[cfg(feature = "log")]
        ::log::debug!($($arg)*);
    };
}

/// Visits the navigator starts, reloads and retries.
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::info!($($arg)*);
        #[cfg(feature = "log")]
        ::log::info!($($arg)*);
    };
}

/// Failed loads and retries that arrive too late.
#[macro_export]
macro_rules! warn_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::warn!($($arg)*);
        #[cfg(feature = "log")]
        ::log::warn!($($arg)*);
    };
}

/// Routing loops and unreadable configuration.
#[macro_export]
macro_rules! error_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::error!($($arg)*);
        #[cfg(feature = "log")]
        ::log::error!($($arg)*);
    };
}
