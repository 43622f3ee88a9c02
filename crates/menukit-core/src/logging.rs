#![forbid(unsafe_code)]

//! Structured logging for the menukit crates.
//!
//! With the `tracing` feature this module forwards to the `tracing` crate.
//! Without it, macros of the same names expand to nothing, so call sites
//! write `menukit_core::debug!(..)` either way and pay nothing when the
//! feature is off.
//!
//! Levels used across the workspace:
//!
//! | level   | events                                              |
//! |---------|-----------------------------------------------------|
//! | `info`  | menu stack changes, controller close, exit requests |
//! | `debug` | focus moves, structural edits, layout passes        |
//! | `warn`  | calls naming an unknown widget or menu              |
//! | `trace` | per-event widget handling and hook calls            |
//!
//! Layout passes and input batches run inside `menu_layout` and
//! `menu_update` spans opened with [`debug_span!`](crate::debug_span).

#[cfg(feature = "tracing")]
pub use tracing::{debug, debug_span, info, trace, warn};

// Macros are written out one by one: `#[macro_export]` macros generated by
// another macro cannot be named by path from other crates.

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {};
}

/// Evaluates to a [`NoopSpan`] without the `tracing` feature.
#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! debug_span {
    ($($arg:tt)*) => {
        $crate::logging::NoopSpan
    };
}

/// Stand-in for `tracing::Span` when the feature is off.
///
/// Only the span methods menukit calls are provided.
#[cfg(not(feature = "tracing"))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    /// Mirrors `Span::entered`; the guard does nothing on drop.
    #[must_use]
    pub fn entered(self) -> NoopGuard {
        NoopGuard(())
    }

    /// Mirrors `Span::in_scope`: runs `f` and returns its result.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        f()
    }

    /// Always `true`: there is no subscriber to record into.
    pub fn is_disabled(&self) -> bool {
        true
    }
}

/// Guard returned by [`NoopSpan::entered`].
#[cfg(not(feature = "tracing"))]
#[derive(Debug)]
pub struct NoopGuard(());
