//! # Action observer trait.
//!
//! Provides [`Observe`], an extension point for listening to an action's runs
//! in addition to its single set of sinks.
//!
//! ## Rules
//! - Observers are called inline, under the run gate, **before** the sink.
//! - Every method has a no-op default; implement only what you need.
//! - Observers must not block; they share the run's execution context.

use crate::error::ProducerError;

/// Listener attached to an action with [`ActionBuilder::observe`](crate::ActionBuilder::observe).
///
/// ## Example
/// ```rust
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use fromto::Observe;
///
/// #[derive(Default)]
/// struct Counter(AtomicUsize);
///
/// impl Observe<u64> for Counter {
///     fn on_value(&self, _value: &u64) {
///         self.0.fetch_add(1, Ordering::Relaxed);
///     }
/// }
/// ```
pub trait Observe<T>: Send + Sync + 'static {
    /// Called for each value of an open run.
    fn on_value(&self, _value: &T) {}

    /// Called once when a run fails.
    fn on_error(&self, _error: &ProducerError) {}

    /// Called once when a run completes.
    fn on_complete(&self) {}
}
