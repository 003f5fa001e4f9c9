//! # Lifecycle contract between an action and its owner.
//!
//! An action knows nothing about groups. It reports two things to whoever
//! started it, through [`Notify`]:
//! - `before_start`: a run is about to begin (called before the producer can emit);
//! - `after_finish`: the running flag has just been cleared.
//!
//! Owners drive actions through [`Lifecycle`], which is object-safe so that a
//! [`Group`](crate::Group) can hold actions of different value types.
//!
//! ```text
//! Group::start ──► Lifecycle::start(notify) ──► notify.before_start()
//!                                                     │
//!                     producer runs on tokio ◄────────┘
//!                             │
//!          error / completion │ / Lifecycle::stop
//!                             ▼
//!                  notify.after_finish(outcome)
//! ```

use std::sync::Arc;

/// How a run ended, as reported to [`Notify::after_finish`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The producer completed normally.
    Completed,
    /// The producer failed.
    Failed {
        /// Rendered producer error.
        error: String,
    },
    /// The action was stopped by its owner.
    ///
    /// `in_flight` is `false` when the action was already idle.
    Stopped {
        /// Whether a run was cancelled by this stop.
        in_flight: bool,
    },
}

/// Callbacks an action invokes on its owner.
///
/// Both methods are called inline from whichever context triggered the
/// transition (the caller of `start`/`stop`, or a tokio worker) and must
/// return quickly.
pub trait Notify: Send + Sync + 'static {
    /// Called before a run begins, while the action still reports idle.
    fn before_start(&self, action: &str);

    /// Called after the action's running flag was cleared.
    fn after_finish(&self, action: &str, outcome: Outcome);
}

/// Start/stop control over an action, independent of its value type.
pub trait Lifecycle: Send + Sync + 'static {
    /// Returns the action name used in events and logs.
    fn name(&self) -> &str;

    /// Returns `true` while a run is held. Never blocks.
    fn is_running(&self) -> bool;

    /// Starts a new run, cancelling the previous one if it is still in flight.
    ///
    /// Must be called from within a tokio runtime.
    fn start(&self, notify: Arc<dyn Notify>);

    /// Cancels the current run (if any) and reports [`Outcome::Stopped`].
    ///
    /// `after_finish` is invoked even when the action was already idle.
    fn stop(&self, notify: &dyn Notify);
}

/// Shared handle to an action of any value type.
pub type ActionRef = Arc<dyn Lifecycle>;
