//! # Group events emitted while actions run.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Action events**: one member's run flow (starting, completed, failed, stopped)
//! - **Group events**: aggregate busy/idle edges
//! - **Subscriber events**: delivery problems of the subscriber fan-out
//!
//! The [`Event`] struct carries additional metadata such as timestamps, the
//! group and action names, and error messages.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use fromto::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::ActionFailed)
//!     .with_group("profile")
//!     .with_action("avatar")
//!     .with_error("boom");
//!
//! assert_eq!(ev.kind, EventKind::ActionFailed);
//! assert_eq!(ev.action.as_deref(), Some("avatar"));
//! assert_eq!(ev.error.as_deref(), Some("boom"));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of group events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Action events ===
    /// A member is about to start a run.
    ///
    /// Sets:
    /// - `group`, `action`
    ActionStarting,

    /// A member's run completed normally.
    ///
    /// Sets:
    /// - `group`, `action`
    ActionCompleted,

    /// A member's run failed.
    ///
    /// Sets:
    /// - `group`, `action`
    /// - `error`: rendered producer error
    ActionFailed,

    /// A member was stopped while a run was in flight.
    ///
    /// Sets:
    /// - `group`, `action`
    ActionStopped,

    // === Group edges ===
    /// Aggregate state flipped idle → busy.
    ///
    /// Sets:
    /// - `group`
    GroupBusy,

    /// Aggregate state flipped busy → idle.
    ///
    /// Sets:
    /// - `group`
    GroupIdle,

    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `action`: subscriber name
    /// - `error`: panic info/message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `action`: subscriber name
    /// - `error`: reason string (e.g., "full", "closed")
    SubscriberOverflow,
}

/// Group event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Debug, Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Name of the emitting group.
    pub group: Option<Arc<str>>,
    /// Name of the action (or subscriber), if applicable.
    pub action: Option<Arc<str>>,
    /// Human-readable error (failures, overflow details, etc.).
    pub error: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            group: None,
            action: None,
            error: None,
        }
    }

    /// Attaches a group name.
    #[inline]
    pub fn with_group(mut self, group: impl Into<Arc<str>>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Attaches an action name.
    #[inline]
    pub fn with_action(mut self, action: impl Into<Arc<str>>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Attaches an error message.
    #[inline]
    pub fn with_error(mut self, error: impl Into<Arc<str>>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_action(subscriber)
            .with_error(reason)
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_action(subscriber)
            .with_error(info)
    }

    /// Returns `true` for the two aggregate edge kinds.
    #[inline]
    pub fn is_edge(&self) -> bool {
        matches!(self.kind, EventKind::GroupBusy | EventKind::GroupIdle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_numbers_increase() {
        let a = Event::new(EventKind::GroupBusy);
        let b = Event::new(EventKind::GroupIdle);
        assert!(b.seq > a.seq);
        assert!(a.is_edge() && b.is_edge());
    }

    #[test]
    fn subscriber_events_carry_name_and_reason() {
        let ev = Event::subscriber_overflow("metrics", "full");
        assert_eq!(ev.kind, EventKind::SubscriberOverflow);
        assert_eq!(ev.action.as_deref(), Some("metrics"));
        assert_eq!(ev.error.as_deref(), Some("full"));
        assert!(!ev.is_edge());
    }
}
