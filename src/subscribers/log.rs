//! # LogWriter: group events as `tracing` records
//!
//! A minimal subscriber that renders incoming [`Event`]s through `tracing`.
//! Install any `tracing` subscriber (e.g. `tracing-subscriber`) to see them.
//!
//! ## Example output
//! ```text
//! INFO fromto: busy group="profile"
//! DEBUG fromto: starting group="profile" action="avatar"
//! DEBUG fromto: completed group="profile" action="avatar"
//! WARN fromto: failed group="profile" action="friends" err="producer failed: timeout"
//! INFO fromto: idle group="profile"
//! ```

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let group = e.group.as_deref().unwrap_or("-");
        let action = e.action.as_deref().unwrap_or("-");
        let err = e.error.as_deref().unwrap_or("-");

        match e.kind {
            EventKind::GroupBusy => info!(target: "fromto", group, "busy"),
            EventKind::GroupIdle => info!(target: "fromto", group, "idle"),
            EventKind::ActionStarting => debug!(target: "fromto", group, action, "starting"),
            EventKind::ActionCompleted => debug!(target: "fromto", group, action, "completed"),
            EventKind::ActionStopped => debug!(target: "fromto", group, action, "stopped"),
            EventKind::ActionFailed => warn!(target: "fromto", group, action, err, "failed"),
            EventKind::SubscriberOverflow => {
                warn!(target: "fromto", subscriber = action, reason = err, "subscriber-overflow")
            }
            EventKind::SubscriberPanicked => {
                warn!(target: "fromto", subscriber = action, info = err, "subscriber-panicked")
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
