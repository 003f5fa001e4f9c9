//! # SubscriberSet: fan-out of group events to subscriber workers.
//!
//! Every subscriber owns one lane: a bounded queue drained by a dedicated
//! tokio task. [`SubscriberSet::emit`] only enqueues, so a slow or stuck
//! subscriber delays nobody but itself.
//!
//! ```text
//! emit(&Event) ──► Arc<Event> ──┬─► lane "log"     ─► worker ─► on_event()
//!                               ├─► lane "metrics" ─► worker ─► on_event()
//!                               └─► lane ...
//! ```
//!
//! ## Rules
//! - Order is preserved within a lane; lanes are not ordered against each other.
//! - A full or closed lane drops the event for that lane and publishes
//!   `SubscriberOverflow` (never for an overflow report itself).
//! - A panic in `on_event` is caught, logged and published as `SubscriberPanicked`
//!   (never for a panic report itself). The worker keeps running.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::warn;

use crate::error::panic_message;
use crate::events::{Bus, Event, EventKind};
use crate::subscribers::Subscribe;

/// Queue side of one subscriber.
struct Lane {
    name: &'static str,
    queue: mpsc::Sender<Arc<Event>>,
}

/// Non-blocking fan-out over a fixed list of subscribers.
pub struct SubscriberSet {
    lanes: Vec<Lane>,
    workers: Vec<JoinHandle<()>>,
    bus: Bus,
}

impl SubscriberSet {
    /// Spawns one worker per subscriber. Failures are reported on `bus`.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn new(subscribers: Vec<Arc<dyn Subscribe>>, bus: Bus) -> Self {
        let (lanes, workers) = subscribers
            .into_iter()
            .map(|sub| {
                let (queue, rx) = mpsc::channel(sub.queue_capacity().max(1));
                let lane = Lane {
                    name: sub.name(),
                    queue,
                };
                (lane, tokio::spawn(drain(sub, rx, bus.clone())))
            })
            .unzip();

        Self {
            lanes,
            workers,
            bus,
        }
    }

    /// Enqueues `event` for every subscriber without waiting.
    pub fn emit(&self, event: &Event) {
        let shared = Arc::new(event.clone());
        let is_overflow = shared.kind == EventKind::SubscriberOverflow;

        for lane in &self.lanes {
            let reason = match lane.queue.try_send(Arc::clone(&shared)) {
                Ok(()) => continue,
                Err(TrySendError::Full(_)) => "full",
                Err(TrySendError::Closed(_)) => "closed",
            };
            if is_overflow {
                continue;
            }
            warn!(subscriber = lane.name, reason, "subscriber dropped event");
            self.bus.publish(Event::subscriber_overflow(lane.name, reason));
        }
    }

    /// Closes every lane and waits until the workers have drained them.
    pub async fn shutdown(self) {
        drop(self.lanes);
        for worker in self.workers {
            let _ = worker.await;
        }
    }

    /// Returns `true` if the set has no subscribers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    /// Number of subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lanes.len()
    }
}

/// Worker loop of one lane.
async fn drain(sub: Arc<dyn Subscribe>, mut rx: mpsc::Receiver<Arc<Event>>, bus: Bus) {
    while let Some(ev) = rx.recv().await {
        let handled = AssertUnwindSafe(sub.on_event(&ev)).catch_unwind().await;
        let Err(payload) = handled else { continue };

        let info = panic_message(payload.as_ref());
        warn!(subscriber = sub.name(), %info, "subscriber panicked");
        if ev.kind != EventKind::SubscriberPanicked {
            bus.publish(Event::subscriber_panicked(sub.name(), info));
        }
    }
}
