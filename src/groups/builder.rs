use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::actions::ActionRef;
use crate::events::Bus;
use crate::groups::{Config, Group};
use crate::subscribers::{Subscribe, SubscriberSet};

/// Builder for constructing a [`Group`] with optional features.
pub struct GroupBuilder {
    actions: Vec<ActionRef>,
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl GroupBuilder {
    /// Creates a new builder over `actions`; their order is the start order.
    pub fn new(actions: impl IntoIterator<Item = ActionRef>) -> Self {
        Self {
            actions: actions.into_iter().collect(),
            cfg: Config::default(),
            subscribers: Vec::new(),
        }
    }

    /// Sets the group configuration.
    pub fn with_config(mut self, cfg: Config) -> Self {
        self.cfg = cfg;
        self
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive group events through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the group.
    ///
    /// With subscribers configured this spawns the fan-out listener, so it must
    /// then be called from within a tokio runtime.
    pub fn build(self) -> Group {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let name: Arc<str> = Arc::from(self.cfg.name.as_ref());

        let listener = if self.subscribers.is_empty() {
            None
        } else {
            let token = CancellationToken::new();
            subscriber_listener(&bus, self.subscribers, token.clone());
            Some(token)
        };

        Group::from_parts(name, self.actions, bus, listener)
    }
}

/// Subscribes to the bus and forwards events to the subscriber set until the group is dropped.
fn subscriber_listener(bus: &Bus, subscribers: Vec<Arc<dyn Subscribe>>, token: CancellationToken) {
    let mut rx = bus.subscribe();
    let set = SubscriberSet::new(subscribers, bus.clone());

    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                msg = rx.recv() => match msg {
                    Ok(ev) => set.emit(&ev),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "subscriber listener lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
        while let Ok(ev) = rx.try_recv() {
            set.emit(&ev);
        }
        set.shutdown().await;
    });
}
