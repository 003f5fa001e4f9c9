//! # Broadcast observer: independent downstream listeners.
//!
//! [`Broadcast`] republishes every signal of an action onto a
//! [`tokio::sync::broadcast`] channel. Listeners call [`Broadcast::subscribe`]
//! whenever they like, without being known to the action at build time.
//!
//! ## Rules
//! - **Non-blocking**: publishing never waits for receivers.
//! - **Late subscribers** only see signals sent after they subscribed.
//! - **Lag**: receivers slower than `capacity` observe `RecvError::Lagged(n)`.
//! - Signals of a run are published under its gate, so nothing is published
//!   for a run after it was stopped.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::error::ProducerError;
use crate::observers::Observe;

/// A signal of one action run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal<T> {
    /// A produced value.
    Value(T),
    /// Terminal failure.
    Error(ProducerError),
    /// Terminal completion.
    Complete,
}

impl<T> Signal<T> {
    /// Returns `true` for [`Signal::Error`] and [`Signal::Complete`].
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Signal::Value(_))
    }
}

/// Observer fanning signals out to any number of broadcast receivers.
#[derive(Debug)]
pub struct Broadcast<T> {
    tx: broadcast::Sender<Signal<T>>,
}

impl<T: Clone + Send + Sync + 'static> Broadcast<T> {
    /// Creates a broadcast observer with the given channel capacity (min 1).
    pub fn new(capacity: usize) -> Arc<Self> {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Arc::new(Self { tx })
    }

    /// Creates a receiver observing subsequent signals.
    pub fn subscribe(&self) -> broadcast::Receiver<Signal<T>> {
        self.tx.subscribe()
    }

    /// Number of live receivers.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl<T: Clone + Send + Sync + 'static> Observe<T> for Broadcast<T> {
    fn on_value(&self, value: &T) {
        let _ = self.tx.send(Signal::Value(value.clone()));
    }

    fn on_error(&self, error: &ProducerError) {
        let _ = self.tx.send(Signal::Error(error.clone()));
    }

    fn on_complete(&self) {
        let _ = self.tx.send(Signal::Complete);
    }
}
