use std::fmt;
use std::sync::Arc;

use crate::actions::{RunGate, Sinks};

/// Value channel handed to a producer for one run.
///
/// Values are delivered inline to the action's observers and value sink.
/// Once the run is cancelled or has finished, emitting is a no-op.
pub struct Emitter<T> {
    gate: Arc<RunGate>,
    sinks: Arc<Sinks<T>>,
}

impl<T: 'static> Emitter<T> {
    pub(crate) fn new(gate: Arc<RunGate>, sinks: Arc<Sinks<T>>) -> Self {
        Self { gate, sinks }
    }

    /// Delivers `value` to the action.
    ///
    /// Returns `false` if the run is no longer open and the value was dropped.
    ///
    /// # Panics
    /// A panic raised by a sink or observer ends the run and propagates from here.
    pub fn emit(&self, value: T) -> bool {
        self.gate.dispatch(|| self.sinks.value(value))
    }

    /// Returns `true` once the run was cancelled or finished.
    pub fn is_closed(&self) -> bool {
        self.gate.is_closed()
    }
}

impl<T> Clone for Emitter<T> {
    fn clone(&self) -> Self {
        Self {
            gate: Arc::clone(&self.gate),
            sinks: Arc::clone(&self.sinks),
        }
    }
}

impl<T: 'static> fmt::Debug for Emitter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("closed", &self.is_closed())
            .finish()
    }
}
