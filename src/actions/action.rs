//! # Action: one cancellable asynchronous unit of work.
//!
//! An [`Action`] wraps a [`Producer`](crate::Producer) together with its sinks,
//! an atomic running flag and the [`RunGate`] of the current run.
//!
//! ## Run flow
//! ```text
//! start(notify)                                  [slot lock]
//!   ├─► revoke previous gate (if any)        ── last writer wins
//!   ├─► notify.before_start()
//!   ├─► running = true, new gate in slot
//!   ├─► tokio::spawn(drive)
//!   └─► barrier on previous gate                 [slot released]
//!             ├─ values    ──► gate.dispatch(sinks.value)
//!             ├─ Ok(())    ──► gate.finish(sinks.complete; release slot) ──► after_finish(Completed)
//!             ├─ Err(e)    ──► gate.finish(sinks.error;    release slot) ──► after_finish(Failed)
//!             └─ cancelled ──► return (stop already reported)
//! ```
//!
//! ## Rules
//! - `running` is true iff the slot holds a gate; both change together under the slot lock.
//! - Lock order is gate dispatch → slot. Start and stop revoke under the slot lock and wait
//!   for an in-flight sink only after releasing it, so a sink may stop its action (or group)
//!   while another thread does the same.
//! - A superseded or stopped run never touches sinks or the running flag again.

use std::borrow::Cow;
use std::cell::RefCell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::FutureExt;
use parking_lot::ReentrantMutex;
use tracing::{debug, trace};

use crate::actions::builder::ActionBuilder;
use crate::actions::gate::RunGate;
use crate::actions::lifecycle::{Lifecycle, Notify, Outcome};
use crate::actions::sinks::Sinks;
use crate::error::ProducerError;
use crate::producers::{BoxProducerFuture, Emitter, ProducerRef};

/// A cancellable unit of work producing values of type `T`.
///
/// Built with [`ActionBuilder`]; driven through the [`Lifecycle`] trait.
pub struct Action<T> {
    name: Cow<'static, str>,
    producer: ProducerRef<T>,
    sinks: Arc<Sinks<T>>,
    held: Arc<Held>,
}

/// The run currently held by an action, shared with its driver task.
struct Held {
    slot: ReentrantMutex<RefCell<Option<Arc<RunGate>>>>,
    running: AtomicBool,
}

impl Held {
    /// Clears the slot and the running flag if `gate` is still the held run.
    ///
    /// Takes the slot lock; callers may hold `gate`'s dispatch lock, never the reverse.
    fn release(&self, gate: &Arc<RunGate>) -> bool {
        let slot = self.slot.lock();
        let mut held = slot.borrow_mut();
        if !held.as_ref().is_some_and(|current| Arc::ptr_eq(current, gate)) {
            return false;
        }
        *held = None;
        self.running.store(false, Ordering::SeqCst);
        true
    }
}

impl<T: Send + 'static> Action<T> {
    /// Returns a builder for an action named `name`.
    pub fn builder(name: impl Into<Cow<'static, str>>) -> ActionBuilder<T> {
        ActionBuilder::new(name)
    }

    pub(crate) fn new(name: Cow<'static, str>, producer: ProducerRef<T>, sinks: Sinks<T>) -> Self {
        Self {
            name,
            producer,
            sinks: Arc::new(sinks),
            held: Arc::new(Held {
                slot: ReentrantMutex::new(RefCell::new(None)),
                running: AtomicBool::new(false),
            }),
        }
    }
}

impl<T> Action<T> {
    /// Returns the action name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` while a run is held. Never blocks.
    pub fn is_running(&self) -> bool {
        self.held.running.load(Ordering::SeqCst)
    }
}

impl<T: Send + 'static> Lifecycle for Action<T> {
    fn name(&self) -> &str {
        Action::name(self)
    }

    fn is_running(&self) -> bool {
        Action::is_running(self)
    }

    fn start(&self, notify: Arc<dyn Notify>) {
        let slot = self.held.slot.lock();

        let previous = slot.borrow_mut().take();
        let replaced = previous.as_ref().is_some_and(|gate| gate.revoke());
        if replaced {
            debug!(action = %self.name, "replacing in-flight run");
        }

        notify.before_start(&self.name);

        let gate = RunGate::new();
        self.held.running.store(true, Ordering::SeqCst);
        *slot.borrow_mut() = Some(Arc::clone(&gate));

        let emitter = Emitter::new(Arc::clone(&gate), Arc::clone(&self.sinks));
        let run = self.producer.spawn(emitter, gate.token());
        trace!(action = %self.name, "run spawned");

        tokio::spawn(drive(
            self.name.clone(),
            run,
            gate,
            Arc::clone(&self.sinks),
            Arc::clone(&self.held),
            notify,
        ));
        drop(slot);

        // Wait for a sink of the replaced run outside the slot lock.
        if let Some(previous) = previous.filter(|_| replaced) {
            previous.barrier();
        }
    }

    fn stop(&self, notify: &dyn Notify) {
        let (held, in_flight) = {
            let slot = self.held.slot.lock();
            let held = slot.borrow_mut().take();
            let in_flight = held.as_ref().is_some_and(|gate| gate.revoke());
            self.held.running.store(false, Ordering::SeqCst);
            (held, in_flight)
        };
        if let Some(gate) = held {
            gate.barrier();
        }
        if in_flight {
            debug!(action = %self.name, "run cancelled");
        }
        notify.after_finish(&self.name, Outcome::Stopped { in_flight });
    }
}

impl<T> fmt::Debug for Action<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("name", &self.name)
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

/// Awaits one run and delivers its terminal event, unless the run is cancelled first.
///
/// A panic raised by a sink during the run is resumed here unchanged; only a
/// panic of the producer itself becomes [`ProducerError::Panicked`].
async fn drive<T: 'static>(
    name: Cow<'static, str>,
    run: BoxProducerFuture,
    gate: Arc<RunGate>,
    sinks: Arc<Sinks<T>>,
    held: Arc<Held>,
    notify: Arc<dyn Notify>,
) {
    let token = gate.token();
    let res = tokio::select! {
        biased;
        _ = token.cancelled() => return,
        res = AssertUnwindSafe(run).catch_unwind() => res,
    };
    let res = match res {
        Ok(res) => res,
        Err(payload) if gate.sink_panicked() => panic::resume_unwind(payload),
        Err(payload) => Err(ProducerError::from_panic(payload.as_ref())),
    };

    let outcome = match &res {
        Ok(()) => Outcome::Completed,
        Err(e) => Outcome::Failed {
            error: e.to_string(),
        },
    };
    let finished = gate.finish(|| {
        match res {
            Ok(()) => sinks.complete(),
            Err(e) => sinks.error(e),
        }
        held.release(&gate);
    });

    if finished {
        trace!(action = %name, ?outcome, "run finished");
        notify.after_finish(&name, outcome);
    }
}
